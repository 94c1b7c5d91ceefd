pub mod event;
pub mod location;
pub mod movie;
pub mod weather;
