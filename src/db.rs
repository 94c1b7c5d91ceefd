use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement,
};
use sea_orm_migration::MigratorTrait;

use crate::error::AppResult;

// only settings stored in the database file belong here; per-connection
// pragmas would reach just the pooled connection that ran them
const SQLITE_PRAGMAS: [&str; 1] = ["PRAGMA journal_mode=WAL"];

pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url.to_string());
    opt.sqlx_logging(false);
    // every pooled connection to an in-memory sqlite url gets its own database
    if database_url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opt).await?;

    if db.get_database_backend() == DbBackend::Sqlite {
        for pragma in SQLITE_PRAGMAS {
            db.execute(Statement::from_string(DbBackend::Sqlite, pragma.to_string())).await?;
        }
    }

    migration::Migrator::up(&db, None).await?;
    tracing::debug!(backend = ?db.get_database_backend(), "database ready");

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn journal_mode(db: &DatabaseConnection) -> String {
        let row = db
            .query_one(Statement::from_string(DbBackend::Sqlite, "PRAGMA journal_mode".to_string()))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "journal_mode").unwrap()
    }

    #[tokio::test]
    async fn wal_mode_persists_for_later_connections() {
        let path = std::env::temp_dir().join(format!("cityscope-db-{}.db", std::process::id()));
        let url = format!("sqlite://{}?mode=rwc", path.display());

        let first = connect_and_migrate(&url).await.unwrap();
        assert_eq!(journal_mode(&first).await, "wal");

        let second = Database::connect(url.as_str()).await.unwrap();
        assert_eq!(journal_mode(&second).await, "wal");

        first.close().await.unwrap();
        second.close().await.unwrap();
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }
}
