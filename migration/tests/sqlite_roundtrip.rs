use migration::sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};
use migration::{Migrator, MigratorTrait};

async fn table_names(db: &migration::sea_orm::DatabaseConnection) -> Vec<String> {
    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        ))
        .await
        .unwrap();
    rows.into_iter()
        .map(|row| row.try_get::<String>("", "name").unwrap())
        .collect()
}

#[tokio::test]
async fn migrations_apply_and_roll_back_on_sqlite() {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    assert_eq!(Migrator::get_pending_migrations(&db).await.unwrap().len(), 2);
    Migrator::up(&db, None).await.unwrap();
    assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());

    let tables = table_names(&db).await;
    for expected in ["attendance", "attrition_record", "employee", "leave_record"] {
        assert!(tables.iter().any(|t| t == expected), "missing {expected}");
    }

    Migrator::down(&db, Some(1)).await.unwrap();
    let tables = table_names(&db).await;
    assert!(tables.iter().any(|t| t == "employee"));
    assert!(!tables.iter().any(|t| t == "attendance"));

    Migrator::up(&db, None).await.unwrap();
    assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
}
