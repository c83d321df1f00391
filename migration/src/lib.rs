pub use sea_orm_migration::prelude::*;

mod m20251118_000001_employee;
mod m20251118_000002_activity_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251118_000001_employee::Migration),
            Box::new(m20251118_000002_activity_records::Migration),
        ]
    }
}
