pub use sea_orm_migration::prelude::*;

mod m20250105_120000_create_companies_table;
mod m20250105_120100_create_jobs_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250105_120000_create_companies_table::Migration),
            Box::new(m20250105_120100_create_jobs_table::Migration),
        ]
    }
}
