use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use tracing::{debug, info};

use super::{CompanyRecord, JobKey, JobStore, NewCompany, NewJob};
use crate::entities::{company, job};
use crate::error::StoreError;

/// sea-orm backed store. Works against Postgres (Supabase) and SQLite.
#[derive(Clone, Debug)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    /// Connects and applies pending migrations.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let mut options = ConnectOptions::new(url.to_owned());
        options.sqlx_logging(false);
        // Every pooled connection to an in-memory SQLite database sees a different database.
        if url.starts_with("sqlite::memory:") {
            options.max_connections(1).min_connections(1);
        }

        let db = Database::connect(options).await?;
        info!("Database connection established.");
        Self::from_connection(db).await
    }

    pub async fn from_connection(db: DatabaseConnection) -> Result<Self, StoreError> {
        Migrator::up(&db, None).await?;
        Ok(Self { db })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl JobStore for DatabaseStore {
    async fn upsert_company(&self, company: &NewCompany) -> Result<CompanyRecord, StoreError> {
        let existing = company::Entity::find()
            .filter(company::Column::Name.eq(company.name.as_str()))
            .one(&self.db)
            .await?;

        match existing {
            Some(model) => {
                let id = model.id;
                let mut am: company::ActiveModel = model.into();
                am.website_url = Set(company.website_url.clone());
                am.updated_at = Set(company.updated_at);
                am.update(&self.db).await?;
                debug!("Updated company {} (id {})", company.name, id);
                Ok(CompanyRecord { id, created: false })
            }
            None => {
                let am = company::ActiveModel {
                    name: Set(company.name.clone()),
                    website_url: Set(company.website_url.clone()),
                    updated_at: Set(company.updated_at),
                    ..Default::default()
                };
                let model = am.insert(&self.db).await?;
                debug!("Created company {} (id {})", company.name, model.id);
                Ok(CompanyRecord {
                    id: model.id,
                    created: true,
                })
            }
        }
    }

    async fn find_job(&self, key: &JobKey<'_>) -> Result<Option<i32>, StoreError> {
        let found = job::Entity::find()
            .filter(job::Column::CompanyId.eq(key.company_id))
            .filter(job::Column::Title.eq(key.title))
            .filter(job::Column::ApplicationUrl.eq(key.application_url))
            .one(&self.db)
            .await?;
        Ok(found.map(|model| model.id))
    }

    async fn insert_job(&self, new_job: &NewJob) -> Result<i32, StoreError> {
        let am = job::ActiveModel {
            company_id: Set(new_job.company_id),
            title: Set(new_job.title.clone()),
            location: Set(new_job.location.clone()),
            application_url: Set(new_job.application_url.clone()),
            date_posted: Set(new_job.date_posted),
            updated_at: Set(new_job.updated_at),
            ..Default::default()
        };
        let model = am.insert(&self.db).await?;
        Ok(model.id)
    }
}
