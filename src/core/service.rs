//! Service catalogue - The kinds of work an engagement can deliver.

use crate::{
    config::settings::ServiceConfig,
    entities::{Service, service},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Creates a service after validating its name.
pub async fn create_service(
    db: &DatabaseConnection,
    name: &str,
    short_name: &str,
) -> Result<service::Model> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Service name cannot be empty".to_string(),
        });
    }

    let service = service::ActiveModel {
        name: Set(name.trim().to_string()),
        short_name: Set(short_name.trim().to_string()),
        ..Default::default()
    };
    service.insert(db).await.map_err(Into::into)
}

/// Finds a service by name or short name.
pub async fn find_service(db: &DatabaseConnection, name: &str) -> Result<Option<service::Model>> {
    let name = name.trim();
    Service::find()
        .filter(
            service::Column::Name
                .eq(name)
                .or(service::Column::ShortName.eq(name)),
        )
        .order_by_asc(service::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every service ordered by name.
pub async fn get_all_services(db: &DatabaseConnection) -> Result<Vec<service::Model>> {
    Service::find()
        .order_by_asc(service::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts any configured service not yet in the catalogue. Running it twice is harmless.
pub async fn seed_services(db: &DatabaseConnection, services: &[ServiceConfig]) -> Result<usize> {
    let mut created = 0;
    for config in services {
        let exists = Service::find()
            .filter(service::Column::Name.eq(config.name.trim()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            create_service(db, &config.name, &config.short_name).await?;
            created += 1;
        }
    }
    if created > 0 {
        info!("Seeded {created} services");
    }
    Ok(created)
}
