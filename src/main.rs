mod catalog;
mod config;
mod error;
mod services;

mod logger;

use {
    crate::{
        catalog::{Catalog, SharedCatalog},
        config::Config,
        logger::TracingLogger,
    },
    actix_web::{web, App, HttpServer},
};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    logger::init()?;

    let config = Config::from_env()?;

    // Created once so every worker shares the same catalog.
    let catalog = web::Data::new(SharedCatalog::new(Catalog::seeded()));

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(catalog.clone())
            .service(services::index())
            .service(services::api())
            .wrap(TracingLogger)
    })
    .bind(config.bind)?;

    if let Some(workers) = config.workers {
        server = server.workers(workers.get());
    }

    tracing::info!(bind = %config.bind, "Server is running");

    server.run().await?;

    Ok(())
}
