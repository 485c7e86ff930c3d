pub mod items;

use {
    crate::error::CatalogError,
    actix_web::{dev::HttpServiceFactory, web},
};

pub fn service() -> impl HttpServiceFactory + 'static {
    // `search` has to be registered before `{id}` or it would be read as an index.
    web::scope("/api/items")
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            CatalogError::MalformedQuery(err.to_string()).into()
        }))
        .service(items::list)
        .service(items::create)
        .service(items::search)
        .service(items::show)
        .service(items::update)
        .service(items::remove)
}
