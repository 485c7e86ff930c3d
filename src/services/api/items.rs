use {
    crate::{
        catalog::{BookIndex, SharedCatalog, Title, TitlePayload},
        error::CatalogError,
    },
    actix_web::{delete, get, post, put, web, HttpResponse},
    serde::{Deserialize, Serialize},
    std::convert::TryFrom,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Changed<'m> {
    message: &'m str,
    books: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Removed<'m> {
    message: &'m str,
    removed_book: String,
    books: Vec<String>,
}

#[get("")]
pub async fn list(catalog: web::Data<SharedCatalog>) -> HttpResponse {
    let books = catalog.with(|catalog| catalog.books().to_vec());

    tracing::debug!(count = books.len(), "listing books");

    HttpResponse::Ok().json(books)
}

#[get("/search")]
pub async fn search(
    catalog: web::Data<SharedCatalog>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, CatalogError> {
    let query = query.into_inner().title.ok_or(CatalogError::MissingQuery)?;

    let found = catalog.with(|catalog| catalog.search(&query));

    tracing::debug!(query = %query, matches = found.len(), "searched books");

    Ok(HttpResponse::Ok().json(found))
}

#[get("/{id}")]
pub async fn show(
    catalog: web::Data<SharedCatalog>,
    id: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    let index = id.parse::<BookIndex>()?;

    let title = catalog.with(|catalog| catalog.get(index).map(str::to_string))?;

    tracing::debug!(%index, "fetched book");

    Ok(HttpResponse::Ok().json(title))
}

#[post("")]
pub async fn create(
    catalog: web::Data<SharedCatalog>,
    body: web::Bytes,
) -> Result<HttpResponse, CatalogError> {
    let title = Title::try_from(TitlePayload::from_slice(&body)?)?;

    let (index, books) = catalog.with(|catalog| {
        let index = catalog.add(title);

        (index, catalog.books().to_vec())
    });

    tracing::info!(%index, "added book");

    Ok(HttpResponse::Created().json(Changed {
        message: "Book added successfully",
        books,
    }))
}

#[put("/{id}")]
pub async fn update(
    catalog: web::Data<SharedCatalog>,
    id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, CatalogError> {
    let index = id.parse::<BookIndex>()?;
    let payload = TitlePayload::from_slice(&body);

    let books = catalog.with(|catalog| {
        catalog
            .update(index, payload)
            .map(|()| catalog.books().to_vec())
    })?;

    tracing::info!(%index, "updated book");

    Ok(HttpResponse::Ok().json(Changed {
        message: "Book updated successfully",
        books,
    }))
}

#[delete("/{id}")]
pub async fn remove(
    catalog: web::Data<SharedCatalog>,
    id: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    let index = id.parse::<BookIndex>()?;

    let (removed_book, books) = catalog.with(|catalog| {
        catalog
            .remove(index)
            .map(|removed| (removed, catalog.books().to_vec()))
    })?;

    tracing::info!(%index, removed = %removed_book, "removed book");

    Ok(HttpResponse::Ok().json(Removed {
        message: "Book removed successfully",
        removed_book,
        books,
    }))
}
