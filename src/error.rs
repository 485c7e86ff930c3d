use {
    actix_web::{
        http::{header::ContentType, StatusCode},
        HttpResponse, ResponseError,
    },
    std::num::ParseIntError,
};

/// Everything a catalog request can be rejected with.
///
/// Every variant is terminal for the request and rendered as a plain text body.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Please provide a title to search.")]
    MissingQuery,

    #[error("Title is required and cannot be empty.")]
    BlankTitle,

    #[error("Book not found")]
    InvalidIndex(#[source] ParseIntError),

    #[error("Book not found")]
    NotFound { index: usize, len: usize },

    #[error("Request body must be a JSON object with a string `title`.")]
    MalformedBody(#[source] serde_json::Error),

    #[error("Malformed query string: {0}")]
    MalformedQuery(String),
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::MissingQuery
            | CatalogError::BlankTitle
            | CatalogError::MalformedBody(_)
            | CatalogError::MalformedQuery(_) => StatusCode::BAD_REQUEST,
            CatalogError::InvalidIndex(_) | CatalogError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        tracing::debug!(error = ?self, "rejected request");

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }
}
