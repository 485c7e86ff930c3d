use actix_web::{dev::HttpServiceFactory, get, http::header::ContentType, HttpResponse, Responder};

const INSTRUCTIONS: &str = include_str!("../../static/index.html");

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .insert_header(ContentType::html())
        .body(INSTRUCTIONS)
}

pub fn service() -> impl HttpServiceFactory + 'static {
    index
}
