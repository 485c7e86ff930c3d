pub mod api;
pub mod index;

pub use self::{api::service as api, index::service as index};
