pub mod client;
pub mod dto;

pub use client::CatalogApiClient;
pub use dto::CourseDto;
