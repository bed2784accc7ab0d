pub mod image_service;
pub mod product_service;

pub use image_service::{MediaHost, S3MediaHost};
pub use product_service::ProductService;
