/// Camila Product API - Data models.
pub mod message;
pub mod product;

pub use message::*;
pub use product::*;
