/// Camila Product API - Services module.
pub mod catalog;

pub use catalog::*;
