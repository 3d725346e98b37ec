/// Camila Product API - Request handlers module.
pub mod websocket;

pub use websocket::*;
