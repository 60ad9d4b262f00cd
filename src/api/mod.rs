//! API module - HTTP routes, handlers, and models

pub mod handlers;
pub mod models;
pub mod routes;
pub mod text_handlers;
