//! Web API module for the data room.
//!
//! This module provides the REST API over the folder and file catalog,
//! with an OpenAPI document served through Swagger UI.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
