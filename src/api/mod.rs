//! API Module
//!
//! HTTP handlers and routing for the admin REST API.
//!
//! # Endpoints
//! - `PUT /set`, `PUT /hset` - Store a value
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /keys`, `DELETE /keys` - List or bulk delete by prefix
//! - `GET /values`, `GET /values/json`, `GET /hashes` - Aggregate by prefix
//! - `POST /flush` - Erase the store
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
