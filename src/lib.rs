//! Cache Admin - bulk maintenance operations over a key-value cache
//!
//! Enumerates keys by prefix, aggregates their values, deletes them in bulk
//! and flushes the whole store. Ships with an in-memory store and an HTTP
//! front end for it.

pub mod admin;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod keys;
pub mod memory;
pub mod models;
pub mod tasks;


pub use admin::{AdminSettings, KeyStream, PurgeReport, ServerUtil};
pub use api::AppState;
pub use client::{ServerClient, ServerHandle, ValueClient, ValueClientExt};
pub use config::Config;
pub use error::{AdminError, Result};
pub use memory::MemoryStore;
pub use tasks::spawn_expiry_sweeper;
