//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: reclaims expired entries of the in-memory store

mod sweeper;

pub use sweeper::spawn_expiry_sweeper;
