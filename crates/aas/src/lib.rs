//! AAS - Asset Administration Shell store
//!
//! This crate provides:
//! - The record codec for shells (`codec`)
//! - A durable redb-backed shell repository (`repository`)
//! - Fleet analytics and threshold alerts over the stored shells
//!   (`analytics`, `alerts`)
//!
//! The entity model itself lives in `aas_types`.

pub use aas_types;

// Threshold rules
pub mod alerts;

// Derived fleet views
pub mod analytics;

// Shell <-> bytes
pub mod codec;

pub mod config;
pub mod error;

// Durable store
pub mod repository;

pub use analytics::FleetAnalytics;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use repository::Repository;
