//! # DONKI Common Library
//!
//! Shared code for the DONKI connector crates including:
//! - Tabular schema types returned to the reporting host
//! - Credential types and masking
//! - Date normalization for host-friendly calendar strings
//! - Bootstrap configuration loading
//! - Settings table initialization

pub mod config;
pub mod credentials;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod schema;
pub mod time;

pub use credentials::Credential;
pub use error::{Error, Result};
pub use schema::{DataRow, FieldDescriptor, FieldValue, RequestedField, Schema};
