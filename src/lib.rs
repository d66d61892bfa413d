#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Credential storage and verification, bearer-token issuance, and owner-scoped"]
#![doc = "task queries for the taskboard backend, plus the record stores, routes and"]
#![doc = "error type the binary (`main.rs`) wires together."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tasks;

pub use crate::error::AppError;
