#![doc = "The `guilt_tracker` library crate."]
#![doc = ""]
#![doc = "Projects with weighted tasks, owned by users who authenticate with bearer tokens."]
#![doc = "The binary (`main.rs`) wires these modules into an actix-web server; the integration"]
#![doc = "tests build the same `App` against the in-memory store."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::store::{MemoryStore, PgStore, Store};
