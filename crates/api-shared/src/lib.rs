//! # API Shared
//!
//! Shared utilities and definitions for the RxPad APIs.
//!
//! Contains:
//! - Request and response bodies of the JSON API (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the `rxpad-run` binary.

pub mod dto;
pub mod health;

pub use dto::{FieldEditReq, HealthRes, PrintRes, PrintStatus};
pub use health::HealthService;
