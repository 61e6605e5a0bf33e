//! HTTP surface for the clinic records service.
//!
//! Thin axum layer over [`clinic_core::ClinicService`]: each request runs on
//! its own task and hands the blocking validate → persist work to tokio's
//! blocking pool.

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use server::HttpServer;
