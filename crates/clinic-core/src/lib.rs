//! Clinic Core Library
//!
//! Patients, doctors and visits kept in a pooled SQLite store, behind a
//! validate → build → persist pipeline.
//!
//! # Architecture
//!
//! ```text
//!  (operation, id?, payload?)
//!             │
//!             ▼
//!        validate::*          ── false ──▶ Outcome::Rejected
//!             │ true
//!             ▼
//!   query::* → Statement { sql, params }
//!             │
//!             ▼
//!   Gateway::execute / query  ◀── ConnectionPool (floor..=ceiling)
//!             │
//!             ▼
//!   Outcome::{Created, Success, NotFound}  /  rows
//! ```
//!
//! # Modules
//!
//! - [`schema`]: Required fields per entity and allow-listed column enums
//! - [`models`]: Domain types (Patient, Doctor, Visit, PatientAggregate)
//! - [`validate`]: Pure payload predicates
//! - [`query`]: Parameterized SQL construction, including the aggregate join
//! - [`db`]: SQLite schema, bounded connection pool and statement gateway
//! - [`service`]: Orchestration of validation and persistence
//! - [`config`]: Environment-driven configuration
//! - [`logging`]: Logger bootstrap

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod query;
pub mod schema;
pub mod service;
pub mod validate;

// Re-export commonly used types
pub use config::{ClinicConfig, ConfigError};
pub use db::{ConnectionPool, DbError, DbResult, Gateway, PoolConfig, PoolStatus};
pub use models::{Doctor, Gender, Patient, PatientAggregate, Visit, VisitSummary};
pub use query::Statement;
pub use service::{ClinicService, Fetch, Outcome};
