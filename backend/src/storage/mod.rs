//! # Storage Module
//!
//! Everything that talks to SQLite.
//!
//! - **connection** - pool ownership, connection checkout and the
//!   `unit_of_work` transaction wrapper
//! - **schema** - table definitions and the sample-data script splitter
//! - **repositories** - parameterized SQL per entity and per report
//!
//! Repositories never validate input; they bind what the domain layer hands
//! them and let the engine enforce keys, references and length limits.

pub mod connection;
pub mod repositories;
pub mod schema;

pub use connection::{BoxFuture, DbConnection};
pub use repositories::{
    CertificationRepository, CropRepository, FarmRepository, FarmerRepository, FieldRepository,
    ReportRepository,
};
