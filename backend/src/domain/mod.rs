//! # Domain Module
//!
//! Record services for the farm database.
//!
//! Each service validates a wire request, turns it into a typed command from
//! [`models`], and hands it to its repositories, either on a single pooled
//! connection or inside one `unit_of_work` transaction when several rows must
//! be written together. Results come back as the response envelopes from the
//! `shared` crate, with the user-facing messages decided here.
//!
//! ## Module Organization
//!
//! - **validation**: predicates and `require_*` extractors for browser input
//! - **models**: validated write commands
//! - **selection**: typed `WHERE` clause and projection list for fields
//! - **farmer_service / farm_service / field_service / crop_service /
//!   certification_service**: inserts and fetches per entity group
//! - **report_service**: joins, aggregates and the relational division query
//! - **system_service**: connectivity check, table reset and sample data

pub mod certification_service;
pub mod crop_service;
pub mod farm_service;
pub mod farmer_service;
pub mod field_service;
pub mod models;
pub mod report_service;
pub mod selection;
pub mod system_service;
pub mod validation;

pub use certification_service::CertificationService;
pub use crop_service::CropService;
pub use farm_service::FarmService;
pub use farmer_service::FarmerService;
pub use field_service::FieldService;
pub use report_service::ReportService;
pub use system_service::SystemService;
