//! # IO Module
//!
//! HTTP interface over the record services.
//!
//! Handlers translate JSON bodies and query strings into service calls and
//! service results into status codes:
//!
//! - `200` with `{data}` for plain table fetches
//! - `200` with `{success: true, message, data?}` for writes and reports
//! - `200` with `{success: false, message, data: []}` for a search that finds
//!   nothing to report (unknown farm, no valid projection attribute)
//! - `400` with `{success: false, message}` for validation, business rule and
//!   constraint failures, and for malformed bodies or query strings
//! - `500` with the same envelope for connectivity and unexpected database
//!   failures

pub mod rest;

pub use rest::router;
