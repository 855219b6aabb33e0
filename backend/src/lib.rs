//! # Farm Records Backend
//!
//! HTTP JSON API over a relational farm-management database.
//!
//! The backend follows a layered architecture:
//! ```text
//! IO Layer (REST handlers, extractors)
//!     ↓
//! Domain Layer (validation, record services)
//!     ↓
//! Storage Layer (pool, transactions, repositories, schema)
//! ```
//!
//! The connection pool is the only shared resource. It is created once at
//! startup and handed to every service through [`AppState`].

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::HttpConfig;
use crate::domain::{
    CertificationService, CropService, FarmService, FarmerService, FieldService, ReportService,
    SystemService,
};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub system_service: SystemService,
    pub farmer_service: FarmerService,
    pub farm_service: FarmService,
    pub field_service: FieldService,
    pub crop_service: CropService,
    pub certification_service: CertificationService,
    pub report_service: ReportService,
}

impl AppState {
    /// Build every service on top of one pool
    pub fn new(db: DbConnection) -> Self {
        Self {
            system_service: SystemService::new(db.clone()),
            farmer_service: FarmerService::new(db.clone()),
            farm_service: FarmService::new(db.clone()),
            field_service: FieldService::new(db.clone()),
            crop_service: CropService::new(db.clone()),
            certification_service: CertificationService::new(db.clone()),
            report_service: ReportService::new(db),
        }
    }
}

/// Create the Axum router with all routes and layers configured
pub fn create_router(state: AppState, http: &HttpConfig) -> Result<Router> {
    let cors = match &http.cors_origin {
        Some(origin) => {
            let origin = origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))?;
            CorsLayer::new().allow_origin(origin)
        }
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods([Method::GET, Method::POST])
    .allow_headers(Any);

    let mut app = io::router();
    if let Some(dir) = &http.static_dir {
        info!("Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    Ok(app
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
