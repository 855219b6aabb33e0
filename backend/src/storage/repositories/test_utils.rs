//! Shared fixtures for repository and service tests.
//!
//! In-memory databases disappear with their pool; the file-backed
//! environment keeps its temporary directory alive until it is dropped, even
//! if the test panics.
use tempfile::TempDir;

use crate::config::PoolSettings;
use crate::storage::schema::{split_sql_statements, SAMPLE_DATA};
use crate::storage::DbConnection;

pub const FARMER_ID: i64 = 1;
pub const FARM_ID: i64 = 101;
pub const FIELD_ID: i64 = 1001;

/// Test environment backed by a real database file
pub struct FileTestEnvironment {
    pub db: DbConnection,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl FileTestEnvironment {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", temp_dir.path().join("farm_test.db").display());
        let db = DbConnection::new(&url, &PoolSettings::default())
            .await
            .expect("Failed to create file database");
        Self {
            db,
            _temp_dir: temp_dir,
        }
    }
}

pub async fn setup_test_db() -> DbConnection {
    DbConnection::init_test()
        .await
        .expect("Failed to create test database")
}

/// Run raw fixture statements, in order
pub async fn exec_all(db: &DbConnection, statements: &[&str]) {
    for statement in statements {
        sqlx::query(statement)
            .execute(db.pool())
            .await
            .unwrap_or_else(|e| panic!("fixture statement failed: {}: {}", statement, e));
    }
}

/// One farmer owning farm 101 with field 1001
pub async fn seed_farm(db: &DbConnection) {
    exec_all(
        db,
        &[
            "INSERT INTO contact_info_name (contact_info, name) VALUES ('alice@farm.com', 'Alice')",
            "INSERT INTO farmer (farmer_id, contact_info) VALUES (1, 'alice@farm.com')",
            "INSERT INTO owns_farm (farm_id, name, location, farmer_id) VALUES (101, 'Green Acres', 'Delta', 1)",
            "INSERT INTO contains_field (field_id, farm_id, area) VALUES (1001, 101, 12.5)",
        ],
    )
    .await;
}

/// Seed farm plus a crop type and crop 1 growing on field 1001
pub async fn seed_crop(db: &DbConnection) {
    seed_farm(db).await;
    exec_all(
        db,
        &[
            "INSERT INTO season_by_plant_date (planting_date, season) VALUES ('2024-04-01', 'Spring')",
            "INSERT INTO crop_type (name, planting_date, harvest_date) VALUES ('Wheat', '2024-04-01', '2024-08-01')",
            "INSERT INTO grows_crop (crop_id, field_id, name) VALUES (1, 1001, 'Wheat')",
        ],
    )
    .await;
}

pub async fn count_rows(db: &DbConnection, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    sqlx::query_scalar(&sql)
        .fetch_one(db.pool())
        .await
        .expect("count query failed")
}

/// Load the bundled sample data set
pub async fn seed_sample_data(db: &DbConnection) {
    for statement in split_sql_statements(SAMPLE_DATA) {
        sqlx::query(&statement)
            .execute(db.pool())
            .await
            .unwrap_or_else(|e| panic!("sample statement failed: {}: {}", statement, e));
    }
}
