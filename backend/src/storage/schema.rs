//! # Schema
//!
//! Table definitions for the farm records database. `VARCHAR(n)` limits are
//! expressed as `CHECK (length(col) <= n)` so an oversized value is rejected by
//! the engine instead of being stored.

use sqlx::{SqliteConnection, SqlitePool};

/// Sample rows loaded by `POST /populate-tables`
pub const SAMPLE_DATA: &str = include_str!("../../sql/sample_data.sql");

/// Create statements in dependency order (parents first)
pub const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS contact_info_name (
        contact_info TEXT PRIMARY KEY CHECK (length(contact_info) <= 80),
        name TEXT NOT NULL CHECK (length(name) <= 20)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS farmer (
        farmer_id INTEGER PRIMARY KEY,
        contact_info TEXT NOT NULL UNIQUE
            REFERENCES contact_info_name (contact_info)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS owns_farm (
        farm_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL CHECK (length(name) <= 20),
        location TEXT NOT NULL CHECK (length(location) <= 20),
        farmer_id INTEGER NOT NULL REFERENCES farmer (farmer_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contains_field (
        field_id INTEGER PRIMARY KEY,
        farm_id INTEGER NOT NULL
            REFERENCES owns_farm (farm_id) ON DELETE CASCADE,
        area REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS season_by_plant_date (
        planting_date TEXT PRIMARY KEY,
        season TEXT NOT NULL CHECK (length(season) <= 20)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS crop_type (
        name TEXT PRIMARY KEY CHECK (length(name) <= 60),
        planting_date TEXT NOT NULL
            REFERENCES season_by_plant_date (planting_date),
        harvest_date TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS grows_crop (
        crop_id INTEGER PRIMARY KEY,
        field_id INTEGER NOT NULL
            REFERENCES contains_field (field_id) ON DELETE CASCADE,
        name TEXT NOT NULL REFERENCES crop_type (name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS grain (
        crop_id INTEGER PRIMARY KEY
            REFERENCES grows_crop (crop_id) ON DELETE CASCADE,
        gluten_content REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vegetable (
        crop_id INTEGER PRIMARY KEY
            REFERENCES grows_crop (crop_id) ON DELETE CASCADE,
        is_leafy INTEGER NOT NULL CHECK (is_leafy IN (0, 1))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fruit (
        crop_id INTEGER PRIMARY KEY
            REFERENCES grows_crop (crop_id) ON DELETE CASCADE,
        sugar_content REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS crop_yield_produces (
        crop_id INTEGER PRIMARY KEY
            REFERENCES grows_crop (crop_id) ON DELETE CASCADE,
        total_yield REAL NOT NULL,
        health_rating INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pesticide (
        pest_id INTEGER PRIMARY KEY,
        name TEXT CHECK (length(name) <= 60)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS treats (
        crop_id INTEGER NOT NULL
            REFERENCES grows_crop (crop_id) ON DELETE CASCADE,
        pest_id INTEGER NOT NULL
            REFERENCES pesticide (pest_id) ON DELETE CASCADE,
        PRIMARY KEY (crop_id, pest_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS irrigation_records (
        irrig_id INTEGER PRIMARY KEY,
        field_id INTEGER NOT NULL
            REFERENCES contains_field (field_id) ON DELETE CASCADE,
        event_date TEXT,
        volume REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS moisture_by_chemistry (
        sample_date TEXT NOT NULL,
        ph REAL NOT NULL,
        moisture REAL NOT NULL,
        PRIMARY KEY (sample_date, ph)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS soil_records (
        soil_cond_id INTEGER PRIMARY KEY,
        field_id INTEGER NOT NULL
            REFERENCES contains_field (field_id) ON DELETE CASCADE,
        sample_date TEXT NOT NULL,
        ph REAL NOT NULL,
        FOREIGN KEY (sample_date, ph)
            REFERENCES moisture_by_chemistry (sample_date, ph)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS award_expiry (
        awarded_date TEXT PRIMARY KEY,
        expiry_date TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS certification (
        cert_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL CHECK (length(name) <= 80),
        awarded_date TEXT NOT NULL REFERENCES award_expiry (awarded_date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS receives (
        farm_id INTEGER NOT NULL
            REFERENCES owns_farm (farm_id) ON DELETE CASCADE,
        cert_id INTEGER NOT NULL REFERENCES certification (cert_id),
        PRIMARY KEY (farm_id, cert_id)
    )
    "#,
];

/// Every table, children first, so dropping in this order never trips a
/// foreign key
pub const TABLES_CHILD_FIRST: &[&str] = &[
    "receives",
    "certification",
    "award_expiry",
    "soil_records",
    "moisture_by_chemistry",
    "irrigation_records",
    "treats",
    "pesticide",
    "crop_yield_produces",
    "fruit",
    "vegetable",
    "grain",
    "grows_crop",
    "crop_type",
    "season_by_plant_date",
    "contains_field",
    "owns_farm",
    "farmer",
    "contact_info_name",
];

/// Create any missing table
pub async fn create_all(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Drop every table and create the schema again, on one connection
pub async fn recreate_all(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for table in TABLES_CHILD_FIRST {
        let statement = format!("DROP TABLE IF EXISTS {}", table);
        sqlx::query(&statement).execute(&mut *conn).await?;
    }
    for statement in CREATE_TABLES {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Split a SQL script into executable statements.
///
/// `--` comments are removed line by line, each statement is collapsed onto
/// one line, and empty statements are discarded. Semicolons inside string
/// literals are not supported.
pub fn split_sql_statements(script: &str) -> Vec<String> {
    // Comments go first so a `;` inside one never ends a statement
    let uncommented = script
        .lines()
        .map(|line| match line.find("--") {
            Some(index) => line[..index].trim(),
            None => line.trim(),
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    uncommented
        .split(';')
        .map(|statement| statement.trim().to_string())
        .filter(|statement| !statement.is_empty())
        .collect()
}
