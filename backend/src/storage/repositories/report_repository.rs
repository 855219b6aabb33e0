use shared::{AverageIrrigationRow, FarmCropsRow, FieldIdRow, HealthyFieldRow};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::FarmResult;
use crate::storage::DbConnection;

/// Healthy soil pH range, inclusive
pub const HEALTHY_PH_MIN: f64 = 5.5;
pub const HEALTHY_PH_MAX: f64 = 7.5;

/// Read-only reporting queries that span several tables
#[derive(Clone)]
pub struct ReportRepository {
    db: DbConnection,
}

struct FarmCropLine {
    farm_id: i64,
    farmer_name: String,
    contact_info: String,
    crop: Option<String>,
}

impl ReportRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// A farm with its owner and the distinct names of everything grown on it.
    ///
    /// Returns `None` when the farm does not exist.
    pub async fn farm_crops(&self, farm_id: i64) -> FarmResult<Option<FarmCropsRow>> {
        let lines = sqlx::query(
            r#"
            SELECT o.farm_id, c.name AS farmer_name, c.contact_info, t.name AS crop_name
            FROM owns_farm o
            JOIN farmer f ON o.farmer_id = f.farmer_id
            JOIN contact_info_name c ON f.contact_info = c.contact_info
            LEFT JOIN contains_field cf ON cf.farm_id = o.farm_id
            LEFT JOIN grows_crop g ON g.field_id = cf.field_id
            LEFT JOIN crop_type t ON t.name = g.name
            WHERE o.farm_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(farm_id)
        .try_map(|row: SqliteRow| {
            Ok(FarmCropLine {
                farm_id: row.try_get("farm_id")?,
                farmer_name: row.try_get("farmer_name")?,
                contact_info: row.try_get("contact_info")?,
                crop: row.try_get("crop_name")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        let mut lines = lines.into_iter();
        let Some(first) = lines.next() else {
            return Ok(None);
        };

        let mut crops: Vec<String> = first.crop.into_iter().collect();
        for line in lines {
            if let Some(crop) = line.crop {
                if crops.last() != Some(&crop) {
                    crops.push(crop);
                }
            }
        }

        Ok(Some(FarmCropsRow {
            farm_id: first.farm_id,
            farmer_name: first.farmer_name,
            contact_info: first.contact_info,
            crops,
        }))
    }

    /// Average irrigation volume of every field with at least one irrigation event
    pub async fn average_irrigation(&self) -> FarmResult<Vec<AverageIrrigationRow>> {
        let rows = sqlx::query(
            r#"
            SELECT field_id, AVG(volume) AS average_volume
            FROM irrigation_records
            GROUP BY field_id
            ORDER BY field_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(AverageIrrigationRow {
                field_id: row.try_get("field_id")?,
                average_volume: row.try_get("average_volume")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    /// Fields whose average soil pH lies in the healthy range
    pub async fn healthy_fields(&self) -> FarmResult<Vec<HealthyFieldRow>> {
        let rows = sqlx::query(
            r#"
            SELECT field_id, AVG(ph) AS average_ph
            FROM soil_records
            GROUP BY field_id
            HAVING AVG(ph) BETWEEN ? AND ?
            ORDER BY field_id
            "#,
        )
        .bind(HEALTHY_PH_MIN)
        .bind(HEALTHY_PH_MAX)
        .try_map(|row: SqliteRow| {
            Ok(HealthyFieldRow {
                field_id: row.try_get("field_id")?,
                average_ph: row.try_get("average_ph")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    /// Fields with the highest average soil moisture; ties are all returned
    pub async fn highest_moisture_fields(&self) -> FarmResult<Vec<FieldIdRow>> {
        let rows = sqlx::query(
            r#"
            SELECT s.field_id
            FROM soil_records s
            JOIN moisture_by_chemistry m ON s.sample_date = m.sample_date AND s.ph = m.ph
            GROUP BY s.field_id
            HAVING AVG(m.moisture) >= (
                SELECT MAX(avg_moisture)
                FROM (
                    SELECT AVG(m2.moisture) AS avg_moisture
                    FROM soil_records s2
                    JOIN moisture_by_chemistry m2
                        ON s2.sample_date = m2.sample_date AND s2.ph = m2.ph
                    GROUP BY s2.field_id
                )
            )
            ORDER BY s.field_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(FieldIdRow {
                field_id: row.try_get("field_id")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    /// Fields on which every known pesticide was applied to some crop.
    ///
    /// With no pesticides on record every field qualifies.
    pub async fn fields_using_all_pesticides(&self) -> FarmResult<Vec<FieldIdRow>> {
        let rows = sqlx::query(
            r#"
            SELECT cf.field_id
            FROM contains_field cf
            WHERE NOT EXISTS (
                SELECT p.pest_id
                FROM pesticide p
                WHERE NOT EXISTS (
                    SELECT 1
                    FROM grows_crop g
                    JOIN treats t ON t.crop_id = g.crop_id
                    WHERE g.field_id = cf.field_id AND t.pest_id = p.pest_id
                )
            )
            ORDER BY cf.field_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(FieldIdRow {
                field_id: row.try_get("field_id")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }
}
