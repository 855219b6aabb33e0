use chrono::NaiveDate;
use shared::{
    CropRow, CropTypeRow, CropYieldRow, FruitRow, GrainRow, PesticideRow, SeasonRow, TreatmentRow,
    VegetableRow,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::domain::models::{CropCategory, NewCrop, NewCropYield, NewPesticide};
use crate::error::FarmResult;
use crate::storage::DbConnection;

/// Repository for crops, their lookup tables, categories, yields and
/// pesticide treatments
#[derive(Clone)]
pub struct CropRepository {
    db: DbConnection,
}

impl CropRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Record the season for a planting date unless one is already known
    pub async fn upsert_season(
        &self,
        conn: &mut SqliteConnection,
        planting_date: NaiveDate,
        season: &str,
    ) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO season_by_plant_date (planting_date, season)
            VALUES (?, ?)
            ON CONFLICT (planting_date) DO NOTHING
            "#,
        )
        .bind(planting_date)
        .bind(season)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Record a crop type; an existing type keeps its stored dates
    pub async fn upsert_crop_type(&self, conn: &mut SqliteConnection, crop: &NewCrop) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO crop_type (name, planting_date, harvest_date)
            VALUES (?, ?, ?)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(&crop.name)
        .bind(crop.planting_date)
        .bind(crop.harvest_date)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn insert_grows_crop(&self, conn: &mut SqliteConnection, crop: &NewCrop) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO grows_crop (crop_id, field_id, name)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(crop.crop_id)
        .bind(crop.field_id)
        .bind(&crop.name)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// List crops with the dates of their crop type, ordered by id
    pub async fn list_crops(&self) -> FarmResult<Vec<CropRow>> {
        let crops = sqlx::query(
            r#"
            SELECT g.crop_id, g.field_id, g.name, t.planting_date, t.harvest_date
            FROM grows_crop g
            JOIN crop_type t ON g.name = t.name
            ORDER BY g.crop_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(CropRow {
                crop_id: row.try_get("crop_id")?,
                field_id: row.try_get("field_id")?,
                name: row.try_get("name")?,
                planting_date: row.try_get("planting_date")?,
                harvest_date: row.try_get("harvest_date")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(crops)
    }

    pub async fn list_seasons(&self) -> FarmResult<Vec<SeasonRow>> {
        let seasons = sqlx::query(
            r#"
            SELECT planting_date, season
            FROM season_by_plant_date
            ORDER BY planting_date
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(SeasonRow {
                planting_date: row.try_get("planting_date")?,
                season: row.try_get("season")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(seasons)
    }

    pub async fn list_crop_types(&self) -> FarmResult<Vec<CropTypeRow>> {
        let types = sqlx::query(
            r#"
            SELECT name, planting_date, harvest_date
            FROM crop_type
            ORDER BY name
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(CropTypeRow {
                name: row.try_get("name")?,
                planting_date: row.try_get("planting_date")?,
                harvest_date: row.try_get("harvest_date")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(types)
    }

    pub async fn insert_pesticide(&self, conn: &mut SqliteConnection, pesticide: &NewPesticide) -> FarmResult<()> {
        sqlx::query("INSERT INTO pesticide (pest_id, name) VALUES (?, ?)")
            .bind(pesticide.pest_id)
            .bind(&pesticide.name)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn list_pesticides(&self) -> FarmResult<Vec<PesticideRow>> {
        let pesticides = sqlx::query("SELECT pest_id, name FROM pesticide ORDER BY pest_id")
            .try_map(|row: SqliteRow| {
                Ok(PesticideRow {
                    pest_id: row.try_get("pest_id")?,
                    name: row.try_get("name")?,
                })
            })
            .fetch_all(self.db.pool())
            .await?;

        Ok(pesticides)
    }

    /// Record that a pesticide was applied to a crop
    pub async fn insert_treatment(&self, conn: &mut SqliteConnection, crop_id: i64, pest_id: i64) -> FarmResult<()> {
        sqlx::query("INSERT INTO treats (crop_id, pest_id) VALUES (?, ?)")
            .bind(crop_id)
            .bind(pest_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn list_treatments(&self) -> FarmResult<Vec<TreatmentRow>> {
        let treatments = sqlx::query("SELECT crop_id, pest_id FROM treats ORDER BY crop_id, pest_id")
            .try_map(|row: SqliteRow| {
                Ok(TreatmentRow {
                    crop_id: row.try_get("crop_id")?,
                    pest_id: row.try_get("pest_id")?,
                })
            })
            .fetch_all(self.db.pool())
            .await?;

        Ok(treatments)
    }

    /// Insert the category row (grain, vegetable or fruit) for a crop
    pub async fn insert_category(&self, conn: &mut SqliteConnection, category: &CropCategory) -> FarmResult<()> {
        let query = match category {
            CropCategory::Grain { crop_id, gluten_content } => {
                sqlx::query("INSERT INTO grain (crop_id, gluten_content) VALUES (?, ?)")
                    .bind(*crop_id)
                    .bind(*gluten_content)
            }
            CropCategory::Vegetable { crop_id, is_leafy } => {
                sqlx::query("INSERT INTO vegetable (crop_id, is_leafy) VALUES (?, ?)")
                    .bind(*crop_id)
                    .bind(i64::from(*is_leafy))
            }
            CropCategory::Fruit { crop_id, sugar_content } => {
                sqlx::query("INSERT INTO fruit (crop_id, sugar_content) VALUES (?, ?)")
                    .bind(*crop_id)
                    .bind(*sugar_content)
            }
        };
        query.execute(conn).await?;
        Ok(())
    }

    pub async fn list_grains(&self) -> FarmResult<Vec<GrainRow>> {
        let grains = sqlx::query("SELECT crop_id, gluten_content FROM grain ORDER BY crop_id")
            .try_map(|row: SqliteRow| {
                Ok(GrainRow {
                    crop_id: row.try_get("crop_id")?,
                    gluten_content: row.try_get("gluten_content")?,
                })
            })
            .fetch_all(self.db.pool())
            .await?;

        Ok(grains)
    }

    pub async fn list_vegetables(&self) -> FarmResult<Vec<VegetableRow>> {
        let vegetables = sqlx::query("SELECT crop_id, is_leafy FROM vegetable ORDER BY crop_id")
            .try_map(|row: SqliteRow| {
                Ok(VegetableRow {
                    crop_id: row.try_get("crop_id")?,
                    is_leafy: row.try_get("is_leafy")?,
                })
            })
            .fetch_all(self.db.pool())
            .await?;

        Ok(vegetables)
    }

    pub async fn list_fruits(&self) -> FarmResult<Vec<FruitRow>> {
        let fruits = sqlx::query("SELECT crop_id, sugar_content FROM fruit ORDER BY crop_id")
            .try_map(|row: SqliteRow| {
                Ok(FruitRow {
                    crop_id: row.try_get("crop_id")?,
                    sugar_content: row.try_get("sugar_content")?,
                })
            })
            .fetch_all(self.db.pool())
            .await?;

        Ok(fruits)
    }

    pub async fn insert_crop_yield(&self, conn: &mut SqliteConnection, crop_yield: &NewCropYield) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO crop_yield_produces (crop_id, total_yield, health_rating)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(crop_yield.crop_id)
        .bind(crop_yield.total_yield)
        .bind(crop_yield.health_rating)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn list_crop_yields(&self) -> FarmResult<Vec<CropYieldRow>> {
        let yields = sqlx::query(
            r#"
            SELECT crop_id, total_yield, health_rating
            FROM crop_yield_produces
            ORDER BY crop_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(CropYieldRow {
                crop_id: row.try_get("crop_id")?,
                total_yield: row.try_get("total_yield")?,
                health_rating: row.try_get("health_rating")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(yields)
    }
}
