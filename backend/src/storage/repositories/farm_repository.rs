use shared::FarmRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};

use crate::domain::models::{FarmUpdate, NewFarm};
use crate::error::FarmResult;
use crate::storage::DbConnection;

/// Repository for farms, the only entity that supports update and delete
#[derive(Clone)]
pub struct FarmRepository {
    db: DbConnection,
}

impl FarmRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn insert_farm(&self, conn: &mut SqliteConnection, farm: &NewFarm) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO owns_farm (farm_id, name, location, farmer_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(farm.farm_id)
        .bind(&farm.name)
        .bind(&farm.location)
        .bind(farm.farmer_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// List farms with the owner's name, ordered by id
    pub async fn list_farms(&self) -> FarmResult<Vec<FarmRow>> {
        let farms = sqlx::query(
            r#"
            SELECT o.farm_id, o.name, o.location, o.farmer_id, c.name AS farmer_name
            FROM owns_farm o
            JOIN farmer f ON o.farmer_id = f.farmer_id
            JOIN contact_info_name c ON f.contact_info = c.contact_info
            ORDER BY o.farm_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(FarmRow {
                farm_id: row.try_get("farm_id")?,
                name: row.try_get("name")?,
                location: row.try_get("location")?,
                farmer_id: row.try_get("farmer_id")?,
                farmer_name: row.try_get("farmer_name")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(farms)
    }

    /// Apply the present columns of `update` to one farm.
    ///
    /// Returns the number of rows matched (0 or 1). The caller guarantees
    /// that `update` is not empty.
    pub async fn update_farm(
        &self,
        conn: &mut SqliteConnection,
        farm_id: i64,
        update: &FarmUpdate,
    ) -> FarmResult<u64> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE owns_farm SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(name) = &update.name {
                set.push("name = ").push_bind_unseparated(name.as_str());
            }
            if let Some(location) = &update.location {
                set.push("location = ").push_bind_unseparated(location.as_str());
            }
            if let Some(farmer_id) = update.farmer_id {
                set.push("farmer_id = ").push_bind_unseparated(farmer_id);
            }
        }
        builder.push(" WHERE farm_id = ").push_bind(farm_id);

        let result = builder.build().execute(conn).await?;
        Ok(result.rows_affected())
    }

    /// Delete a farm; fields, crops and their records go with it by cascade
    pub async fn delete_farm(&self, conn: &mut SqliteConnection, farm_id: i64) -> FarmResult<u64> {
        let result = sqlx::query("DELETE FROM owns_farm WHERE farm_id = ?")
            .bind(farm_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
