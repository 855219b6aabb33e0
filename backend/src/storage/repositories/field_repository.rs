use serde_json::Value;
use shared::{FieldRecord, FieldRow, IrrigationRow, MoistureRow, ProjectedRow, SoilRecordRow};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};

use crate::domain::models::{NewField, NewIrrigation, NewMoisture, NewSoilRecord};
use crate::domain::selection::{FieldColumn, FieldSelection};
use crate::error::FarmResult;
use crate::storage::DbConnection;

/// Repository for fields and the per-field irrigation and soil records
#[derive(Clone)]
pub struct FieldRepository {
    db: DbConnection,
}

impl FieldRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn insert_field(&self, conn: &mut SqliteConnection, field: &NewField) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contains_field (field_id, farm_id, area)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(field.field_id)
        .bind(field.farm_id)
        .bind(field.area)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// List fields with the farm name, ordered by id
    pub async fn list_fields(&self) -> FarmResult<Vec<FieldRow>> {
        let fields = sqlx::query(
            r#"
            SELECT cf.field_id, cf.farm_id, cf.area, o.name AS farm_name
            FROM contains_field cf
            JOIN owns_farm o ON cf.farm_id = o.farm_id
            ORDER BY cf.field_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(FieldRow {
                field_id: row.try_get("field_id")?,
                farm_id: row.try_get("farm_id")?,
                area: row.try_get("area")?,
                farm_name: row.try_get("farm_name")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(fields)
    }

    /// Fields matching `selection`; every field when it has no conditions.
    ///
    /// Conditions fold left to right, so `a AND b OR c` runs as
    /// `((a AND b) OR c)`.
    pub async fn select_fields(&self, selection: &FieldSelection) -> FarmResult<Vec<FieldRecord>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT field_id, farm_id, area FROM contains_field");

        let conditions = selection.conditions();
        if let Some((first, rest)) = conditions.split_first() {
            builder.push(" WHERE ");
            for _ in rest {
                builder.push("(");
            }
            builder
                .push(first.column.sql())
                .push(first.comparison.sql())
                .push_bind(first.value);
            for condition in rest {
                builder
                    .push(condition.connector.sql())
                    .push(condition.column.sql())
                    .push(condition.comparison.sql())
                    .push_bind(condition.value)
                    .push(")");
            }
        }
        builder.push(" ORDER BY field_id");

        let fields = builder
            .build()
            .try_map(|row: SqliteRow| {
                Ok(FieldRecord {
                    field_id: row.try_get("field_id")?,
                    farm_id: row.try_get("farm_id")?,
                    area: row.try_get("area")?,
                })
            })
            .fetch_all(self.db.pool())
            .await?;

        Ok(fields)
    }

    /// Project the field table onto `columns`, in the given order.
    ///
    /// `columns` must not be empty.
    pub async fn project_fields(&self, columns: &[FieldColumn]) -> FarmResult<Vec<ProjectedRow>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
        {
            let mut list = builder.separated(", ");
            for column in columns {
                list.push(column.sql());
            }
        }
        builder.push(" FROM contains_field ORDER BY field_id");

        let rows = builder
            .build()
            .try_map(|row: SqliteRow| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(index, column)| project_value(&row, index, *column))
                    .collect::<Result<ProjectedRow, sqlx::Error>>()
            })
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows)
    }

    pub async fn insert_irrigation(
        &self,
        conn: &mut SqliteConnection,
        record: &NewIrrigation,
    ) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO irrigation_records (irrig_id, field_id, event_date, volume)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.irrig_id)
        .bind(record.field_id)
        .bind(record.event_date)
        .bind(record.volume)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn list_irrigation(&self) -> FarmResult<Vec<IrrigationRow>> {
        let records = sqlx::query(
            r#"
            SELECT irrig_id, field_id, event_date, volume
            FROM irrigation_records
            ORDER BY irrig_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(IrrigationRow {
                irrig_id: row.try_get("irrig_id")?,
                field_id: row.try_get("field_id")?,
                event_date: row.try_get("event_date")?,
                volume: row.try_get("volume")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(records)
    }

    /// Insert a moisture reading; an existing (date, pH) pair is a duplicate
    pub async fn insert_moisture(&self, conn: &mut SqliteConnection, moisture: &NewMoisture) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO moisture_by_chemistry (sample_date, ph, moisture)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(moisture.sample_date)
        .bind(moisture.ph)
        .bind(moisture.moisture)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Insert a moisture reading unless its (date, pH) pair is already known
    pub async fn upsert_moisture(&self, conn: &mut SqliteConnection, moisture: &NewMoisture) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO moisture_by_chemistry (sample_date, ph, moisture)
            VALUES (?, ?, ?)
            ON CONFLICT (sample_date, ph) DO NOTHING
            "#,
        )
        .bind(moisture.sample_date)
        .bind(moisture.ph)
        .bind(moisture.moisture)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Insert a soil sample; its (date, pH) pair must already have a moisture reading
    pub async fn insert_soil_record(&self, conn: &mut SqliteConnection, record: &NewSoilRecord) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO soil_records (soil_cond_id, field_id, sample_date, ph)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.soil_cond_id)
        .bind(record.field_id)
        .bind(record.moisture.sample_date)
        .bind(record.moisture.ph)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn list_soil_records(&self) -> FarmResult<Vec<SoilRecordRow>> {
        let records = sqlx::query(
            r#"
            SELECT soil_cond_id, field_id, sample_date, ph
            FROM soil_records
            ORDER BY soil_cond_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(SoilRecordRow {
                soil_cond_id: row.try_get("soil_cond_id")?,
                field_id: row.try_get("field_id")?,
                sample_date: row.try_get("sample_date")?,
                ph: row.try_get("ph")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(records)
    }

    pub async fn list_moisture(&self) -> FarmResult<Vec<MoistureRow>> {
        let readings = sqlx::query(
            r#"
            SELECT sample_date, ph, moisture
            FROM moisture_by_chemistry
            ORDER BY sample_date, ph
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(MoistureRow {
                sample_date: row.try_get("sample_date")?,
                ph: row.try_get("ph")?,
                moisture: row.try_get("moisture")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(readings)
    }
}

fn project_value(row: &SqliteRow, index: usize, column: FieldColumn) -> Result<Value, sqlx::Error> {
    let value = match column {
        FieldColumn::FieldId | FieldColumn::FarmId => Value::from(row.try_get::<i64, _>(index)?),
        FieldColumn::Area => row
            .try_get::<Option<f64>, _>(index)?
            .map(Value::from)
            .unwrap_or(Value::Null),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::selection::{Comparison, Condition, Connector};
    use crate::error::FarmError;
    use crate::storage::repositories::test_utils::{count_rows, exec_all, seed_farm, setup_test_db, FIELD_ID};
    use chrono::NaiveDate;
    use serde_json::json;
    use shared::{Scalar, SelectionCondition, SelectionRequest};

    async fn setup_fields() -> (DbConnection, FieldRepository) {
        let db = setup_test_db().await;
        seed_farm(&db).await;
        exec_all(
            &db,
            &[
                "INSERT INTO contains_field (field_id, farm_id, area) VALUES (1002, 101, 4.0)",
                "INSERT INTO contains_field (field_id, farm_id, area) VALUES (1003, 101, 25.0)",
                "INSERT INTO contains_field (field_id, farm_id, area) VALUES (1004, 101, NULL)",
            ],
        )
        .await;
        let repo = FieldRepository::new(db.clone());
        (db, repo)
    }

    fn selection(conditions: &[(&str, &str, f64, &str)]) -> FieldSelection {
        let request = SelectionRequest {
            conditions: conditions
                .iter()
                .map(|(attribute, operator, value, connector)| SelectionCondition {
                    attribute: attribute.to_string(),
                    operator: operator.to_string(),
                    value: Some(Scalar::Float(*value)),
                    connector: Some(connector.to_string()),
                })
                .collect(),
        };
        FieldSelection::from_request(&request).unwrap()
    }

    fn ids(fields: &[FieldRecord]) -> Vec<i64> {
        fields.iter().map(|f| f.field_id).collect()
    }

    #[tokio::test]
    async fn test_empty_selection_returns_every_field() {
        let (_db, repo) = setup_fields().await;

        let fields = repo.select_fields(&FieldSelection::default()).await.unwrap();
        assert_eq!(ids(&fields), vec![1001, 1002, 1003, 1004]);
    }

    #[tokio::test]
    async fn test_area_filter_returns_subset() {
        let (_db, repo) = setup_fields().await;

        let fields = repo.select_fields(&selection(&[("Area", ">", 10.0, "AND")])).await.unwrap();
        assert_eq!(ids(&fields), vec![1001, 1003]);
        assert_eq!(fields[0].area, Some(12.5));
    }

    #[tokio::test]
    async fn test_conditions_fold_left_to_right() {
        let (_db, repo) = setup_fields().await;

        // ((Area > 10 OR FieldID = 1002) AND Area < 20) keeps 1001 and 1002;
        // the precedence-based reading (Area > 10 OR (FieldID = 1002 AND Area < 20))
        // would also keep 1003.
        let fields = repo
            .select_fields(&selection(&[
                ("Area", ">", 10.0, "AND"),
                ("FieldID", "=", 1002.0, "OR"),
                ("Area", "<", 20.0, "AND"),
            ]))
            .await
            .unwrap();
        assert_eq!(ids(&fields), vec![1001, 1002]);
    }

    #[tokio::test]
    async fn test_built_condition_values_are_bound() {
        let (_db, repo) = setup_fields().await;

        let selection = {
            let mut request = SelectionRequest::default();
            request.conditions.push(SelectionCondition {
                attribute: "FieldID".to_string(),
                operator: ">=".to_string(),
                value: Some(Scalar::from("1003")),
                connector: None,
            });
            FieldSelection::from_request(&request).unwrap()
        };
        assert_eq!(
            selection.conditions()[0],
            Condition {
                column: FieldColumn::FieldId,
                comparison: Comparison::Ge,
                value: 1003.0,
                connector: Connector::And,
            }
        );

        let fields = repo.select_fields(&selection).await.unwrap();
        assert_eq!(ids(&fields), vec![1003, 1004]);
    }

    #[tokio::test]
    async fn test_projection_keeps_requested_order() {
        let (_db, repo) = setup_fields().await;

        let rows = repo
            .project_fields(&[FieldColumn::Area, FieldColumn::FieldId])
            .await
            .unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec![json!(12.5), json!(1001)]);
        assert_eq!(rows[3], vec![Value::Null, json!(1004)]);
    }

    #[tokio::test]
    async fn test_soil_record_requires_moisture_reading() {
        let (db, repo) = setup_fields().await;
        let moisture = NewMoisture {
            sample_date: NaiveDate::from_ymd_opt(2024, 5, 12).unwrap(),
            ph: 6.5,
            moisture: 31.0,
        };
        let record = NewSoilRecord {
            soil_cond_id: 1,
            field_id: FIELD_ID,
            moisture: moisture.clone(),
        };

        let mut conn = db.acquire().await.unwrap();
        let err = repo.insert_soil_record(&mut conn, &record).await.unwrap_err();
        assert!(matches!(err, FarmError::MissingReference(_)));

        repo.upsert_moisture(&mut conn, &moisture).await.unwrap();
        repo.upsert_moisture(&mut conn, &moisture).await.unwrap();
        repo.insert_soil_record(&mut conn, &record).await.unwrap();
        let err = repo.insert_moisture(&mut conn, &moisture).await.unwrap_err();
        assert!(matches!(err, FarmError::DuplicateKey(_)));
        drop(conn);

        assert_eq!(count_rows(&db, "moisture_by_chemistry").await, 1);
        let soil = repo.list_soil_records().await.unwrap();
        assert_eq!(soil[0].sample_date, moisture.sample_date);
        assert_eq!(soil[0].ph, 6.5);
    }

    #[tokio::test]
    async fn test_irrigation_round_trip() {
        let (db, repo) = setup_fields().await;
        let record = NewIrrigation {
            irrig_id: 3,
            field_id: FIELD_ID,
            event_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            volume: 150.0,
        };

        let mut conn = db.acquire().await.unwrap();
        repo.insert_irrigation(&mut conn, &record).await.unwrap();
        drop(conn);

        let rows = repo.list_irrigation().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_date, Some(record.event_date));
        assert_eq!(rows[0].volume, Some(150.0));
    }
}
