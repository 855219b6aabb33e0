use chrono::NaiveDate;
use shared::{AwardExpiryRow, CertificationRow, ReceivesRow};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::domain::models::NewCertification;
use crate::error::FarmResult;
use crate::storage::DbConnection;

/// Repository for certifications and the farms that hold them
#[derive(Clone)]
pub struct CertificationRepository {
    db: DbConnection,
}

impl CertificationRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Record the expiry for an award date unless one is already known
    pub async fn upsert_award_expiry(
        &self,
        conn: &mut SqliteConnection,
        awarded_date: NaiveDate,
        expiry_date: NaiveDate,
    ) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO award_expiry (awarded_date, expiry_date)
            VALUES (?, ?)
            ON CONFLICT (awarded_date) DO NOTHING
            "#,
        )
        .bind(awarded_date)
        .bind(expiry_date)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn insert_certification(
        &self,
        conn: &mut SqliteConnection,
        certification: &NewCertification,
    ) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO certification (cert_id, name, awarded_date)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(certification.cert_id)
        .bind(&certification.name)
        .bind(certification.awarded_date)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn insert_receives(&self, conn: &mut SqliteConnection, farm_id: i64, cert_id: i64) -> FarmResult<()> {
        sqlx::query("INSERT INTO receives (farm_id, cert_id) VALUES (?, ?)")
            .bind(farm_id)
            .bind(cert_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// List certifications with the expiry of their award date
    pub async fn list_certifications(&self) -> FarmResult<Vec<CertificationRow>> {
        let certifications = sqlx::query(
            r#"
            SELECT c.cert_id, c.name, c.awarded_date, a.expiry_date
            FROM certification c
            JOIN award_expiry a ON c.awarded_date = a.awarded_date
            ORDER BY c.cert_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(CertificationRow {
                cert_id: row.try_get("cert_id")?,
                name: row.try_get("name")?,
                awarded_date: row.try_get("awarded_date")?,
                expiry_date: row.try_get("expiry_date")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(certifications)
    }

    pub async fn list_award_expiries(&self) -> FarmResult<Vec<AwardExpiryRow>> {
        let expiries = sqlx::query("SELECT awarded_date, expiry_date FROM award_expiry ORDER BY awarded_date")
            .try_map(|row: SqliteRow| {
                Ok(AwardExpiryRow {
                    awarded_date: row.try_get("awarded_date")?,
                    expiry_date: row.try_get("expiry_date")?,
                })
            })
            .fetch_all(self.db.pool())
            .await?;

        Ok(expiries)
    }

    pub async fn list_receives(&self) -> FarmResult<Vec<ReceivesRow>> {
        let receives = sqlx::query("SELECT farm_id, cert_id FROM receives ORDER BY farm_id, cert_id")
            .try_map(|row: SqliteRow| {
                Ok(ReceivesRow {
                    farm_id: row.try_get("farm_id")?,
                    cert_id: row.try_get("cert_id")?,
                })
            })
            .fetch_all(self.db.pool())
            .await?;

        Ok(receives)
    }
}
