use shared::{ContactInfoRow, FarmerRow};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::domain::models::NewFarmer;
use crate::error::FarmResult;
use crate::storage::DbConnection;

/// Repository for farmers and their contact details
#[derive(Clone)]
pub struct FarmerRepository {
    db: DbConnection,
}

impl FarmerRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert the contact row and the farmer row that points at it.
    ///
    /// Both statements run on `conn`; the caller owns the transaction.
    pub async fn insert_farmer(&self, conn: &mut SqliteConnection, farmer: &NewFarmer) -> FarmResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contact_info_name (contact_info, name)
            VALUES (?, ?)
            "#,
        )
        .bind(&farmer.contact_info)
        .bind(&farmer.name)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO farmer (farmer_id, contact_info)
            VALUES (?, ?)
            "#,
        )
        .bind(farmer.farmer_id)
        .bind(&farmer.contact_info)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// List farmers with their contact name, ordered by id
    pub async fn list_farmers(&self) -> FarmResult<Vec<FarmerRow>> {
        let farmers = sqlx::query(
            r#"
            SELECT f.farmer_id, f.contact_info, c.name
            FROM farmer f
            JOIN contact_info_name c ON f.contact_info = c.contact_info
            ORDER BY f.farmer_id
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(FarmerRow {
                farmer_id: row.try_get("farmer_id")?,
                contact_info: row.try_get("contact_info")?,
                name: row.try_get("name")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(farmers)
    }

    pub async fn list_contact_info(&self) -> FarmResult<Vec<ContactInfoRow>> {
        let contacts = sqlx::query(
            r#"
            SELECT contact_info, name
            FROM contact_info_name
            ORDER BY contact_info
            "#,
        )
        .try_map(|row: SqliteRow| {
            Ok(ContactInfoRow {
                contact_info: row.try_get("contact_info")?,
                name: row.try_get("name")?,
            })
        })
        .fetch_all(self.db.pool())
        .await?;

        Ok(contacts)
    }
}
