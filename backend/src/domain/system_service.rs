use shared::ApiResponse;
use tracing::{error, info, warn};

use crate::error::FarmResult;
use crate::storage::schema::{self, split_sql_statements, SAMPLE_DATA};
use crate::storage::DbConnection;

const ALREADY_POPULATED_MESSAGE: &str =
    "Error populating tables: sample rows already exist. Initialize the tables first.";

/// Service for database housekeeping: connectivity, schema reset and
/// sample data
#[derive(Clone)]
pub struct SystemService {
    db: DbConnection,
}

impl SystemService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// True when a statement can be round-tripped to the database
    pub async fn check_connection(&self) -> bool {
        match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Database connectivity check failed: {}", e);
                false
            }
        }
    }

    /// Drop every table and create the schema again, empty
    pub async fn initialize_tables(&self) -> FarmResult<ApiResponse<()>> {
        info!("Initializing farm tables");

        self.db
            .unit_of_work(|conn| {
                Box::pin(async move {
                    schema::recreate_all(conn).await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| {
                error!("Error initializing farm tables: {}", e);
                e
            })?;

        info!("Farm tables initialized");
        Ok(ApiResponse::done("Farm tables initialized successfully"))
    }

    /// Load the bundled sample data; either every row is written or none is
    pub async fn populate_tables(&self) -> FarmResult<ApiResponse<()>> {
        let statements = split_sql_statements(SAMPLE_DATA);
        info!("Populating tables with {} sample statements", statements.len());

        self.db
            .unit_of_work(move |conn| {
                Box::pin(async move {
                    for statement in &statements {
                        sqlx::query(statement).execute(&mut *conn).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|e| {
                error!("Error populating tables: {}", e);
                e.on_duplicate(ALREADY_POPULATED_MESSAGE)
            })?;

        Ok(ApiResponse::done("Populated all tables with sample data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FarmError;
    use crate::storage::repositories::test_utils::{count_rows, seed_farm, setup_test_db};

    #[tokio::test]
    async fn test_check_connection() {
        let db = setup_test_db().await;
        let service = SystemService::new(db.clone());

        assert!(service.check_connection().await);
        db.close(std::time::Duration::from_secs(1)).await;
        assert!(!service.check_connection().await);
    }

    #[tokio::test]
    async fn test_populate_is_all_or_nothing() {
        let db = setup_test_db().await;
        let service = SystemService::new(db.clone());

        service.populate_tables().await.unwrap();
        assert_eq!(count_rows(&db, "owns_farm").await, 5);
        assert_eq!(count_rows(&db, "receives").await, 5);

        let err = service.populate_tables().await.unwrap_err();
        assert!(matches!(err, FarmError::DuplicateKey(_)));
        assert_eq!(err.to_string(), ALREADY_POPULATED_MESSAGE);
        assert_eq!(count_rows(&db, "owns_farm").await, 5);
    }

    #[tokio::test]
    async fn test_initialize_empties_every_table() {
        let db = setup_test_db().await;
        seed_farm(&db).await;
        let service = SystemService::new(db.clone());

        let response = service.initialize_tables().await.unwrap();
        assert_eq!(response.message, "Farm tables initialized successfully");
        assert_eq!(count_rows(&db, "farmer").await, 0);
        assert_eq!(count_rows(&db, "contains_field").await, 0);

        // the fresh schema accepts the sample data
        service.populate_tables().await.unwrap();
        assert_eq!(count_rows(&db, "contains_field").await, 6);
    }
}
