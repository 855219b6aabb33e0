use shared::{ApiResponse, AverageIrrigationRow, FarmCropsRow, FieldIdRow, HealthyFieldRow, Scalar};
use tracing::{info, warn};

use crate::domain::validation::require_id;
use crate::error::FarmResult;
use crate::storage::{DbConnection, ReportRepository};

const SEARCH_SUCCESS_MESSAGE: &str = "Search successful!";
const NO_FARM_MESSAGE: &str = "No farm found for this FarmID. Please check and try again.";

/// Service for the read-only reports
#[derive(Clone)]
pub struct ReportService {
    reports: ReportRepository,
}

impl ReportService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            reports: ReportRepository::new(db),
        }
    }

    /// A farm, its owner and the crops grown on it
    pub async fn farm_crops(&self, farm_id: Option<&Scalar>) -> FarmResult<ApiResponse<Vec<FarmCropsRow>>> {
        let farm_id = require_id(farm_id, "farmID")?;
        info!("Joining crops for farm {}", farm_id);

        match self.reports.farm_crops(farm_id).await? {
            Some(row) => Ok(ApiResponse::ok(SEARCH_SUCCESS_MESSAGE, vec![row])),
            None => {
                warn!("No farm with id {}", farm_id);
                Ok(ApiResponse::failure_with(NO_FARM_MESSAGE, Vec::new()))
            }
        }
    }

    pub async fn average_irrigation(&self) -> FarmResult<ApiResponse<Vec<AverageIrrigationRow>>> {
        info!("Averaging irrigation per field");
        let rows = self.reports.average_irrigation().await?;
        Ok(ApiResponse::ok(SEARCH_SUCCESS_MESSAGE, rows))
    }

    pub async fn healthy_fields(&self) -> FarmResult<ApiResponse<Vec<HealthyFieldRow>>> {
        info!("Finding fields with healthy soil pH");
        let rows = self.reports.healthy_fields().await?;
        Ok(ApiResponse::ok(SEARCH_SUCCESS_MESSAGE, rows))
    }

    pub async fn highest_moisture_fields(&self) -> FarmResult<ApiResponse<Vec<FieldIdRow>>> {
        info!("Finding fields with the highest average moisture");
        let rows = self.reports.highest_moisture_fields().await?;
        Ok(ApiResponse::ok(SEARCH_SUCCESS_MESSAGE, rows))
    }

    pub async fn fields_using_all_pesticides(&self) -> FarmResult<ApiResponse<Vec<FieldIdRow>>> {
        info!("Finding fields treated with every pesticide");
        let rows = self.reports.fields_using_all_pesticides().await?;
        Ok(ApiResponse::ok(SEARCH_SUCCESS_MESSAGE, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FarmError;
    use crate::storage::repositories::test_utils::{seed_sample_data, setup_test_db};

    async fn setup() -> ReportService {
        let db = setup_test_db().await;
        seed_sample_data(&db).await;
        ReportService::new(db)
    }

    #[tokio::test]
    async fn test_unknown_farm_is_an_unsuccessful_search() {
        let service = setup().await;

        let response = service.farm_crops(Some(&Scalar::from("102"))).await.unwrap();
        let rows = response.data.unwrap();
        assert_eq!(rows[0].farmer_name, "Bram Okafor");
        assert_eq!(rows[0].crops, vec!["Corn"]);

        let response = service.farm_crops(Some(&Scalar::Int(999))).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.message, NO_FARM_MESSAGE);
        assert_eq!(response.data, Some(Vec::new()));

        let err = service.farm_crops(None).await.unwrap_err();
        assert!(matches!(err, FarmError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reports_wrap_rows() {
        let service = setup().await;

        let response = service.fields_using_all_pesticides().await.unwrap();
        assert!(response.success);
        assert_eq!(response.message, SEARCH_SUCCESS_MESSAGE);
        assert_eq!(response.data.unwrap(), vec![FieldIdRow { field_id: 1001 }]);

        assert_eq!(service.highest_moisture_fields().await.unwrap().data.unwrap().len(), 2);
        assert_eq!(service.healthy_fields().await.unwrap().data.unwrap().len(), 4);
        assert_eq!(service.average_irrigation().await.unwrap().data.unwrap().len(), 5);
    }
}
