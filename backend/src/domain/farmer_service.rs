use shared::{AddFarmerRequest, ApiResponse, ContactInfoRow, DataResponse, FarmerRow};
use tracing::info;

use crate::domain::models::NewFarmer;
use crate::domain::validation::{require_email, require_id, require_text, MAX_NAME_LEN};
use crate::error::FarmResult;
use crate::storage::{DbConnection, FarmerRepository};

/// Service for farmers and their contact details
#[derive(Clone)]
pub struct FarmerService {
    db: DbConnection,
    farmers: FarmerRepository,
}

impl FarmerService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            farmers: FarmerRepository::new(db.clone()),
            db,
        }
    }

    /// Add a farmer together with their contact row, in one transaction
    pub async fn add_farmer(&self, request: AddFarmerRequest) -> FarmResult<ApiResponse<()>> {
        info!("Adding farmer: {:?}", request.farmer_id);

        let farmer = NewFarmer {
            farmer_id: require_id(request.farmer_id.as_ref(), "farmerID")?,
            name: require_text(request.name.as_deref(), "name", MAX_NAME_LEN)?,
            contact_info: require_email(request.contact_info.as_deref(), "contactInfo")?,
        };

        let repo = self.farmers.clone();
        let record = farmer.clone();
        self.db
            .unit_of_work(move |conn| Box::pin(async move { repo.insert_farmer(conn, &record).await }))
            .await?;

        info!("Added farmer {} ({})", farmer.farmer_id, farmer.contact_info);
        Ok(ApiResponse::done("Farmer added successfully"))
    }

    pub async fn list_farmers(&self) -> FarmResult<DataResponse<FarmerRow>> {
        let farmers = self.farmers.list_farmers().await?;
        info!("Found {} farmers", farmers.len());
        Ok(DataResponse::new(farmers))
    }

    pub async fn list_contact_info(&self) -> FarmResult<DataResponse<ContactInfoRow>> {
        Ok(DataResponse::new(self.farmers.list_contact_info().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FarmError;
    use crate::storage::repositories::test_utils::{count_rows, setup_test_db, FileTestEnvironment};
    use shared::Scalar;

    fn request(id: i64, name: &str, contact: &str) -> AddFarmerRequest {
        AddFarmerRequest {
            farmer_id: Some(Scalar::Int(id)),
            name: Some(name.to_string()),
            contact_info: Some(contact.to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_farmer_round_trip() {
        let db = setup_test_db().await;
        let service = FarmerService::new(db);

        let response = service
            .add_farmer(request(3, "  Chen Wei ", "chen@hilltop.net"))
            .await
            .unwrap();
        assert!(response.success);

        let farmers = service.list_farmers().await.unwrap().data;
        assert_eq!(
            farmers,
            vec![FarmerRow {
                farmer_id: 3,
                contact_info: "chen@hilltop.net".to_string(),
                name: "Chen Wei".to_string(),
            }]
        );
        assert_eq!(service.list_contact_info().await.unwrap().data.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_writing() {
        let db = setup_test_db().await;
        let service = FarmerService::new(db.clone());

        let err = service.add_farmer(request(0, "Zed", "zed@farm.com")).await.unwrap_err();
        assert_eq!(err.to_string(), "farmerID must be a positive integer.");

        let err = service.add_farmer(request(4, "Zed", "not-an-email")).await.unwrap_err();
        assert!(matches!(err, FarmError::Validation(_)));

        assert_eq!(count_rows(&db, "contact_info_name").await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_farmer_leaves_no_orphan_contact() {
        let db = setup_test_db().await;
        let service = FarmerService::new(db.clone());

        service.add_farmer(request(1, "Alice", "alice@farm.com")).await.unwrap();
        // same farmer id, new contact: the contact insert succeeds, the farmer insert fails
        let err = service.add_farmer(request(1, "Alicia", "alicia@farm.com")).await.unwrap_err();

        assert!(matches!(err, FarmError::DuplicateKey(_)));
        assert_eq!(count_rows(&db, "contact_info_name").await, 1);
        assert_eq!(count_rows(&db, "farmer").await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_of_same_farmer() {
        let env = FileTestEnvironment::new().await;
        let first = FarmerService::new(env.db.clone());
        let second = first.clone();

        let (a, b) = tokio::join!(
            first.add_farmer(request(1, "Alice", "alice@farm.com")),
            second.add_farmer(request(1, "Alice", "alice@farm.com")),
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(FarmError::DuplicateKey(_)))));
        assert_eq!(count_rows(&env.db, "contact_info_name").await, 1);
        assert_eq!(count_rows(&env.db, "farmer").await, 1);
    }
}
