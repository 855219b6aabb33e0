use shared::{
    AddCertificationRequest, AddReceivesRequest, ApiResponse, AwardExpiryRow, CertificationRow,
    DataResponse, ReceivesRow,
};
use tracing::info;

use crate::domain::models::NewCertification;
use crate::domain::validation::{
    require_after, require_date, require_id, require_text, MAX_CERTIFICATION_NAME_LEN,
};
use crate::error::FarmResult;
use crate::storage::{CertificationRepository, DbConnection};

const UNKNOWN_FARM_MESSAGE: &str = "farmID not recognized. Please provide a valid existing farmID.";

/// Service for certifications and the farms holding them
#[derive(Clone)]
pub struct CertificationService {
    db: DbConnection,
    certifications: CertificationRepository,
}

impl CertificationService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            certifications: CertificationRepository::new(db.clone()),
            db,
        }
    }

    /// Award a certification to a farm.
    ///
    /// Writes the award expiry (unless the award date is already known), the
    /// certification and the farm's receipt of it in one transaction.
    pub async fn add_certification(&self, request: AddCertificationRequest) -> FarmResult<ApiResponse<()>> {
        info!("Adding certification: {:?}", request.cert_id);

        let certification = NewCertification {
            cert_id: require_id(request.cert_id.as_ref(), "certID")?,
            name: require_text(request.name.as_deref(), "name", MAX_CERTIFICATION_NAME_LEN)?,
            awarded_date: require_date(request.award_date.as_deref(), "awardDate")?,
            expiry_date: require_date(request.expiry_date.as_deref(), "expiryDate")?,
            farm_id: require_id(request.farm_id.as_ref(), "farmID")?,
        };
        require_after(
            certification.awarded_date,
            certification.expiry_date,
            "awardDate",
            "expiryDate",
        )?;

        let repo = self.certifications.clone();
        let record = certification.clone();
        self.db
            .unit_of_work(move |conn| {
                Box::pin(async move {
                    repo.upsert_award_expiry(&mut *conn, record.awarded_date, record.expiry_date)
                        .await?;
                    repo.insert_certification(&mut *conn, &record).await?;
                    repo.insert_receives(&mut *conn, record.farm_id, record.cert_id)
                        .await
                        .map_err(|e| e.on_missing_reference(UNKNOWN_FARM_MESSAGE))
                })
            })
            .await?;

        info!(
            "Added certification {} for farm {}",
            certification.cert_id, certification.farm_id
        );
        Ok(ApiResponse::done("Certification added successfully"))
    }

    pub async fn list_certifications(&self) -> FarmResult<DataResponse<CertificationRow>> {
        let certifications = self.certifications.list_certifications().await?;
        info!("Found {} certifications", certifications.len());
        Ok(DataResponse::new(certifications))
    }

    pub async fn list_award_expiries(&self) -> FarmResult<DataResponse<AwardExpiryRow>> {
        Ok(DataResponse::new(self.certifications.list_award_expiries().await?))
    }

    /// Record that an existing certification is held by another farm
    pub async fn add_receives(&self, request: AddReceivesRequest) -> FarmResult<ApiResponse<()>> {
        let farm_id = require_id(request.farm_id.as_ref(), "farmID")?;
        let cert_id = require_id(request.cert_id.as_ref(), "certID")?;
        info!("Recording certification {} for farm {}", cert_id, farm_id);

        let mut conn = self.db.acquire().await?;
        self.certifications.insert_receives(&mut conn, farm_id, cert_id).await?;

        Ok(ApiResponse::done("Receives record added successfully"))
    }

    pub async fn list_receives(&self) -> FarmResult<DataResponse<ReceivesRow>> {
        Ok(DataResponse::new(self.certifications.list_receives().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FarmError;
    use crate::storage::repositories::test_utils::{count_rows, seed_farm, setup_test_db, FARM_ID};
    use shared::Scalar;

    fn request(cert_id: i64, farm_id: i64, award: &str, expiry: &str) -> AddCertificationRequest {
        AddCertificationRequest {
            cert_id: Some(Scalar::Int(cert_id)),
            name: Some("Certified Organic".to_string()),
            award_date: Some(award.to_string()),
            expiry_date: Some(expiry.to_string()),
            farm_id: Some(Scalar::Int(farm_id)),
        }
    }

    #[tokio::test]
    async fn test_add_certification_writes_all_rows() {
        let db = setup_test_db().await;
        seed_farm(&db).await;
        let service = CertificationService::new(db);

        service
            .add_certification(request(1, FARM_ID, "2023-01-15", "2026-01-15"))
            .await
            .unwrap();

        let certifications = service.list_certifications().await.unwrap().data;
        assert_eq!(certifications.len(), 1);
        assert_eq!(certifications[0].name, "Certified Organic");
        assert_eq!(service.list_award_expiries().await.unwrap().data.len(), 1);
        assert_eq!(
            service.list_receives().await.unwrap().data,
            vec![ReceivesRow { farm_id: FARM_ID, cert_id: 1 }]
        );
    }

    #[tokio::test]
    async fn test_expiry_must_follow_award() {
        let db = setup_test_db().await;
        seed_farm(&db).await;
        let service = CertificationService::new(db.clone());

        let err = service
            .add_certification(request(1, FARM_ID, "2023-01-15", "2022-01-15"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "expiryDate must be after awardDate.");
        assert_eq!(count_rows(&db, "award_expiry").await, 0);
    }

    #[tokio::test]
    async fn test_unknown_farm_rolls_back_certification() {
        let db = setup_test_db().await;
        seed_farm(&db).await;
        let service = CertificationService::new(db.clone());

        let err = service
            .add_certification(request(1, 999, "2023-01-15", "2026-01-15"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), UNKNOWN_FARM_MESSAGE);
        assert_eq!(count_rows(&db, "certification").await, 0);
        assert_eq!(count_rows(&db, "award_expiry").await, 0);
    }

    #[tokio::test]
    async fn test_add_receives_for_existing_certification() {
        let db = setup_test_db().await;
        seed_farm(&db).await;
        let service = CertificationService::new(db.clone());
        service
            .add_certification(request(1, FARM_ID, "2023-01-15", "2026-01-15"))
            .await
            .unwrap();

        let err = service
            .add_receives(AddReceivesRequest {
                farm_id: Some(Scalar::Int(FARM_ID)),
                cert_id: Some(Scalar::Int(1)),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, FarmError::DuplicateKey(_)));

        let err = service
            .add_receives(AddReceivesRequest {
                farm_id: Some(Scalar::Int(FARM_ID)),
                cert_id: Some(Scalar::Int(2)),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, FarmError::MissingReference(_)));
    }
}
