use shared::{AddFarmRequest, ApiResponse, DataResponse, DeleteFarmRequest, FarmRow, UpdateFarmRequest};
use tracing::{info, warn};

use crate::domain::models::{FarmUpdate, NewFarm};
use crate::domain::validation::{require_id, require_text, MAX_LOCATION_LEN, MAX_NAME_LEN};
use crate::error::{FarmError, FarmResult};
use crate::storage::{DbConnection, FarmRepository};

const UNKNOWN_FARMER_MESSAGE: &str =
    "farmerID not recognized. Please provide a valid existing farmerID.";
const BLANK_UPDATE_MESSAGE: &str = "Update fields are all blank. Please check and try again.";
const FARM_NOT_FOUND_MESSAGE: &str = "No farm found with this FarmID. Please check and try again.";

/// Service for farms: the only entity that can be updated or deleted
#[derive(Clone)]
pub struct FarmService {
    db: DbConnection,
    farms: FarmRepository,
}

impl FarmService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            farms: FarmRepository::new(db.clone()),
            db,
        }
    }

    pub async fn add_farm(&self, request: AddFarmRequest) -> FarmResult<ApiResponse<()>> {
        info!("Adding farm: {:?}", request.farm_id);

        let farm = NewFarm {
            farm_id: require_id(request.farm_id.as_ref(), "farmID")?,
            name: require_text(request.name.as_deref(), "name", MAX_NAME_LEN)?,
            location: require_text(request.location.as_deref(), "location", MAX_LOCATION_LEN)?,
            farmer_id: require_id(request.farmer_id.as_ref(), "farmerID")?,
        };

        let mut conn = self.db.acquire().await?;
        self.farms
            .insert_farm(&mut conn, &farm)
            .await
            .map_err(|e| e.on_missing_reference(UNKNOWN_FARMER_MESSAGE))?;

        info!("Added farm {} owned by farmer {}", farm.farm_id, farm.farmer_id);
        Ok(ApiResponse::done("Farm added successfully"))
    }

    pub async fn list_farms(&self) -> FarmResult<DataResponse<FarmRow>> {
        let farms = self.farms.list_farms().await?;
        info!("Found {} farms", farms.len());
        Ok(DataResponse::new(farms))
    }

    /// Update the non-blank attributes of one farm
    pub async fn update_farm(&self, request: UpdateFarmRequest) -> FarmResult<ApiResponse<()>> {
        info!("Updating farm: {:?}", request.farm_id);

        let farm_id = require_id(request.farm_id.as_ref(), "farmID")?;
        let update = FarmUpdate {
            name: present_text(request.farm_name.as_deref())
                .map(|name| require_text(Some(name), "farmName", MAX_NAME_LEN))
                .transpose()?,
            location: present_text(request.location.as_deref())
                .map(|location| require_text(Some(location), "location", MAX_LOCATION_LEN))
                .transpose()?,
            farmer_id: request
                .farmer_id
                .as_ref()
                .filter(|id| !id.is_blank())
                .map(|id| require_id(Some(id), "farmerID"))
                .transpose()?,
        };
        if update.is_empty() {
            return Err(FarmError::validation(BLANK_UPDATE_MESSAGE));
        }

        let mut conn = self.db.acquire().await?;
        let matched = self
            .farms
            .update_farm(&mut conn, farm_id, &update)
            .await
            .map_err(|e| e.on_missing_reference(UNKNOWN_FARMER_MESSAGE))?;

        if matched == 0 {
            warn!("No farm to update with id {}", farm_id);
            return Err(FarmError::not_found(FARM_NOT_FOUND_MESSAGE));
        }

        info!("Updated farm {}", farm_id);
        Ok(ApiResponse::done("Update successful!"))
    }

    /// Delete a farm and, by cascade, everything recorded on its fields
    pub async fn delete_farm(&self, request: DeleteFarmRequest) -> FarmResult<ApiResponse<()>> {
        let farm_id = require_id(request.farm_id.as_ref(), "farmID")?;
        info!("Deleting farm: {}", farm_id);

        let mut conn = self.db.acquire().await?;
        let deleted = self.farms.delete_farm(&mut conn, farm_id).await?;

        if deleted == 0 {
            warn!("No farm to delete with id {}", farm_id);
            return Err(FarmError::not_found(FARM_NOT_FOUND_MESSAGE));
        }

        info!("Deleted farm {}", farm_id);
        Ok(ApiResponse::done("Cascade Delete successful!"))
    }
}

fn present_text(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
