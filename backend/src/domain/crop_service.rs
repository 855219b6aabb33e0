use shared::{
    AddCropRequest, AddCropYieldRequest, AddFruitRequest, AddGrainRequest, AddPesticideRequest,
    AddTreatmentRequest, AddVegetableRequest, ApiResponse, CropRow, CropTypeRow, CropYieldRow,
    DataResponse, FruitRow, GrainRow, PesticideRow, SeasonRow, TreatmentRow, VegetableRow,
};
use tracing::info;

use crate::domain::models::{CropCategory, NewCrop, NewCropYield, NewPesticide};
use crate::domain::validation::{
    optional_percentage, require_after, require_boolean, require_date, require_health_rating,
    require_id, require_non_negative, require_text, MAX_CROP_NAME_LEN, MAX_PESTICIDE_NAME_LEN,
    MAX_SEASON_LEN,
};
use crate::error::FarmResult;
use crate::storage::{CropRepository, DbConnection};

/// Service for crops, pesticides and the per-crop category and yield records
#[derive(Clone)]
pub struct CropService {
    db: DbConnection,
    crops: CropRepository,
}

impl CropService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            crops: CropRepository::new(db.clone()),
            db,
        }
    }

    /// Plant a crop on a field.
    ///
    /// The season of the planting date and the crop type are recorded first,
    /// unless already known, then the crop itself; all three in one
    /// transaction.
    pub async fn add_crop(&self, request: AddCropRequest) -> FarmResult<ApiResponse<()>> {
        info!("Adding crop: {:?}", request.crop_id);

        let crop = NewCrop {
            crop_id: require_id(request.crop_id.as_ref(), "cropID")?,
            field_id: require_id(request.field_id.as_ref(), "fieldID")?,
            name: require_text(request.crop_name.as_deref(), "cropName", MAX_CROP_NAME_LEN)?,
            planting_date: require_date(request.plant_date.as_deref(), "plantDate")?,
            harvest_date: require_date(request.harvest_date.as_deref(), "harvestDate")?,
            season: require_text(request.season.as_deref(), "season", MAX_SEASON_LEN)?,
        };
        require_after(crop.planting_date, crop.harvest_date, "plantDate", "harvestDate")?;

        let repo = self.crops.clone();
        let record = crop.clone();
        self.db
            .unit_of_work(move |conn| {
                Box::pin(async move {
                    repo.upsert_season(&mut *conn, record.planting_date, &record.season).await?;
                    repo.upsert_crop_type(&mut *conn, &record).await?;
                    repo.insert_grows_crop(&mut *conn, &record).await
                })
            })
            .await?;

        info!("Added crop {} ({}) on field {}", crop.crop_id, crop.name, crop.field_id);
        Ok(ApiResponse::done("Crop added successfully"))
    }

    pub async fn list_crops(&self) -> FarmResult<DataResponse<CropRow>> {
        let crops = self.crops.list_crops().await?;
        info!("Found {} crops", crops.len());
        Ok(DataResponse::new(crops))
    }

    pub async fn list_seasons(&self) -> FarmResult<DataResponse<SeasonRow>> {
        Ok(DataResponse::new(self.crops.list_seasons().await?))
    }

    pub async fn list_crop_types(&self) -> FarmResult<DataResponse<CropTypeRow>> {
        Ok(DataResponse::new(self.crops.list_crop_types().await?))
    }

    pub async fn add_pesticide(&self, request: AddPesticideRequest) -> FarmResult<ApiResponse<()>> {
        info!("Adding pesticide: {:?}", request.pest_id);

        let pesticide = NewPesticide {
            pest_id: require_id(request.pest_id.as_ref(), "pestID")?,
            name: require_text(request.name.as_deref(), "name", MAX_PESTICIDE_NAME_LEN)?,
        };

        let mut conn = self.db.acquire().await?;
        self.crops.insert_pesticide(&mut conn, &pesticide).await?;

        Ok(ApiResponse::done("Pesticide added successfully"))
    }

    pub async fn list_pesticides(&self) -> FarmResult<DataResponse<PesticideRow>> {
        Ok(DataResponse::new(self.crops.list_pesticides().await?))
    }

    pub async fn add_treatment(&self, request: AddTreatmentRequest) -> FarmResult<ApiResponse<()>> {
        let crop_id = require_id(request.crop_id.as_ref(), "cropID")?;
        let pest_id = require_id(request.pest_id.as_ref(), "pestID")?;
        info!("Recording pesticide {} on crop {}", pest_id, crop_id);

        let mut conn = self.db.acquire().await?;
        self.crops.insert_treatment(&mut conn, crop_id, pest_id).await?;

        Ok(ApiResponse::done("Treatment added successfully"))
    }

    pub async fn list_treatments(&self) -> FarmResult<DataResponse<TreatmentRow>> {
        Ok(DataResponse::new(self.crops.list_treatments().await?))
    }

    pub async fn add_grain(&self, request: AddGrainRequest) -> FarmResult<ApiResponse<()>> {
        let category = CropCategory::Grain {
            crop_id: require_id(request.crop_id.as_ref(), "cropID")?,
            gluten_content: optional_percentage(request.gluten_content.as_ref(), "glutenContent")?,
        };
        self.add_category(category, "Grain added successfully").await
    }

    pub async fn add_vegetable(&self, request: AddVegetableRequest) -> FarmResult<ApiResponse<()>> {
        let category = CropCategory::Vegetable {
            crop_id: require_id(request.crop_id.as_ref(), "cropID")?,
            is_leafy: require_boolean(request.is_leafy.as_ref(), "isLeafy")?,
        };
        self.add_category(category, "Vegetable added successfully").await
    }

    pub async fn add_fruit(&self, request: AddFruitRequest) -> FarmResult<ApiResponse<()>> {
        let category = CropCategory::Fruit {
            crop_id: require_id(request.crop_id.as_ref(), "cropID")?,
            sugar_content: optional_percentage(request.sugar_content.as_ref(), "sugarContent")?,
        };
        self.add_category(category, "Fruit added successfully").await
    }

    async fn add_category(&self, category: CropCategory, message: &str) -> FarmResult<ApiResponse<()>> {
        info!("Adding crop category: {:?}", category);

        let mut conn = self.db.acquire().await?;
        self.crops.insert_category(&mut conn, &category).await?;

        Ok(ApiResponse::done(message))
    }

    pub async fn list_grains(&self) -> FarmResult<DataResponse<GrainRow>> {
        Ok(DataResponse::new(self.crops.list_grains().await?))
    }

    pub async fn list_vegetables(&self) -> FarmResult<DataResponse<VegetableRow>> {
        Ok(DataResponse::new(self.crops.list_vegetables().await?))
    }

    pub async fn list_fruits(&self) -> FarmResult<DataResponse<FruitRow>> {
        Ok(DataResponse::new(self.crops.list_fruits().await?))
    }

    pub async fn add_crop_yield(&self, request: AddCropYieldRequest) -> FarmResult<ApiResponse<()>> {
        info!("Adding crop yield: {:?}", request.crop_id);

        let crop_yield = NewCropYield {
            crop_id: require_id(request.crop_id.as_ref(), "cropID")?,
            total_yield: require_non_negative(request.total_yield.as_ref(), "totalYield")?,
            health_rating: require_health_rating(request.health_rating.as_ref())?,
        };

        let mut conn = self.db.acquire().await?;
        self.crops.insert_crop_yield(&mut conn, &crop_yield).await?;

        Ok(ApiResponse::done("Crop yield added successfully"))
    }

    pub async fn list_crop_yields(&self) -> FarmResult<DataResponse<CropYieldRow>> {
        Ok(DataResponse::new(self.crops.list_crop_yields().await?))
    }
}
