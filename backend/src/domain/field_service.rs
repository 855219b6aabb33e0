use shared::{
    AddFieldRequest, AddIrrigationRequest, AddMoistureRequest, AddSoilRecordRequest, ApiResponse,
    DataResponse, FieldRecord, FieldRow, IrrigationRow, MoistureRow, ProjectedRow, SelectionRequest,
    SoilRecordRow,
};
use tracing::{info, warn};

use crate::domain::models::{NewField, NewIrrigation, NewMoisture, NewSoilRecord};
use crate::domain::selection::{parse_projection, FieldSelection};
use crate::domain::validation::{
    optional_non_negative, require_date, require_id, require_non_negative, require_ph,
};
use crate::error::FarmResult;
use crate::storage::{DbConnection, FieldRepository};

const SEARCH_SUCCESS_MESSAGE: &str = "Search successful!";
const NO_PROJECTION_MESSAGE: &str =
    "No valid attributes selected. Please choose from FieldID, FarmID and Area.";

/// Service for fields and the records kept per field
#[derive(Clone)]
pub struct FieldService {
    db: DbConnection,
    fields: FieldRepository,
}

impl FieldService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            fields: FieldRepository::new(db.clone()),
            db,
        }
    }

    pub async fn add_field(&self, request: AddFieldRequest) -> FarmResult<ApiResponse<()>> {
        info!("Adding field: {:?}", request.field_id);

        let field = NewField {
            field_id: require_id(request.field_id.as_ref(), "fieldID")?,
            farm_id: require_id(request.farm_id.as_ref(), "farmID")?,
            area: optional_non_negative(request.area.as_ref(), "area")?,
        };

        let mut conn = self.db.acquire().await?;
        self.fields.insert_field(&mut conn, &field).await?;

        info!("Added field {} to farm {}", field.field_id, field.farm_id);
        Ok(ApiResponse::done("Field added successfully"))
    }

    pub async fn list_fields(&self) -> FarmResult<DataResponse<FieldRow>> {
        let fields = self.fields.list_fields().await?;
        info!("Found {} fields", fields.len());
        Ok(DataResponse::new(fields))
    }

    /// Fields matching the user-built conditions
    pub async fn select_fields(&self, request: SelectionRequest) -> FarmResult<ApiResponse<Vec<FieldRecord>>> {
        let selection = FieldSelection::from_request(&request)?;
        info!("Selecting fields with {} condition(s)", selection.conditions().len());

        let fields = self.fields.select_fields(&selection).await?;

        info!("Selection matched {} fields", fields.len());
        Ok(ApiResponse::ok(SEARCH_SUCCESS_MESSAGE, fields))
    }

    /// Project every field onto a comma-separated list of attributes
    pub async fn project_fields(&self, requested: Option<&str>) -> FarmResult<ApiResponse<Vec<ProjectedRow>>> {
        let columns = parse_projection(requested.unwrap_or_default());
        if columns.is_empty() {
            warn!("Projection requested without a valid attribute: {:?}", requested);
            return Ok(ApiResponse::failure_with(NO_PROJECTION_MESSAGE, Vec::new()));
        }

        let labels: Vec<&str> = columns.iter().map(|column| column.label()).collect();
        info!("Projecting fields onto {:?}", labels);

        let rows = self.fields.project_fields(&columns).await?;
        Ok(ApiResponse::ok(SEARCH_SUCCESS_MESSAGE, rows))
    }

    pub async fn add_irrigation(&self, request: AddIrrigationRequest) -> FarmResult<ApiResponse<()>> {
        info!("Adding irrigation record: {:?}", request.irrig_id);

        let record = NewIrrigation {
            irrig_id: require_id(request.irrig_id.as_ref(), "irrigID")?,
            field_id: require_id(request.field_id.as_ref(), "fieldID")?,
            event_date: require_date(request.event_date.as_deref(), "eventDate")?,
            volume: require_non_negative(request.volume.as_ref(), "volume")?,
        };

        let mut conn = self.db.acquire().await?;
        self.fields.insert_irrigation(&mut conn, &record).await?;

        Ok(ApiResponse::done("Irrigation record added successfully"))
    }

    pub async fn list_irrigation(&self) -> FarmResult<DataResponse<IrrigationRow>> {
        Ok(DataResponse::new(self.fields.list_irrigation().await?))
    }

    /// Add a soil sample together with its moisture reading.
    ///
    /// The reading is stored once per (date, pH) pair; a later sample with the
    /// same pair reuses the stored reading.
    pub async fn add_soil_record(&self, request: AddSoilRecordRequest) -> FarmResult<ApiResponse<()>> {
        info!("Adding soil record: {:?}", request.soil_cond_id);

        let record = NewSoilRecord {
            soil_cond_id: require_id(request.soil_cond_id.as_ref(), "soilCondID")?,
            field_id: require_id(request.field_id.as_ref(), "fieldID")?,
            moisture: NewMoisture {
                sample_date: require_date(request.sample_date.as_deref(), "sampleDate")?,
                ph: require_ph(request.ph.as_ref())?,
                moisture: require_non_negative(request.moisture.as_ref(), "moisture")?,
            },
        };

        let repo = self.fields.clone();
        self.db
            .unit_of_work(move |conn| {
                Box::pin(async move {
                    repo.upsert_moisture(&mut *conn, &record.moisture).await?;
                    repo.insert_soil_record(&mut *conn, &record).await
                })
            })
            .await?;

        Ok(ApiResponse::done("Soil record added successfully"))
    }

    pub async fn list_soil_records(&self) -> FarmResult<DataResponse<SoilRecordRow>> {
        Ok(DataResponse::new(self.fields.list_soil_records().await?))
    }

    pub async fn add_moisture(&self, request: AddMoistureRequest) -> FarmResult<ApiResponse<()>> {
        let moisture = NewMoisture {
            sample_date: require_date(request.sample_date.as_deref(), "sampleDate")?,
            ph: require_ph(request.ph.as_ref())?,
            moisture: require_non_negative(request.moisture.as_ref(), "moisture")?,
        };
        info!("Adding moisture reading for {} at pH {}", moisture.sample_date, moisture.ph);

        let mut conn = self.db.acquire().await?;
        self.fields.insert_moisture(&mut conn, &moisture).await?;

        Ok(ApiResponse::done("Moisture data added successfully"))
    }

    pub async fn list_moisture(&self) -> FarmResult<DataResponse<MoistureRow>> {
        Ok(DataResponse::new(self.fields.list_moisture().await?))
    }
}
