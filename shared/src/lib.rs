use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A loosely typed input value.
///
/// Browser forms submit numbers either as JSON numbers or as strings, so every
/// numeric attribute of a request is accepted as a `Scalar` and interpreted by
/// the validation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Numeric interpretation of the value, if it has one.
    ///
    /// Blank strings and non-finite values have no numeric interpretation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(value) => Some(*value as f64),
            Scalar::Float(value) if value.is_finite() => Some(*value),
            Scalar::Float(_) => None,
            Scalar::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
            }
        }
    }

    /// Integer interpretation of the value, if it is integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(value) => Some(*value),
            _ => {
                let value = self.as_f64()?;
                if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                    Some(value as i64)
                } else {
                    None
                }
            }
        }
    }

    /// True for strings that are empty after trimming.
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(value) => write!(f, "{}", value),
            Scalar::Float(value) => write!(f, "{}", value),
            Scalar::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Envelope for plain table fetches: `{ "data": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

impl<T> DataResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Envelope for validated writes and reports: `{ "success", "message", "data"? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure_with(message: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Successful outcome that carries no data
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// Failed outcome that carries no data
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Insert requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddFarmerRequest {
    #[serde(rename = "farmerID")]
    pub farmer_id: Option<Scalar>,
    pub name: Option<String>,
    #[serde(rename = "contactInfo")]
    pub contact_info: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddFarmRequest {
    #[serde(rename = "farmID")]
    pub farm_id: Option<Scalar>,
    pub name: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "farmerID")]
    pub farmer_id: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddFieldRequest {
    #[serde(rename = "fieldID")]
    pub field_id: Option<Scalar>,
    #[serde(rename = "farmID")]
    pub farm_id: Option<Scalar>,
    /// Area is optional; an absent or blank value is stored as NULL
    pub area: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddCropRequest {
    #[serde(rename = "cropID")]
    pub crop_id: Option<Scalar>,
    #[serde(rename = "fieldID")]
    pub field_id: Option<Scalar>,
    #[serde(rename = "cropName")]
    pub crop_name: Option<String>,
    /// Planting date (YYYY-MM-DD)
    #[serde(rename = "plantDate")]
    pub plant_date: Option<String>,
    /// Harvest date (YYYY-MM-DD), must follow the planting date
    #[serde(rename = "harvestDate")]
    pub harvest_date: Option<String>,
    pub season: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddPesticideRequest {
    #[serde(rename = "pestID")]
    pub pest_id: Option<Scalar>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddCertificationRequest {
    #[serde(rename = "certID")]
    pub cert_id: Option<Scalar>,
    pub name: Option<String>,
    #[serde(rename = "awardDate")]
    pub award_date: Option<String>,
    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<String>,
    /// Farm that receives the certification
    #[serde(rename = "farmID")]
    pub farm_id: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddGrainRequest {
    #[serde(rename = "cropID")]
    pub crop_id: Option<Scalar>,
    #[serde(rename = "glutenContent")]
    pub gluten_content: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddVegetableRequest {
    #[serde(rename = "cropID")]
    pub crop_id: Option<Scalar>,
    /// 0 or 1, as a number or a string
    #[serde(rename = "isLeafy")]
    pub is_leafy: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddFruitRequest {
    #[serde(rename = "cropID")]
    pub crop_id: Option<Scalar>,
    #[serde(rename = "sugarContent")]
    pub sugar_content: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddCropYieldRequest {
    #[serde(rename = "cropID")]
    pub crop_id: Option<Scalar>,
    #[serde(rename = "totalYield")]
    pub total_yield: Option<Scalar>,
    #[serde(rename = "healthRating")]
    pub health_rating: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddTreatmentRequest {
    #[serde(rename = "cropID")]
    pub crop_id: Option<Scalar>,
    #[serde(rename = "pestID")]
    pub pest_id: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddIrrigationRequest {
    #[serde(rename = "irrigID")]
    pub irrig_id: Option<Scalar>,
    #[serde(rename = "fieldID")]
    pub field_id: Option<Scalar>,
    #[serde(rename = "eventDate")]
    pub event_date: Option<String>,
    pub volume: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddSoilRecordRequest {
    #[serde(rename = "soilCondID")]
    pub soil_cond_id: Option<Scalar>,
    #[serde(rename = "fieldID")]
    pub field_id: Option<Scalar>,
    #[serde(rename = "sampleDate")]
    pub sample_date: Option<String>,
    #[serde(rename = "pH")]
    pub ph: Option<Scalar>,
    /// Moisture reading for the (sampleDate, pH) pair
    pub moisture: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddMoistureRequest {
    #[serde(rename = "sampleDate")]
    pub sample_date: Option<String>,
    #[serde(rename = "pH")]
    pub ph: Option<Scalar>,
    pub moisture: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddReceivesRequest {
    #[serde(rename = "farmID")]
    pub farm_id: Option<Scalar>,
    #[serde(rename = "certID")]
    pub cert_id: Option<Scalar>,
}

// ---------------------------------------------------------------------------
// Update, delete and report requests
// ---------------------------------------------------------------------------

/// Partial farm update; blank attributes are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFarmRequest {
    #[serde(rename = "farmID")]
    pub farm_id: Option<Scalar>,
    #[serde(rename = "farmName")]
    pub farm_name: Option<String>,
    pub location: Option<String>,
    /// New owner of the farm
    #[serde(rename = "farmerID")]
    pub farmer_id: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteFarmRequest {
    #[serde(rename = "farmID")]
    pub farm_id: Option<Scalar>,
}

/// One `attribute operator value` term of a field selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCondition {
    pub attribute: String,
    pub operator: String,
    pub value: Option<Scalar>,
    /// `AND` or `OR`; joins this term to everything before it
    #[serde(default)]
    pub connector: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub conditions: Vec<SelectionCondition>,
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerRow {
    #[serde(rename = "farmerID")]
    pub farmer_id: i64,
    #[serde(rename = "contactInfo")]
    pub contact_info: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmRow {
    #[serde(rename = "farmID")]
    pub farm_id: i64,
    pub name: String,
    pub location: String,
    #[serde(rename = "farmerID")]
    pub farmer_id: i64,
    #[serde(rename = "farmerName")]
    pub farmer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRow {
    #[serde(rename = "fieldID")]
    pub field_id: i64,
    #[serde(rename = "farmID")]
    pub farm_id: i64,
    pub area: Option<f64>,
    #[serde(rename = "farmName")]
    pub farm_name: String,
}

/// A field as stored, without joined columns; the shape returned by selections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    #[serde(rename = "fieldID")]
    pub field_id: i64,
    #[serde(rename = "farmID")]
    pub farm_id: i64,
    pub area: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRow {
    #[serde(rename = "cropID")]
    pub crop_id: i64,
    #[serde(rename = "fieldID")]
    pub field_id: i64,
    pub name: String,
    #[serde(rename = "plantingDate")]
    pub planting_date: NaiveDate,
    #[serde(rename = "harvestDate")]
    pub harvest_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PesticideRow {
    #[serde(rename = "pestID")]
    pub pest_id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationRow {
    #[serde(rename = "certID")]
    pub cert_id: i64,
    pub name: String,
    #[serde(rename = "awardedDate")]
    pub awarded_date: NaiveDate,
    #[serde(rename = "expiryDate")]
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrainRow {
    #[serde(rename = "cropID")]
    pub crop_id: i64,
    #[serde(rename = "glutenContent")]
    pub gluten_content: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetableRow {
    #[serde(rename = "cropID")]
    pub crop_id: i64,
    /// Stored as 0 or 1
    #[serde(rename = "isLeafy")]
    pub is_leafy: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FruitRow {
    #[serde(rename = "cropID")]
    pub crop_id: i64,
    #[serde(rename = "sugarContent")]
    pub sugar_content: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropYieldRow {
    #[serde(rename = "cropID")]
    pub crop_id: i64,
    #[serde(rename = "totalYield")]
    pub total_yield: f64,
    #[serde(rename = "healthRating")]
    pub health_rating: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRow {
    #[serde(rename = "cropID")]
    pub crop_id: i64,
    #[serde(rename = "pestID")]
    pub pest_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationRow {
    #[serde(rename = "irrigID")]
    pub irrig_id: i64,
    #[serde(rename = "fieldID")]
    pub field_id: i64,
    #[serde(rename = "eventDate")]
    pub event_date: Option<NaiveDate>,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilRecordRow {
    #[serde(rename = "soilCondID")]
    pub soil_cond_id: i64,
    #[serde(rename = "fieldID")]
    pub field_id: i64,
    #[serde(rename = "sampleDate")]
    pub sample_date: NaiveDate,
    #[serde(rename = "pH")]
    pub ph: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoistureRow {
    #[serde(rename = "sampleDate")]
    pub sample_date: NaiveDate,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub moisture: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRow {
    #[serde(rename = "plantingDate")]
    pub planting_date: NaiveDate,
    pub season: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropTypeRow {
    pub name: String,
    #[serde(rename = "plantingDate")]
    pub planting_date: NaiveDate,
    #[serde(rename = "harvestDate")]
    pub harvest_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardExpiryRow {
    #[serde(rename = "awardedDate")]
    pub awarded_date: NaiveDate,
    #[serde(rename = "expiryDate")]
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivesRow {
    #[serde(rename = "farmID")]
    pub farm_id: i64,
    #[serde(rename = "certID")]
    pub cert_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfoRow {
    #[serde(rename = "contactInfo")]
    pub contact_info: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

/// A farm with its owner and every crop grown on any of its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmCropsRow {
    #[serde(rename = "farmID")]
    pub farm_id: i64,
    #[serde(rename = "farmerName")]
    pub farmer_name: String,
    #[serde(rename = "contactInfo")]
    pub contact_info: String,
    /// Crop names ordered by name; empty when the farm grows nothing
    pub crops: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageIrrigationRow {
    #[serde(rename = "fieldID")]
    pub field_id: i64,
    #[serde(rename = "averageVolume")]
    pub average_volume: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthyFieldRow {
    #[serde(rename = "fieldID")]
    pub field_id: i64,
    #[serde(rename = "averagePH")]
    pub average_ph: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIdRow {
    #[serde(rename = "fieldID")]
    pub field_id: i64,
}

/// A projected row: one JSON value per requested column, in request order
pub type ProjectedRow = Vec<serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_deserializes_numbers_and_strings() {
        let int: Scalar = serde_json::from_str("7").unwrap();
        let float: Scalar = serde_json::from_str("7.5").unwrap();
        let text: Scalar = serde_json::from_str("\"12\"").unwrap();

        assert_eq!(int, Scalar::Int(7));
        assert_eq!(float, Scalar::Float(7.5));
        assert_eq!(text, Scalar::Text("12".to_string()));
    }

    #[test]
    fn test_scalar_numeric_interpretation() {
        assert_eq!(Scalar::from(" 12 ").as_i64(), Some(12));
        assert_eq!(Scalar::from("12.0").as_i64(), Some(12));
        assert_eq!(Scalar::from("12.5").as_i64(), None);
        assert_eq!(Scalar::from("12.5").as_f64(), Some(12.5));
        assert_eq!(Scalar::from("").as_f64(), None);
        assert_eq!(Scalar::from("abc").as_f64(), None);
        assert_eq!(Scalar::from("inf").as_f64(), None);
        assert!(Scalar::from("   ").is_blank());
        assert!(!Scalar::Int(0).is_blank());
    }

    #[test]
    fn test_request_uses_wire_attribute_names() {
        let body = r#"{"farmID": 3, "name": "Green Acres", "location": "Delta", "farmerID": "1"}"#;
        let request: AddFarmRequest = serde_json::from_str(body).unwrap();

        assert_eq!(request.farm_id, Some(Scalar::Int(3)));
        assert_eq!(request.farmer_id, Some(Scalar::Text("1".to_string())));
        assert_eq!(request.name.as_deref(), Some("Green Acres"));
    }

    #[test]
    fn test_api_response_omits_missing_data() {
        let json = serde_json::to_value(ApiResponse::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "message": "nope"}));

        let json = serde_json::to_value(ApiResponse::ok("ok", vec![1, 2])).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_selection_request_defaults_to_no_conditions() {
        let request: SelectionRequest = serde_json::from_str("{}").unwrap();
        assert!(request.conditions.is_empty());
    }
}
