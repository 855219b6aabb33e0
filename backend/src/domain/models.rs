//! Validated write commands.
//!
//! Each struct is produced by a service from its wire request once every
//! check has passed, and is what the repositories bind into SQL.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct NewFarmer {
    pub farmer_id: i64,
    pub name: String,
    pub contact_info: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFarm {
    pub farm_id: i64,
    pub name: String,
    pub location: String,
    pub farmer_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewField {
    pub field_id: i64,
    pub farm_id: i64,
    pub area: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCrop {
    pub crop_id: i64,
    pub field_id: i64,
    pub name: String,
    pub planting_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub season: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPesticide {
    pub pest_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCertification {
    pub cert_id: i64,
    pub name: String,
    pub awarded_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub farm_id: i64,
}

/// Category row for a crop: grain, vegetable or fruit
#[derive(Debug, Clone, PartialEq)]
pub enum CropCategory {
    Grain { crop_id: i64, gluten_content: Option<f64> },
    Vegetable { crop_id: i64, is_leafy: bool },
    Fruit { crop_id: i64, sugar_content: Option<f64> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCropYield {
    pub crop_id: i64,
    pub total_yield: f64,
    pub health_rating: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIrrigation {
    pub irrig_id: i64,
    pub field_id: i64,
    pub event_date: NaiveDate,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMoisture {
    pub sample_date: NaiveDate,
    pub ph: f64,
    pub moisture: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSoilRecord {
    pub soil_cond_id: i64,
    pub field_id: i64,
    pub moisture: NewMoisture,
}

/// Partial farm update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub farmer_id: Option<i64>,
}

impl FarmUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none() && self.farmer_id.is_none()
    }
}
