// Repository modules
pub mod certification_repository;
pub mod crop_repository;
pub mod farm_repository;
pub mod farmer_repository;
pub mod field_repository;
pub mod report_repository;

#[cfg(test)]
pub mod test_utils;

// Re-export repository types
pub use certification_repository::CertificationRepository;
pub use crop_repository::CropRepository;
pub use farm_repository::FarmRepository;
pub use farmer_repository::FarmerRepository;
pub use field_repository::FieldRepository;
pub use report_repository::ReportRepository;
