//! Analysis module - fetch, returns and forecast orchestration.

mod analysis_model;
mod analysis_service;


pub use analysis_model::{AnalysisRequest, VolatilityReport};
pub use analysis_service::{VolatilityService, VolatilityServiceTrait};
