pub mod chart_service;
pub mod price_service;
