pub mod analytics_service;
pub mod audit_service;
pub mod import_service;
pub mod layout_service;
pub mod mcq_backend;
pub mod scoring_service;
pub mod validation_service;
