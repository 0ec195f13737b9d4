pub mod analytics_dto;
pub mod audit_dto;
pub mod import_dto;
pub mod layout_dto;
pub mod mcq_set_dto;
pub mod quiz_dto;
