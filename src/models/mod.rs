pub mod attempt;
pub mod audit_log;
pub mod layout;
pub mod mcq_set;
pub mod question;
pub mod quiz;
