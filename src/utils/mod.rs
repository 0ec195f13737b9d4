pub mod in_flight;
pub mod time;
pub mod upload;
