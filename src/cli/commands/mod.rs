pub mod check;
pub mod config;
pub mod doctor;
pub mod log;
pub mod pull;
pub mod save;
pub mod status;
