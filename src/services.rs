pub mod auth;
pub mod lead_service;
pub mod lead_stats;
pub mod lead_status;
