pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
