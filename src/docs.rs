// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Tenancy ---
        handlers::tenancy::list_my_tenants,

        // --- CRM ---
        handlers::crm::create_lead,
        handlers::crm::list_leads,
        handlers::crm::get_lead,
        handlers::crm::update_lead,
        handlers::crm::change_lead_status,

        // --- Dashboard ---
        handlers::dashboard::lead_status_summary,
    ),
    components(
        schemas(
            // --- CRM ---
            models::lead::BackendStatus,
            models::lead::FrontendStatus,
            models::lead::Lead,
            handlers::crm::CreateLeadPayload,
            handlers::crm::UpdateLeadPayload,
            handlers::crm::ChangeStatusPayload,

            // --- DASHBOARD ---
            models::dashboard::LeadStatusSummary,
            models::dashboard::StatusShare,

            // --- TENANCY ---
            models::tenancy::MemberTenant,
        )
    ),
    tags(
        (name = "CRM", description = "Gestão de Leads"),
        (name = "Dashboard", description = "Indicadores do funil de leads"),
        (name = "Tenancy", description = "Empresas e acesso")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
