// src/router.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::{auth_guard, tenant_guard},
};

pub fn create_router(app_state: AppState) -> Router {
    // Rotas do usuário (só precisam do token)
    let user_routes = Router::new()
        .route("/me/tenants", get(handlers::tenancy::list_my_tenants))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let crm_routes = Router::new()
        .route("/leads"
               ,get(handlers::crm::list_leads)
               .post(handlers::crm::create_lead)
        )
        .route("/leads/{id}"
               ,get(handlers::crm::get_lead)
               .put(handlers::crm::update_lead)
        )
        .route("/leads/{id}/status"
               ,put(handlers::crm::change_lead_status)
        )
        // Aplica o middleware de Auth + Tenancy em tudo
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/lead-status", get(handlers::dashboard::lead_status_summary))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/users", user_routes)
        .nest("/api/crm", crm_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
