// src/handlers/tenancy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::tenancy::MemberTenant,
};

// GET /api/users/me/tenants
// Empresas do usuário logado, para o frontend escolher o X-Tenant-ID
#[utoipa::path(
    get,
    path = "/api/users/me/tenants",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Empresas das quais o usuário é membro", body = Vec<MemberTenant>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_tenants(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {

    let tenants = app_state
        .tenant_repo
        .list_for_user(user.0.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tenants)))
}
