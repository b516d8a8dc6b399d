// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::auth::CurrentUser,
};

// Usuário autenticado, disponível nos handlers via extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub CurrentUser);

fn authenticate(app_state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, AppError> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    app_state.auth_service.validate_token(bearer.token())
}

/// Exige um Bearer token válido.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&app_state, request.headers())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

/// Exige token válido + cabeçalho X-Tenant-ID de uma loja da qual o usuário é membro.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&app_state, request.headers())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let tenant = TenantContext::from_headers(request.headers())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let is_member = app_state
        .tenant_repo
        .is_member(user.id, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if !is_member {
        tracing::warn!(user_id = %user.id, tenant_id = %tenant.0, "Acesso negado ao tenant");
        return Err(AppError::TenantAccessDenied.to_api_error(&locale, &app_state.i18n_store));
    }

    tracing::debug!(user_id = %user.id, email = ?user.email, tenant_id = %tenant.0, "Requisição autorizada");

    request.extensions_mut().insert(AuthenticatedUser(user));
    request.extensions_mut().insert(tenant);
    Ok(next.run(request).await)
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                let locale = Locale::from_header(
                    parts
                        .headers
                        .get(axum::http::header::ACCEPT_LANGUAGE)
                        .and_then(|v| v.to_str().ok()),
                );
                AppError::InvalidToken.to_api_error(&locale, &state.i18n_store)
            })
    }
}
