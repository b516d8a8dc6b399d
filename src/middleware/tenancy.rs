// src/middleware/tenancy.rs

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// O nome do nosso cabeçalho HTTP customizado
pub const TENANT_ID_HEADER: &str = "x-tenant-id";

// O tenant (empresa) que o usuário quer acessar.
// Inserido nas extensions pelo `tenant_guard` depois da checagem de membro.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext(pub Uuid);

impl TenantContext {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let value = headers
            .get(TENANT_ID_HEADER)
            .ok_or(AppError::TenantHeaderMissing)?;

        let value_str = value.to_str().map_err(|_| AppError::TenantHeaderInvalid)?;

        let tenant_id = Uuid::parse_str(value_str.trim()).map_err(|_| AppError::TenantHeaderInvalid)?;

        Ok(TenantContext(tenant_id))
    }
}

impl FromRequestParts<AppState> for TenantContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<TenantContext>() {
            return Ok(*ctx);
        }

        // Rota sem o guard: nunca confiamos só no cabeçalho
        let locale = Locale::from_header(
            parts
                .headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok()),
        );
        Err(AppError::TenantAccessDenied.to_api_error(&locale, &state.i18n_store))
    }
}
