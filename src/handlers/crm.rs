// src/handlers/crm.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::begin_rls_transaction,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::lead::{FrontendStatus, Lead, LeadChanges, LeadFilter, NewLead},
    services::lead_status::to_backend,
};

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, max = 200, message = "invalid_length"))]
    #[schema(example = "Maria García")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@empresa.com")]
    pub email: Option<String>,

    #[validate(length(max = 40, message = "too_long"))]
    #[schema(example = "+34 600 000 000")]
    pub phone: Option<String>,

    #[validate(length(max = 200, message = "too_long"))]
    #[schema(example = "Empresa S.L.")]
    pub company: Option<String>,

    // Vocabulário do frontend. Ausente ou desconhecido vira "Nuevo".
    #[schema(example = "nuevo")]
    pub status: Option<String>,

    #[schema(example = "landing")]
    pub source: Option<String>,

    pub notes: Option<String>,
}

impl CreateLeadPayload {
    fn into_new_lead(self) -> NewLead {
        NewLead {
            status: to_backend(self.status.as_deref()),
            name: self.name.trim().to_string(),
            email: self.email,
            phone: self.phone,
            company: self.company,
            source: self.source,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    #[validate(length(min = 1, max = 200, message = "invalid_length"))]
    pub name: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    #[validate(length(max = 40, message = "too_long"))]
    pub phone: Option<String>,

    #[validate(length(max = 200, message = "too_long"))]
    pub company: Option<String>,

    pub source: Option<String>,
    pub notes: Option<String>,
}

impl From<UpdateLeadPayload> for LeadChanges {
    fn from(payload: UpdateLeadPayload) -> Self {
        Self {
            name: payload.name.map(|n| n.trim().to_string()),
            email: payload.email,
            phone: payload.phone,
            company: payload.company,
            source: payload.source,
            notes: payload.notes,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatusPayload {
    // Estrito: "nuevo", "proceso" ou "cliente" (sem diferenciar caixa)
    #[schema(example = "proceso")]
    pub status: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLeadsQuery {
    /// Status no vocabulário do frontend
    #[param(example = "proceso")]
    pub status: Option<String>,
    /// Busca por nome, e-mail ou empresa
    #[param(example = "garcía")]
    pub q: Option<String>,
}

fn parse_frontend_status(raw: &str) -> Result<FrontendStatus, AppError> {
    raw.parse()
        .map_err(|_| AppError::InvalidStatus(raw.to_string()))
}

impl ListLeadsQuery {
    fn into_filter(self) -> Result<LeadFilter, AppError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_frontend_status(raw)?.to_backend()),
        };

        let search = self
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        Ok(LeadFilter { status, search })
    }
}

// =============================================================================
//  HANDLERS
// =============================================================================

// POST /api/crm/leads
#[utoipa::path(
    post,
    path = "/api/crm/leads",
    tag = "CRM",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado no tenant")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload.validate().map_err(|e| to_api(AppError::ValidationError(e)))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(to_api)?;

    let lead = app_state
        .lead_service
        .create_lead(&mut *tx, tenant.0, payload.into_new_lead())
        .await
        .map_err(to_api)?;

    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/crm/leads
#[utoipa::path(
    get,
    path = "/api/crm/leads",
    tag = "CRM",
    responses(
        (status = 200, description = "Lista de leads", body = Vec<Lead>),
        (status = 400, description = "Status inválido no filtro")
    ),
    params(
        ListLeadsQuery,
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Query(query): Query<ListLeadsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let filter = query.into_filter().map_err(to_api)?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(to_api)?;

    let leads = app_state
        .lead_service
        .list_leads(&mut *tx, tenant.0, &filter)
        .await
        .map_err(to_api)?;

    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/crm/leads/{id}
#[utoipa::path(
    get,
    path = "/api/crm/leads/{id}",
    tag = "CRM",
    responses(
        (status = 200, description = "Lead", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Lead"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(lead_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(to_api)?;

    let lead = app_state
        .lead_service
        .get_lead(&mut *tx, tenant.0, lead_id)
        .await
        .map_err(to_api)?;

    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok((StatusCode::OK, Json(lead)))
}

// PUT /api/crm/leads/{id}
#[utoipa::path(
    put,
    path = "/api/crm/leads/{id}",
    tag = "CRM",
    request_body = UpdateLeadPayload,
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Lead"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(lead_id): Path<Uuid>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    payload.validate().map_err(|e| to_api(AppError::ValidationError(e)))?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(to_api)?;

    let lead = app_state
        .lead_service
        .update_lead(&mut *tx, tenant.0, lead_id, &payload.into())
        .await
        .map_err(to_api)?;

    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok((StatusCode::OK, Json(lead)))
}

// PUT /api/crm/leads/{id}/status
#[utoipa::path(
    put,
    path = "/api/crm/leads/{id}/status",
    tag = "CRM",
    request_body = ChangeStatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = Lead),
        (status = 400, description = "Status desconhecido"),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do Lead"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_lead_status(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(lead_id): Path<Uuid>,
    Json(payload): Json<ChangeStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    // Valida na borda: daqui pra dentro só circula o enum
    let new_status = parse_frontend_status(&payload.status).map_err(to_api)?;

    let mut tx = begin_rls_transaction(&app_state, &tenant, &user)
        .await
        .map_err(to_api)?;

    let lead = app_state
        .lead_service
        .change_status(&mut *tx, tenant.0, lead_id, new_status)
        .await
        .map_err(to_api)?;

    tx.commit().await.map_err(|e| to_api(e.into()))?;

    Ok((StatusCode::OK, Json(lead)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::BackendStatus;

    fn create_payload(json: serde_json::Value) -> CreateLeadPayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn create_payload_translates_status_leniently() {
        let lead = create_payload(serde_json::json!({"name": "Ana", "status": "PROCESO"})).into_new_lead();
        assert_eq!(lead.status, BackendStatus::Activo);

        let lead = create_payload(serde_json::json!({"name": "Ana"})).into_new_lead();
        assert_eq!(lead.status, BackendStatus::Nuevo);

        let lead = create_payload(serde_json::json!({"name": "Ana", "status": "perdido"})).into_new_lead();
        assert_eq!(lead.status, BackendStatus::Nuevo);
    }

    #[test]
    fn create_payload_validation() {
        let payload = create_payload(serde_json::json!({"name": "", "email": "nao-e-email"}));
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn list_query_parses_status_strictly() {
        let filter = ListLeadsQuery {
            status: Some("Cliente".into()),
            q: Some("  garcía ".into()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.status, Some(BackendStatus::Cliente));
        assert_eq!(filter.search.as_deref(), Some("garcía"));

        let err = ListLeadsQuery {
            status: Some("perdido".into()),
            q: None,
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus(v) if v == "perdido"));
    }

    #[test]
    fn empty_query_means_no_filter() {
        let filter = ListLeadsQuery {
            status: Some(" ".into()),
            q: Some("".into()),
        }
        .into_filter()
        .unwrap();
        assert!(filter.status.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn change_status_payload_is_strict() {
        assert_eq!(parse_frontend_status("Cliente").unwrap(), FrontendStatus::Cliente);
        assert!(matches!(parse_frontend_status("Activo"), Err(AppError::InvalidStatus(_))));
    }
}
