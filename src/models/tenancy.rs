// src/models/tenancy.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Uma empresa vista por um de seus membros
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberTenant {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Academia Central")]
    pub name: String,
    #[schema(example = "academia-central")]
    pub slug: String,
    #[schema(example = "member")]
    pub role: String,
}
