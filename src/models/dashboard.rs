// src/models/dashboard.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Uma fatia do gráfico de status
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusShare {
    #[schema(example = "nuevo")]
    pub status: String,
    #[schema(example = 12)]
    pub count: u64,
    #[schema(value_type = f64, example = 66.67)]
    pub percentage: Decimal,
    #[schema(example = 67)]
    pub rounded_percentage: u32,
}

// Distribuição dos leads por status (cards + gráfico de pizza)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadStatusSummary {
    #[schema(example = 18)]
    pub total: u64,
    // false quando o tenant ainda não tem leads ("sem dados")
    pub has_data: bool,
    #[schema(example = json!({"nuevo": 12, "proceso": 6}))]
    pub counts: HashMap<String, u64>,
    pub distribution: Vec<StatusShare>,
}
