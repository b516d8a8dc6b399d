// src/models/lead.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::lead_status::to_frontend;

// --- ENUMS ---

/// Status como é persistido pela API (coluna `leads.status`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum BackendStatus {
    #[default]
    Nuevo,
    Activo,
    Cliente,
}

/// Status como o frontend trabalha (estado da tela de CRM).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FrontendStatus {
    #[default]
    Nuevo,
    Proceso,
    Cliente,
}

/// Erro do parse estrito: o valor não pertence ao vocabulário.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status desconhecido: '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl BackendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nuevo => "Nuevo",
            Self::Activo => "Activo",
            Self::Cliente => "Cliente",
        }
    }

    pub fn to_frontend(self) -> FrontendStatus {
        self.into()
    }
}

impl FrontendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nuevo => "nuevo",
            Self::Proceso => "proceso",
            Self::Cliente => "cliente",
        }
    }

    pub fn to_backend(self) -> BackendStatus {
        self.into()
    }
}

impl From<FrontendStatus> for BackendStatus {
    fn from(status: FrontendStatus) -> Self {
        match status {
            FrontendStatus::Nuevo => BackendStatus::Nuevo,
            FrontendStatus::Proceso => BackendStatus::Activo,
            FrontendStatus::Cliente => BackendStatus::Cliente,
        }
    }
}

impl From<BackendStatus> for FrontendStatus {
    fn from(status: BackendStatus) -> Self {
        match status {
            BackendStatus::Nuevo => FrontendStatus::Nuevo,
            BackendStatus::Activo => FrontendStatus::Proceso,
            BackendStatus::Cliente => FrontendStatus::Cliente,
        }
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FrontendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Parse estrito (sem default), usado na borda da API.
impl FromStr for BackendStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nuevo" => Ok(Self::Nuevo),
            "activo" => Ok(Self::Activo),
            "cliente" => Ok(Self::Cliente),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl FromStr for FrontendStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nuevo" => Ok(Self::Nuevo),
            "proceso" => Ok(Self::Proceso),
            "cliente" => Ok(Self::Cliente),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

// Aceita "Proceso", "PROCESO", etc. Qualquer outro valor é rejeitado.
impl<'de> Deserialize<'de> for FrontendStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// --- LEAD ---

/// Linha crua da tabela `leads`. O status vem como texto livre
/// (dados importados podem ter outra caixa) e é normalizado em `Lead`.
#[derive(Debug, Clone, FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    // O tenant já vem no cabeçalho; não volta na resposta
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Maria García")]
    pub name: String,
    #[schema(example = "maria@empresa.com")]
    pub email: Option<String>,
    #[schema(example = "+34 600 000 000")]
    pub phone: Option<String>,
    #[schema(example = "Empresa S.L.")]
    pub company: Option<String>,
    #[schema(example = "Activo")]
    pub status: BackendStatus,
    // Rótulo do frontend, derivado do status persistido
    #[schema(example = "proceso")]
    pub stage: FrontendStatus,
    #[schema(example = "landing")]
    pub source: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        let status = BackendStatus::from_stored(row.status.as_deref());
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            status,
            stage: status.to_frontend(),
            source: row.source,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl BackendStatus {
    /// Normaliza o texto salvo no banco. Valores fora do vocabulário viram `Nuevo`.
    pub fn from_stored(raw: Option<&str>) -> Self {
        to_frontend(raw).into()
    }
}

// --- ENTRADAS DO SERVIÇO ---

/// Dados de um lead vindos do formulário, já validados.
#[derive(Debug, Clone, Default)]
pub struct NewLead {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: BackendStatus,
    pub source: Option<String>,
    pub notes: Option<String>,
}

/// Campos de contato editáveis. O status muda só pela ação de transição.
#[derive(Debug, Clone, Default)]
pub struct LeadChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub status: Option<BackendStatus>,
    pub search: Option<String>,
}
