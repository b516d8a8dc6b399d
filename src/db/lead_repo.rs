// src/db/lead_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{BackendStatus, LeadChanges, LeadFilter, LeadRow, NewLead},
};

const LEAD_COLUMNS: &str = r#"
    id, tenant_id, name, email, phone, company,
    status, source, notes, created_at, updated_at
"#;

// Todas as consultas recebem o executor da transação RLS do handler.
#[derive(Clone, Default)]
pub struct LeadRepository;

impl LeadRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_lead<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        lead: &NewLead,
    ) -> Result<LeadRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO leads (tenant_id, name, email, phone, company, status, source, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {LEAD_COLUMNS}
            "#
        );

        sqlx::query_as::<_, LeadRow>(&sql)
            .bind(tenant_id)
            .bind(&lead.name)
            .bind(lead.email.as_deref())
            .bind(lead.phone.as_deref())
            .bind(lead.company.as_deref())
            .bind(lead.status.as_str())
            .bind(lead.source.as_deref())
            .bind(lead.notes.as_deref())
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_violation(e, lead.email.as_deref()))
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        lead_id: Uuid,
    ) -> Result<Option<LeadRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE tenant_id = $1 AND id = $2");

        let row = sqlx::query_as::<_, LeadRow>(&sql)
            .bind(tenant_id)
            .bind(lead_id)
            .fetch_optional(executor)
            .await?;

        Ok(row)
    }

    /// Lista os leads do tenant, mais recentes primeiro.
    /// A coluna só aceita o vocabulário do backend (`leads_status_check`),
    /// então o status é comparado direto e usa `idx_leads_tenant_status`.
    pub async fn list_leads<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        filter: &LeadFilter,
    ) -> Result<Vec<LeadRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {LEAD_COLUMNS}
            FROM leads
            WHERE tenant_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND (
                  $3::text IS NULL
                  OR name ILIKE $3 ESCAPE '\'
                  OR email ILIKE $3 ESCAPE '\'
                  OR company ILIKE $3 ESCAPE '\'
              )
            ORDER BY created_at DESC
            "#
        );

        let search_term = filter.search.as_deref().map(contains_pattern);

        let rows = sqlx::query_as::<_, LeadRow>(&sql)
            .bind(tenant_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(search_term)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    /// Atualiza só os campos enviados. `None` quando o lead não existe no tenant.
    pub async fn update_lead<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        lead_id: Uuid,
        changes: &LeadChanges,
    ) -> Result<Option<LeadRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE leads SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                company = COALESCE($6, company),
                source = COALESCE($7, source),
                notes = COALESCE($8, notes),
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {LEAD_COLUMNS}
            "#
        );

        sqlx::query_as::<_, LeadRow>(&sql)
            .bind(tenant_id)
            .bind(lead_id)
            .bind(changes.name.as_deref())
            .bind(changes.email.as_deref())
            .bind(changes.phone.as_deref())
            .bind(changes.company.as_deref())
            .bind(changes.source.as_deref())
            .bind(changes.notes.as_deref())
            .fetch_optional(executor)
            .await
            .map_err(|e| map_unique_violation(e, changes.email.as_deref()))
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        lead_id: Uuid,
        status: BackendStatus,
    ) -> Result<Option<LeadRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE leads SET status = $3, updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING {LEAD_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LeadRow>(&sql)
            .bind(tenant_id)
            .bind(lead_id)
            .bind(status.as_str())
            .fetch_optional(executor)
            .await?;

        Ok(row)
    }
}

// `%` e `_` digitados pelo usuário são literais na busca
fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{escaped}%")
}

// Converte erro de violação de chave única (e-mail por tenant) em um erro mais amigável
fn map_unique_violation(e: sqlx::Error, email: Option<&str>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(format!(
                "O e-mail '{}' já está cadastrado.",
                email.unwrap_or("?")
            ));
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_term_is_wrapped_in_wildcards() {
        assert_eq!(contains_pattern("garcía"), "%garcía%");
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(contains_pattern("%"), "%\\%%");
        assert_eq!(contains_pattern("100%_off"), "%100\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
