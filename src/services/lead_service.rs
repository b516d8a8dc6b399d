// src/services/lead_service.rs

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeadRepository,
    models::{
        dashboard::LeadStatusSummary,
        lead::{BackendStatus, FrontendStatus, Lead, LeadChanges, LeadFilter, NewLead},
    },
    services::lead_stats::aggregate_leads,
};

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
}

impl LeadService {
    pub fn new(repo: LeadRepository) -> Self {
        Self { repo }
    }

    pub async fn create_lead(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        lead: NewLead,
    ) -> Result<Lead, AppError> {
        let row = self.repo.create_lead(&mut *conn, tenant_id, &lead).await?;

        tracing::info!(lead_id = %row.id, status = %lead.status, "Lead criado");
        Ok(row.into())
    }

    pub async fn list_leads(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        filter: &LeadFilter,
    ) -> Result<Vec<Lead>, AppError> {
        let rows = self.repo.list_leads(&mut *conn, tenant_id, filter).await?;
        Ok(rows.into_iter().map(Lead::from).collect())
    }

    pub async fn get_lead(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        lead_id: Uuid,
    ) -> Result<Lead, AppError> {
        self.repo
            .find_by_id(&mut *conn, tenant_id, lead_id)
            .await?
            .map(Lead::from)
            .ok_or(AppError::LeadNotFound)
    }

    pub async fn update_lead(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        lead_id: Uuid,
        changes: &LeadChanges,
    ) -> Result<Lead, AppError> {
        self.repo
            .update_lead(&mut *conn, tenant_id, lead_id, changes)
            .await?
            .map(Lead::from)
            .ok_or(AppError::LeadNotFound)
    }

    /// Ação de mudança de status vinda do CRM (vocabulário do frontend).
    /// Se o texto gravado já é o status pedido, nada é gravado e o lead volta como está.
    pub async fn change_status(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
        lead_id: Uuid,
        new_status: FrontendStatus,
    ) -> Result<Lead, AppError> {
        let current = self
            .repo
            .find_by_id(&mut *conn, tenant_id, lead_id)
            .await?
            .ok_or(AppError::LeadNotFound)?;
        let target = new_status.to_backend();

        // Compara o valor cru, não o normalizado
        if current.status.as_deref() == Some(target.as_str()) {
            return Ok(current.into());
        }

        let from = BackendStatus::from_stored(current.status.as_deref());

        let updated: Lead = self
            .repo
            .update_status(&mut *conn, tenant_id, lead_id, target)
            .await?
            .map(Lead::from)
            .ok_or(AppError::LeadNotFound)?;

        tracing::info!(
            lead_id = %lead_id,
            from = %from,
            to = %updated.status,
            "Status do lead alterado"
        );

        Ok(updated)
    }

    /// Distribuição dos leads do tenant por status (rótulos do frontend).
    pub async fn status_summary(
        &self,
        conn: &mut PgConnection,
        tenant_id: Uuid,
    ) -> Result<LeadStatusSummary, AppError> {
        let leads = self
            .list_leads(&mut *conn, tenant_id, &LeadFilter::default())
            .await?;

        Ok(aggregate_leads(&leads).into_summary())
    }
}

// Precisam de um Postgres em DATABASE_URL. Sem a variável, os testes não rodam nada.
// Cada teste trabalha dentro de uma transação que nunca é confirmada.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LeadRepository;
    use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};

    async fn test_pool() -> Option<PgPool> {
        dotenvy::dotenv().ok();
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL ausente, pulando teste de banco");
            return None;
        };

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        Some(pool)
    }

    // Cria um tenant novo e abre a transação já com o RLS dele
    async fn tenant_tx(pool: &PgPool) -> (Transaction<'static, Postgres>, Uuid) {
        let mut tx = pool.begin().await.unwrap();

        let tenant_id: Uuid =
            sqlx::query_scalar("INSERT INTO tenants (name, slug) VALUES ($1, $2) RETURNING id")
                .bind("Loja Teste")
                .bind(format!("loja-{}", Uuid::new_v4()))
                .fetch_one(&mut *tx)
                .await
                .unwrap();

        sqlx::query("SELECT set_config('app.tenant_id', $1, true)")
            .bind(tenant_id.to_string())
            .execute(&mut *tx)
            .await
            .unwrap();

        (tx, tenant_id)
    }

    fn service() -> LeadService {
        LeadService::new(LeadRepository::new())
    }

    fn new_lead(name: &str, status: BackendStatus) -> NewLead {
        NewLead {
            name: name.into(),
            status,
            ..Default::default()
        }
    }

    fn by_status(status: BackendStatus) -> LeadFilter {
        LeadFilter {
            status: Some(status),
            search: None,
        }
    }

    #[tokio::test]
    async fn status_change_reaches_filter_and_summary() {
        let Some(pool) = test_pool().await else { return };
        let (mut tx, tenant_id) = tenant_tx(&pool).await;
        let svc = service();

        let ana = svc
            .create_lead(&mut tx, tenant_id, new_lead("Ana", BackendStatus::Nuevo))
            .await
            .unwrap();
        svc.create_lead(&mut tx, tenant_id, new_lead("Bruno", BackendStatus::Activo))
            .await
            .unwrap();
        svc.create_lead(&mut tx, tenant_id, new_lead("Carla", BackendStatus::Nuevo))
            .await
            .unwrap();

        let changed = svc
            .change_status(&mut tx, tenant_id, ana.id, FrontendStatus::Cliente)
            .await
            .unwrap();
        assert_eq!(changed.status, BackendStatus::Cliente);
        assert_eq!(changed.stage, FrontendStatus::Cliente);

        let summary = svc.status_summary(&mut tx, tenant_id).await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.counts["nuevo"], 1);
        assert_eq!(summary.counts["proceso"], 1);
        assert_eq!(summary.counts["cliente"], 1);

        // O filtro da lista tem que bater com a contagem do dashboard
        for status in [BackendStatus::Nuevo, BackendStatus::Activo, BackendStatus::Cliente] {
            let listed = svc
                .list_leads(&mut tx, tenant_id, &by_status(status))
                .await
                .unwrap();
            let label = status.to_frontend().as_str();
            assert_eq!(listed.len() as u64, summary.counts[label], "status {status}");
            assert!(listed.iter().all(|lead| lead.status == status));
        }
    }

    #[tokio::test]
    async fn same_status_change_writes_nothing() {
        let Some(pool) = test_pool().await else { return };
        let (mut tx, tenant_id) = tenant_tx(&pool).await;
        let svc = service();

        let lead = svc
            .create_lead(&mut tx, tenant_id, new_lead("Davi", BackendStatus::Activo))
            .await
            .unwrap();

        let unchanged = svc
            .change_status(&mut tx, tenant_id, lead.id, FrontendStatus::Proceso)
            .await
            .unwrap();
        assert_eq!(unchanged.status, BackendStatus::Activo);
        assert_eq!(unchanged.updated_at, lead.updated_at);
    }

    #[tokio::test]
    async fn status_change_of_missing_lead_is_not_found() {
        let Some(pool) = test_pool().await else { return };
        let (mut tx, tenant_id) = tenant_tx(&pool).await;

        let result = service()
            .change_status(&mut tx, tenant_id, Uuid::new_v4(), FrontendStatus::Cliente)
            .await;
        assert!(matches!(result, Err(AppError::LeadNotFound)));
    }

    #[tokio::test]
    async fn status_column_only_accepts_backend_vocabulary() {
        let Some(pool) = test_pool().await else { return };

        for raw in ["archivado", "Activo ", "activo", "proceso"] {
            let (mut tx, tenant_id) = tenant_tx(&pool).await;
            let err = sqlx::query("INSERT INTO leads (tenant_id, name, status) VALUES ($1, $2, $3)")
                .bind(tenant_id)
                .bind("Legado")
                .bind(raw)
                .execute(&mut *tx)
                .await
                .unwrap_err();

            let constraint = err.as_database_error().and_then(|e| e.constraint());
            assert_eq!(constraint, Some("leads_status_check"), "valor {raw:?}");
        }
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let Some(pool) = test_pool().await else { return };
        let (mut tx, tenant_id) = tenant_tx(&pool).await;
        let svc = service();

        let mut natural = new_lead("Elisa", BackendStatus::Nuevo);
        natural.company = Some("100% Natural".into());
        svc.create_lead(&mut tx, tenant_id, natural).await.unwrap();
        svc.create_lead(&mut tx, tenant_id, new_lead("Fabio", BackendStatus::Nuevo))
            .await
            .unwrap();

        let filter = LeadFilter {
            status: None,
            search: Some("%".into()),
        };
        let found = svc.list_leads(&mut tx, tenant_id, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Elisa");
    }
}
