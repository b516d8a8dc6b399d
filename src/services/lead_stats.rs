// src/services/lead_stats.rs

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{
    dashboard::{LeadStatusSummary, StatusShare},
    lead::Lead,
};

/// Ordem em que os status aparecem no dashboard.
/// Rótulos fora da lista vêm depois, na ordem em que foram encontrados.
pub const CANONICAL_ORDER: [&str; 7] = [
    "nuevo",
    "contactado",
    "cualificado",
    "negociación",
    "convertido",
    "perdido",
    "inactivo",
];

/// Rótulo usado para registros sem status.
pub const UNKNOWN_STATUS: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusDistribution {
    counts: HashMap<String, u64>,
    // Primeira aparição de cada rótulo
    encountered: Vec<String>,
    total: u64,
}

impl StatusDistribution {
    pub fn counts(&self) -> &HashMap<String, u64> {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn count(&self, status: &str) -> u64 {
        self.counts().get(status).copied().unwrap_or(0)
    }

    /// `count / total * 100` com duas casas. `None` sem dados ou rótulo ausente.
    pub fn percentage(&self, status: &str) -> Option<Decimal> {
        let count = *self.counts.get(status)?;
        if self.total == 0 {
            return None;
        }
        let pct = Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(self.total);
        Some(pct.round_dp(2))
    }

    /// Percentual inteiro para exibição (meio arredonda para cima).
    pub fn rounded_percentage(&self, status: &str) -> Option<u32> {
        let count = *self.counts.get(status)?;
        if self.total == 0 {
            return None;
        }
        let rounded = (count * 200 + self.total) / (self.total * 2);
        Some(rounded as u32)
    }

    /// Rótulos na ordem de exibição.
    pub fn ordered_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.encountered.iter().map(String::as_str).collect();
        // sort estável: desconhecidos mantêm a ordem de chegada
        labels.sort_by_key(|label| canonical_rank(label));
        labels
    }

    pub fn ordered(&self) -> Vec<StatusShare> {
        self.ordered_labels()
            .into_iter()
            .map(|label| StatusShare {
                status: label.to_string(),
                count: self.count(label),
                percentage: self.percentage(label).unwrap_or(Decimal::ZERO),
                rounded_percentage: self.rounded_percentage(label).unwrap_or(0),
            })
            .collect()
    }

    pub fn into_summary(self) -> LeadStatusSummary {
        let distribution = self.ordered();
        LeadStatusSummary {
            total: self.total(),
            has_data: !self.is_empty(),
            counts: self.counts,
            distribution,
        }
    }
}

fn canonical_rank(label: &str) -> usize {
    let lower = label.to_lowercase();
    CANONICAL_ORDER
        .iter()
        .position(|known| *known == lower)
        .unwrap_or(CANONICAL_ORDER.len())
}

/// Agrupa por status. `None` é contado como `"unknown"`.
pub fn aggregate_by_status<I, S>(statuses: I) -> StatusDistribution
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let mut dist = StatusDistribution::default();

    for status in statuses {
        let label: &str = match &status {
            Some(s) => s.as_ref(),
            None => UNKNOWN_STATUS,
        };

        match dist.counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                dist.counts.insert(label.to_string(), 1);
                dist.encountered.push(label.to_string());
            }
        }
        dist.total += 1;
    }

    dist
}

/// Distribuição pelos rótulos do frontend.
pub fn aggregate_leads(leads: &[Lead]) -> StatusDistribution {
    aggregate_by_status(leads.iter().map(|lead| Some(lead.stage.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead::{BackendStatus, LeadRow};
    use chrono::Utc;
    use uuid::Uuid;

    fn lead_with(status: &str) -> Lead {
        let now = Utc::now();
        Lead::from(LeadRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            name: "Lead".into(),
            email: None,
            phone: None,
            company: None,
            status: Some(status.into()),
            source: None,
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn empty_input_is_no_data() {
        let dist = aggregate_by_status(Vec::<Option<&str>>::new());
        assert!(dist.counts().is_empty());
        assert_eq!(dist.total(), 0);
        assert!(dist.is_empty());
        assert_eq!(dist.percentage("nuevo"), None);
        assert!(dist.ordered().is_empty());
    }

    #[test]
    fn counts_per_status() {
        let dist = aggregate_by_status([Some("nuevo"), Some("nuevo"), Some("proceso")]);
        assert_eq!(dist.total(), 3);
        assert_eq!(dist.counts().len(), 2);
        assert_eq!(dist.count("nuevo"), 2);
        assert_eq!(dist.count("proceso"), 1);
    }

    #[test]
    fn missing_status_is_unknown() {
        let dist = aggregate_by_status([Some("nuevo"), None, None]);
        assert_eq!(dist.count(UNKNOWN_STATUS), 2);
        assert_eq!(dist.total(), 3);
    }

    #[test]
    fn percentages() {
        let dist = aggregate_by_status([Some("nuevo"), Some("nuevo"), Some("proceso")]);
        assert_eq!(dist.percentage("nuevo"), Some(Decimal::new(6667, 2)));
        assert_eq!(dist.percentage("proceso"), Some(Decimal::new(3333, 2)));
        assert_eq!(dist.rounded_percentage("nuevo"), Some(67));
        assert_eq!(dist.rounded_percentage("proceso"), Some(33));
        assert_eq!(dist.percentage("cliente"), None);
    }

    #[test]
    fn half_percent_rounds_up() {
        let mut statuses = vec![Some("cliente")];
        statuses.extend(std::iter::repeat_n(Some("nuevo"), 7));
        let dist = aggregate_by_status(statuses);
        // 1/8 = 12.5%
        assert_eq!(dist.rounded_percentage("cliente"), Some(13));
    }

    #[test]
    fn canonical_order_is_applied() {
        let dist = aggregate_by_status([Some("perdido"), Some("nuevo"), Some("contactado")]);
        assert_eq!(dist.ordered_labels(), vec!["nuevo", "contactado", "perdido"]);
    }

    #[test]
    fn unlisted_statuses_follow_in_encounter_order() {
        let dist = aggregate_by_status([
            Some("proceso"),
            Some("inactivo"),
            Some("cliente"),
            Some("nuevo"),
            Some("proceso"),
        ]);
        assert_eq!(
            dist.ordered_labels(),
            vec!["nuevo", "inactivo", "proceso", "cliente"]
        );
    }

    #[test]
    fn leads_are_grouped_by_frontend_label() {
        let leads = vec![lead_with("Nuevo"), lead_with("Activo"), lead_with("ACTIVO")];
        let dist = aggregate_leads(&leads);
        assert_eq!(dist.count("proceso"), 2);
        assert_eq!(dist.count("nuevo"), 1);
        assert_eq!(leads[1].status, BackendStatus::Activo);
    }

    #[test]
    fn summary_carries_ordered_shares() {
        let summary = aggregate_by_status([Some("proceso"), Some("nuevo")]).into_summary();
        assert!(summary.has_data);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.distribution[0].status, "nuevo");
        assert_eq!(summary.distribution[0].rounded_percentage, 50);
        assert_eq!(summary.distribution[1].percentage, Decimal::new(5000, 2));
    }
}
