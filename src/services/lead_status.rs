// src/services/lead_status.rs
//
// Tradução entre o vocabulário de status do frontend (nuevo/proceso/cliente)
// e o persistido pela API (Nuevo/Activo/Cliente).
// Funções puras e totais: entrada nula, vazia ou desconhecida vira o status inicial.

use crate::models::lead::{BackendStatus, FrontendStatus};

/// Rótulo do frontend -> status persistido. Nunca falha.
pub fn to_backend(frontend_status: Option<&str>) -> BackendStatus {
    frontend_status
        .and_then(|s| s.parse::<FrontendStatus>().ok())
        .map(BackendStatus::from)
        .unwrap_or_default()
}

/// Status persistido -> rótulo do frontend. Nunca falha.
pub fn to_frontend(backend_status: Option<&str>) -> FrontendStatus {
    backend_status
        .and_then(|s| s.parse::<BackendStatus>().ok())
        .map(FrontendStatus::from)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONTEND: [&str; 3] = ["nuevo", "proceso", "cliente"];
    const BACKEND: [&str; 3] = ["Nuevo", "Activo", "Cliente"];

    #[test]
    fn frontend_labels_round_trip() {
        for s in FRONTEND {
            assert_eq!(to_frontend(Some(to_backend(Some(s)).as_str())).as_str(), s);
        }
    }

    #[test]
    fn backend_labels_round_trip() {
        for s in BACKEND {
            assert_eq!(to_backend(Some(to_frontend(Some(s)).as_str())).as_str(), s);
        }
    }

    #[test]
    fn to_backend_maps_each_label() {
        assert_eq!(to_backend(Some("nuevo")), BackendStatus::Nuevo);
        assert_eq!(to_backend(Some("proceso")), BackendStatus::Activo);
        assert_eq!(to_backend(Some("cliente")), BackendStatus::Cliente);
    }

    #[test]
    fn to_backend_defaults_to_nuevo() {
        assert_eq!(to_backend(None), BackendStatus::Nuevo);
        assert_eq!(to_backend(Some("")), BackendStatus::Nuevo);
        assert_eq!(to_backend(Some("GARBAGE")), BackendStatus::Nuevo);
        // Vocabulário do backend não é entrada válida aqui
        assert_eq!(to_backend(Some("Activo")), BackendStatus::Nuevo);
    }

    #[test]
    fn to_frontend_is_case_insensitive() {
        assert_eq!(to_frontend(Some("ACTIVO")), FrontendStatus::Proceso);
        assert_eq!(to_frontend(Some("cliente")), FrontendStatus::Cliente);
        assert_eq!(to_backend(Some("PrOcEsO")), BackendStatus::Activo);
    }

    #[test]
    fn to_frontend_defaults_to_nuevo() {
        assert_eq!(to_frontend(None), FrontendStatus::Nuevo);
        assert_eq!(to_frontend(Some("")), FrontendStatus::Nuevo);
        assert_eq!(to_frontend(Some("proceso")), FrontendStatus::Nuevo);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(to_backend(Some(" cliente ")), BackendStatus::Cliente);
        assert_eq!(to_frontend(Some("Activo\n")), FrontendStatus::Proceso);
    }
}
