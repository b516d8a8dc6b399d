// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "en";

// Catálogos embutidos no binário
const CATALOGS: [(&str, &str); 3] = [
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
    ("es", include_str!("../../locales/es.json")),
];

/// Mensagens traduzidas por idioma: `lang -> (código -> mensagem)`.
#[derive(Debug, Clone, Default)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Catálogo '{}' inválido: {}", lang, e))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs })
    }

    /// Busca a mensagem no idioma pedido, depois no padrão e por fim devolve o próprio código.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        [lang, DEFAULT_LANG]
            .iter()
            .find_map(|l| self.catalogs.get(*l).and_then(|c| c.get(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_share_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let en = &store.catalogs["en"];
        for lang in ["pt", "es"] {
            let other = &store.catalogs[lang];
            assert_eq!(en.len(), other.len(), "catálogo {}", lang);
            assert!(en.keys().all(|k| other.contains_key(k)), "catálogo {}", lang);
        }
    }

    #[test]
    fn translates_with_fallbacks() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("pt", "lead_not_found"), "Lead não encontrado.");
        assert_eq!(store.translate("de", "lead_not_found"), "Lead not found.");
        assert_eq!(store.translate("es", "sem_chave"), "sem_chave");
    }
}
