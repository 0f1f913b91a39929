// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LANG: &str = "pt";

// Os arquivos de tradução vão embutidos no binário.
const LOCALES: &[(&str, &str)] = &[
    ("pt", include_str!("../../locales/pt.json")),
    ("en", include_str!("../../locales/en.json")),
];

/// Idiomas com arquivo de tradução embutido.
pub fn is_supported(lang: &str) -> bool {
    LOCALES.iter().any(|(known, _)| *known == lang)
}

/// Mensagens traduzidas por idioma: `lang -> chave -> texto`.
/// Textos podem ter marcadores `{nome}` substituídos em `translate`.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut messages = HashMap::new();
        for (lang, raw) in LOCALES {
            let table: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Arquivo de tradução '{}' inválido: {}", lang, e))?;
            messages.insert(lang.to_string(), table);
        }
        Ok(Self { messages: Arc::new(messages) })
    }

    /// Busca no idioma pedido, depois no padrão; sem tradução devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|table| table.get(key)));

        let Some(template) = template else {
            return key.to_string();
        };

        args.iter().fold(template.clone(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_locale_has_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let pt = &store.messages["pt"];
        let en = &store.messages["en"];
        for key in pt.keys() {
            assert!(en.contains_key(key), "chave '{}' faltando em en.json", key);
        }
        assert_eq!(pt.len(), en.len());
        assert!(LOCALES.iter().all(|(lang, _)| store.messages.contains_key(*lang) && is_supported(lang)));
    }

    #[test]
    fn falls_back_to_default_language_then_key() {
        let store = I18nStore::load().unwrap();
        assert_eq!(
            store.translate("fr", "error.forbidden", &[]),
            store.translate("pt", "error.forbidden", &[])
        );
        assert_eq!(store.translate("en", "chave.inexistente", &[]), "chave.inexistente");
    }

    #[test]
    fn replaces_placeholders() {
        let store = I18nStore::load().unwrap();
        let text = store.translate("en", "error.slug_exists", &[("slug", "dr-ana")]);
        assert!(text.contains("dr-ana"));
        assert!(!text.contains("{slug}"));
    }
}
