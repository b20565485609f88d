//! Site configuration
//!
//! Loaded from `weft.toml` at the site root:
//!
//! ```toml
//! site_url = "https://example.com/"
//! default_language = "en"
//! languages = ["en", "fr"]
//! ```
//!
//! The default language is served from the site root; every other language
//! gets a `<lang>/` subdirectory and URL.

use camino::Utf8Path;
use serde::Deserialize;

use crate::error::BuildError;

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Public base URL of the site, trailing slash included.
    pub site_url: String,

    #[serde(default = "default_language")]
    pub default_language: String,

    /// Languages to build, default language included. Empty means just the
    /// default.
    #[serde(default)]
    pub languages: Vec<String>,
}

fn default_language() -> String {
    "en".to_string()
}

impl SiteConfig {
    pub fn load(path: &Utf8Path) -> Result<Self, BuildError> {
        let text = std::fs::read_to_string(path).map_err(|source| BuildError::Read {
            path: path.to_owned(),
            source,
        })?;
        let mut config: SiteConfig = toml::from_str(&text).map_err(|source| BuildError::Config {
            path: path.to_owned(),
            source,
        })?;
        if config.languages.is_empty() {
            config.languages = vec![config.default_language.clone()];
        }
        Ok(config)
    }

    /// Public URL of one language's page.
    pub fn page_url(&self, lang: &str) -> String {
        if lang == self.default_language {
            self.site_url.clone()
        } else {
            format!("{}{}/", self.site_url, lang)
        }
    }

    /// All `(lang, url)` pairs in configured order.
    pub fn page_urls(&self) -> Vec<PageUrl> {
        self.languages
            .iter()
            .map(|lang| PageUrl {
                lang: lang.clone(),
                url: self.page_url(lang),
            })
            .collect()
    }
}

/// One language's public page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl {
    pub lang: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(languages: &[&str]) -> SiteConfig {
        SiteConfig {
            site_url: "https://example.com/".to_string(),
            default_language: "en".to_string(),
            languages: languages.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn default_language_lives_at_the_root() {
        let cfg = config(&["en", "fr", "de"]);
        assert_eq!(cfg.page_url("en"), "https://example.com/");
        assert_eq!(cfg.page_url("fr"), "https://example.com/fr/");
    }

    #[test]
    fn page_urls_keep_configured_order() {
        let cfg = config(&["en", "fr"]);
        let urls: Vec<_> = cfg.page_urls().into_iter().map(|p| p.url).collect();
        assert_eq!(urls, vec!["https://example.com/", "https://example.com/fr/"]);
    }

    #[test]
    fn parses_minimal_toml() {
        let cfg: SiteConfig = toml::from_str(r#"site_url = "https://example.com/""#).unwrap();
        assert_eq!(cfg.default_language, "en");
        assert!(cfg.languages.is_empty());
    }
}
