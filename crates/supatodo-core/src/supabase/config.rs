//! Supabase project configuration

use serde::{Deserialize, Serialize};
use url::Url;

pub const URL_VAR: &str = "SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
pub const REDIRECT_VAR: &str = "SUPABASE_REDIRECT_URL";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid Supabase URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Supabase anon key is empty")]
    EmptyKey,
}

/// Where the project lives and how to identify as its public client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project base URL, always ending in `/`
    pub url: Url,
    /// Public anon key sent as `apikey` on every request
    pub anon_key: String,
    /// Landing page for confirmation e-mails
    #[serde(default)]
    pub email_redirect_to: Option<String>,
}

impl SupabaseConfig {
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let mut parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }
        // Url::join replaces the last segment unless the base ends in '/'
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }

        Ok(Self {
            url: parsed,
            anon_key,
            email_redirect_to: None,
        })
    }

    pub fn with_email_redirect(mut self, email_redirect_to: Option<String>) -> Self {
        self.email_redirect_to = email_redirect_to;
        self
    }

    /// Read from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read values baked in at compile time (the WASM build has no
    /// process environment)
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| {
            match name {
                URL_VAR => option_env!("SUPABASE_URL"),
                ANON_KEY_VAR => option_env!("SUPABASE_ANON_KEY"),
                REDIRECT_VAR => option_env!("SUPABASE_REDIRECT_URL"),
                _ => None,
            }
            .map(str::to_string)
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let present = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let url = present(URL_VAR).ok_or(ConfigError::Missing(URL_VAR))?;
        let anon_key = present(ANON_KEY_VAR).ok_or(ConfigError::Missing(ANON_KEY_VAR))?;
        Ok(Self::new(&url, anon_key)?.with_email_redirect(present(REDIRECT_VAR)))
    }

    /// Absolute URL for a path relative to the project root
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.url.join(path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_endpoint_keeps_project_path() {
        let config = SupabaseConfig::new("https://proxy.example/supabase", "key").unwrap();
        assert_eq!(
            config.endpoint("/auth/v1/signup").unwrap().as_str(),
            "https://proxy.example/supabase/auth/v1/signup"
        );

        let config = SupabaseConfig::new("https://abc.supabase.co", "key").unwrap();
        assert_eq!(
            config.endpoint("rest/v1/todos").unwrap().as_str(),
            "https://abc.supabase.co/rest/v1/todos"
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SupabaseConfig::new("not a url", "key"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            SupabaseConfig::new("ftp://files.example", "key"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert_eq!(
            SupabaseConfig::new("https://abc.supabase.co", "  "),
            Err(ConfigError::EmptyKey)
        );
    }

    #[test]
    fn test_lookup_reads_all_values() {
        let config = SupabaseConfig::from_lookup(lookup(&[
            (URL_VAR, "https://abc.supabase.co"),
            (ANON_KEY_VAR, "anon"),
            (REDIRECT_VAR, "https://todo.example"),
        ]))
        .unwrap();

        assert_eq!(config.anon_key, "anon");
        assert_eq!(config.email_redirect_to.as_deref(), Some("https://todo.example"));
    }

    #[test]
    fn test_lookup_reports_missing_variables() {
        assert_eq!(
            SupabaseConfig::from_lookup(lookup(&[(ANON_KEY_VAR, "anon")])),
            Err(ConfigError::Missing(URL_VAR))
        );
        assert_eq!(
            SupabaseConfig::from_lookup(lookup(&[
                (URL_VAR, "https://abc.supabase.co"),
                (ANON_KEY_VAR, ""),
            ])),
            Err(ConfigError::Missing(ANON_KEY_VAR))
        );
    }

    #[test]
    fn test_config_serde() {
        let config = SupabaseConfig::new("https://abc.supabase.co", "anon").unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["url"], "https://abc.supabase.co/");

        let parsed: SupabaseConfig =
            serde_json::from_str(r#"{"url":"https://abc.supabase.co/","anon_key":"anon"}"#).unwrap();
        assert_eq!(parsed, config);
    }
}
