use std::{collections::HashMap, env, fs};

use anyhow::bail;

pub const SETTINGS_FILE: &str = "commission_desk.toml";

/// Connection settings for the hosted REST backend.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_url: String,
    pub anon_key: String,
    pub schema: String,
    pub client_info: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_url: String::new(),
            anon_key: String::new(),
            schema: "public".into(),
            client_info: "xoxo-erp-crm".into(),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Both values are required before a single request can be built.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.project_url.trim().is_empty() {
            bail!(
                "missing backend project url (set SUPABASE_URL or project_url in {})",
                SETTINGS_FILE
            );
        }
        if self.anon_key.trim().is_empty() {
            bail!(
                "missing backend anon key (set SUPABASE_ANON_KEY or anon_key in {})",
                SETTINGS_FILE
            );
        }
        Ok(())
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("project_url") {
                settings.project_url = v.clone();
            }
            if let Some(v) = file_cfg.get("anon_key") {
                settings.anon_key = v.clone();
            }
            if let Some(v) = file_cfg.get("schema") {
                settings.schema = v.clone();
            }
            if let Some(v) = file_cfg.get("client_info") {
                settings.client_info = v.clone();
            }
            if let Some(v) = file_cfg.get("request_timeout_secs") {
                if let Ok(parsed) = v.parse::<u64>() {
                    settings.request_timeout_secs = parsed;
                }
            }
        }
    }

    if let Ok(v) = env::var("SUPABASE_URL") {
        settings.project_url = v;
    }
    if let Ok(v) = env::var("APP__SUPABASE_URL") {
        settings.project_url = v;
    }

    if let Ok(v) = env::var("SUPABASE_ANON_KEY") {
        settings.anon_key = v;
    }
    if let Ok(v) = env::var("APP__SUPABASE_ANON_KEY") {
        settings.anon_key = v;
    }

    if let Ok(v) = env::var("APP__SCHEMA") {
        settings.schema = v;
    }

    if let Ok(v) = env::var("APP__CLIENT_INFO") {
        settings.client_info = v;
    }

    if let Ok(v) = env::var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings.project_url = normalize_project_url(&settings.project_url);
    settings
}

/// Accepts bare hosts and trailing slashes; request paths are joined against
/// the normalized form.
pub fn normalize_project_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    with_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_bare_host_to_https() {
        assert_eq!(
            normalize_project_url("abc123.supabase.co"),
            "https://abc123.supabase.co"
        );
    }

    #[test]
    fn strips_trailing_slashes_and_whitespace() {
        assert_eq!(
            normalize_project_url("  http://localhost:54321/// "),
            "http://localhost:54321"
        );
        assert_eq!(normalize_project_url("   "), "");
    }

    #[test]
    fn defaults_match_the_hosted_project_conventions() {
        let settings = Settings::default();
        assert_eq!(settings.schema, "public");
        assert_eq!(settings.client_info, "xoxo-erp-crm");
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn validate_requires_url_and_key() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_err());
        settings.project_url = "https://abc123.supabase.co".into();
        assert!(settings.validate().is_err());
        settings.anon_key = "anon".into();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn prefixed_env_vars_override_plain_ones() {
        env::set_var("SUPABASE_URL", "https://plain.supabase.co");
        env::set_var("APP__SUPABASE_URL", "https://prefixed.supabase.co/");

        let settings = load_settings();
        assert_eq!(settings.project_url, "https://prefixed.supabase.co");

        env::remove_var("SUPABASE_URL");
        env::remove_var("APP__SUPABASE_URL");
    }
}
