use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// User settings, persisted both in the store blob and in settings.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Quiet interval before the idle auto-save fires, in milliseconds
    #[serde(default = "default_autosave_interval_ms")]
    pub autosave_interval_ms: u64,
    /// Background color for `==highlighted==` spans
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
    /// Override for the continuation system prompt (None = built-in default)
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Override for the continuation user prompt
    #[serde(default)]
    pub user_prompt: Option<String>,
    /// Override for the brainstorm/ideas prompt
    #[serde(default)]
    pub ideas_prompt: Option<String>,
    /// Override for the newline-delimited detected-phrase lexicon
    #[serde(default)]
    pub phrase_list: Option<String>,
    /// Completion API endpoint
    #[serde(default = "default_endpoint")]
    pub api_endpoint: String,
    /// Bearer credential for the completion API
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion length budget per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Remote sync endpoint; None = sync off
    #[serde(default)]
    pub sync_endpoint: Option<String>,
    /// Independent sync credential. Never the API key; the two trust
    /// domains do not share a secret.
    #[serde(default)]
    pub sync_key: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Per-variable theme color overrides, in the order the user set them
    #[serde(default)]
    pub theme_colors: IndexMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            autosave_interval_ms: default_autosave_interval_ms(),
            highlight_color: default_highlight_color(),
            system_prompt: None,
            user_prompt: None,
            ideas_prompt: None,
            phrase_list: None,
            api_endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            sync_endpoint: None,
            sync_key: None,
            theme: default_theme(),
            theme_colors: IndexMap::new(),
        }
    }
}

fn default_autosave_interval_ms() -> u64 {
    10_000
}

fn default_highlight_color() -> String {
    "#fff59d".to_string()
}

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "openrouter/auto".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_max_tokens() -> u32 {
    500
}

fn default_theme() -> String {
    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.autosave_interval_ms, 10_000);
        assert_eq!(settings.highlight_color, "#fff59d");
        assert!(settings.api_key.is_none());
        assert!(settings.sync_endpoint.is_none());
        assert!(settings.theme_colors.is_empty());
    }

    #[test]
    fn theme_colors_preserve_insertion_order() {
        let mut settings = Settings::default();
        settings
            .theme_colors
            .insert("--accent-primary".into(), "#667eea".into());
        settings
            .theme_colors
            .insert("--bg-primary".into(), "#1a1a2e".into());

        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        let keys: Vec<&String> = back.theme_colors.keys().collect();
        assert_eq!(keys, ["--accent-primary", "--bg-primary"]);
    }
}
