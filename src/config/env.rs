use crate::config::types::Config;

/// Environment variable holding the LLM API key
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Environment variable overriding the LLM base URL
pub const BASE_URL_VAR: &str = "OPENROUTER_BASE_URL";

/// Environment variable overriding the model name
pub const MODEL_VAR: &str = "DEFAULT_MODEL";

/// Loads `config.env` and `.env` from the working directory, if present
///
/// Variables already set in the process environment are not overwritten.
pub fn load_env_files() {
    for name in ["config.env", ".env"] {
        match dotenvy::from_filename(name) {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Could not load {}: {}", name, e),
        }
    }
}

impl Config {
    /// Applies overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides using the given variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_VAR) {
            self.llm.api_key = Some(key);
        }
        if let Some(base_url) = get(BASE_URL_VAR) {
            self.llm.base_url = base_url;
        }
        if let Some(model) = get(MODEL_VAR) {
            self.llm.model = model;
        }
    }
}
