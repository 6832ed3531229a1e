use crate::config::types::{Config, CrawlerConfig, LlmConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_llm_config(&config.llm)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates LLM endpoint configuration
fn validate_llm_config(config: &LlmConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "temperature must be between 0 and 2, got {}",
            config.temperature
        )));
    }

    if config.max_tokens < 1 {
        return Err(ConfigError::Validation(format!(
            "max-tokens must be >= 1, got {}",
            config.max_tokens
        )));
    }

    if config.max_input_chars < 1 {
        return Err(ConfigError::Validation(
            "max-input-chars must be >= 1".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "llm timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates page fetching configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "crawler timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = Config::default();
        config.llm.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.llm.base_url = "ftp://llm.example.com".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.llm.base_url = "http://localhost:8080/v1".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_temperature() {
        let mut config = Config::default();
        config.llm.temperature = -0.1;
        assert!(validate(&config).is_err());

        config.llm.temperature = 2.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_model() {
        let mut config = Config::default();
        config.llm.model = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_crawler_limits() {
        let mut config = Config::default();
        config.crawler.timeout_secs = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.crawler.max_retries = 11;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.crawler.user_agent = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_output_dir() {
        let mut config = Config::default();
        config.output.output_dir = String::new();
        assert!(validate(&config).is_err());
    }
}
