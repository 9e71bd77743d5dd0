use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use fogwatch::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Shrine source: {}", config.sources.shrine_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Used to detect whether the configuration changed between runs of the same
/// cache database.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[sources]
codes-url = "https://example.com/"
shrine-url = "https://api.example.com/v1/shrine"
news-url = "https://api.example.com/news"

[client]
app-name = "Fogwatch"
app-version = "1.0"

[cache]
database-path = "./fogwatch.db"

[notifications]
codes = true

[refresh]
interval-minutes = 30
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.sources.codes_url, "https://example.com/");
        assert_eq!(config.client.app_name, "Fogwatch");
        assert_eq!(config.client.timeout_secs, 30);
        assert!(config.notifications.codes);
        assert!(!config.notifications.shrine);
        assert_eq!(config.refresh.interval_minutes, 30);
    }

    #[test]
    fn test_optional_sections_default() {
        let config_content = r#"
[sources]
codes-url = "https://example.com/"
shrine-url = "https://api.example.com/v1/shrine"
news-url = "https://api.example.com/news"

[client]
app-name = "Fogwatch"
app-version = "1.0"

[cache]
database-path = "./fogwatch.db"
"#;
        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert!(!config.notifications.codes);
        assert!(!config.notifications.news);
        assert_eq!(config.refresh.interval_minutes, 15);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[sources]
codes-url = "not a url"
shrine-url = "https://api.example.com/v1/shrine"
news-url = "https://api.example.com/news"

[client]
app-name = "Fogwatch"
app-version = "1.0"

[cache]
database-path = "./fogwatch.db"
"#;
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
