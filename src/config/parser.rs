use crate::config::types::FileConfig;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The file only carries overrides; validation happens once every layer
/// (defaults, file, flags) has been applied.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully loaded configuration overrides
/// * `Err(ConfigError)` - Failed to read or parse the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_mirror::config::load_config_file;
///
/// let file = load_config_file(Path::new("mirror.toml")).unwrap();
/// println!("Max depth: {:?}", file.max_depth);
/// ```
pub fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be matched to the exact file they used.
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

/// Loads a configuration file and returns both its overrides and its hash
pub fn load_config_file_with_hash(path: &Path) -> Result<(FileConfig, String), ConfigError> {
    let config = load_config_file(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
