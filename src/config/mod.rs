mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./playdeck.toml",
        "./config.toml",
        "~/.config/playdeck/config.toml",
        "/etc/playdeck/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.library.staged_name.is_empty() {
        anyhow::bail!("library.staged_name cannot be empty");
    }

    // A capability cannot be both pre-granted and policy-revoked
    for name in &config.platform.granted {
        if config.platform.revoked.iter().any(|r| r == name) {
            anyhow::bail!("Capability '{}' is both granted and revoked", name);
        }
    }

    if !config.library.source_clip.exists() {
        tracing::warn!(
            "Source clip does not exist: {:?} (staging will fail until it does)",
            config.library.source_clip
        );
    }

    Ok(())
}
