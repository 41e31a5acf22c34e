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

    let default_paths = [
        "./wbprovider.toml",
        "~/.config/wbprovider/config.toml",
        "/etc/wbprovider/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    // ip/port fall back to defaults at use time, only flag them here
    if config.server.ip.trim().is_empty() || config.server.port == 0 {
        tracing::warn!(
            ip = %config.server.ip,
            port = config.server.port,
            "Server address incomplete, using {}",
            config.server.address()
        );
    }

    if config.client.timeout_secs == 0 {
        anyhow::bail!("Client timeout cannot be 0");
    }

    for share in &config.shares {
        if share.host.is_empty() || share.share.is_empty() || share.local_root.is_empty() {
            anyhow::bail!(
                "Share mapping \\\\{}\\{} -> '{}' has an empty component",
                share.host,
                share.share,
                share.local_root
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.ip, "127.0.0.1");
        assert_eq!(config.server.port, 8765);
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.shares, vec![ShareMapping::new("shun920", "av", "/volume1/av")]);
    }

    #[test]
    fn test_load_partial_config() {
        let file = write_config(
            r#"
[server]
ip = "192.168.1.20"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.ip, "192.168.1.20");
        assert_eq!(config.server.port, 8765);
        assert_eq!(config.shares.len(), 1);
    }

    #[test]
    fn test_load_custom_shares() {
        let file = write_config(
            r#"
[server]
ip = "nas.local"
port = 9000

[client]
timeout_secs = 5

[[shares]]
host = "nas"
share = "media"
local_root = "/mnt/media"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.address().base_url(), "http://nas.local:9000");
        assert_eq!(config.client.timeout(), std::time::Duration::from_secs(5));
        assert_eq!(config.shares, vec![ShareMapping::new("nas", "media", "/mnt/media")]);
    }

    #[test]
    fn test_zero_port_uses_default_address() {
        let file = write_config(
            r#"
[server]
ip = ""
port = 0
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.address().base_url(), "http://127.0.0.1:8765");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let file = write_config(
            r#"
[client]
timeout_secs = 0
"#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_empty_share_component_rejected() {
        let file = write_config(
            r#"
[[shares]]
host = "nas"
share = ""
local_root = "/mnt"
"#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_config("[server\nip = ");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_custom_path_missing() {
        let result = load_config_or_default(Some(Path::new("/nonexistent/wbprovider.toml")));
        assert!(result.is_err());
    }
}
