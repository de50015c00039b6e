use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pricing::{DEFAULT_UNIT_PRICE_WEI, Price};
use crate::state::{GRID_COLS, GRID_ROWS};

pub const CONFIG_ENV: &str = "CELLMINT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "cellmint.json";

/// What region the mint call describes
#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayloadMode {
    /// Always the 2x2 block at (1, 1), whatever was selected
    #[default]
    Fixed,
    /// The rectangle the user actually dragged
    Selection,
}

/// Mint settings, read from a JSON file
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct MintConfig {
    pub unit_price_wei: Price,
    pub contract_address: String,
    pub entrypoint: String,
    pub payload: PayloadMode,
    pub image_uri: String,
    pub metadata_uri: String,
    /// Connected wallet address. Minting is disabled without one.
    pub account: Option<String>,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            unit_price_wei: Price(DEFAULT_UNIT_PRICE_WEI),
            contract_address: "0x05eefcf9148636f2f0f3b7969e7d0107809ee05201ecbbd69335c40bd031de75"
                .to_string(),
            entrypoint: "mint2".to_string(),
            payload: PayloadMode::Fixed,
            image_uri: "http://sitio.com/a.jpg".to_string(),
            metadata_uri: "http://sitio.com/".to_string(),
            account: None,
        }
    }
}

impl MintConfig {
    /// Config path from the first CLI argument, then the environment, then the default file
    pub fn resolve_path(arg: Option<String>, env: Option<String>) -> PathBuf {
        arg.or(env)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load config from `path`, falling back to defaults when the file doesn't exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Like [`MintConfig::load`], but writes the defaults to `path` on first run
    /// so there is a file to edit. A failed write is logged, not fatal.
    pub fn load_or_seed(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        match config.save(path) {
            Ok(()) => info!("wrote default config to {}", path.display()),
            Err(e) => warn!("{}", e),
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contract_address.trim().is_empty() {
            return Err(ConfigError::Invalid("contract_address is empty".into()));
        }
        if self.entrypoint.trim().is_empty() {
            return Err(ConfigError::Invalid("entrypoint is empty".into()));
        }
        if self.unit_price_wei.wei() == 0 {
            return Err(ConfigError::Invalid("unit_price_wei must be positive".into()));
        }
        // A full-grid selection must still be priceable
        if self.unit_price_wei.wei().checked_mul((GRID_ROWS * GRID_COLS) as u128).is_none() {
            return Err(ConfigError::Invalid(format!(
                "unit_price_wei {} overflows for a {}x{} selection",
                self.unit_price_wei.wei(),
                GRID_ROWS,
                GRID_COLS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MintConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, MintConfig::default());
        assert_eq!(config.unit_price_wei.to_string(), "0.001");
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cellmint.json");
        let config = MintConfig {
            payload: PayloadMode::Selection,
            account: Some("0x0123".into()),
            ..MintConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(MintConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cellmint.json");
        std::fs::write(&path, r#"{ "payload": "selection", "account": "0xfeed" }"#).unwrap();

        let config = MintConfig::load(&path).unwrap();
        assert_eq!(config.payload, PayloadMode::Selection);
        assert_eq!(config.account.as_deref(), Some("0xfeed"));
        assert_eq!(config.entrypoint, "mint2");
    }

    #[test]
    fn malformed_and_invalid_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cellmint.json");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(MintConfig::load(&path), Err(ConfigError::Parse { .. })));

        std::fs::write(&path, r#"{ "unit_price_wei": 0 }"#).unwrap();
        assert!(matches!(MintConfig::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn oversized_unit_price_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cellmint.json");

        std::fs::write(&path, r#"{ "unit_price_wei": 100000000000000000000000000000000000000 }"#).unwrap();
        assert!(matches!(MintConfig::load(&path), Err(ConfigError::Invalid(_))));

        // The largest price that still covers the whole grid is accepted
        let max = u128::MAX / (GRID_ROWS * GRID_COLS) as u128;
        std::fs::write(&path, format!(r#"{{ "unit_price_wei": {} }}"#, max)).unwrap();
        assert_eq!(MintConfig::load(&path).unwrap().unit_price_wei, Price(max));
    }

    #[test]
    fn write_failures_are_not_reported_as_malformed() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = ConfigError::Serialize {
            path: PathBuf::from("cellmint.json"),
            source,
        };
        assert!(err.to_string().starts_with("failed to encode config for cellmint.json"));

        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("nope").join("cellmint.json");
        assert!(matches!(
            MintConfig::default().save(&missing_dir),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn first_run_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cellmint.json");

        let config = MintConfig::load_or_seed(&path).unwrap();
        assert_eq!(config, MintConfig::default());
        assert!(path.exists());
        assert_eq!(MintConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn seeding_leaves_existing_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cellmint.json");
        std::fs::write(&path, r#"{ "account": "0xfeed" }"#).unwrap();

        let config = MintConfig::load_or_seed(&path).unwrap();
        assert_eq!(config.account.as_deref(), Some("0xfeed"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{ "account": "0xfeed" }"#);
    }

    #[test]
    fn path_resolution_order() {
        assert_eq!(
            MintConfig::resolve_path(Some("a.json".into()), Some("b.json".into())),
            PathBuf::from("a.json")
        );
        assert_eq!(MintConfig::resolve_path(None, Some("b.json".into())), PathBuf::from("b.json"));
        assert_eq!(MintConfig::resolve_path(None, None), PathBuf::from(DEFAULT_CONFIG_FILE));
    }
}
