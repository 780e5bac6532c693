//! Configuration module
//!
//! Environment-based configuration for the bridge. All settings are read once
//! at startup; there is no mutable configuration state after construction.

use std::env;
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;

/// Bridge configuration.
///
/// `PICTION_DATABASE_URL` (falling back to `DATABASE_URL`),
/// `PICTION_INTERFACE_TABLE` and `PICTION_WORK_PATH` are required; the rest
/// have defaults.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    pub database_url: String,
    /// Name of the interface table populated by the Piction integration.
    pub interface_table: String,
    /// Root work directory; extracted binaries land under `<work_path>/binaries/`.
    pub work_path: PathBuf,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Default row limit for a drain cycle when the caller does not pass one.
    pub batch_limit: Option<i64>,
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url = env::var("PICTION_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .context("PICTION_DATABASE_URL (or DATABASE_URL) must be set")?;

        let interface_table =
            env::var("PICTION_INTERFACE_TABLE").context("PICTION_INTERFACE_TABLE must be set")?;

        let work_path = env::var("PICTION_WORK_PATH")
            .map(PathBuf::from)
            .context("PICTION_WORK_PATH must be set")?;

        let db_max_connections = env::var("PICTION_DB_MAX_CONNECTIONS")
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("PICTION_DB_MAX_CONNECTIONS must be a positive integer")?
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);

        let db_timeout_seconds = env::var("PICTION_DB_TIMEOUT_SECONDS")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("PICTION_DB_TIMEOUT_SECONDS must be a positive integer")?
            .unwrap_or(DEFAULT_DB_TIMEOUT_SECS);

        let batch_limit = env::var("PICTION_BATCH_LIMIT")
            .ok()
            .map(|v| v.parse::<i64>())
            .transpose()
            .context("PICTION_BATCH_LIMIT must be an integer")?;

        Ok(BridgeConfig {
            database_url,
            interface_table,
            work_path,
            db_max_connections,
            db_timeout_seconds,
            batch_limit,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.is_empty() {
            anyhow::bail!("database URL must not be empty");
        }
        if self.interface_table.is_empty() {
            anyhow::bail!("interface table name must not be empty");
        }
        if self.work_path.as_os_str().is_empty() {
            anyhow::bail!("work path must not be empty");
        }
        if self.db_max_connections == 0 {
            anyhow::bail!("db_max_connections must be greater than zero");
        }
        if let Some(limit) = self.batch_limit {
            if limit <= 0 {
                anyhow::bail!("batch limit must be greater than zero, got {}", limit);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> BridgeConfig {
        BridgeConfig {
            database_url: "postgres://localhost/piction".to_string(),
            interface_table: "cspace_piction_interface".to_string(),
            work_path: PathBuf::from("/var/lib/pictionbridge"),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            db_timeout_seconds: DEFAULT_DB_TIMEOUT_SECS,
            batch_limit: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn empty_table_rejected() {
        let mut config = base_config();
        config.interface_table = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_work_path_rejected() {
        let mut config = base_config();
        config.work_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_batch_limit_rejected() {
        let mut config = base_config();
        config.batch_limit = Some(0);
        assert!(config.validate().is_err());
        config.batch_limit = Some(-5);
        assert!(config.validate().is_err());
        config.batch_limit = Some(100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_connections_rejected() {
        let mut config = base_config();
        config.db_max_connections = 0;
        assert!(config.validate().is_err());
    }
}
