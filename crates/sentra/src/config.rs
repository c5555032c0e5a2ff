//! Provider credentials and source selection.
//!
//! Deployments carry a JSON configuration file; any key missing from the
//! file falls back to an environment variable of the same name. The loaded
//! configuration is an explicit value injected into routers at
//! construction, not process-wide state.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use sentra_fetch::Credentials;
use sentra_source::{AsfEndpoint, EsaEndpoint, ProviderEndpoint, SourceError, SourceRouter};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing credential {0} (not in the configuration file or the environment)")]
    MissingCredential(&'static str),

    #[error("missing S1.DOWNLOAD source selection")]
    MissingSourceSelection,

    #[error("unknown download source {0:?}, expected USGS_ASF or ESA_SCIHUB")]
    UnknownSource(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Which provider serves Sentinel-1 archives first.
///
/// The labels match the values deployments already use in their
/// configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum S1Source {
    #[serde(rename = "USGS_ASF")]
    UsgsAsf,

    #[serde(rename = "ESA_SCIHUB")]
    EsaScihub,
}

impl FromStr for S1Source {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USGS_ASF" => Ok(S1Source::UsgsAsf),
            "ESA_SCIHUB" => Ok(S1Source::EsaScihub),
            other => Err(ConfigError::UnknownSource(other.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPlatform {
    #[serde(rename = "DOWNLOAD")]
    download: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    #[serde(rename = "SENTINEL_USER")]
    sentinel_user: Option<String>,

    #[serde(rename = "SENTINEL_PASS")]
    sentinel_pass: Option<String>,

    #[serde(rename = "ASF_USER")]
    asf_user: Option<String>,

    #[serde(rename = "ASF_PASS")]
    asf_pass: Option<String>,

    #[serde(rename = "S1")]
    s1: Option<RawPlatform>,
}

/// Credentials for both provider families plus the Sentinel-1 source
/// order.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    pub esa: Credentials,
    pub asf: Credentials,
    pub s1_primary: S1Source,
}

impl TransferConfig {
    /// Load from a JSON file, falling back to the environment for any
    /// missing key.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
        Self::resolve(raw)
    }

    /// Load entirely from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(RawConfig::default())
    }

    fn resolve(raw: RawConfig) -> Result<Self, ConfigError> {
        let esa = Credentials::new(
            required(raw.sentinel_user, "SENTINEL_USER")?,
            required(raw.sentinel_pass, "SENTINEL_PASS")?,
        );
        let asf = Credentials::new(
            required(raw.asf_user, "ASF_USER")?,
            required(raw.asf_pass, "ASF_PASS")?,
        );

        let s1_primary = match raw.s1 {
            Some(platform) => platform.download.parse()?,
            None => match env::var("S1_DOWNLOAD") {
                Ok(value) => value.parse()?,
                Err(_) => return Err(ConfigError::MissingSourceSelection),
            },
        };

        Ok(Self {
            esa,
            asf,
            s1_primary,
        })
    }

    /// Router for Sentinel-1 archives: the configured primary first, the
    /// other provider family as the designated secondary.
    pub fn s1_router(&self) -> Result<SourceRouter, ConfigError> {
        let esa = ProviderEndpoint::EsaCatalog(EsaEndpoint::new(self.esa.clone()));
        let asf = ProviderEndpoint::AsfArchive(AsfEndpoint::new(self.asf.clone()));
        let (primary, secondary) = match self.s1_primary {
            S1Source::UsgsAsf => (asf, esa),
            S1Source::EsaScihub => (esa, asf),
        };
        Ok(SourceRouter::new(primary, Some(secondary))?)
    }

    /// Router for Sentinel-2 archives. The ESA catalog is the only
    /// provider that hosts them; there is no secondary.
    pub fn s2_router(&self) -> Result<SourceRouter, ConfigError> {
        let esa = ProviderEndpoint::EsaCatalog(EsaEndpoint::new(self.esa.clone()));
        Ok(SourceRouter::new(esa, None)?)
    }
}

fn required(value: Option<String>, var: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .or_else(|| env::var(var).ok().filter(|v| !v.is_empty()))
        .ok_or(ConfigError::MissingCredential(var))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_complete_file() {
        let file = write_config(
            r#"{
                "SENTINEL_USER": "esa-user",
                "SENTINEL_PASS": "esa-pass",
                "ASF_USER": "asf-user",
                "ASF_PASS": "asf-pass",
                "S1": { "DOWNLOAD": "USGS_ASF" }
            }"#,
        );

        let config = TransferConfig::from_file(file.path()).unwrap();
        assert_eq!(config.esa.username(), "esa-user");
        assert_eq!(config.asf.username(), "asf-user");
        assert_eq!(config.s1_primary, S1Source::UsgsAsf);
    }

    #[test]
    fn missing_credential_is_a_config_error() {
        let file = write_config(
            r#"{
                "SENTINEL_USER": "esa-user",
                "ASF_USER": "asf-user",
                "ASF_PASS": "asf-pass",
                "S1": { "DOWNLOAD": "ESA_SCIHUB" }
            }"#,
        );

        let err = TransferConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential("SENTINEL_PASS")
        ));
    }

    #[test]
    fn unknown_source_label_is_rejected() {
        let file = write_config(
            r#"{
                "SENTINEL_USER": "u", "SENTINEL_PASS": "p",
                "ASF_USER": "u", "ASF_PASS": "p",
                "S1": { "DOWNLOAD": "CARRIER_PIGEON" }
            }"#,
        );

        let err = TransferConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSource(_)));
    }

    #[test]
    fn env_fills_gaps_in_the_file() {
        let file = write_config(
            r#"{
                "SENTINEL_USER": "esa-user", "SENTINEL_PASS": "esa-pass",
                "S1": { "DOWNLOAD": "ESA_SCIHUB" }
            }"#,
        );

        // set_var is process-global; the variables set here are not read
        // by any other test.
        unsafe {
            env::set_var("ASF_USER", "asf-from-env");
            env::set_var("ASF_PASS", "asf-pass-from-env");
        }

        let config = TransferConfig::from_file(file.path()).unwrap();
        assert_eq!(config.asf.username(), "asf-from-env");
        assert_eq!(config.s1_primary, S1Source::EsaScihub);
    }

    #[test]
    fn s1_router_orders_providers_by_configured_primary() {
        let config = TransferConfig {
            esa: Credentials::new("u", "p"),
            asf: Credentials::new("u", "p"),
            s1_primary: S1Source::UsgsAsf,
        };

        let router = config.s1_router().unwrap();
        let primary = router
            .resolve(sentra_source::SourcePreference::Primary)
            .unwrap();
        assert_eq!(primary.name(), "ASF archive");
        let secondary = router
            .resolve(sentra_source::SourcePreference::Secondary)
            .unwrap();
        assert_eq!(secondary.name(), "ESA catalog");
    }

    #[test]
    fn s2_router_has_no_secondary() {
        let config = TransferConfig {
            esa: Credentials::new("u", "p"),
            asf: Credentials::new("u", "p"),
            s1_primary: S1Source::EsaScihub,
        };

        let router = config.s2_router().unwrap();
        assert!(matches!(
            router.resolve(sentra_source::SourcePreference::Secondary),
            Err(SourceError::NoSecondary)
        ));
    }
}
