//! Configuration module
//!
//! Provider configuration, keyed by provider name. Each section is optional:
//! a missing or incomplete section only disables the provider it belongs to.
//! Sections can be deserialized from JSON or loaded from the environment.
//!
//! # Security Note
//!
//! Sections carry credentials. Their `Debug` output redacts secrets; never log
//! a section through any other formatter.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::error::{ProviderError, ProviderResult};

const HTTP_TIMEOUT_SECS: u64 = 60;
const BITMOVIN_ENDPOINT: &str = "https://api.bitmovin.com/v1";
const BITMOVIN_STORAGE_REGION: &str = "us-east-1";
const BITMOVIN_ENCODING_REGION: &str = "AWS_US_EAST_1";
const BITMOVIN_ENCODING_VERSION: &str = "STABLE";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mediaconvert: Option<MediaConvertConfig>,
    #[serde(default)]
    pub bitmovin: Option<BitmovinConfig>,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_http_timeout_secs() -> u64 {
    HTTP_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mediaconvert: None,
            bitmovin: None,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http_timeout_secs = match var("REELCAST_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                anyhow::anyhow!("REELCAST_HTTP_TIMEOUT_SECS must be a number, got {:?}", raw)
            })?,
            None => HTTP_TIMEOUT_SECS,
        };

        let mediaconvert_vars = [
            "MEDIACONVERT_ENDPOINT",
            "MEDIACONVERT_QUEUE_ARN",
            "MEDIACONVERT_ROLE_ARN",
            "MEDIACONVERT_DESTINATION",
        ];
        let mediaconvert = if mediaconvert_vars.into_iter().any(|key| var(key).is_some()) {
            Some(MediaConvertConfig {
                endpoint: var("MEDIACONVERT_ENDPOINT").unwrap_or_default(),
                queue: var("MEDIACONVERT_QUEUE_ARN").unwrap_or_default(),
                role: var("MEDIACONVERT_ROLE_ARN").unwrap_or_default(),
                destination: var("MEDIACONVERT_DESTINATION").unwrap_or_default(),
                region: var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION")),
                access_key_id: var("AWS_ACCESS_KEY_ID"),
                secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
            })
        } else {
            None
        };

        let bitmovin = if var("BITMOVIN_API_KEY").is_some() || var("BITMOVIN_DESTINATION").is_some()
        {
            Some(BitmovinConfig {
                api_key: var("BITMOVIN_API_KEY").unwrap_or_default(),
                endpoint: var("BITMOVIN_ENDPOINT")
                    .unwrap_or_else(|| BITMOVIN_ENDPOINT.to_string()),
                destination: var("BITMOVIN_DESTINATION").unwrap_or_default(),
                aws_access_key_id: var("BITMOVIN_AWS_ACCESS_KEY_ID").unwrap_or_default(),
                aws_secret_access_key: var("BITMOVIN_AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
                aws_storage_region: var("BITMOVIN_AWS_STORAGE_REGION")
                    .unwrap_or_else(|| BITMOVIN_STORAGE_REGION.to_string()),
                encoding_region: var("BITMOVIN_ENCODING_REGION")
                    .unwrap_or_else(|| BITMOVIN_ENCODING_REGION.to_string()),
                encoding_version: var("BITMOVIN_ENCODING_VERSION")
                    .unwrap_or_else(|| BITMOVIN_ENCODING_VERSION.to_string()),
            })
        } else {
            None
        };

        Ok(Self {
            mediaconvert,
            bitmovin,
            http_timeout_secs,
        })
    }
}

/// MediaConvert section.
///
/// `region` and the access key pair are optional: when absent they are
/// resolved from the AWS default provider chain on first use.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConvertConfig {
    pub endpoint: String,
    pub queue: String,
    pub role: String,
    pub destination: String,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl MediaConvertConfig {
    pub fn validate(&self) -> ProviderResult<()> {
        require("mediaconvert", "endpoint", &self.endpoint)?;
        require("mediaconvert", "queue", &self.queue)?;
        require("mediaconvert", "role", &self.role)?;
        require("mediaconvert", "destination", &self.destination)?;

        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(ProviderError::incomplete_config(
                "mediaconvert",
                "access_key_id and secret_access_key must be set together",
            ));
        }

        Ok(())
    }
}

impl Debug for MediaConvertConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaConvertConfig")
            .field("endpoint", &self.endpoint)
            .field("queue", &self.queue)
            .field("role", &self.role)
            .field("destination", &self.destination)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redacted(&self.secret_access_key))
            .finish()
    }
}

/// Bitmovin section.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BitmovinConfig {
    pub api_key: String,
    pub endpoint: String,
    pub destination: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_storage_region: String,
    pub encoding_region: String,
    pub encoding_version: String,
}

impl Default for BitmovinConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: BITMOVIN_ENDPOINT.to_string(),
            destination: String::new(),
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            aws_storage_region: BITMOVIN_STORAGE_REGION.to_string(),
            encoding_region: BITMOVIN_ENCODING_REGION.to_string(),
            encoding_version: BITMOVIN_ENCODING_VERSION.to_string(),
        }
    }
}

impl BitmovinConfig {
    pub fn validate(&self) -> ProviderResult<()> {
        require("bitmovin", "api_key", &self.api_key)?;
        require("bitmovin", "endpoint", &self.endpoint)?;
        require("bitmovin", "destination", &self.destination)?;
        require("bitmovin", "aws_access_key_id", &self.aws_access_key_id)?;
        require("bitmovin", "aws_secret_access_key", &self.aws_secret_access_key)?;
        Ok(())
    }
}

impl Debug for BitmovinConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BitmovinConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("destination", &self.destination)
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &"<redacted>")
            .field("aws_storage_region", &self.aws_storage_region)
            .field("encoding_region", &self.encoding_region)
            .field("encoding_version", &self.encoding_version)
            .finish()
    }
}

fn require(provider: &str, field: &str, value: &str) -> ProviderResult<()> {
    if value.trim().is_empty() {
        return Err(ProviderError::incomplete_config(
            provider,
            format!("missing {}", field),
        ));
    }
    Ok(())
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_has_no_sections() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.mediaconvert.is_none());
        assert!(config.bitmovin.is_none());
        assert_eq!(config.http_timeout_secs, 60);
    }

    #[test]
    fn test_mediaconvert_section_from_env() {
        let config = Config::from_lookup(lookup(&[
            ("MEDIACONVERT_ENDPOINT", "https://abc.mediaconvert.us-east-1.amazonaws.com"),
            ("MEDIACONVERT_QUEUE_ARN", "arn:aws:mediaconvert:us-east-1:1:queues/Default"),
            ("MEDIACONVERT_ROLE_ARN", "arn:aws:iam::1:role/mc"),
            ("MEDIACONVERT_DESTINATION", "s3://bucket/out/"),
            ("AWS_REGION", "us-east-1"),
        ]))
        .unwrap();

        let mc = config.mediaconvert.unwrap();
        assert_eq!(mc.destination, "s3://bucket/out/");
        assert_eq!(mc.region.as_deref(), Some("us-east-1"));
        assert!(mc.access_key_id.is_none());
        assert!(mc.validate().is_ok());
    }

    #[test]
    fn test_bitmovin_defaults_applied() {
        let config = Config::from_lookup(lookup(&[
            ("BITMOVIN_API_KEY", "key"),
            ("BITMOVIN_DESTINATION", "s3://bucket/encodes"),
        ]))
        .unwrap();

        let bm = config.bitmovin.unwrap();
        assert_eq!(bm.endpoint, "https://api.bitmovin.com/v1");
        assert_eq!(bm.encoding_region, "AWS_US_EAST_1");
        assert_eq!(bm.encoding_version, "STABLE");

        let err = bm.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("aws_access_key_id"));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = Config::from_lookup(lookup(&[("REELCAST_HTTP_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_mediaconvert_validate_names_missing_field() {
        let mc = MediaConvertConfig {
            endpoint: "https://mc".into(),
            role: "role".into(),
            destination: "s3://b/".into(),
            ..Default::default()
        };
        let err = mc.validate().unwrap_err();
        assert!(err.to_string().contains("missing queue"));
    }

    #[test]
    fn test_mediaconvert_rejects_half_credentials() {
        let mc = MediaConvertConfig {
            endpoint: "https://mc".into(),
            queue: "q".into(),
            role: "role".into(),
            destination: "s3://b/".into(),
            access_key_id: Some("AKID".into()),
            ..Default::default()
        };
        assert!(mc.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let bm = BitmovinConfig {
            api_key: "super-secret".into(),
            aws_secret_access_key: "also-secret".into(),
            ..Default::default()
        };
        let printed = format!("{:?}", bm);
        assert!(!printed.contains("super-secret"));
        assert!(!printed.contains("also-secret"));

        let mc = MediaConvertConfig {
            secret_access_key: Some("mc-secret".into()),
            ..Default::default()
        };
        assert!(!format!("{:?}", mc).contains("mc-secret"));
    }

    #[test]
    fn test_config_deserializes_from_json() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "bitmovin": {"api_key": "k", "destination": "s3://b/p"}
        }))
        .unwrap();
        assert_eq!(config.http_timeout_secs, 60);
        let bm = config.bitmovin.unwrap();
        assert_eq!(bm.endpoint, "https://api.bitmovin.com/v1");
        assert!(config.mediaconvert.is_none());
    }
}
