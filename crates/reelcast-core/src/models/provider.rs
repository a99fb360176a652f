use serde::{Deserialize, Serialize};

/// Static description of what a provider accepts and produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Capabilities {
    pub input_formats: Vec<String>,
    pub output_formats: Vec<String>,
    pub destinations: Vec<String>,
}

impl Capabilities {
    pub fn new(input_formats: &[&str], output_formats: &[&str], destinations: &[&str]) -> Self {
        let owned = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
        Self {
            input_formats: owned(input_formats),
            output_formats: owned(output_formats),
            destinations: owned(destinations),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Health {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Health {
    pub fn healthy() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// Registry-level view of a provider.
///
/// `enabled` is false when the provider cannot even be built from the current
/// configuration; in that case neither capabilities nor health are reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Descriptor {
    pub name: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<Health>,
}

impl Descriptor {
    pub fn disabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: false,
            capabilities: None,
            health: None,
        }
    }
}
