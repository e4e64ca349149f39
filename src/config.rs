//! Properties file loading and connection mode resolution.
//!
//! The console is configured by a plain `key=value` properties file. The
//! `app.mode` key selects between the hosted subscription endpoints (`AZURE`)
//! and a privately deployed endpoint (`AKS`); the remaining keys supply the
//! credentials or address for the selected mode.

use std::{collections::HashMap, fmt, path::Path, str::FromStr};

use http::Uri;

use crate::error::ConfigError;

pub const MODE_KEY: &str = "app.mode";
pub const SUBSCRIPTION_KEY_KEY: &str = "subs.key";
pub const LOCATION_KEY: &str = "location";
pub const AKS_URI_KEY: &str = "aks.tts.uri";

/// Connection mode, resolved case-insensitively from the `app.mode` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Azure,
    Aks,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("azure") {
            Ok(Mode::Azure)
        } else if s.eq_ignore_ascii_case("aks") {
            Ok(Mode::Aks)
        } else {
            Err(ConfigError::UnknownMode(s.to_string()))
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Azure => write!(f, "AZURE"),
            Mode::Aks => write!(f, "AKS"),
        }
    }
}

/// Resolved connection configuration. Exactly one variant is ever populated;
/// an unset or unknown mode never constructs a `Config`, it surfaces as a
/// [`ConfigError`] instead.
#[derive(Debug, Clone)]
pub enum Config {
    Azure {
        subscription_key: String,
        location: String,
    },
    Aks {
        endpoint: Uri,
    },
}

impl Config {
    /// Reads and resolves a properties file. An unreadable file is its own
    /// error, distinct from a file that is readable but missing `app.mode`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_properties(&parse_properties(&text))
    }

    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mode = props
            .get(MODE_KEY)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::ModeNotSet)?
            .parse::<Mode>()?;

        match mode {
            Mode::Azure => Ok(Config::Azure {
                subscription_key: require(props, SUBSCRIPTION_KEY_KEY)?,
                location: require(props, LOCATION_KEY)?,
            }),
            Mode::Aks => {
                let raw = require(props, AKS_URI_KEY)?;
                let endpoint =
                    raw.parse::<Uri>()
                        .map_err(|source| ConfigError::InvalidEndpointUri {
                            uri: raw.clone(),
                            source,
                        })?;
                if endpoint.host().is_none() {
                    return Err(ConfigError::EndpointMissingHost(endpoint));
                }
                if let Some(scheme) = endpoint.scheme_str() {
                    if !matches!(scheme, "http" | "https" | "ws" | "wss") {
                        return Err(ConfigError::UnsupportedEndpointScheme(scheme.to_string()));
                    }
                }
                Ok(Config::Aks { endpoint })
            }
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Config::Azure { .. } => Mode::Azure,
            Config::Aks { .. } => Mode::Aks,
        }
    }
}

// Values may still be empty strings: the original behavior accepts an empty
// subscription key and lets the service reject it.
fn require(props: &HashMap<String, String>, key: &'static str) -> Result<String, ConfigError> {
    props
        .get(key)
        .cloned()
        .ok_or(ConfigError::MissingProperty(key))
}

/// Minimal properties syntax: one `key=value` (or `key: value`) pair per line,
/// `#`/`!` comment lines, whitespace around key and value trimmed. Later
/// occurrences of a key win.
fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let separator = line.find(['=', ':']);
        if let Some(index) = separator {
            let key = line[..index].trim();
            let value = line[index + 1..].trim();
            if !key.is_empty() {
                props.insert(key.to_string(), value.to_string());
            }
        }
    }
    props
}
