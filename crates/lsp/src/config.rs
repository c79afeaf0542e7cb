//! Server configuration read from `initializationOptions`.

use serde::Deserialize;

/// Settings the client may pass at initialize time. Unknown fields are
/// ignored; a missing or malformed options object falls back to the
/// defaults wholesale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Upper bound on diagnostics published per document.
    pub max_diagnostics: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { max_diagnostics: 1000 }
    }
}

impl ServerConfig {
    pub fn from_initialization_options(options: Option<&serde_json::Value>) -> Self {
        let value = match options {
            Some(v) if !v.is_null() => v,
            _ => return ServerConfig::default(),
        };
        match serde_json::from_value(value.clone()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed initializationOptions");
                ServerConfig::default()
            }
        }
    }
}
