use std::fmt;

/// Errors raised while migrating playlists between catalogs.
///
/// Resolve-phase errors (`Network`, `NoMatchFound`, `Upstream`) are recorded
/// in the [`ErrorLedger`](crate::types::ErrorLedger) and the run continues.
/// The same errors during playlist creation abort the run. `Configuration`
/// is raised before a run can start.
#[derive(Debug)]
pub enum MigrationError {
    Network(reqwest::Error),
    NoMatchFound {
        artist: String,
        title: String,
    },
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },
    Configuration(String),
    Io(String),
}

impl MigrationError {
    pub fn upstream(service: &'static str, status: Option<u16>, message: impl Into<String>) -> Self {
        MigrationError::Upstream {
            service,
            status,
            message: message.into(),
        }
    }

    pub fn missing_setting(key: &str) -> Self {
        MigrationError::Configuration(format!("{} must be set", key))
    }
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::Network(e) => write!(f, "network error: {}", e),
            MigrationError::NoMatchFound { artist, title } => {
                write!(f, "no match found for {} - {}", artist, title)
            }
            MigrationError::Upstream {
                service,
                status: Some(status),
                message,
            } => write!(f, "{} returned {}: {}", service, status, message),
            MigrationError::Upstream {
                service, message, ..
            } => write!(f, "{} returned an error: {}", service, message),
            MigrationError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            MigrationError::Io(msg) => write!(f, "i/o error: {}", msg),
        }
    }
}

impl std::error::Error for MigrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MigrationError::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MigrationError {
    fn from(err: reqwest::Error) -> Self {
        MigrationError::Network(err)
    }
}

impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        MigrationError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MigrationError {
    fn from(err: serde_json::Error) -> Self {
        MigrationError::Io(err.to_string())
    }
}
