use std::fmt;

/// Errors returned when handing a payload to the dispatcher fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Dispatcher has been shut down.
    Shutdown,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Shutdown =>
                write!(f, "dispatcher is shut down"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// A required scalar field could not be read from the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Key is absent from the payload.
    MissingField {
        field: &'static str,
    },

    /// Key is present but its value is not a JSON string.
    WrongType {
        field: &'static str,
        found: &'static str,
    },
}

impl SchemaError {
    /// Payload key the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            SchemaError::MissingField { field } => field,
            SchemaError::WrongType { field, .. } => field,
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::MissingField { field } =>
                write!(f, "missing required field '{}'", field),
            SchemaError::WrongType { field, found } =>
                write!(f, "field '{}' must be a string, found {}", field, found),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Final outcome of processing one queued payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Delivered,
    Dropped(SchemaError),
    Failed(FailureReason),
}

/// Reasons why a forwarding attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Timeout,
    Network,
    /// Destination answered with a non-2xx status.
    RemoteStatus(u16),
    Serialization,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Timeout =>
                write!(f, "request timed out"),
            FailureReason::Network =>
                write!(f, "network error"),
            FailureReason::RemoteStatus(status) =>
                write!(f, "destination returned status {}", status),
            FailureReason::Serialization =>
                write!(f, "event could not be serialized"),
        }
    }
}

impl std::error::Error for FailureReason {}

/// Startup configuration could not be loaded.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } =>
                write!(f, "failed to read config file '{}': {}", path, source),
            ConfigError::Parse(err) =>
                write!(f, "invalid config file: {}", err),
            ConfigError::InvalidValue { key, value, reason } =>
                write!(f, "invalid value '{}' for {}: {}", value, key, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}
