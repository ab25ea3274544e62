//! # Error Types Module
//!
//! Centralized error handling for the Green Guardian dashboard.
//! One error type per concern, each with a readable message and, where an
//! underlying error exists, a `source()` chain.
//!
//! ## Error Types
//! - `ConnectionError`: WebSocket runtime and handshake failures
//! - `ConfigError`: Configuration file I/O and parsing errors
//! - `StorageError`: Cache persistence read/write failures
//! - `CaptureError`: Camera access, frame grab and frame encoding failures
//! - `PayloadError`: Malformed inbound messages and image payloads
//!
//! None of these are ever shown to the user. Every failure path logs the
//! error and degrades to a stale or empty display.

use std::fmt;

/// Errors that can occur while managing the backend connection
#[derive(Debug)]
pub enum ConnectionError {
    /// Failed to create Tokio runtime
    RuntimeCreation(String),
    /// WebSocket handshake with the inference backend failed
    Handshake { url: String, reason: String },
    /// An established connection failed while sending or receiving
    Transport(String),
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::RuntimeCreation(msg) => {
                write!(f, "Failed to create async runtime: {}", msg)
            }
            ConnectionError::Handshake { url, reason } => {
                write!(f, "Failed to connect to inference backend at {}: {}", url, reason)
            }
            ConnectionError::Transport(msg) => {
                write!(f, "WebSocket error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConnectionError {}

/// Errors that can occur during configuration operations
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read config file
    ReadFailed(std::io::Error),
    /// Failed to write config file
    WriteFailed(std::io::Error),
    /// Failed to parse config file
    ParseFailed(toml::de::Error),
    /// Failed to serialize config
    SerializeFailed(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadFailed(e) => {
                write!(f, "Failed to read config file: {}", e)
            }
            ConfigError::WriteFailed(e) => {
                write!(f, "Failed to write config file: {}", e)
            }
            ConfigError::ParseFailed(e) => {
                write!(f, "Failed to parse config file: {}", e)
            }
            ConfigError::SerializeFailed(e) => {
                write!(f, "Failed to serialize config: {}", e)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadFailed(e) => Some(e),
            ConfigError::WriteFailed(e) => Some(e),
            ConfigError::ParseFailed(e) => Some(e),
            ConfigError::SerializeFailed(e) => Some(e),
        }
    }
}

/// Errors raised by the cache store
#[derive(Debug)]
pub enum StorageError {
    /// Failed to read a cache entry
    ReadFailed { key: String, source: std::io::Error },
    /// Failed to write or remove a cache entry
    WriteFailed { key: String, source: std::io::Error },
    /// Cache entry exists but does not hold the expected JSON shape
    Corrupt { key: String, source: serde_json::Error },
    /// Value could not be serialized before writing
    SerializeFailed { key: String, source: serde_json::Error },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ReadFailed { key, source } => {
                write!(f, "Failed to read cache entry '{}': {}", key, source)
            }
            StorageError::WriteFailed { key, source } => {
                write!(f, "Failed to write cache entry '{}': {}", key, source)
            }
            StorageError::Corrupt { key, source } => {
                write!(f, "Cache entry '{}' is corrupt: {}", key, source)
            }
            StorageError::SerializeFailed { key, source } => {
                write!(f, "Failed to serialize cache entry '{}': {}", key, source)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::ReadFailed { source, .. } => Some(source),
            StorageError::WriteFailed { source, .. } => Some(source),
            StorageError::Corrupt { source, .. } => Some(source),
            StorageError::SerializeFailed { source, .. } => Some(source),
        }
    }
}

/// Errors from the webcam and the frame encoder
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// Camera could not be opened (denied, missing, or busy)
    DeviceUnavailable(String),
    /// Binary was built without a camera backend
    Unsupported,
    /// Camera was open but returned no usable frame
    GrabFailed(String),
    /// Frame could not be encoded as JPEG
    EncodeFailed(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::DeviceUnavailable(msg) => {
                write!(f, "Error accessing webcam: {}", msg)
            }
            CaptureError::Unsupported => {
                write!(f, "Webcam capture is not available in this build (enable the `webcam` feature)")
            }
            CaptureError::GrabFailed(msg) => {
                write!(f, "Failed to grab frame: {}", msg)
            }
            CaptureError::EncodeFailed(msg) => {
                write!(f, "Failed to encode frame: {}", msg)
            }
        }
    }
}

impl std::error::Error for CaptureError {}

/// Errors from decoding what the backend sends us
#[derive(Debug)]
pub enum PayloadError {
    /// Message is not the expected JSON shape
    Malformed(serde_json::Error),
    /// Annotated image is not a base64 data URI
    InvalidImage(String),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Malformed(e) => {
                write!(f, "Error parsing server message: {}", e)
            }
            PayloadError::InvalidImage(msg) => {
                write!(f, "Invalid image payload: {}", msg)
            }
        }
    }
}

impl std::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PayloadError::Malformed(e) => Some(e),
            PayloadError::InvalidImage(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_handshake_error_display() {
        let err = ConnectionError::Handshake {
            url: "ws://127.0.0.1:49078/ws".to_string(),
            reason: "connection refused".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("ws://127.0.0.1:49078/ws"));
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn test_config_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::ReadFailed(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_storage_error_names_key() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::WriteFailed {
            key: "itemTypeTimes".to_string(),
            source: io_err,
        };
        assert!(err.to_string().contains("itemTypeTimes"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_payload_error_chain() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PayloadError::Malformed(json_err);
        assert!(err.to_string().starts_with("Error parsing server message"));
        assert!(err.source().is_some());
        assert!(PayloadError::InvalidImage("no comma".into()).source().is_none());
    }
}
