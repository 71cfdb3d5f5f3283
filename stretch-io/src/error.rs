//! Error types for stretch-io

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// stretch-io error types
///
/// Errors raised by the vendor body, teleop session or cameras pass through
/// the lifecycle shim unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON error (vendor status records)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Operation requires a connected robot or camera
    #[error("Device not connected")]
    NotConnected,

    /// Device was already connected
    #[error("Device already connected")]
    AlreadyConnected,

    /// Vendor session not started
    #[error("Device not initialized")]
    NotInitialized,

    /// Teleop session was stopped and cannot be restarted on this robot
    #[error("Teleop session already stopped; create a new robot to teleoperate again")]
    TeleopStopped,

    /// Communication timeout
    #[error("Communication timeout")]
    Timeout,

    /// Operation not supported
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown device or driver type
    #[error("Unknown device type: {0}")]
    UnknownDevice(String),

    /// Camera driver failure
    #[error("Camera '{name}': {message}")]
    Camera {
        /// Configured camera name
        name: String,
        /// Driver message
        message: String,
    },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
