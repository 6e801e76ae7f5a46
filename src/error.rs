use std::fmt;

/// Custom error type for provider operations
#[derive(Debug)]
pub enum ProviderError {
    /// HTTP request failed
    Http(reqwest::Error),
    /// Dashboard API returned an error response
    Api { status: u16, message: String },
    /// JSON parsing error
    Json(String),
    /// Provider configuration error, optionally tied to one attribute
    Config {
        attribute: Option<String>,
        message: String,
    },
    /// Resource operation called before ConfigureProvider
    NotConfigured,
    /// Resource type not served by this provider
    UnknownResource(String),
    /// State value could not be decoded or does not match the schema
    Value {
        attribute: Option<String>,
        message: String,
    },
    /// Resource handler rejected the requested operation
    Resource(String),
    /// Plugin server or handshake failure
    Plugin(String),
}

impl ProviderError {
    /// Configuration error tied to a provider attribute
    pub fn config_attr(attribute: &str, message: impl Into<String>) -> Self {
        ProviderError::Config {
            attribute: Some(attribute.to_string()),
            message: message.into(),
        }
    }

    /// Value error tied to a resource attribute
    pub fn value_attr(attribute: &str, message: impl Into<String>) -> Self {
        ProviderError::Value {
            attribute: Some(attribute.to_string()),
            message: message.into(),
        }
    }

    /// Value error not tied to any attribute
    pub fn value(message: impl Into<String>) -> Self {
        ProviderError::Value {
            attribute: None,
            message: message.into(),
        }
    }

    /// The attribute this error refers to, if any
    pub fn attribute(&self) -> Option<&str> {
        match self {
            ProviderError::Config { attribute, .. } | ProviderError::Value { attribute, .. } => {
                attribute.as_deref()
            }
            _ => None,
        }
    }

    /// Short diagnostic summary for this error kind
    pub fn summary(&self) -> &'static str {
        match self {
            ProviderError::Http(_) => "Dashboard request failed",
            ProviderError::Api { .. } => "Dashboard API error",
            ProviderError::Json(_) => "Invalid dashboard response",
            ProviderError::Config { .. } => "Invalid provider configuration",
            ProviderError::NotConfigured => "Provider not configured",
            ProviderError::UnknownResource(_) => "Unsupported resource type",
            ProviderError::Value { .. } => "Invalid resource value",
            ProviderError::Resource(_) => "Resource operation failed",
            ProviderError::Plugin(_) => "Plugin error",
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Http(e) => write!(f, "HTTP request failed: {}", e),
            ProviderError::Api { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            ProviderError::Json(msg) => write!(f, "JSON error: {}", msg),
            ProviderError::Config { attribute, message } => match attribute {
                Some(attr) => write!(f, "Configuration error in '{}': {}", attr, message),
                None => write!(f, "Configuration error: {}", message),
            },
            ProviderError::NotConfigured => write!(
                f,
                "the provider must be configured before managing resources"
            ),
            ProviderError::UnknownResource(name) => {
                write!(f, "resource type '{}' is not supported by this provider", name)
            }
            ProviderError::Value { attribute, message } => match attribute {
                Some(attr) => write!(f, "Invalid value for '{}': {}", attr, message),
                None => write!(f, "Invalid value: {}", message),
            },
            ProviderError::Resource(msg) => write!(f, "{}", msg),
            ProviderError::Plugin(msg) => write!(f, "Plugin error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err)
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Json(err.to_string())
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        ProviderError::Plugin(err.to_string())
    }
}

impl From<rmpv::decode::Error> for ProviderError {
    fn from(err: rmpv::decode::Error) -> Self {
        ProviderError::value(format!("malformed msgpack value: {}", err))
    }
}

impl From<rmpv::encode::Error> for ProviderError {
    fn from(err: rmpv::encode::Error) -> Self {
        ProviderError::value(format!("failed to encode msgpack value: {}", err))
    }
}

impl From<tonic::transport::Error> for ProviderError {
    fn from(err: tonic::transport::Error) -> Self {
        ProviderError::Plugin(err.to_string())
    }
}

impl From<rcgen::Error> for ProviderError {
    fn from(err: rcgen::Error) -> Self {
        ProviderError::Plugin(format!("certificate generation failed: {}", err))
    }
}

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ProviderError::Api {
            status: 404,
            message: "Not found".to_string(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Not found"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        // Diagnostics are built from errors inside async gRPC handlers
        assert_send_sync::<ProviderError>();
    }

    #[test]
    fn test_config_error_display_with_attribute() {
        let err = ProviderError::config_attr("backend_url", "must be an absolute URL");
        assert!(err.to_string().contains("backend_url"));
        assert!(err.to_string().contains("must be an absolute URL"));
        assert_eq!(err.attribute(), Some("backend_url"));
    }

    #[test]
    fn test_value_error_without_attribute() {
        let err = ProviderError::value("expected an object");
        assert_eq!(err.to_string(), "Invalid value: expected an object");
        assert!(err.attribute().is_none());
    }

    #[test]
    fn test_json_error_display() {
        let err = ProviderError::Json("Invalid JSON".to_string());
        assert!(err.to_string().contains("JSON error"));
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_not_configured_summary() {
        let err = ProviderError::NotConfigured;
        assert_eq!(err.summary(), "Provider not configured");
        assert!(err.to_string().contains("configured"));
    }

    #[test]
    fn test_unknown_resource_display() {
        let err = ProviderError::UnknownResource("goliatdashboard_widget".to_string());
        assert!(err.to_string().contains("goliatdashboard_widget"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ProviderError = json_err.into();
        match err {
            ProviderError::Json(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected ProviderError::Json"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err: ProviderError = io_err.into();
        match err {
            ProviderError::Plugin(msg) => assert!(msg.contains("address in use")),
            _ => panic!("Expected ProviderError::Plugin"),
        }
    }

    #[test]
    fn test_error_source_non_http() {
        use std::error::Error;
        let err = ProviderError::Api {
            status: 500,
            message: "Server error".to_string(),
        };
        assert!(err.source().is_none());
    }
}
