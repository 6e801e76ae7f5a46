//! Error to protocol diagnostic conversion

use log::warn;

use crate::error::ProviderError;
use crate::plugin::proto::tfplugin6::{attribute_path, diagnostic, AttributePath, Diagnostic};

/// Path selecting one top-level attribute
pub fn path_to_attribute(name: &str) -> AttributePath {
    AttributePath {
        steps: vec![attribute_path::Step {
            selector: Some(attribute_path::step::Selector::AttributeName(
                name.to_string(),
            )),
        }],
    }
}

/// Error diagnostic for a provider error
pub fn error_diagnostic(err: &ProviderError) -> Diagnostic {
    warn!("{}", err);
    Diagnostic {
        severity: diagnostic::Severity::Error as i32,
        summary: err.summary().to_string(),
        detail: err.to_string(),
        attribute: err.attribute().map(path_to_attribute),
    }
}

/// Diagnostics for a fallible step; empty on success
pub fn diagnostics_of<T>(result: &Result<T, ProviderError>) -> Vec<Diagnostic> {
    match result {
        Ok(_) => Vec::new(),
        Err(e) => vec![error_diagnostic(e)],
    }
}

/// Diagnostic for calls addressing data sources, which this provider has none of
pub fn unsupported_data_source(type_name: &str) -> Diagnostic {
    Diagnostic {
        severity: diagnostic::Severity::Error as i32,
        summary: "Unsupported data source".to_string(),
        detail: format!(
            "data source '{}' is not supported by this provider",
            type_name
        ),
        attribute: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_diagnostic_with_attribute() {
        let err = ProviderError::config_attr("backend_url", "bad");
        let diag = error_diagnostic(&err);

        assert_eq!(diag.severity, diagnostic::Severity::Error as i32);
        assert_eq!(diag.summary, "Invalid provider configuration");
        assert!(diag.detail.contains("bad"));

        let path = diag.attribute.unwrap();
        assert_eq!(
            path.steps[0].selector,
            Some(attribute_path::step::Selector::AttributeName(
                "backend_url".to_string()
            ))
        );
    }

    #[test]
    fn test_error_diagnostic_without_attribute() {
        let diag = error_diagnostic(&ProviderError::NotConfigured);
        assert!(diag.attribute.is_none());
    }

    #[test]
    fn test_diagnostics_of() {
        let ok: Result<(), ProviderError> = Ok(());
        assert!(diagnostics_of(&ok).is_empty());

        let err: Result<(), ProviderError> = Err(ProviderError::NotConfigured);
        assert_eq!(diagnostics_of(&err).len(), 1);
    }
}
