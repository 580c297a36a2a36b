//! Error types for pointer parsing, schema derivation, and registry resolution.

use thiserror::Error;

/// Errors from parsing a JSON Pointer (RFC 6901) path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("pointer \"{path}\" must be empty or start with '/'")]
    NotRooted { path: String },

    #[error("pointer \"{path}\" contains an empty reference token")]
    EmptySegment { path: String },

    #[error("pointer \"{path}\" has an invalid escape at byte {offset}: '~' must be followed by '0' or '1'")]
    InvalidEscape { path: String, offset: usize },
}

/// Errors during type registration and document resolution.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Pointer(#[from] ParseError),

    #[error("cannot derive a schema for type kind \"{kind}\"")]
    UnsupportedType { kind: String },

    #[error("schema body failed to encode: {source}")]
    Encoding {
        #[source]
        source: serde_json::Error,
    },

    #[error("no schema tree node at pointer \"{pointer}\"")]
    MissingSchema { pointer: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::NotRooted {
            path: "components/schemas".into(),
        };
        assert_eq!(
            err.to_string(),
            "pointer \"components/schemas\" must be empty or start with '/'"
        );

        let err = ParseError::InvalidEscape {
            path: "/a~2b".into(),
            offset: 2,
        };
        assert!(err.to_string().contains("invalid escape at byte 2"));
    }

    #[test]
    fn registry_error_preserves_parse_cause() {
        let parse = ParseError::EmptySegment { path: "//a".into() };
        let err = RegistryError::from(parse);
        assert!(matches!(err, RegistryError::Pointer(_)));
        assert_eq!(
            err.to_string(),
            "pointer \"//a\" contains an empty reference token"
        );
    }

    #[test]
    fn unsupported_type_display() {
        let err = RegistryError::UnsupportedType {
            kind: "function".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot derive a schema for type kind \"function\""
        );
    }
}
