//! Error types for XRD document construction and codecs.
//!
//! Every failure in this crate falls into one of two kinds:
//!
//! | Kind | Raised by | Examples |
//! |------|-----------|----------|
//! | Validation | model construction | a `Link` with both `href` and `template` |
//! | Format | decoding | wrong root element, two `<Subject>` elements, bad timestamp, malformed text |
//!
//! Writer failures while encoding are reported separately as I/O errors.

use thiserror::Error;

/// Error type for XRD operations.
#[derive(Error, Debug)]
pub enum XrdError {
    /// A model invariant was violated at construction time.
    #[error("validation error: {0}")]
    Validation(String),

    /// The input does not have the expected XRD wire shape.
    #[error("format error: {0}")]
    Format(String),

    /// JSON text could not be parsed or did not match the RFC 6415 shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML text could not be parsed.
    #[cfg(feature = "xml")]
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The output sink failed while encoding.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`XrdError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Model invariant violation.
    Validation,
    /// Structural violation of a wire format, including parser failures.
    Format,
    /// Output sink failure.
    Io,
}

impl XrdError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        XrdError::Validation(msg.into())
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        XrdError::Format(msg.into())
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            XrdError::Validation(_) => ErrorKind::Validation,
            XrdError::Format(_) | XrdError::Json(_) => ErrorKind::Format,
            #[cfg(feature = "xml")]
            XrdError::Xml(_) => ErrorKind::Format,
            XrdError::Io(_) => ErrorKind::Io,
        }
    }

    /// True for model invariant violations.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// True for decode failures, whether structural or from the underlying parser.
    pub fn is_format(&self) -> bool {
        self.kind() == ErrorKind::Format
    }
}

#[cfg(feature = "xml")]
impl From<quick_xml::events::attributes::AttrError> for XrdError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        XrdError::Xml(err.into())
    }
}

/// Result type alias for XRD operations.
pub type Result<T> = std::result::Result<T, XrdError>;
