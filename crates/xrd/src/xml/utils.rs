//! Namespace constants and small helpers shared by the XML reader and writer.

/// OASIS XRD 1.0 namespace, the default namespace of every XRD element.
pub const XRD_NAMESPACE: &str = "http://docs.oasis-open.org/ns/xri/xrd-1.0";

/// XML Schema instance namespace, home of the `nil` attribute.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace permanently bound to the `xml` prefix (`xml:lang`).
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace of `xmlns` declarations.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

pub const XSI_PREFIX: &str = "xsi";

/// Interprets an `xsi:nil` value as an `xs:boolean`.
pub fn parse_nil(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

pub fn is_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\n' | '\r' | '\t'))
}
