//! JSON codec for XRD documents (RFC 6415, Appendix A).
//!
//! Text is parsed and produced by `serde_json`; this module maps between the
//! JSON object shape and the [`Document`] model:
//!
//! ```json
//! {
//!   "subject": "acct:bob@example.com",
//!   "expires": "2026-01-01T00:00:00Z",
//!   "aliases": ["http://example.com/bob"],
//!   "properties": {"http://example.com/ns/role": "admin", "http://example.com/ns/nil": null},
//!   "links": [{"rel": "profile", "href": "http://example.com/bob", "titles": {"default": "Bob"}}]
//! }
//! ```
//!
//! Keys are emitted only for fields that are present. Property lists are
//! collapsed into objects, so a repeated property type keeps only its last value.
//!
//! Documents and links must be JSON objects. A derived serde struct visitor
//! would also fill fields by position from an array, so input is checked as a
//! [`serde_json::Value`] before it is mapped onto the wire structs.

use crate::datetime::{format_timestamp, parse_timestamp};
use crate::document::Document;
use crate::error::{Result, XrdError};
use crate::link::Link;
use crate::property::{self, PropertyMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aliases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<PropertyMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    links: Option<Vec<JsonLink>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonLink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    titles: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<PropertyMap>,
}

impl From<&Link> for JsonLink {
    fn from(link: &Link) -> Self {
        JsonLink {
            rel: link.rel.clone(),
            href: link.href.clone(),
            template: link.template.clone(),
            type_: link.type_.clone(),
            titles: link.titles.clone(),
            properties: link.property_map(),
        }
    }
}

impl TryFrom<JsonLink> for Link {
    type Error = crate::XrdError;

    fn try_from(json: JsonLink) -> Result<Link> {
        let mut builder = Link::builder();
        if let Some(rel) = json.rel {
            builder = builder.rel(rel);
        }
        if let Some(href) = json.href {
            builder = builder.href(href);
        }
        if let Some(template) = json.template {
            builder = builder.template(template);
        }
        if let Some(type_) = json.type_ {
            builder = builder.type_(type_);
        }
        if let Some(titles) = json.titles {
            builder = builder.titles(titles);
        }
        if let Some(properties) = json.properties {
            builder = builder.properties(properties);
        }
        builder.build()
    }
}

impl From<&Document> for JsonDocument {
    fn from(doc: &Document) -> Self {
        JsonDocument {
            subject: doc.subject.clone(),
            expires: doc.expires.as_ref().map(format_timestamp),
            aliases: doc.aliases.clone(),
            properties: doc.property_map(),
            links: doc
                .links
                .as_ref()
                .map(|links| links.iter().map(JsonLink::from).collect()),
        }
    }
}

impl TryFrom<JsonDocument> for Document {
    type Error = crate::XrdError;

    fn try_from(json: JsonDocument) -> Result<Document> {
        let links = json
            .links
            .map(|links| {
                links
                    .into_iter()
                    .map(Link::try_from)
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(Document {
            subject: json.subject,
            expires: json.expires.as_deref().map(parse_timestamp).transpose()?,
            aliases: json.aliases,
            properties: json.properties.map(property::from_map),
            links,
        })
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        JsonDocument::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        document_from_value(value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        JsonLink::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        link_from_json_value(value).map_err(serde::de::Error::custom)
    }
}

/// Decode an XRD document from JSON text.
///
/// # Examples
///
/// ```
/// use helios_xrd::json::from_json_str;
///
/// let json = r#"{"subject": "acct:carol@example.com"}"#;
/// let doc = from_json_str(json)?;
/// assert_eq!(doc.subject(), Some("acct:carol@example.com"));
/// # Ok::<(), helios_xrd::XrdError>(())
/// ```
pub fn from_json_str(s: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(s)?;
    from_json_value(value)
}

/// Decode an XRD document from JSON bytes.
pub fn from_json_slice(v: &[u8]) -> Result<Document> {
    let value: Value = serde_json::from_slice(v)?;
    from_json_value(value)
}

/// Decode an XRD document from an already parsed JSON value.
pub fn from_json_value(value: Value) -> Result<Document> {
    let doc = document_from_value(value)?;
    debug!(
        subject = ?doc.subject(),
        links = doc.links().map_or(0, <[Link]>::len),
        "decoded XRD from JSON"
    );
    Ok(doc)
}

/// Encode an XRD document as a JSON value.
pub fn to_json_value(doc: &Document) -> Result<Value> {
    debug!(subject = ?doc.subject(), "encoding XRD as JSON");
    Ok(serde_json::to_value(JsonDocument::from(doc))?)
}

/// Encode an XRD document as compact JSON text.
///
/// # Examples
///
/// ```
/// use helios_xrd::{Document, Property};
/// use helios_xrd::json::to_json_string;
///
/// let doc = Document::builder()
///     .subject("acct:bob@example.com")
///     .property(Property::nil("http://example.com/ns/nil"))
///     .build();
/// assert_eq!(
///     to_json_string(&doc)?,
///     r#"{"subject":"acct:bob@example.com","properties":{"http://example.com/ns/nil":null}}"#
/// );
/// # Ok::<(), helios_xrd::XrdError>(())
/// ```
pub fn to_json_string(doc: &Document) -> Result<String> {
    debug!(subject = ?doc.subject(), "encoding XRD as JSON");
    Ok(serde_json::to_string(&JsonDocument::from(doc))?)
}

/// Encode an XRD document as pretty-printed JSON text.
pub fn to_json_string_pretty(doc: &Document) -> Result<String> {
    debug!(subject = ?doc.subject(), "encoding XRD as JSON");
    Ok(serde_json::to_string_pretty(&JsonDocument::from(doc))?)
}

/// Encode an XRD document as JSON bytes.
pub fn to_json_vec(doc: &Document) -> Result<Vec<u8>> {
    debug!(subject = ?doc.subject(), "encoding XRD as JSON");
    Ok(serde_json::to_vec(&JsonDocument::from(doc))?)
}

/// Encode a single link as a JSON value.
pub fn link_to_json_value(link: &Link) -> Result<Value> {
    Ok(serde_json::to_value(JsonLink::from(link))?)
}

/// Decode a single link from an already parsed JSON value.
pub fn link_from_json_value(value: Value) -> Result<Link> {
    expect_object(&value, "XRD link")?;
    let json: JsonLink = serde_json::from_value(value)?;
    Link::try_from(json)
}

fn document_from_value(value: Value) -> Result<Document> {
    let object = expect_object(&value, "XRD document")?;
    if let Some(Value::Array(links)) = object.get("links") {
        for link in links {
            expect_object(link, "XRD link")?;
        }
    }
    let json: JsonDocument = serde_json::from_value(value)?;
    Document::try_from(json)
}

fn expect_object<'a>(
    value: &'a Value,
    what: &str,
) -> Result<&'a serde_json::Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        let found = match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };
        XrdError::format(format!("{} must be a JSON object, found {}", what, found))
    })
}
