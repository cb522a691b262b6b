//! XML decoding: OASIS XRD 1.0 markup to [`Document`].

use crate::datetime::parse_timestamp;
use crate::document::Document;
use crate::error::{Result, XrdError};
use crate::link::{DEFAULT_TITLE_LANG, Link};
use crate::property::Property;
use crate::xml::tree::{NodeId, XmlTree};
use crate::xml::utils::{self, XML_NAMESPACE, XRD_NAMESPACE, XSI_NAMESPACE};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Decode an XRD document from XML text.
///
/// # Examples
///
/// ```
/// use helios_xrd::xml::from_xml_str;
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0">
///   <Subject>acct:bob@example.com</Subject>
/// </XRD>"#;
/// let doc = from_xml_str(xml)?;
/// assert_eq!(doc.subject(), Some("acct:bob@example.com"));
/// # Ok::<(), helios_xrd::XrdError>(())
/// ```
pub fn from_xml_str(xml: &str) -> Result<Document> {
    let tree = XmlTree::parse(xml)?;
    from_xml_tree(&tree)
}

/// Decode an XRD document from XML bytes.
pub fn from_xml_slice(xml: &[u8]) -> Result<Document> {
    let xml_str = std::str::from_utf8(xml)
        .map_err(|e| XrdError::format(format!("invalid UTF-8: {}", e)))?;
    from_xml_str(xml_str)
}

/// Decode an XRD document from an already parsed tree.
pub fn from_xml_tree(tree: &XmlTree) -> Result<Document> {
    let root = tree
        .root()
        .ok_or_else(|| XrdError::format("XML document has no root element"))?;
    match tree.name(root) {
        Some(name) if name.is(XRD_NAMESPACE, "XRD") => {}
        Some(name) => {
            return Err(XrdError::format(format!(
                "expected root element XRD in namespace {}, found {} in {}",
                XRD_NAMESPACE,
                name.local,
                name.namespace.as_deref().unwrap_or("no namespace")
            )));
        }
        None => return Err(XrdError::format("XML document has no root element")),
    }

    let mut doc = Document::default();
    for child in tree.child_elements(root) {
        let Some(name) = tree.name(child) else {
            continue;
        };
        if name.namespace.as_deref() != Some(XRD_NAMESPACE) {
            trace!(element = %name.qualified(), "skipping foreign element in XRD");
            continue;
        }

        match name.local.as_str() {
            "Subject" => {
                if doc.subject.is_some() {
                    return Err(XrdError::format("XRD has more than one Subject element"));
                }
                doc.subject = Some(tree.text(child));
            }
            "Expires" => {
                if doc.expires.is_some() {
                    return Err(XrdError::format("XRD has more than one Expires element"));
                }
                doc.expires = Some(parse_timestamp(&tree.text(child))?);
            }
            "Alias" => doc
                .aliases
                .get_or_insert_with(Vec::new)
                .push(tree.text(child)),
            "Property" => doc
                .properties
                .get_or_insert_with(Vec::new)
                .push(decode_property(tree, child)?),
            "Link" => doc
                .links
                .get_or_insert_with(Vec::new)
                .push(decode_link(tree, child)?),
            other => trace!(element = other, "skipping unknown XRD element"),
        }
    }

    debug!(
        subject = ?doc.subject(),
        links = doc.links().map_or(0, <[Link]>::len),
        "decoded XRD from XML"
    );
    Ok(doc)
}

fn decode_property(tree: &XmlTree, id: NodeId) -> Result<Property> {
    let type_ = tree
        .attribute(id, None, "type")
        .ok_or_else(|| XrdError::format("Property element is missing its type attribute"))?;

    let nil = match tree.attribute(id, Some(XSI_NAMESPACE), "nil") {
        Some(value) => utils::parse_nil(value).ok_or_else(|| {
            XrdError::format(format!("invalid xsi:nil value '{}' on Property {}", value, type_))
        })?,
        None => false,
    };

    Ok(if nil {
        Property::nil(type_)
    } else {
        Property::new(type_, tree.text(id))
    })
}

fn decode_link(tree: &XmlTree, id: NodeId) -> Result<Link> {
    let mut builder = Link::builder();
    if let Some(rel) = tree.attribute(id, None, "rel") {
        builder = builder.rel(rel);
    }
    if let Some(href) = tree.attribute(id, None, "href") {
        builder = builder.href(href);
    }
    if let Some(template) = tree.attribute(id, None, "template") {
        builder = builder.template(template);
    }
    if let Some(type_) = tree.attribute(id, None, "type") {
        builder = builder.type_(type_);
    }

    let mut titles: Option<BTreeMap<String, String>> = None;
    let mut properties: Option<Vec<Property>> = None;
    for child in tree.child_elements(id) {
        let Some(name) = tree.name(child) else {
            continue;
        };
        if name.is(XRD_NAMESPACE, "Title") {
            let lang = tree
                .attribute(child, Some(XML_NAMESPACE), "lang")
                .unwrap_or(DEFAULT_TITLE_LANG);
            titles
                .get_or_insert_with(BTreeMap::new)
                .insert(lang.to_string(), tree.text(child));
        } else if name.is(XRD_NAMESPACE, "Property") {
            properties
                .get_or_insert_with(Vec::new)
                .push(decode_property(tree, child)?);
        } else {
            trace!(element = %name.qualified(), "skipping element in Link");
        }
    }

    if let Some(titles) = titles {
        builder = builder.titles(titles);
    }
    if let Some(properties) = properties {
        builder = builder.properties(properties);
    }
    builder.build()
}
