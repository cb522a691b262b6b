//! XML encoding: [`Document`] to OASIS XRD 1.0 markup.
//!
//! The document is first laid out as an [`XmlTree`] and then written in a
//! single pass. Child elements of `XRD` always come in the order `Subject`,
//! `Expires`, `Alias`*, `Property`*, `Link`*.

use crate::datetime::format_timestamp;
use crate::document::Document;
use crate::error::{Result, XrdError};
use crate::link::{DEFAULT_TITLE_LANG, Link};
use crate::property::Property;
use crate::xml::tree::{NodeId, XmlName, XmlTree};
use crate::xml::utils::{XML_NAMESPACE, XRD_NAMESPACE, XSI_NAMESPACE, XSI_PREFIX};
use std::io::Write;
use tracing::debug;

const PRETTY_INDENT: usize = 2;

/// Serialize an XRD document to an XML string.
///
/// # Examples
///
/// ```
/// use helios_xrd::Document;
/// use helios_xrd::xml::to_xml_string;
///
/// let doc = Document::builder().subject("acct:bob@example.com").build();
/// assert_eq!(
///     to_xml_string(&doc)?,
///     concat!(
///         r#"<?xml version="1.0" encoding="UTF-8"?>"#,
///         r#"<XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0">"#,
///         "<Subject>acct:bob@example.com</Subject></XRD>"
///     )
/// );
/// # Ok::<(), helios_xrd::XrdError>(())
/// ```
pub fn to_xml_string(doc: &Document) -> Result<String> {
    let buffer = to_xml_vec(doc)?;
    String::from_utf8(buffer).map_err(|e| XrdError::format(e.to_string()))
}

/// Serialize an XRD document to an indented XML string.
pub fn to_xml_string_pretty(doc: &Document) -> Result<String> {
    let mut buffer = Vec::new();
    to_xml_tree(doc)?.write_to(&mut buffer, Some(PRETTY_INDENT))?;
    String::from_utf8(buffer).map_err(|e| XrdError::format(e.to_string()))
}

/// Serialize an XRD document to an XML byte vector.
pub fn to_xml_vec(doc: &Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    to_xml_writer(doc, &mut buffer)?;
    Ok(buffer)
}

/// Serialize an XRD document to an XML writer.
pub fn to_xml_writer<W: Write>(doc: &Document, writer: W) -> Result<()> {
    to_xml_tree(doc)?.write_to(writer, None)
}

/// Lay out an XRD document as an XML tree without writing it.
pub fn to_xml_tree(doc: &Document) -> Result<XmlTree> {
    debug!(subject = ?doc.subject(), "encoding XRD as XML");

    let mut tree = XmlTree::new(true);
    let root = tree.append_element(None, xrd_name("XRD"))?;
    tree.set_attribute(root, XmlName::namespace_declaration(None), XRD_NAMESPACE)?;
    if has_nil_property(doc) {
        tree.set_attribute(
            root,
            XmlName::namespace_declaration(Some(XSI_PREFIX)),
            XSI_NAMESPACE,
        )?;
    }

    if let Some(subject) = &doc.subject {
        append_text_element(&mut tree, root, "Subject", subject)?;
    }
    if let Some(expires) = &doc.expires {
        append_text_element(&mut tree, root, "Expires", &format_timestamp(expires))?;
    }
    for alias in doc.aliases.iter().flatten() {
        append_text_element(&mut tree, root, "Alias", alias)?;
    }
    for property in doc.properties.iter().flatten() {
        append_property(&mut tree, root, property)?;
    }
    for link in doc.links.iter().flatten() {
        append_link(&mut tree, root, link)?;
    }

    Ok(tree)
}

fn xrd_name(local: &str) -> XmlName {
    XmlName::in_default(XRD_NAMESPACE, local)
}

fn has_nil_property(doc: &Document) -> bool {
    let link_properties = doc
        .links
        .iter()
        .flatten()
        .flat_map(|link| link.properties.iter().flatten());
    doc.properties
        .iter()
        .flatten()
        .chain(link_properties)
        .any(Property::is_nil)
}

fn append_text_element(
    tree: &mut XmlTree,
    parent: NodeId,
    local: &str,
    text: &str,
) -> Result<NodeId> {
    let id = tree.append_element(Some(parent), xrd_name(local))?;
    if !text.is_empty() {
        tree.append_text(id, text)?;
    }
    Ok(id)
}

fn append_property(tree: &mut XmlTree, parent: NodeId, property: &Property) -> Result<()> {
    let id = tree.append_element(Some(parent), xrd_name("Property"))?;
    tree.set_attribute(id, XmlName::local("type"), property.type_())?;
    match property.value() {
        None => tree.set_attribute(
            id,
            XmlName::prefixed(XSI_NAMESPACE, XSI_PREFIX, "nil"),
            "true",
        )?,
        Some("") => {}
        Some(value) => tree.append_text(id, value)?,
    }
    Ok(())
}

fn append_link(tree: &mut XmlTree, parent: NodeId, link: &Link) -> Result<()> {
    let id = tree.append_element(Some(parent), xrd_name("Link"))?;
    let attributes = [
        ("rel", link.rel()),
        ("href", link.href()),
        ("template", link.template()),
        ("type", link.type_()),
    ];
    for (key, value) in attributes {
        if let Some(value) = value {
            tree.set_attribute(id, XmlName::local(key), value)?;
        }
    }

    for property in link.properties().into_iter().flatten() {
        append_property(tree, id, property)?;
    }
    for (lang, title) in link.titles().into_iter().flatten() {
        let title_id = append_text_element(tree, id, "Title", title)?;
        if lang != DEFAULT_TITLE_LANG {
            let lang_name = XmlName::prefixed(XML_NAMESPACE, "xml", "lang");
            tree.set_attribute(title_id, lang_name, lang)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let xml = to_xml_string(&Document::default()).unwrap();
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?><XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0"/>"#
        );
    }

    #[test]
    fn test_nil_property_declares_xsi() {
        let doc = Document::builder().property(Property::nil("t")).build();
        let xml = to_xml_string(&doc).unwrap();
        assert!(xml.contains(r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#));
        assert!(xml.contains(r#"<Property type="t" xsi:nil="true"/>"#));
    }

    #[test]
    fn test_element_order_is_fixed() {
        let link = Link::builder()
            .rel("r")
            .title(Some("en"), "T")
            .property(Property::new("lp", "v"))
            .build()
            .unwrap();
        let doc = Document::builder()
            .link(link)
            .property(Property::new("p", "1"))
            .alias("http://a")
            .subject("s")
            .build();
        let xml = to_xml_string(&doc).unwrap();
        let body = xml.split_once("?>").unwrap().1;
        assert_eq!(
            body,
            concat!(
                r#"<XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0">"#,
                "<Subject>s</Subject>",
                "<Alias>http://a</Alias>",
                r#"<Property type="p">1</Property>"#,
                r#"<Link rel="r"><Property type="lp">v</Property><Title xml:lang="en">T</Title></Link>"#,
                "</XRD>"
            )
        );
    }

    #[test]
    fn test_default_title_has_no_lang() {
        let link = Link::builder().title(None, "Plain").build().unwrap();
        let doc = Document::builder().link(link).build();
        let xml = to_xml_string(&doc).unwrap();
        assert!(xml.contains("<Title>Plain</Title>"));
        assert!(!xml.contains("default"));
    }

    #[test]
    fn test_tree_reparses_identically() {
        let doc = Document::builder()
            .subject("acct:bob@example.com")
            .property(Property::nil("n"))
            .link(
                Link::builder()
                    .rel("lrdd")
                    .template("http://x/{uri}")
                    .build()
                    .unwrap(),
            )
            .build();
        let tree = to_xml_tree(&doc).unwrap();
        let xml = tree.to_xml_string(None).unwrap();
        assert_eq!(XmlTree::parse(&xml).unwrap(), tree);
    }

    #[test]
    fn test_pretty_output_decodes() {
        let doc = Document::builder()
            .subject("acct:bob@example.com")
            .alias("http://example.com/bob")
            .property(Property::new("p", "value"))
            .build();
        let xml = to_xml_string_pretty(&doc).unwrap();
        assert!(xml.contains('\n'));
        assert_eq!(crate::xml::from_xml_str(&xml).unwrap(), doc);
    }
}
