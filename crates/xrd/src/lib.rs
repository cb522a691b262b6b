//! # Helios XRD
//!
//! Extensible Resource Descriptor documents, as used by WebFinger and Web
//! Host Metadata discovery, with codecs for both wire formats.
//!
//! ## Features
//!
//! - **Model**: immutable [`Document`], [`Link`], and [`Property`] values built
//!   with [`Document::builder`] and [`Link::builder`].
//! - **JSON**: the RFC 6415 Appendix A shape, through `serde_json`.
//! - **XML** (`xml` feature, on by default): the OASIS XRD 1.0 shape, through `quick-xml`.
//!
//! ## Lookups
//!
//! Repeated property types resolve to the **last** property, while repeated
//! link relations resolve to the **first** link:
//!
//! ```
//! use helios_xrd::{Document, Link, Property};
//!
//! let doc = Document::builder()
//!     .property(Property::new("http://example.com/ns/tier", "free"))
//!     .property(Property::new("http://example.com/ns/tier", "paid"))
//!     .link(Link::builder().rel("avatar").href("http://example.com/a.png").build()?)
//!     .link(Link::builder().rel("avatar").href("http://example.com/b.png").build()?)
//!     .build();
//!
//! assert_eq!(doc.property("http://example.com/ns/tier"), Some("paid"));
//! assert_eq!(doc.link("avatar").and_then(Link::href), Some("http://example.com/a.png"));
//! # Ok::<(), helios_xrd::XrdError>(())
//! ```
//!
//! ## JSON ↔ XML
//!
//! | JSON | XML |
//! |------|-----|
//! | `{"subject": "acct:bob@example.com"}` | `<Subject>acct:bob@example.com</Subject>` |
//! | `{"aliases": ["a", "b"]}` | `<Alias>a</Alias><Alias>b</Alias>` |
//! | `{"properties": {"t": "v"}}` | `<Property type="t">v</Property>` |
//! | `{"properties": {"t": null}}` | `<Property type="t" xsi:nil="true"/>` |
//! | `{"links": [{"rel": "r", "titles": {"default": "T"}}]}` | `<Link rel="r"><Title>T</Title></Link>` |
//!
//! JSON keeps one value per property type, so converting a document with
//! repeated property types to JSON drops all but the last of them.

mod datetime;
pub mod document;
pub mod error;
pub mod json;
pub mod link;
pub mod property;

#[cfg(feature = "xml")]
pub mod xml;

pub use document::{Document, DocumentBuilder};
pub use error::{ErrorKind, Result, XrdError};
pub use link::{DEFAULT_TITLE_LANG, Link, LinkBuilder, URI_TEMPLATE_TOKEN};
pub use property::{Property, PropertyInput, PropertyMap};

pub use json::{
    from_json_slice, from_json_str, from_json_value, link_from_json_value, link_to_json_value,
    to_json_string, to_json_string_pretty, to_json_value, to_json_vec,
};

#[cfg(feature = "xml")]
pub use xml::{
    from_xml_slice, from_xml_str, from_xml_tree, to_xml_string, to_xml_string_pretty,
    to_xml_tree, to_xml_vec, to_xml_writer,
};
