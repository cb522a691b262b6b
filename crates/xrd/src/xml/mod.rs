//! XML codec for XRD documents (OASIS XRD 1.0).
//!
//! Decoding parses text into an [`XmlTree`] with namespaces resolved, then
//! walks the tree. Encoding lays the document out as an [`XmlTree`] and
//! writes it in a single pass with `quick-xml`.
//!
//! ## Shape
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <XRD xmlns="http://docs.oasis-open.org/ns/xri/xrd-1.0"
//!      xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
//!   <Subject>acct:bob@example.com</Subject>
//!   <Expires>2026-01-01T00:00:00Z</Expires>
//!   <Alias>http://example.com/bob</Alias>
//!   <Property type="http://example.com/ns/role">admin</Property>
//!   <Property type="http://example.com/ns/nil" xsi:nil="true"/>
//!   <Link rel="lrdd" template="http://example.com/lrdd?uri={uri}">
//!     <Property type="http://example.com/ns/p">v</Property>
//!     <Title xml:lang="en">Resource descriptor</Title>
//!   </Link>
//! </XRD>
//! ```
//!
//! ## Validation
//!
//! - The root must be `XRD` in the XRD namespace and the only top-level element.
//! - `Subject` and `Expires` may each appear at most once.
//! - Every `Property` needs a `type` attribute.
//! - Elements from other namespaces (for example `ds:Signature`) are skipped.
//!
//! XML has no way to spell an empty list, so an empty alias, property, link,
//! or title list is written as no elements and decodes as absent.

pub mod de;
pub mod ser;
pub mod tree;
pub mod utils;

pub use de::{from_xml_slice, from_xml_str, from_xml_tree};
pub use ser::{to_xml_string, to_xml_string_pretty, to_xml_tree, to_xml_vec, to_xml_writer};
pub use tree::{NodeId, XmlName, XmlTree};
