//! The XRD document aggregate.

use crate::link::Link;
use crate::property::{self, Property, PropertyInput, PropertyMap};
use chrono::{DateTime, Utc};

/// An Extensible Resource Descriptor.
///
/// All five fields are independently optional. An absent field and an empty
/// list are different states and both survive a JSON or XML round trip.
/// Equality is structural and order-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Document {
    pub(crate) subject: Option<String>,
    pub(crate) expires: Option<DateTime<Utc>>,
    pub(crate) aliases: Option<Vec<String>>,
    pub(crate) properties: Option<Vec<Property>>,
    pub(crate) links: Option<Vec<Link>>,
}

impl Document {
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    pub fn aliases(&self) -> Option<&[String]> {
        self.aliases.as_deref()
    }

    pub fn properties(&self) -> Option<&[Property]> {
        self.properties.as_deref()
    }

    pub fn links(&self) -> Option<&[Link]> {
        self.links.as_deref()
    }

    /// The document's properties collapsed into a map (last duplicate wins).
    pub fn property_map(&self) -> Option<PropertyMap> {
        property::to_map(self.properties())
    }

    /// Value of the last document property with the given type.
    pub fn property(&self, type_: &str) -> Option<&str> {
        property::last_value(self.properties(), type_)
    }

    /// The first link with the given relation, in document order.
    ///
    /// Note the tie-break is the opposite of [`Document::property`]: the first
    /// link of a relation is the preferred one.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|link| link.rel() == Some(rel))
    }

    /// Every link with the given relation, in document order.
    pub fn all_links<'a, 'r>(
        &'a self,
        rel: &'r str,
    ) -> impl Iterator<Item = &'a Link> + Clone + use<'a, 'r> {
        self.links
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(move |link| link.rel() == Some(rel))
    }
}

/// Builder for [`Document`].
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    subject: Option<String>,
    expires: Option<DateTime<Utc>>,
    aliases: Option<Vec<String>>,
    properties: Option<PropertyInput>,
    links: Option<Vec<Link>>,
}

impl DocumentBuilder {
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Replaces the alias list, marking it present even when empty.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = Some(aliases.into_iter().map(Into::into).collect());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.get_or_insert_with(Vec::new).push(alias.into());
        self
    }

    /// Replaces the property list, marking it present even when empty.
    pub fn properties(mut self, properties: impl Into<PropertyInput>) -> Self {
        self.properties = Some(properties.into());
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        let mut list = self
            .properties
            .take()
            .map(PropertyInput::into_properties)
            .unwrap_or_default();
        list.push(property);
        self.properties = Some(PropertyInput::Sequence(list));
        self
    }

    /// Replaces the link list, marking it present even when empty.
    pub fn links(mut self, links: impl IntoIterator<Item = Link>) -> Self {
        self.links = Some(links.into_iter().collect());
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.links.get_or_insert_with(Vec::new).push(link);
        self
    }

    pub fn build(self) -> Document {
        Document {
            subject: self.subject,
            expires: self.expires,
            aliases: self.aliases,
            properties: self.properties.map(PropertyInput::into_properties),
            links: self.links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(rel: &str, href: &str) -> Link {
        Link::builder().rel(rel).href(href).build().unwrap()
    }

    fn sample() -> Document {
        Document::builder()
            .subject("acct:bob@example.com")
            .property(Property::new("http://example.com/p", "old"))
            .property(Property::new("http://example.com/p", "new"))
            .link(link("avatar", "http://example.com/1.png"))
            .link(link("profile", "http://example.com/bob"))
            .link(link("avatar", "http://example.com/2.png"))
            .build()
    }

    #[test]
    fn test_link_is_first_match() {
        let doc = sample();
        assert_eq!(
            doc.link("avatar").and_then(Link::href),
            Some("http://example.com/1.png")
        );
        assert!(doc.link("missing").is_none());
    }

    #[test]
    fn test_link_outlives_relation_argument() {
        let doc = sample();
        let found = {
            let rel = String::from("profile");
            doc.link(&rel)
        };
        assert_eq!(found.and_then(Link::href), Some("http://example.com/bob"));
    }

    #[test]
    fn test_property_is_last_match() {
        let doc = sample();
        assert_eq!(doc.property("http://example.com/p"), Some("new"));
        assert_eq!(
            doc.property_map().unwrap()["http://example.com/p"],
            Some("new".to_string())
        );
        assert_eq!(doc.properties().map(<[Property]>::len), Some(2));
    }

    #[test]
    fn test_all_links_is_reiterable() {
        let doc = sample();
        let avatars = doc.all_links("avatar");
        let hrefs: Vec<_> = avatars.clone().filter_map(Link::href).collect();
        assert_eq!(
            hrefs,
            vec!["http://example.com/1.png", "http://example.com/2.png"]
        );
        assert_eq!(avatars.count(), 2);
        assert_eq!(doc.links().map(<[Link]>::len), Some(3));
    }

    #[test]
    fn test_absent_vs_empty() {
        let absent = Document::builder().build();
        let empty = Document::builder()
            .aliases(Vec::<String>::new())
            .properties(Vec::<Property>::new())
            .links(Vec::<Link>::new())
            .build();

        assert_eq!(absent.aliases(), None);
        assert_eq!(empty.aliases(), Some(&[][..]));
        assert_eq!(absent.property_map(), None);
        assert_eq!(empty.property_map(), Some(PropertyMap::new()));
        assert_ne!(absent, empty);
        assert_eq!(absent.all_links("any").count(), 0);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a = Document::builder().alias("x").alias("y").build();
        let b = Document::builder().aliases(["y", "x"]).build();
        assert_ne!(a, b);
        assert_eq!(a, Document::builder().aliases(["x", "y"]).build());
    }
}
