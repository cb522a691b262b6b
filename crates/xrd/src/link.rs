//! XRD links.

use crate::error::{Result, XrdError};
use crate::property::{self, Property, PropertyInput, PropertyMap};
use std::collections::BTreeMap;

/// Title map key used for a title that declares no language.
pub const DEFAULT_TITLE_LANG: &str = "default";

/// Token replaced by the resource URI in a link template.
pub const URI_TEMPLATE_TOKEN: &str = "{uri}";

/// A typed link from the subject to another resource.
///
/// The target is either a fixed `href` or a `template` containing `{uri}`,
/// never both; [`LinkBuilder::build`] rejects links that set both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Link {
    pub(crate) rel: Option<String>,
    pub(crate) href: Option<String>,
    pub(crate) template: Option<String>,
    pub(crate) type_: Option<String>,
    pub(crate) titles: Option<BTreeMap<String, String>>,
    pub(crate) properties: Option<Vec<Property>>,
}

impl Link {
    pub fn builder() -> LinkBuilder {
        LinkBuilder::default()
    }

    pub fn rel(&self) -> Option<&str> {
        self.rel.as_deref()
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// The media type of the link target.
    pub fn type_(&self) -> Option<&str> {
        self.type_.as_deref()
    }

    /// Titles keyed by language tag; [`DEFAULT_TITLE_LANG`] holds the untagged title.
    ///
    /// The empty tag `""` is an ordinary key, distinct from the untagged title.
    pub fn titles(&self) -> Option<&BTreeMap<String, String>> {
        self.titles.as_ref()
    }

    /// Title for a language tag, `None` selecting the untagged title.
    pub fn title(&self, lang: Option<&str>) -> Option<&str> {
        self.titles
            .as_ref()?
            .get(lang.unwrap_or(DEFAULT_TITLE_LANG))
            .map(String::as_str)
    }

    pub fn properties(&self) -> Option<&[Property]> {
        self.properties.as_deref()
    }

    /// The link's properties collapsed into a map (last duplicate wins).
    pub fn property_map(&self) -> Option<PropertyMap> {
        property::to_map(self.properties())
    }

    /// Value of the last property with the given type.
    ///
    /// Returns `None` when nothing matches, when the match is nil, or when the
    /// link has no property list at all.
    pub fn property(&self, type_: &str) -> Option<&str> {
        property::last_value(self.properties(), type_)
    }

    /// Resolves the link target for `resource_uri`.
    ///
    /// A template has every `{uri}` replaced by `resource_uri` verbatim, with
    /// no other URI-template processing. Otherwise the `href` is returned as is.
    pub fn resolve_href(&self, resource_uri: &str) -> Option<String> {
        match (&self.template, &self.href) {
            (Some(template), _) => Some(template.replace(URI_TEMPLATE_TOKEN, resource_uri)),
            (None, Some(href)) => Some(href.clone()),
            (None, None) => None,
        }
    }
}

/// Builder for [`Link`].
#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    rel: Option<String>,
    href: Option<String>,
    template: Option<String>,
    type_: Option<String>,
    titles: Option<BTreeMap<String, String>>,
    properties: Option<PropertyInput>,
}

impl LinkBuilder {
    pub fn rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = Some(rel.into());
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn type_(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    /// Adds a title. `None` stores it under [`DEFAULT_TITLE_LANG`]; a repeated
    /// language replaces the earlier title.
    pub fn title(mut self, lang: Option<&str>, title: impl Into<String>) -> Self {
        self.titles.get_or_insert_with(BTreeMap::new).insert(
            lang.unwrap_or(DEFAULT_TITLE_LANG).to_string(),
            title.into(),
        );
        self
    }

    /// Replaces the title map, marking titles as present even when empty.
    pub fn titles(mut self, titles: BTreeMap<String, String>) -> Self {
        self.titles = Some(titles);
        self
    }

    /// Replaces the property list, marking it present even when empty.
    pub fn properties(mut self, properties: impl Into<PropertyInput>) -> Self {
        self.properties = Some(properties.into());
        self
    }

    /// Appends one property.
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

    pub fn build(self) -> Result<Link> {
        if self.href.is_some() && self.template.is_some() {
            return Err(XrdError::validation(
                "link cannot have both href and template",
            ));
        }

        Ok(Link {
            rel: self.rel,
            href: self.href,
            template: self.template,
            type_: self.type_,
            titles: self.titles,
            properties: self.properties.map(PropertyInput::into_properties),
        })
    }
}
