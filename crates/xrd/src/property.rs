//! Typed key/value properties and their list ↔ map conversions.
//!
//! Properties appear as an ordered list in XML but as an object in JSON. The
//! list → map direction is lossy: when two properties share a `type`, the
//! later one overwrites the earlier one.

use indexmap::IndexMap;

/// Map form of a property list: `type` → value, with `None` for nil properties.
///
/// Iteration order is insertion order, so the same input always yields the
/// same sequence when expanded again with [`from_map`].
pub type PropertyMap = IndexMap<String, Option<String>>;

/// A single XRD property.
///
/// A property whose value is `None` is a *nil* property. It is distinct from a
/// property whose value is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    type_: String,
    value: Option<String>,
}

impl Property {
    /// Creates a property with a value.
    pub fn new(type_: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            value: Some(value.into()),
        }
    }

    /// Creates a nil property.
    pub fn nil(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            value: None,
        }
    }

    /// Creates a property from an optional value.
    pub fn with_value(type_: impl Into<String>, value: Option<String>) -> Self {
        Self {
            type_: type_.into(),
            value,
        }
    }

    /// The property type URI.
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// The property value, `None` when nil.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_nil(&self) -> bool {
        self.value.is_none()
    }
}

/// Properties supplied either as an ordered list or as a map.
///
/// Builders accept this so callers can pass whichever shape they hold; it is
/// resolved once, at construction, by [`PropertyInput::into_properties`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyInput {
    Sequence(Vec<Property>),
    Map(PropertyMap),
}

impl PropertyInput {
    /// Resolves the input into an ordered property list.
    pub fn into_properties(self) -> Vec<Property> {
        match self {
            PropertyInput::Sequence(properties) => properties,
            PropertyInput::Map(map) => from_map(map),
        }
    }
}

impl From<Vec<Property>> for PropertyInput {
    fn from(properties: Vec<Property>) -> Self {
        PropertyInput::Sequence(properties)
    }
}

impl From<&[Property]> for PropertyInput {
    fn from(properties: &[Property]) -> Self {
        PropertyInput::Sequence(properties.to_vec())
    }
}

impl From<PropertyMap> for PropertyInput {
    fn from(map: PropertyMap) -> Self {
        PropertyInput::Map(map)
    }
}

/// Collapses a property list into a map, later duplicates overwriting earlier ones.
///
/// An absent list yields an absent map; an empty list yields an empty map.
pub fn to_map(properties: Option<&[Property]>) -> Option<PropertyMap> {
    properties.map(|properties| {
        let mut map = PropertyMap::with_capacity(properties.len());
        for property in properties {
            map.insert(property.type_.clone(), property.value.clone());
        }
        map
    })
}

/// Expands a map into a property list, one property per entry in map order.
pub fn from_map(map: PropertyMap) -> Vec<Property> {
    map.into_iter()
        .map(|(type_, value)| Property::with_value(type_, value))
        .collect()
}

/// Value of the last property in `properties` with the given type.
pub(crate) fn last_value<'a>(properties: Option<&'a [Property]>, type_: &str) -> Option<&'a str> {
    properties?
        .iter()
        .rev()
        .find(|p| p.type_ == type_)
        .and_then(Property::value)
}
