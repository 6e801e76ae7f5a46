//! Resource state values
//!
//! Every attribute served by this provider is a string, so a resource value
//! is an object of string attributes where each attribute may also be null or
//! not yet known (during planning).

use std::collections::BTreeMap;

use crate::error::{ProviderError, Result};

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttrValue {
    #[default]
    Null,
    Unknown,
    Known(String),
}

impl AttrValue {
    /// Known string value
    pub fn known(value: impl Into<String>) -> Self {
        AttrValue::Known(value.into())
    }

    /// `Known` for `Some`, `Null` for `None`
    pub fn from_option(value: Option<String>) -> Self {
        value.map_or(AttrValue::Null, AttrValue::Known)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, AttrValue::Unknown)
    }

    /// Borrow the string if known
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Known(s) => Some(s),
            _ => None,
        }
    }
}

static NULL: AttrValue = AttrValue::Null;

/// Object value of a resource or provider block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectValue {
    attrs: BTreeMap<String, AttrValue>,
}

impl ObjectValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, name: &str, value: AttrValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: AttrValue) {
        self.attrs.insert(name.to_string(), value);
    }

    /// Attribute value; missing attributes read as null
    pub fn get(&self, name: &str) -> &AttrValue {
        self.attrs.get(name).unwrap_or(&NULL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when any attribute is still unknown
    pub fn has_unknowns(&self) -> bool {
        self.attrs.values().any(AttrValue::is_unknown)
    }

    /// Optional string attribute; unknown values are an error
    pub fn string(&self, name: &str) -> Result<Option<String>> {
        match self.get(name) {
            AttrValue::Null => Ok(None),
            AttrValue::Known(s) => Ok(Some(s.clone())),
            AttrValue::Unknown => Err(ProviderError::value_attr(
                name,
                "value is not known yet",
            )),
        }
    }

    /// Computed string attribute; unknown reads as not yet assigned
    pub fn computed_string(&self, name: &str) -> Option<String> {
        self.get(name).as_str().map(str::to_string)
    }

    /// Required string attribute; null or unknown values are an error
    pub fn required_string(&self, name: &str) -> Result<String> {
        self.string(name)?
            .ok_or_else(|| ProviderError::value_attr(name, "a value is required"))
    }
}
