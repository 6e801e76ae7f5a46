//! Provider and resource schemas

use crate::provider::value::{AttrValue, ObjectValue};

/// A string attribute of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Changing the value replaces the resource
    pub force_new: bool,
}

impl Attribute {
    fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            force_new: false,
        }
    }

    pub fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            required: true,
            ..Self::new(name, description)
        }
    }

    pub fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            optional: true,
            ..Self::new(name, description)
        }
    }

    pub fn computed(name: &'static str, description: &'static str) -> Self {
        Self {
            computed: true,
            ..Self::new(name, description)
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }
}

/// Schema of a provider block or resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub version: i64,
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: &'static str, attributes: Vec<Attribute>) -> Self {
        Self {
            version: 0,
            description,
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes.iter().map(|a| a.name)
    }

    /// Project a value onto this schema
    ///
    /// Attributes the schema does not declare are dropped and missing ones
    /// become null.
    pub fn conform(&self, value: &ObjectValue) -> ObjectValue {
        self.attributes.iter().fold(ObjectValue::new(), |obj, attr| {
            obj.with(attr.name, value.get(attr.name).clone())
        })
    }

    /// Object with every attribute null
    pub fn empty_object(&self) -> ObjectValue {
        self.conform(&ObjectValue::new())
    }

    /// Names of required attributes holding a known empty string
    pub fn empty_required(&self, value: &ObjectValue) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.required)
            .filter(|a| matches!(value.get(a.name), AttrValue::Known(s) if s.trim().is_empty()))
            .map(|a| a.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(
            "test",
            vec![
                Attribute::computed("id", "id"),
                Attribute::required("name", "name").force_new(),
                Attribute::optional("description", "description"),
            ],
        )
    }

    #[test]
    fn test_attribute_builders() {
        let attr = Attribute::required("token", "API token").sensitive();
        assert!(attr.required && attr.sensitive);
        assert!(!attr.optional && !attr.computed && !attr.force_new);
    }

    #[test]
    fn test_conform_drops_and_fills() {
        let value = ObjectValue::new()
            .with("name", AttrValue::known("x"))
            .with("timeouts", AttrValue::known("legacy"));
        let conformed = schema().conform(&value);

        let names: Vec<&str> = conformed.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["description", "id", "name"]);
        assert!(conformed.get("id").is_null());
    }

    #[test]
    fn test_empty_required() {
        let value = ObjectValue::new()
            .with("name", AttrValue::known("  "))
            .with("description", AttrValue::known(""));
        assert_eq!(schema().empty_required(&value), vec!["name"]);

        let value = ObjectValue::new().with("name", AttrValue::Unknown);
        assert!(schema().empty_required(&value).is_empty());
    }
}
