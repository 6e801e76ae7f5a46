//! Plan computation for managed resources

use crate::provider::schema::Schema;
use crate::provider::value::{AttrValue, ObjectValue};

/// Outcome of planning a resource change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    /// Planned new state; `None` plans a destroy
    pub planned_state: Option<ObjectValue>,
    /// Attributes whose change forces replacement
    pub requires_replace: Vec<String>,
}

/// Plan the transition from `prior` to `proposed`
///
/// - no proposal: destroy
/// - no prior state: create, computed attributes left null become unknown
/// - otherwise update; computed attributes keep their prior values unless a
///   replace-forcing attribute changed, in which case they become unknown
pub fn plan_change(
    schema: &Schema,
    prior: Option<&ObjectValue>,
    proposed: Option<ObjectValue>,
) -> PlannedChange {
    let Some(proposed) = proposed else {
        return PlannedChange {
            planned_state: None,
            requires_replace: Vec::new(),
        };
    };

    let mut planned = schema.conform(&proposed);

    let Some(prior) = prior else {
        for attr in schema.attributes.iter().filter(|a| a.computed) {
            if planned.get(attr.name).is_null() {
                planned.set(attr.name, AttrValue::Unknown);
            }
        }
        return PlannedChange {
            planned_state: Some(planned),
            requires_replace: Vec::new(),
        };
    };

    let requires_replace: Vec<String> = schema
        .attributes
        .iter()
        .filter(|a| a.force_new)
        .filter(|a| planned.get(a.name) != prior.get(a.name))
        .map(|a| a.name.to_string())
        .collect();

    for attr in schema.attributes.iter().filter(|a| a.computed) {
        if !requires_replace.is_empty() {
            planned.set(attr.name, AttrValue::Unknown);
        } else if planned.get(attr.name).is_null() {
            planned.set(attr.name, prior.get(attr.name).clone());
        }
    }

    PlannedChange {
        planned_state: Some(planned),
        requires_replace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::schema::Attribute;

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

    fn state(id: &str, name: &str) -> ObjectValue {
        ObjectValue::new()
            .with("id", AttrValue::known(id))
            .with("name", AttrValue::known(name))
            .with("description", AttrValue::Null)
    }

    #[test]
    fn test_plan_destroy() {
        let prior = state("a", "alpha");
        let change = plan_change(&schema(), Some(&prior), None);
        assert!(change.planned_state.is_none());
        assert!(change.requires_replace.is_empty());
    }

    #[test]
    fn test_plan_create_marks_computed_unknown() {
        let proposed = ObjectValue::new().with("name", AttrValue::known("alpha"));
        let change = plan_change(&schema(), None, Some(proposed));
        let planned = change.planned_state.unwrap();
        assert!(planned.get("id").is_unknown());
        assert_eq!(planned.get("name").as_str(), Some("alpha"));
        assert!(planned.get("description").is_null());
    }

    #[test]
    fn test_plan_in_place_update_keeps_id() {
        let prior = state("a", "alpha");
        let proposed = ObjectValue::new()
            .with("name", AttrValue::known("alpha"))
            .with("description", AttrValue::known("new"));
        let change = plan_change(&schema(), Some(&prior), Some(proposed));
        assert!(change.requires_replace.is_empty());
        let planned = change.planned_state.unwrap();
        assert_eq!(planned.get("id").as_str(), Some("a"));
        assert_eq!(planned.get("description").as_str(), Some("new"));
    }

    #[test]
    fn test_plan_force_new_change_requires_replace() {
        let prior = state("a", "alpha");
        let proposed = state("a", "beta");
        let change = plan_change(&schema(), Some(&prior), Some(proposed));
        assert_eq!(change.requires_replace, vec!["name".to_string()]);
        assert!(change.planned_state.unwrap().get("id").is_unknown());
    }

    #[test]
    fn test_plan_unknown_force_new_requires_replace() {
        let prior = state("a", "alpha");
        let proposed = ObjectValue::new().with("name", AttrValue::Unknown);
        let change = plan_change(&schema(), Some(&prior), Some(proposed));
        assert_eq!(change.requires_replace, vec!["name".to_string()]);
    }

    #[test]
    fn test_plan_no_change() {
        let prior = state("a", "alpha");
        let change = plan_change(&schema(), Some(&prior), Some(prior.clone()));
        assert_eq!(change.planned_state, Some(prior));
        assert!(change.requires_replace.is_empty());
    }
}
