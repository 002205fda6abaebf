//! Slot-keyed view models.
//!
//! A route declares its slots once; `ViewModel` construction always goes
//! through those declarations so a template never sees an undefined slot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What kind of value a slot holds, and therefore its empty sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// A sequence of entities; empty sentinel `[]`.
    Listing,
    /// A single entity object; empty sentinel `null`.
    Entity,
    /// A string echoed back to the page (e.g. the search box); empty sentinel `""`.
    Text,
}

impl SlotKind {
    pub fn empty(&self) -> Value {
        match self {
            SlotKind::Listing => Value::Array(Vec::new()),
            SlotKind::Entity => Value::Null,
            SlotKind::Text => Value::String(String::new()),
        }
    }

    /// Whether `value` has the structure this slot promises its template.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            SlotKind::Listing => value.is_array(),
            SlotKind::Entity => value.is_object(),
            SlotKind::Text => value.is_string(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SlotKind::Listing => "array",
            SlotKind::Entity => "object",
            SlotKind::Text => "string",
        }
    }
}

/// A named slot a route's template reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDecl {
    pub name: &'static str,
    pub kind: SlotKind,
}

impl SlotDecl {
    pub const fn listing(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Listing,
        }
    }

    pub const fn entity(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Entity,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Text,
        }
    }
}

/// The structure a template consumes: declared slots plus an optional error.
///
/// Serialises flat, e.g. `{"team": {...}, "roster": [...], "error": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    #[serde(flatten)]
    slots: BTreeMap<String, Value>,
}

impl ViewModel {
    /// Build a populated model. Declared slots missing from `values` get
    /// their empty sentinel; values for undeclared names are dropped.
    pub fn populated<'a, I>(decls: &[SlotDecl], values: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut provided: BTreeMap<&str, Value> = values.into_iter().collect();
        let slots = decls
            .iter()
            .map(|decl| {
                let value = provided
                    .remove(decl.name)
                    .unwrap_or_else(|| decl.kind.empty());
                (decl.name.to_string(), value)
            })
            .collect();

        Self { error: None, slots }
    }

    /// Build a degraded model: every declared slot empty, `error` set.
    pub fn degraded(decls: &[SlotDecl], error: impl Into<String>) -> Self {
        let slots = decls
            .iter()
            .map(|decl| (decl.name.to_string(), decl.kind.empty()))
            .collect();

        Self {
            error: Some(error.into()),
            slots,
        }
    }

    pub fn slot(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DECLS: [SlotDecl; 2] = [SlotDecl::entity("team"), SlotDecl::listing("roster")];

    #[test]
    fn test_populated_fills_missing_slots() {
        let model = ViewModel::populated(&DECLS, [("team", json!({"id": 1}))]);

        assert_eq!(model.slot("team"), Some(&json!({"id": 1})));
        assert_eq!(model.slot("roster"), Some(&json!([])));
        assert!(!model.is_degraded());
    }

    #[test]
    fn test_populated_drops_undeclared() {
        let model = ViewModel::populated(&DECLS, [("stray", json!(1))]);
        assert_eq!(model.slot("stray"), None);
        assert_eq!(model.slots().count(), 2);
    }

    #[test]
    fn test_degraded_uses_sentinels() {
        let model = ViewModel::degraded(&DECLS, "Failed to load team details");

        assert_eq!(model.slot("team"), Some(&Value::Null));
        assert_eq!(model.slot("roster"), Some(&json!([])));
        assert_eq!(model.error(), Some("Failed to load team details"));
    }

    #[test]
    fn test_serialises_flat() {
        let model = ViewModel::degraded(&DECLS, "boom");
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value, json!({"team": null, "roster": [], "error": "boom"}));

        let back: ViewModel = serde_json::from_value(value).unwrap();
        assert_eq!(back, model);
    }
}
