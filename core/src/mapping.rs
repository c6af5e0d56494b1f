#![deny(missing_docs)]

//! # Type Mapping
//!
//! The ordered rule table that maps well-known source types directly to
//! target-language destinations, bypassing structural classification.
//!
//! Rule order is a contract: custom rules are always consulted before the
//! built-ins and the first match wins, so a custom rule for a well-known
//! value type can override the built-in primitive mapping. The table must
//! stay an ordered list — replacing it with a keyed map would lose the
//! precedence semantics.
//!
//! These mappings need to correspond with the server's JSON serialization,
//! including any customization done there.

use crate::classify::generic_enumerable_item;
use crate::universe::{TypeId, Universe, CHAR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicate deciding whether a rule applies to a type.
///
/// Takes the universe alongside the id so predicates can inspect structure
/// (nullable wrappers, item types) rather than just the full name.
pub type MatchFn = Box<dyn Fn(&Universe, TypeId) -> bool>;

/// A single (predicate, destination) mapping rule.
pub struct MappingRule {
    matches: MatchFn,
    /// The destination type name emitted in type positions.
    pub destination_type: String,
    /// Assignment expression template; `{0}` is replaced with the source
    /// expression by the renderer.
    pub assignment_template: String,
}

impl MappingRule {
    /// Creates a rule from an arbitrary predicate.
    pub fn new(
        matches: impl Fn(&Universe, TypeId) -> bool + 'static,
        destination_type: &str,
        assignment_template: &str,
    ) -> Self {
        Self {
            matches: Box::new(matches),
            destination_type: destination_type.to_string(),
            assignment_template: assignment_template.to_string(),
        }
    }

    /// Creates a rule matching any of the given full names exactly.
    pub fn full_names(names: &[&str], destination_type: &str, assignment_template: &str) -> Self {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        Self::new(
            move |universe, id| names.iter().any(|n| universe.get(id).full_name == *n),
            destination_type,
            assignment_template,
        )
    }

    /// Creates a rule matching nullable wrappers of any of the given
    /// full names.
    pub fn nullable_of(names: &[&str], destination_type: &str, assignment_template: &str) -> Self {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        Self::new(
            move |universe, id| match universe.nullable_inner(id) {
                Some(inner) => names.iter().any(|n| universe.get(inner).full_name == *n),
                None => false,
            },
            destination_type,
            assignment_template,
        )
    }

    /// Evaluates the rule's predicate.
    pub fn matches(&self, universe: &Universe, id: TypeId) -> bool {
        (self.matches)(universe, id)
    }
}

impl fmt::Debug for MappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRule")
            .field("destination_type", &self.destination_type)
            .field("assignment_template", &self.assignment_template)
            .finish_non_exhaustive()
    }
}

const NUMERIC: &[&str] = &[
    "System.Byte",
    "System.SByte",
    "System.Int16",
    "System.UInt16",
    "System.Int32",
    "System.UInt32",
    "System.Int64",
    "System.UInt64",
    "System.Double",
    "System.Single",
    "System.Decimal",
];

/// The ordered rule list consulted before structural classification.
#[derive(Debug)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

impl MappingTable {
    /// The built-in rules only.
    ///
    /// There is deliberately no built-in for `System.Void` (callers
    /// special-case it) or `System.Object` (consumers supply a catch-all
    /// custom rule mapping it to an open destination).
    pub fn built_in() -> Self {
        let rules = vec![
            MappingRule::full_names(&["System.String", CHAR], "string", "{0}"),
            MappingRule::nullable_of(&[CHAR], "string", "{0}"),
            // A generic enumerable of characters is a string, never a
            // sequence of strings. Arrays stay sequences: char[] is string[].
            MappingRule::new(
                |universe, id| {
                    generic_enumerable_item(universe, id)
                        .is_some_and(|item| universe.get(item).full_name == CHAR)
                },
                "string",
                "{0}",
            ),
            MappingRule::full_names(NUMERIC, "number", "{0}"),
            MappingRule::nullable_of(NUMERIC, "number", "{0}"),
            MappingRule::full_names(&["System.DateTime"], "string", "{0}"),
            MappingRule::nullable_of(&["System.DateTime"], "string", "{0}"),
            MappingRule::full_names(&["System.DateTimeOffset"], "string", "{0}"),
            MappingRule::nullable_of(&["System.DateTimeOffset"], "string", "{0}"),
            MappingRule::full_names(&["System.TimeSpan"], "string", "{0}"),
            MappingRule::nullable_of(&["System.TimeSpan"], "string", "{0}"),
            MappingRule::full_names(&["System.Guid"], "string", "{0}"),
            MappingRule::nullable_of(&["System.Guid"], "string", "{0}"),
            MappingRule::full_names(&["System.Uri"], "string", "{0}"),
            MappingRule::full_names(&["System.Boolean"], "boolean", "{0}"),
            MappingRule::nullable_of(&["System.Boolean"], "boolean", "{0}"),
        ];
        Self { rules }
    }

    /// Builds a table with `custom` rules prepended ahead of the built-ins.
    pub fn with_custom(custom: Vec<MappingRule>) -> Self {
        let mut rules = custom;
        rules.extend(Self::built_in().rules);
        Self { rules }
    }

    /// Returns the first rule (in list order) matching the type, if any.
    ///
    /// Absence of a match is a normal outcome: the caller falls through to
    /// structural classification.
    pub fn resolve(&self, universe: &Universe, id: TypeId) -> Option<&MappingRule> {
        self.rules.iter().find(|rule| rule.matches(universe, id))
    }
}

fn default_template() -> String {
    "{0}".to_string()
}

/// Declarative form of a custom mapping rule, loadable from a JSON/YAML
/// configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    /// Full names the rule matches exactly.
    pub full_names: Vec<String>,
    /// Also match nullable wrappers of those full names.
    #[serde(default)]
    pub match_nullable: bool,
    /// Destination type name.
    pub destination_type: String,
    /// Assignment template; defaults to the identity `{0}`.
    #[serde(default = "default_template")]
    pub assignment_template: String,
}

impl MappingConfig {
    /// Lowers the declarative form into an executable rule.
    pub fn into_rule(self) -> MappingRule {
        let MappingConfig {
            full_names,
            match_nullable,
            destination_type,
            assignment_template,
        } = self;
        MappingRule::new(
            move |universe, id| {
                let hit = |candidate: TypeId| {
                    full_names
                        .iter()
                        .any(|n| universe.get(candidate).full_name == *n)
                };
                hit(id)
                    || (match_nullable && universe.nullable_inner(id).is_some_and(hit))
            },
            &destination_type,
            &assignment_template,
        )
    }
}
