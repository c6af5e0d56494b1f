#![deny(missing_docs)]

//! # Shape Classification
//!
//! Structural classification for types the mapping table did not claim.
//! Classification is total: every type lands in some shape, with a fixed
//! precedence of dictionary, then sequence, then enumeration, then nullable
//! enumeration, then the structured fallback.

use crate::universe::{TypeId, TypeKind, Universe, CHAR, DICTIONARY, IDICTIONARY, IENUMERABLE};

/// The structural category of a type, with the extracted constituent types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A closed generic instantiation of a key/value map abstraction.
    Dictionary {
        /// The key type.
        key: TypeId,
        /// The value type.
        value: TypeId,
    },
    /// A single-type-argument enumerable (interface, structural implementor
    /// or array).
    Sequence {
        /// The item type.
        item: TypeId,
    },
    /// A native enumeration.
    Enumeration {
        /// The enum type itself.
        id: TypeId,
    },
    /// A nullable wrapper around a native enumeration.
    ///
    /// The inner enum's identity — not the wrapper's — is what the resolver
    /// memoizes under, so a raw enum and its nullable form share one
    /// declaration.
    NullableEnumeration {
        /// The wrapped enum type.
        inner: TypeId,
    },
    /// Anything else: an object with members (possibly none).
    Structured,
}

/// Classifies a type into its [`Shape`].
///
/// Only consulted after the mapping table declined the type; never fails.
pub fn classify(universe: &Universe, id: TypeId) -> Shape {
    let ty = universe.get(id);

    if let Some((key, value)) = dictionary_entry(universe, id) {
        return Shape::Dictionary { key, value };
    }

    // A sequence of characters is not a sequence; the built-in mapping table
    // claims it as "string" before classification is ever reached.
    if let Some(item) = sequence_item(universe, id) {
        return Shape::Sequence { item };
    }

    if ty.kind == TypeKind::Enum {
        return Shape::Enumeration { id };
    }

    if let Some(inner) = universe.nullable_inner(id) {
        if universe.get(inner).kind == TypeKind::Enum {
            return Shape::NullableEnumeration { inner };
        }
    }

    Shape::Structured
}

/// If `id` is a key/value map instantiation, returns its (key, value) types.
pub(crate) fn dictionary_entry(universe: &Universe, id: TypeId) -> Option<(TypeId, TypeId)> {
    let ty = universe.get(id);
    match ty.generic_definition.as_deref() {
        Some(DICTIONARY) | Some(IDICTIONARY) => match ty.generic_args.as_slice() {
            [key, value] => Some((*key, *value)),
            _ => None,
        },
        _ => None,
    }
}

/// If `id` is enumerable, returns its item type.
///
/// Covers the direct generic enumerable interface, structural implementors
/// (via the exporter's `enumerableItem`), and arrays. The character
/// exclusion applies to the generic-enumerable clause only: `char[]` is a
/// sequence, but a generic enumerable of characters is claimed by the
/// textual mapping instead.
pub(crate) fn sequence_item(universe: &Universe, id: TypeId) -> Option<TypeId> {
    if let Some(item) = generic_enumerable_item(universe, id) {
        if universe.get(item).full_name == CHAR {
            return None;
        }
        return Some(item);
    }
    let ty = universe.get(id);
    if ty.kind == TypeKind::Array {
        return ty.element;
    }
    None
}

/// The item type of a generic enumerable (direct interface or structural
/// implementor), never of an array.
///
/// The built-in mapping table uses this to claim generic character
/// sequences as "string".
pub(crate) fn generic_enumerable_item(universe: &Universe, id: TypeId) -> Option<TypeId> {
    let ty = universe.get(id);
    if ty.kind == TypeKind::Array {
        return None;
    }
    if ty.generic_definition.as_deref() == Some(IENUMERABLE) {
        return ty.generic_args.first().copied();
    }
    ty.enumerable_item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::UniverseBuilder;

    #[test]
    fn test_dictionary_precedes_sequence() {
        // Dictionary<K, V> also enumerates key/value pairs; the exporter may
        // report an enumerableItem for it, and dictionary must still win.
        let mut builder = UniverseBuilder::new();
        let key = builder.primitive("System.String");
        let value = builder.primitive("System.Int32");
        let dict = builder.dictionary(key, value);
        let mut universe = builder.build();
        universe.types[dict.0].enumerable_item = Some(key);

        assert_eq!(classify(&universe, dict), Shape::Dictionary { key, value });
    }

    #[test]
    fn test_sequence_shapes() {
        let mut builder = UniverseBuilder::new();
        let item = builder.class("Demo", "LineItem", None);
        let list = builder.list(item);
        let iface = builder.enumerable(item);
        let array = builder.array(item);
        let universe = builder.build();

        for id in [list, iface, array] {
            assert_eq!(classify(&universe, id), Shape::Sequence { item });
        }
    }

    #[test]
    fn test_generic_char_sequence_is_not_a_sequence() {
        let mut builder = UniverseBuilder::new();
        let ch = builder.primitive("System.Char");
        let chars = builder.enumerable(ch);
        let char_list = builder.list(ch);
        let char_array = builder.array(ch);
        let universe = builder.build();

        // Generic enumerables of characters fall past the sequence shape;
        // the mapping table claims them first in a full resolution pass.
        for id in [chars, char_list] {
            assert_eq!(sequence_item(&universe, id), None);
            assert_eq!(generic_enumerable_item(&universe, id), Some(ch));
        }
        // A character array stays a sequence.
        assert_eq!(sequence_item(&universe, char_array), Some(ch));
        assert_eq!(generic_enumerable_item(&universe, char_array), None);
    }

    #[test]
    fn test_enum_shapes() {
        let mut builder = UniverseBuilder::new();
        let status = builder.enumeration("Demo", "Status", &[("Ok", 0), ("Bad", 1)]);
        let nullable = builder.nullable(status);
        let universe = builder.build();

        assert_eq!(classify(&universe, status), Shape::Enumeration { id: status });
        assert_eq!(
            classify(&universe, nullable),
            Shape::NullableEnumeration { inner: status }
        );
    }

    #[test]
    fn test_fallback_is_total() {
        let mut builder = UniverseBuilder::new();
        let empty = builder.class("Demo", "Empty", None);
        let nullable_int = {
            let int = builder.primitive("System.Int32");
            builder.nullable(int)
        };
        let universe = builder.build();

        // No members, no base: still structured, never an error.
        assert_eq!(classify(&universe, empty), Shape::Structured);
        // Nullable of a non-enum is not a nullable enumeration.
        assert_eq!(classify(&universe, nullable_int), Shape::Structured);
    }
}
