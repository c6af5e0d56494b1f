#![deny(missing_docs)]

//! # Type Universe
//!
//! Data model for the pre-extracted metadata document describing the server's
//! type universe: every structural type reachable from the API surface plus
//! the service operations that reference them.
//!
//! The document is produced by an external exporter running against the
//! server's own reflection facility; this crate only loads and validates it.
//! All cross-references inside the document are `TypeId` indices, checked
//! once at load time so that lookups are infallible afterwards.

use crate::error::{MapperError, MapperResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Full name of the universal root object type.
pub const OBJECT: &str = "System.Object";
/// Full name of the character primitive.
pub const CHAR: &str = "System.Char";
/// Open-generic full name of the nullable wrapper.
pub const NULLABLE: &str = "System.Nullable`1";
/// Open-generic full name of the concrete key/value map.
pub const DICTIONARY: &str = "System.Collections.Generic.Dictionary`2";
/// Open-generic full name of the key/value map abstraction.
pub const IDICTIONARY: &str = "System.Collections.Generic.IDictionary`2";
/// Open-generic full name of the single-argument enumerable abstraction.
pub const IENUMERABLE: &str = "System.Collections.Generic.IEnumerable`1";
/// Type name of the cancellation parameter excluded from root-set scans.
pub const CANCELLATION_TOKEN: &str = "CancellationToken";

/// Identity of a source type: its index inside [`Universe::types`].
///
/// This is the identity used everywhere — memoization keys, member
/// references and service signatures all speak in `TypeId`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub usize);

/// Broad structural category reported by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    /// A reference type with members.
    Class,
    /// An interface type.
    Interface,
    /// A non-enum value type.
    ValueType,
    /// A native enumeration.
    Enum,
    /// An array type; `element` carries the element type.
    Array,
    /// A built-in primitive.
    Primitive,
}

/// A single named member declared directly on a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// The member name as declared on the source type.
    pub name: String,
    /// The member's type.
    pub ty: TypeId,
}

/// A named enumeration member with its integer value.
///
/// Values are widened to `i64` by the exporter regardless of the enum's
/// declared backing width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMember {
    /// The member name.
    pub name: String,
    /// The member's integer value, widened to 64 bits.
    pub value: i64,
}

/// One structural type description from the exported universe.
///
/// Treated as immutable input; the resolver never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceType {
    /// The namespace (module) the type lives in.
    #[serde(default)]
    pub namespace: String,
    /// The simple type name.
    pub name: String,
    /// The namespace-qualified full name, unique per closed instantiation.
    pub full_name: String,
    /// Structural category.
    pub kind: TypeKind,
    /// The declared base type, if any.
    #[serde(default)]
    pub base: Option<TypeId>,
    /// For closed generics, the open-generic full name
    /// (e.g. `System.Nullable`1`).
    #[serde(default)]
    pub generic_definition: Option<String>,
    /// Generic type arguments, in declaration order.
    #[serde(default)]
    pub generic_args: Vec<TypeId>,
    /// For arrays, the element type.
    #[serde(default)]
    pub element: Option<TypeId>,
    /// For types structurally implementing the generic enumerable interface
    /// (e.g. `List<T>`), the extracted item type.
    #[serde(default)]
    pub enumerable_item: Option<TypeId>,
    /// For enums, the (name, value) members in declaration order.
    #[serde(default)]
    pub enum_members: Vec<EnumMember>,
    /// Public, parameterless-gettable instance members declared directly on
    /// the type (not inherited), in declaration order.
    #[serde(default)]
    pub members: Vec<Member>,
}

/// A parameter of a service operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// The parameter name.
    pub name: String,
    /// The parameter type.
    pub ty: TypeId,
}

/// One API operation on a service, with its declared signature types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// The operation name.
    pub name: String,
    /// Response types the exporter found declared on the operation.
    #[serde(default)]
    pub response_types: Vec<TypeId>,
    /// Declared parameters, in signature order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// An API service (controller) exposing operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// The service name.
    pub name: String,
    /// The operations declared directly on the service.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// The fully loaded, reference-validated type universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Universe {
    /// Every type in the universe; `TypeId`s index into this list.
    pub types: Vec<SourceType>,
    /// The API services whose signatures seed the root set.
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Universe {
    /// Parses and validates a universe from a JSON document.
    pub fn from_json(content: &str) -> MapperResult<Self> {
        let universe: Universe = serde_json::from_str(content)?;
        universe.validated()
    }

    /// Parses and validates a universe from a YAML document.
    pub fn from_yaml(content: &str) -> MapperResult<Self> {
        let universe: Universe = serde_yaml::from_str(content)?;
        universe.validated()
    }

    /// Loads a universe from disk, dispatching on the file extension
    /// (`.yaml`/`.yml` is parsed as YAML, anything else as JSON).
    pub fn load(path: &Path) -> MapperResult<Self> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Checks that every `TypeId` in the document is in range.
    ///
    /// After this passes, [`Universe::get`] is infallible.
    fn validated(self) -> MapperResult<Self> {
        let count = self.types.len();
        let check = |id: TypeId, context: &str| -> MapperResult<()> {
            if id.0 >= count {
                return Err(MapperError::Metadata(format!(
                    "dangling type id {} in {} (universe has {} types)",
                    id.0, context, count
                )));
            }
            Ok(())
        };

        for (index, ty) in self.types.iter().enumerate() {
            let context = format!("type '{}' (#{})", ty.full_name, index);
            if let Some(base) = ty.base {
                check(base, &context)?;
            }
            if let Some(element) = ty.element {
                check(element, &context)?;
            }
            if let Some(item) = ty.enumerable_item {
                check(item, &context)?;
            }
            for &arg in &ty.generic_args {
                check(arg, &context)?;
            }
            for member in &ty.members {
                check(member.ty, &context)?;
            }
        }
        for service in &self.services {
            for op in &service.operations {
                let context = format!("operation '{}.{}'", service.name, op.name);
                for &response in &op.response_types {
                    check(response, &context)?;
                }
                for param in &op.parameters {
                    check(param.ty, &context)?;
                }
            }
        }
        Ok(self)
    }

    /// Returns the type description for an id.
    ///
    /// Infallible for ids handed out by this universe (validated at load).
    pub fn get(&self, id: TypeId) -> &SourceType {
        &self.types[id.0]
    }

    /// Number of types in the universe.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the universe contains no types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// If `id` is a nullable wrapper, returns the wrapped type.
    pub fn nullable_inner(&self, id: TypeId) -> Option<TypeId> {
        let ty = self.get(id);
        if ty.generic_definition.as_deref() == Some(NULLABLE) {
            ty.generic_args.first().copied()
        } else {
            None
        }
    }
}

/// Fluent construction of universes without a serialized document.
///
/// Mostly test tooling, but also the programmatic entry point for hosts that
/// extract metadata in-process instead of shipping a JSON file.
#[derive(Debug, Default)]
pub struct UniverseBuilder {
    types: Vec<SourceType>,
    services: Vec<Service>,
}

impl UniverseBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, ty: SourceType) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(ty);
        id
    }

    fn blank(namespace: &str, name: &str, full_name: &str, kind: TypeKind) -> SourceType {
        SourceType {
            namespace: namespace.to_string(),
            name: name.to_string(),
            full_name: full_name.to_string(),
            kind,
            base: None,
            generic_definition: None,
            generic_args: Vec::new(),
            element: None,
            enumerable_item: None,
            enum_members: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Adds a primitive by full name (e.g. `System.Int32`).
    pub fn primitive(&mut self, full_name: &str) -> TypeId {
        let (namespace, name) = split_full_name(full_name);
        self.push(Self::blank(&namespace, &name, full_name, TypeKind::Primitive))
    }

    /// Adds a class, optionally based on a previously added class.
    pub fn class(&mut self, namespace: &str, name: &str, base: Option<TypeId>) -> TypeId {
        let full_name = format!("{}.{}", namespace, name);
        let mut ty = Self::blank(namespace, name, &full_name, TypeKind::Class);
        ty.base = base;
        self.push(ty)
    }

    /// Adds a (name, type) member to a previously added type.
    pub fn member(&mut self, owner: TypeId, name: &str, ty: TypeId) {
        self.types[owner.0].members.push(Member {
            name: name.to_string(),
            ty,
        });
    }

    /// Adds a native enumeration with the given members.
    pub fn enumeration(&mut self, namespace: &str, name: &str, members: &[(&str, i64)]) -> TypeId {
        let full_name = format!("{}.{}", namespace, name);
        let mut ty = Self::blank(namespace, name, &full_name, TypeKind::Enum);
        ty.enum_members = members
            .iter()
            .map(|(n, v)| EnumMember {
                name: n.to_string(),
                value: *v,
            })
            .collect();
        self.push(ty)
    }

    /// Adds a nullable wrapper around a previously added type.
    pub fn nullable(&mut self, inner: TypeId) -> TypeId {
        let inner_full = self.types[inner.0].full_name.clone();
        let full_name = format!("{}[[{}]]", NULLABLE, inner_full);
        let mut ty = Self::blank("System", "Nullable`1", &full_name, TypeKind::ValueType);
        ty.generic_definition = Some(NULLABLE.to_string());
        ty.generic_args = vec![inner];
        self.push(ty)
    }

    /// Adds a `List<T>`-like type structurally implementing the generic
    /// enumerable interface.
    pub fn list(&mut self, item: TypeId) -> TypeId {
        let item_full = self.types[item.0].full_name.clone();
        let full_name = format!("System.Collections.Generic.List`1[[{}]]", item_full);
        let mut ty = Self::blank("System.Collections.Generic", "List`1", &full_name, TypeKind::Class);
        ty.generic_definition = Some("System.Collections.Generic.List`1".to_string());
        ty.generic_args = vec![item];
        ty.enumerable_item = Some(item);
        self.push(ty)
    }

    /// Adds a direct generic enumerable interface instantiation.
    pub fn enumerable(&mut self, item: TypeId) -> TypeId {
        let item_full = self.types[item.0].full_name.clone();
        let full_name = format!("{}[[{}]]", IENUMERABLE, item_full);
        let mut ty = Self::blank(
            "System.Collections.Generic",
            "IEnumerable`1",
            &full_name,
            TypeKind::Interface,
        );
        ty.generic_definition = Some(IENUMERABLE.to_string());
        ty.generic_args = vec![item];
        ty.enumerable_item = Some(item);
        self.push(ty)
    }

    /// Adds an array of a previously added element type.
    pub fn array(&mut self, element: TypeId) -> TypeId {
        let element_full = self.types[element.0].full_name.clone();
        let full_name = format!("{}[]", element_full);
        let (namespace, name) = split_full_name(&full_name);
        let mut ty = Self::blank(&namespace, &name, &full_name, TypeKind::Array);
        ty.element = Some(element);
        self.push(ty)
    }

    /// Adds a `Dictionary<K, V>` instantiation.
    pub fn dictionary(&mut self, key: TypeId, value: TypeId) -> TypeId {
        let key_full = self.types[key.0].full_name.clone();
        let value_full = self.types[value.0].full_name.clone();
        let full_name = format!("{}[[{}],[{}]]", DICTIONARY, key_full, value_full);
        let mut ty = Self::blank(
            "System.Collections.Generic",
            "Dictionary`2",
            &full_name,
            TypeKind::Class,
        );
        ty.generic_definition = Some(DICTIONARY.to_string());
        ty.generic_args = vec![key, value];
        self.push(ty)
    }

    /// Adds a service with its operations.
    pub fn service(&mut self, name: &str, operations: Vec<Operation>) {
        self.services.push(Service {
            name: name.to_string(),
            operations,
        });
    }

    /// Finishes the universe. Ids handed out by this builder are in range by
    /// construction.
    pub fn build(self) -> Universe {
        Universe {
            types: self.types,
            services: self.services,
        }
    }
}

fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.rsplit_once('.') {
        Some((namespace, name)) => (namespace.to_string(), name.to_string()),
        None => (String::new(), full_name.to_string()),
    }
}
