#![deny(missing_docs)]

//! # Declaration Graph
//!
//! The resolver's output: an arena of deduplicated declarations indexed by
//! source-type identity, plus the read-only ordered views the renderer
//! depends on.
//!
//! The arena doubles as the cycle breaker: a structured declaration is
//! inserted as an empty shell before its member list is populated, so a
//! member typing back into the same or an ancestor type finds the
//! partially-built declaration already memoized instead of recursing.

use crate::universe::{EnumMember, TypeId};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Identity of a resolved declaration: its index inside the arena.
///
/// Resolving the same source type twice yields the same `DeclId`; that is
/// the idempotence contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub usize);

/// A (name, declaration) member of a structured declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructMember {
    /// The member name as declared on the source type.
    pub name: String,
    /// The member's resolved declaration.
    pub ty: DeclId,
}

/// An enumeration declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// The namespace/module the enum is emitted into.
    pub module: String,
    /// The display name.
    pub name: String,
    /// The (name, value) members in declaration order.
    pub members: Vec<EnumMember>,
}

/// An object-shaped declaration with named members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    /// The namespace/module the class is emitted into.
    pub module: String,
    /// The display name.
    pub name: String,
    /// The owning base declaration, if the source type had a class base
    /// other than the universal root.
    pub base: Option<DeclId>,
    /// Inheritance depth: 0 without a base, else the base's depth plus one.
    pub depth: u32,
    /// The (name, declaration) members, populated after insertion.
    pub members: Vec<StructMember>,
}

/// A resolved declaration, one of the five shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A leaf produced by a mapping rule.
    Mapped {
        /// The destination type name.
        destination: String,
        /// The assignment expression template (`{0}` = source expression).
        assignment_template: String,
    },
    /// A sequence of one item declaration.
    Sequence {
        /// The item declaration.
        item: DeclId,
    },
    /// A key/value map.
    Dictionary {
        /// The key declaration.
        key: DeclId,
        /// The value declaration.
        value: DeclId,
    },
    /// An enumeration.
    Enumeration(EnumDecl),
    /// An object with members.
    Structured(StructDecl),
}

/// The deduplicated collection of declarations produced by one resolution
/// pass, with the derived emission-order views.
#[derive(Debug, Default)]
pub struct DeclarationGraph {
    decls: Vec<Declaration>,
    memo: IndexMap<TypeId, DeclId>,
}

impl DeclarationGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Looks up the declaration already memoized for a source type.
    pub fn lookup(&self, id: TypeId) -> Option<DeclId> {
        self.memo.get(&id).copied()
    }

    /// Inserts a declaration memoized under `id` and returns its identity.
    ///
    /// The memo table holds at most one declaration per source type; a
    /// double insert means the resolver skipped its memo check.
    pub(crate) fn insert(&mut self, id: TypeId, decl: Declaration) -> DeclId {
        if let Declaration::Structured(ref s) = decl {
            if let Some(base) = s.base {
                if let Declaration::Structured(base_decl) = self.get(base) {
                    assert!(
                        s.depth == base_decl.depth + 1,
                        "depth invariant violated: {}.{} has depth {} over base depth {}",
                        s.module,
                        s.name,
                        s.depth,
                        base_decl.depth
                    );
                }
            }
        }
        let decl_id = DeclId(self.decls.len());
        self.decls.push(decl);
        let previous = self.memo.insert(id, decl_id);
        assert!(previous.is_none(), "duplicate declaration for type {:?}", id);
        decl_id
    }

    /// Memoizes an additional source-type identity for an existing
    /// declaration (the nullable-enum wrapper aliasing its inner enum).
    pub(crate) fn alias(&mut self, id: TypeId, decl_id: DeclId) {
        let previous = self.memo.insert(id, decl_id);
        assert!(
            previous.is_none() || previous == Some(decl_id),
            "conflicting alias for type {:?}",
            id
        );
    }

    /// Appends a member to a structured declaration (the populate phase of
    /// insert-before-populate).
    pub(crate) fn push_member(&mut self, owner: DeclId, name: String, ty: DeclId) {
        match &mut self.decls[owner.0] {
            Declaration::Structured(s) => s.members.push(StructMember { name, ty }),
            other => panic!("members pushed onto non-structured declaration {:?}", other),
        }
    }

    /// Returns the declaration for an id.
    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0]
    }

    /// Number of declarations in the graph.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Whether the graph holds no declarations.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Iterates all declarations in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(index, decl)| (DeclId(index), decl))
    }

    /// The module-qualified name used in emitted type positions and for
    /// deduplication and ordering.
    pub fn reference_name(&self, id: DeclId) -> String {
        match self.get(id) {
            Declaration::Mapped { destination, .. } => destination.clone(),
            Declaration::Sequence { item } => format!("{}[]", self.reference_name(*item)),
            Declaration::Dictionary { key, value } => format!(
                "{{ key:{}; value:{} }}[]",
                self.reference_name(*key),
                self.reference_name(*value)
            ),
            Declaration::Enumeration(e) => format!("{}.{}", e.module, e.name),
            Declaration::Structured(s) => format!("{}.{}", s.module, s.name),
        }
    }

    /// All structured declarations ordered ascending by depth, then by
    /// module name.
    ///
    /// This guarantees a base is emitted before every one of its
    /// descendants; the renderer depends on it to avoid forward references.
    pub fn structured_in_emit_order(&self) -> Vec<DeclId> {
        let mut ordered: Vec<(DeclId, u32, String)> = self
            .iter()
            .filter_map(|(id, decl)| match decl {
                Declaration::Structured(s) => Some((id, s.depth, s.module.clone())),
                _ => None,
            })
            .collect();
        ordered.sort_by(|a, b| (a.1, &a.2).cmp(&(b.1, &b.2)));
        ordered.into_iter().map(|(id, _, _)| id).collect()
    }

    /// All distinct enumeration declarations grouped by module, groups
    /// ordered ascending by module name.
    ///
    /// Distinctness is reference-name equality, independent of memo
    /// identity; two same-named enums with differing member sets indicate an
    /// inconsistent source universe and fail fast.
    pub fn enum_groups(&self) -> Vec<(String, Vec<DeclId>)> {
        let mut seen: IndexMap<String, DeclId> = IndexMap::new();
        let mut groups: BTreeMap<String, Vec<DeclId>> = BTreeMap::new();

        for (id, decl) in self.iter() {
            let Declaration::Enumeration(e) = decl else {
                continue;
            };
            let reference = self.reference_name(id);
            if let Some(&first) = seen.get(&reference) {
                let Declaration::Enumeration(first_decl) = self.get(first) else {
                    unreachable!("seen table only holds enumerations");
                };
                assert!(
                    first_decl.members == e.members,
                    "enumeration {} declared twice with differing members",
                    reference
                );
                continue;
            }
            seen.insert(reference, id);
            groups.entry(e.module.clone()).or_default().push(id);
        }

        groups.into_iter().collect()
    }
}
