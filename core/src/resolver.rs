#![deny(missing_docs)]

//! # Type Graph Resolver
//!
//! The single depth-first pass that turns a root set of source types into a
//! [`DeclarationGraph`]. Resolution is memoized per source-type identity and
//! idempotent; cycles terminate because a structured declaration is memoized
//! before its member list is populated.

use crate::classify::{classify, Shape};
use crate::graph::{DeclId, Declaration, DeclarationGraph, EnumDecl, StructDecl};
use crate::mapping::MappingTable;
use crate::universe::{TypeId, TypeKind, Universe, OBJECT};

/// Resolves source types into declarations against one universe and one
/// mapping table.
#[derive(Debug)]
pub struct Resolver<'u> {
    universe: &'u Universe,
    mappings: &'u MappingTable,
    graph: DeclarationGraph,
}

impl<'u> Resolver<'u> {
    /// Creates a resolver with an empty graph.
    pub fn new(universe: &'u Universe, mappings: &'u MappingTable) -> Self {
        Self {
            universe,
            mappings,
            graph: DeclarationGraph::new(),
        }
    }

    /// Resolves one source type, reusing the memoized declaration when the
    /// type (or, through recursion, any type) was already seen.
    pub fn resolve(&mut self, id: TypeId) -> DeclId {
        if let Some(found) = self.graph.lookup(id) {
            return found;
        }

        if let Some(rule) = self.mappings.resolve(self.universe, id) {
            let decl = Declaration::Mapped {
                destination: rule.destination_type.clone(),
                assignment_template: rule.assignment_template.clone(),
            };
            return self.graph.insert(id, decl);
        }

        match classify(self.universe, id) {
            Shape::Dictionary { key, value } => {
                let key = self.resolve(key);
                let value = self.resolve(value);
                // A cycle through the value (or key) type may have re-entered
                // and already memoized this type.
                if let Some(found) = self.graph.lookup(id) {
                    return found;
                }
                self.graph.insert(id, Declaration::Dictionary { key, value })
            }
            Shape::Sequence { item } => {
                let item = self.resolve(item);
                // Same re-entrancy as the dictionary arm, through the item.
                if let Some(found) = self.graph.lookup(id) {
                    return found;
                }
                self.graph.insert(id, Declaration::Sequence { item })
            }
            Shape::Enumeration { id: inner } | Shape::NullableEnumeration { inner } => {
                self.resolve_enum(id, inner)
            }
            Shape::Structured => self.resolve_structured(id),
        }
    }

    /// Resolves every root, then yields the finished graph.
    pub fn resolve_all(mut self, roots: impl IntoIterator<Item = TypeId>) -> DeclarationGraph {
        for root in roots {
            self.resolve(root);
        }
        self.graph
    }

    /// Read access to the graph built so far.
    pub fn graph(&self) -> &DeclarationGraph {
        &self.graph
    }

    /// Consumes the resolver, yielding the graph built so far.
    pub fn into_graph(self) -> DeclarationGraph {
        self.graph
    }

    /// Enumerations are memoized under the inner enum's identity, so a raw
    /// enum and its nullable wrapper share one declaration. The wrapper's
    /// own identity is aliased onto it so re-resolving the wrapper is still
    /// a memo hit.
    fn resolve_enum(&mut self, requested: TypeId, inner: TypeId) -> DeclId {
        if let Some(found) = self.graph.lookup(inner) {
            if requested != inner {
                self.graph.alias(requested, found);
            }
            return found;
        }

        let source = self.universe.get(inner);
        let decl = Declaration::Enumeration(EnumDecl {
            module: source.namespace.clone(),
            name: source.name.clone(),
            members: source.enum_members.clone(),
        });
        let decl_id = self.graph.insert(inner, decl);
        if requested != inner {
            self.graph.alias(requested, decl_id);
        }
        decl_id
    }

    /// The structured fallback. The base (a class base other than the
    /// universal root) is resolved first so the depth invariant holds; the
    /// shell is inserted into the memo table before the member list is
    /// populated, which is what makes self- and mutually-referential types
    /// terminate.
    fn resolve_structured(&mut self, id: TypeId) -> DeclId {
        let source = self.universe.get(id);

        let base = match source.base {
            Some(base)
                if source.kind == TypeKind::Class
                    && self.universe.get(base).kind == TypeKind::Class
                    && self.universe.get(base).full_name != OBJECT =>
            {
                Some(self.resolve(base))
            }
            _ => None,
        };
        // A base whose members reach back down to this type resolves it
        // mid-recursion; the memoized declaration is the one to keep.
        if let Some(found) = self.graph.lookup(id) {
            return found;
        }
        let depth = base
            .and_then(|base_id| match self.graph.get(base_id) {
                Declaration::Structured(s) => Some(s.depth + 1),
                _ => None,
            })
            .unwrap_or(0);

        let shell = Declaration::Structured(StructDecl {
            module: source.namespace.clone(),
            name: source.name.clone(),
            base,
            depth,
            members: Vec::new(),
        });
        let decl_id = self.graph.insert(id, shell);

        for member in &source.members {
            let member_ty = self.resolve(member.ty);
            self.graph.push_member(decl_id, member.name.clone(), member_ty);
        }
        decl_id
    }
}
