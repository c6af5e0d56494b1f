#![deny(missing_docs)]

//! # tsmapper Core
//!
//! Core library for generating TypeScript client declarations from a
//! server's exported API type metadata.
//!
//! The pipeline: load a type [`universe`], [`scan`] the service operations
//! for root types, run the [`resolver`] against a [`mapping`] table to build
//! a deduplicated declaration [`graph`], then [`emit`] TypeScript from its
//! ordered views.

/// Shared error types.
pub mod error;

/// Metadata-document model and loading.
pub mod universe;

/// Ordered type-mapping rule table.
pub mod mapping;

/// Structural shape classification.
pub mod classify;

/// The memoized type-graph resolver.
pub mod resolver;

/// The declaration arena and emission-ordering views.
pub mod graph;

/// Root-set discovery from service operations.
pub mod scan;

/// TypeScript text rendering.
pub mod emit;

pub use classify::{classify, Shape};
pub use emit::render;
pub use error::{MapperError, MapperResult};
pub use graph::{DeclId, Declaration, DeclarationGraph, EnumDecl, StructDecl, StructMember};
pub use mapping::{MappingConfig, MappingRule, MappingTable};
pub use resolver::Resolver;
pub use scan::collect_roots;
pub use universe::{
    EnumMember, Member, Operation, Parameter, Service, SourceType, TypeId, TypeKind, Universe,
    UniverseBuilder,
};
