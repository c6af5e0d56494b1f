#![deny(missing_docs)]

//! # Root-Set Scan
//!
//! Derives the deduplicated root set of interesting types from the service
//! operations in the metadata document: declared response types plus
//! parameter types, skipping the well-known cancellation parameter type.

use crate::universe::{TypeId, Universe, CANCELLATION_TOKEN};
use indexmap::IndexSet;

/// Collects the root types to resolve, in first-seen order.
pub fn collect_roots(universe: &Universe) -> IndexSet<TypeId> {
    let mut roots = IndexSet::new();
    for service in &universe.services {
        for operation in &service.operations {
            for &response in &operation.response_types {
                roots.insert(response);
            }
            for parameter in &operation.parameters {
                if universe.get(parameter.ty).name != CANCELLATION_TOKEN {
                    roots.insert(parameter.ty);
                }
            }
        }
    }
    roots
}
