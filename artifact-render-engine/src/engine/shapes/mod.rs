//! Shape tag resolution for artifact geometry.
//!
//! Every artifact carries a free-form shape tag; the registry turns it into a
//! constant procedural primitive so each artifact family has a recognisable
//! silhouette.

/// Shape tag to geometry descriptor mapping with default fallback.
pub mod registry;

pub use registry::{PolyhedronKind, Primitive, ShapeDescriptor, ShapeKind, ShapeRegistry};
