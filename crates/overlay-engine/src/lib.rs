//! A topological overlay engine computing boolean combinations of planar
//! vector geometries: intersection, union, difference, and symmetric
//! difference over points, linestrings, and polygons.
//!
//! The pipeline nodes the inputs' segments, merges duplicate edges while
//! tracking coverage depths, builds a labelled planar graph, selects the
//! edges and nodes belonging to the requested operation, and assembles
//! polygons (shells with holes), lines, and points in canonical order.
//!
//! The engine is single-threaded and synchronous: one `OverlayOp` per
//! invocation, with no shared mutable state between invocations.

pub mod build;
pub mod error;
pub mod graph;
pub mod noding;
pub mod op;
pub mod topology;

// Re-export the public surface at the crate root.
pub use error::TopologyError;
pub use op::{
    difference, intersection, is_result_of_op, overlay, overlay_snap_if_needed, sym_difference,
    union_of, OverlayOp, OverlayOpCode, OverlayOptions,
};
