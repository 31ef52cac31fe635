//! Topological primitives shared by the overlay pipeline: the side
//! positions of a directed edge, two-operand labels, and signed area
//! depths.

pub mod depth;
pub mod label;
pub mod position;

pub use depth::Depth;
pub use label::{Label, TopologyLocation};
pub use position::Position;
