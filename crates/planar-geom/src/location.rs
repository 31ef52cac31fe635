use serde::{Deserialize, Serialize};

/// The topological relationship of a point to a geometry. Absent values
/// (the "NONE" location) are expressed as `Option<Location>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}
