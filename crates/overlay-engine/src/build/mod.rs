//! Assembly of result geometries from the labelled overlay graph: edge
//! rings and polygons first, then lines not covered by areas, then points
//! not covered by either.

pub mod line;
pub mod point;
pub mod polygon;
pub mod ring;
