use planar_geom::algorithm::locate::PointLocator;
use planar_geom::{Geometry, GeometryFactory, Location, PrecisionModel};
use tracing::debug;

use crate::build::line::build_lines;
use crate::build::point::build_points;
use crate::build::polygon::build_polygons;
use crate::error::TopologyError;
use crate::graph::edge_table::EdgeTable;
use crate::graph::OverlayGraph;
use crate::noding::classic::node_classic;
use crate::noding::snapround::node_snap_rounded;
use crate::noding::validate::validate_noding;
use crate::topology::Position;

/// The boolean operations of the overlay engine. The integer codes are
/// part of the external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum OverlayOpCode {
    Intersection = 1,
    Union = 2,
    Difference = 3,
    SymDifference = 4,
}

impl OverlayOpCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<OverlayOpCode> {
        match code {
            1 => Some(OverlayOpCode::Intersection),
            2 => Some(OverlayOpCode::Union),
            3 => Some(OverlayOpCode::Difference),
            4 => Some(OverlayOpCode::SymDifference),
            _ => None,
        }
    }
}

/// Tests whether a point with the given locations relative to the two
/// operands is contained in the result of the operation. Boundary counts
/// as Interior; absent locations count as not-Interior.
pub fn is_result_of_op(
    loc0: Option<Location>,
    loc1: Option<Location>,
    op: OverlayOpCode,
) -> bool {
    let is_in = |loc: Option<Location>| {
        matches!(loc, Some(Location::Interior) | Some(Location::Boundary))
    };
    let in0 = is_in(loc0);
    let in1 = is_in(loc1);
    match op {
        OverlayOpCode::Intersection => in0 && in1,
        OverlayOpCode::Union => in0 || in1,
        OverlayOpCode::Difference => in0 && !in1,
        OverlayOpCode::SymDifference => in0 != in1,
    }
}

/// Caller-selectable behavior for one overlay invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayOptions {
    /// When set, noding uses snap-rounding at this precision instead of
    /// classic noding at the inputs' precision.
    pub noding_precision: Option<PrecisionModel>,
    /// Overrides the noding validator: defaults to on for classic noding
    /// and off for snap-rounding.
    pub validate_noding: Option<bool>,
}

/// A single overlay computation. One instance per invocation; it owns
/// every datum it constructs and is consumed by `result_geometry`.
pub struct OverlayOp<'a> {
    input: [&'a Geometry; 2],
    factory: GeometryFactory,
    noding_pm: PrecisionModel,
    use_snap_rounding: bool,
    validate_override: Option<bool>,
    locator: PointLocator,
    graph: OverlayGraph,
}

impl<'a> OverlayOp<'a> {
    pub fn new(g0: &'a Geometry, g1: &'a Geometry) -> Self {
        Self::with_precision(g0, PrecisionModel::Floating, g1, PrecisionModel::Floating)
    }

    /// The result (and default noding) precision is the higher-precision
    /// of the two input models; the factory of the first input is used
    /// for all results.
    pub fn with_precision(
        g0: &'a Geometry,
        pm0: PrecisionModel,
        g1: &'a Geometry,
        pm1: PrecisionModel,
    ) -> Self {
        let result_pm = pm0.higher_of(pm1);
        Self {
            input: [g0, g1],
            factory: GeometryFactory::new(result_pm),
            noding_pm: result_pm,
            use_snap_rounding: false,
            validate_override: None,
            locator: PointLocator::new(),
            graph: OverlayGraph::new(),
        }
    }

    /// Selects snap-rounded noding at the given precision.
    pub fn set_noding_precision(&mut self, pm: PrecisionModel) {
        self.noding_pm = pm;
        self.use_snap_rounding = true;
    }

    pub fn set_validate_noding(&mut self, validate: bool) {
        self.validate_override = Some(validate);
    }

    /// Runs the overlay pipeline and emits the result geometry, with
    /// elements ordered points, lines, polygons.
    pub fn result_geometry(mut self, op: OverlayOpCode) -> Result<Geometry, TopologyError> {
        debug!(op = ?op, snap_rounding = self.use_snap_rounding, "computing overlay");

        // noding, under the noding precision model
        let noded = if self.use_snap_rounding {
            node_snap_rounded(self.input[0], self.input[1], &self.noding_pm)
        } else {
            node_classic(self.input[0], self.input[1], &self.noding_pm)
        };

        // copy operand nodes first so input points are considered for the
        // result; their labels override computed ones
        self.graph.copy_operand_nodes(0, &noded.operand_nodes[0]);
        self.graph.copy_operand_nodes(1, &noded.operand_nodes[1]);

        let edges = EdgeTable::merge_edges(noded.edges);

        // the validator is needed to catch classic-noding robustness
        // failures; snap-rounded output skips it unless asked for
        let validate = self.validate_override.unwrap_or(!self.use_snap_rounding);
        if validate {
            validate_noding(&edges)?;
        }

        for e in edges {
            self.graph.add_edge(e);
        }
        self.graph.compute_labelling(self.input)?;
        self.graph.label_incomplete_nodes(self.input, &self.locator);

        self.find_result_area_edges(op);
        self.graph.cancel_duplicate_result_edges();

        // areas must be built before lines, and lines before points, so
        // that covered lower-dimension elements can be dropped
        let result_polys = build_polygons(&mut self.graph)?;
        let result_lines = build_lines(&mut self.graph, op, &result_polys, &self.locator);
        let lines_and_areas: Vec<&Geometry> =
            result_lines.iter().chain(result_polys.iter()).collect();
        let result_points = build_points(&self.graph, op, &lines_and_areas, &self.locator);

        debug!(
            points = result_points.len(),
            lines = result_lines.len(),
            polygons = result_polys.len(),
            "overlay result assembled"
        );

        // element geometries of the result are always in the order
        // points, lines, polygons
        let mut parts = result_points;
        parts.extend(result_lines);
        parts.extend(result_polys);
        if parts.is_empty() {
            return Ok(create_empty_result(
                op,
                self.input[0],
                self.input[1],
                &self.factory,
            ));
        }
        Ok(self.factory.build_geometry(parts))
    }

    /// Marks the directed edges whose labels satisfy the operation
    /// predicate on their right side (polygon shells traced CW keep the
    /// interior on the right). Interior-area edges are collapse artifacts
    /// and never bound the result.
    fn find_result_area_edges(&mut self, op: OverlayOpCode) {
        for dk in self.graph.dir_edge_order.clone() {
            let label = self.graph.dir_edges[dk].label;
            if label.is_area()
                && !self.graph.is_interior_area_edge(dk)
                && is_result_of_op(
                    label.location(0, Position::Right),
                    label.location(1, Position::Right),
                    op,
                )
            {
                self.graph.dir_edges[dk].in_result = true;
            }
        }
    }
}

/// Computes the overlay of two geometries for the given operation.
pub fn overlay(
    g0: &Geometry,
    g1: &Geometry,
    op: OverlayOpCode,
    options: &OverlayOptions,
) -> Result<Geometry, TopologyError> {
    let mut overlay_op = OverlayOp::new(g0, g1);
    if let Some(pm) = options.noding_precision {
        overlay_op.set_noding_precision(pm);
    }
    if let Some(validate) = options.validate_noding {
        overlay_op.set_validate_noding(validate);
    }
    overlay_op.result_geometry(op)
}

pub fn intersection(g0: &Geometry, g1: &Geometry) -> Result<Geometry, TopologyError> {
    overlay(g0, g1, OverlayOpCode::Intersection, &OverlayOptions::default())
}

pub fn union_of(g0: &Geometry, g1: &Geometry) -> Result<Geometry, TopologyError> {
    overlay(g0, g1, OverlayOpCode::Union, &OverlayOptions::default())
}

pub fn difference(g0: &Geometry, g1: &Geometry) -> Result<Geometry, TopologyError> {
    overlay(g0, g1, OverlayOpCode::Difference, &OverlayOptions::default())
}

pub fn sym_difference(g0: &Geometry, g1: &Geometry) -> Result<Geometry, TopologyError> {
    overlay(g0, g1, OverlayOpCode::SymDifference, &OverlayOptions::default())
}

/// Computes the overlay with classic noding, retrying once with
/// snap-rounding at a scale derived from the input magnitudes if a
/// topology failure occurs. The retry is a fresh overlay invocation.
pub fn overlay_snap_if_needed(
    g0: &Geometry,
    g1: &Geometry,
    op: OverlayOpCode,
) -> Result<Geometry, TopologyError> {
    match overlay(g0, g1, op, &OverlayOptions::default()) {
        Ok(result) => Ok(result),
        Err(err) => {
            let pm = PrecisionModel::fixed(snap_scale(g0, g1));
            debug!(error = %err, precision = ?pm, "classic overlay failed, retrying with snap-rounding");
            overlay(
                g0,
                g1,
                op,
                &OverlayOptions {
                    noding_precision: Some(pm),
                    validate_noding: None,
                },
            )
        }
    }
}

/// A snapping scale that preserves about 12 significant digits of the
/// inputs' ordinate magnitudes.
fn snap_scale(g0: &Geometry, g1: &Geometry) -> f64 {
    let mut env = g0.envelope();
    env.expand_to_include_envelope(&g1.envelope());
    if env.is_null() {
        return 1.0;
    }
    let magnitude = env
        .min_x
        .abs()
        .max(env.max_x.abs())
        .max(env.min_y.abs())
        .max(env.max_y.abs())
        .max(1.0);
    10f64.powi(12 - magnitude.log10().ceil() as i32)
}

/// Creates the empty result for an operation that produced no elements:
/// an atomic geometry whose dimension is determined by the operation and
/// the input dimensions, or an empty collection when undefined.
fn create_empty_result(
    op: OverlayOpCode,
    g0: &Geometry,
    g1: &Geometry,
    factory: &GeometryFactory,
) -> Geometry {
    match result_dimension(op, g0, g1) {
        0 => factory.create_empty_point(),
        1 => factory.create_empty_line_string(),
        2 => factory.create_empty_polygon(),
        _ => factory.create_geometry_collection(Vec::new()),
    }
}

fn result_dimension(op: OverlayOpCode, g0: &Geometry, g1: &Geometry) -> i32 {
    let dim0 = g0.dimension();
    let dim1 = g1.dimension();
    match op {
        OverlayOpCode::Intersection => dim0.min(dim1),
        OverlayOpCode::Union => dim0.max(dim1),
        OverlayOpCode::Difference => dim0,
        // SymDiff = Union(Diff(A, B), Diff(B, A)), and union takes the
        // dimension of its highest-dimension argument
        OverlayOpCode::SymDifference => dim0.max(dim1),
    }
}
