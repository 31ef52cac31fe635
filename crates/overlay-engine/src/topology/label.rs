use planar_geom::Location;

use super::position::Position;

/// The topological location of a graph component relative to a single
/// operand. Components from lineal operands have only an On location;
/// components from polygonal operands also carry Left and Right side
/// locations. Unknown slots are `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TopologyLocation {
    Line {
        on: Option<Location>,
    },
    Area {
        on: Option<Location>,
        left: Option<Location>,
        right: Option<Location>,
    },
}

impl TopologyLocation {
    pub fn line(on: Option<Location>) -> Self {
        TopologyLocation::Line { on }
    }

    pub fn area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        TopologyLocation::Area { on, left, right }
    }

    pub fn is_area(&self) -> bool {
        matches!(self, TopologyLocation::Area { .. })
    }

    pub fn is_line(&self) -> bool {
        matches!(self, TopologyLocation::Line { .. })
    }

    pub fn get(&self, pos: Position) -> Option<Location> {
        match (self, pos) {
            (TopologyLocation::Line { on }, Position::On) => *on,
            (TopologyLocation::Line { .. }, _) => None,
            (TopologyLocation::Area { on, .. }, Position::On) => *on,
            (TopologyLocation::Area { left, .. }, Position::Left) => *left,
            (TopologyLocation::Area { right, .. }, Position::Right) => *right,
        }
    }

    pub fn set(&mut self, pos: Position, loc: Location) {
        match (&mut *self, pos) {
            (TopologyLocation::Line { on }, Position::On) => *on = Some(loc),
            (TopologyLocation::Line { .. }, _) => {
                debug_assert!(false, "side location on a line label")
            }
            (TopologyLocation::Area { on, .. }, Position::On) => *on = Some(loc),
            (TopologyLocation::Area { left, .. }, Position::Left) => *left = Some(loc),
            (TopologyLocation::Area { right, .. }, Position::Right) => *right = Some(loc),
        }
    }

    /// True when every slot is unknown.
    pub fn is_null(&self) -> bool {
        match self {
            TopologyLocation::Line { on } => on.is_none(),
            TopologyLocation::Area { on, left, right } => {
                on.is_none() && left.is_none() && right.is_none()
            }
        }
    }

    /// True when any slot is unknown.
    pub fn is_any_null(&self) -> bool {
        match self {
            TopologyLocation::Line { on } => on.is_none(),
            TopologyLocation::Area { on, left, right } => {
                on.is_none() || left.is_none() || right.is_none()
            }
        }
    }

    pub fn all_positions_equal(&self, loc: Location) -> bool {
        match self {
            TopologyLocation::Line { on } => *on == Some(loc),
            TopologyLocation::Area { on, left, right } => {
                *on == Some(loc) && *left == Some(loc) && *right == Some(loc)
            }
        }
    }

    /// Swaps the Left and Right locations (no effect on a line location).
    pub fn flip(&mut self) {
        if let TopologyLocation::Area { left, right, .. } = self {
            std::mem::swap(left, right);
        }
    }

    pub fn set_all_if_null(&mut self, loc: Location) {
        match self {
            TopologyLocation::Line { on } => {
                if on.is_none() {
                    *on = Some(loc);
                }
            }
            TopologyLocation::Area { on, left, right } => {
                for slot in [on, left, right] {
                    if slot.is_none() {
                        *slot = Some(loc);
                    }
                }
            }
        }
    }

    /// Merges another location into this one, filling only unknown slots.
    /// A line location is promoted to an area location when merging with
    /// one.
    pub fn merge(&mut self, other: &TopologyLocation) {
        if self.is_line() && other.is_area() {
            *self = TopologyLocation::area(self.get(Position::On), None, None);
        }
        match (&mut *self, other) {
            (TopologyLocation::Line { on }, _) => {
                if on.is_none() {
                    *on = other.get(Position::On);
                }
            }
            (
                TopologyLocation::Area { on, left, right },
                TopologyLocation::Area {
                    on: o_on,
                    left: o_left,
                    right: o_right,
                },
            ) => {
                if on.is_none() {
                    *on = *o_on;
                }
                if left.is_none() {
                    *left = *o_left;
                }
                if right.is_none() {
                    *right = *o_right;
                }
            }
            (TopologyLocation::Area { on, .. }, TopologyLocation::Line { on: o_on }) => {
                if on.is_none() {
                    *on = *o_on;
                }
            }
        }
    }
}

/// The topological label of a graph component relative to both overlay
/// operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    elt: [TopologyLocation; 2],
}

impl Label {
    /// A label with no information for either operand.
    pub fn empty() -> Self {
        Self {
            elt: [TopologyLocation::line(None), TopologyLocation::line(None)],
        }
    }

    /// A line label with the given On location for one operand.
    pub fn line_at(operand: usize, on: Location) -> Self {
        let mut label = Self::empty();
        label.elt[operand] = TopologyLocation::line(Some(on));
        label
    }

    /// An area label for one operand; the other operand's slot is
    /// area-sized but unknown.
    pub fn area_at(operand: usize, on: Location, left: Location, right: Location) -> Self {
        let mut label = Self {
            elt: [
                TopologyLocation::area(None, None, None),
                TopologyLocation::area(None, None, None),
            ],
        };
        label.elt[operand] = TopologyLocation::area(Some(on), Some(left), Some(right));
        label
    }

    pub fn location(&self, operand: usize, pos: Position) -> Option<Location> {
        self.elt[operand].get(pos)
    }

    pub fn on_location(&self, operand: usize) -> Option<Location> {
        self.elt[operand].get(Position::On)
    }

    pub fn set_location(&mut self, operand: usize, pos: Position, loc: Location) {
        self.elt[operand].set(pos, loc);
    }

    pub fn set_on_location(&mut self, operand: usize, loc: Location) {
        self.elt[operand].set(Position::On, loc);
    }

    /// Swaps Left and Right on both operands. Used when a component is
    /// viewed in the reverse direction.
    pub fn flip(&mut self) {
        self.elt[0].flip();
        self.elt[1].flip();
    }

    pub fn flipped(&self) -> Label {
        let mut l = *self;
        l.flip();
        l
    }

    /// Merges another label into this one, filling only unknown slots.
    pub fn merge(&mut self, other: &Label) {
        self.elt[0].merge(&other.elt[0]);
        self.elt[1].merge(&other.elt[1]);
    }

    /// Collapses the operand's location to an On-only line location
    /// (dimensional collapse).
    pub fn to_line(&mut self, operand: usize) {
        if self.elt[operand].is_area() {
            self.elt[operand] = TopologyLocation::line(self.elt[operand].get(Position::On));
        }
    }

    /// A copy with both operands collapsed to On-only line locations.
    pub fn to_line_label(&self) -> Label {
        let mut label = *self;
        label.to_line(0);
        label.to_line(1);
        label
    }

    /// True when either operand carries side locations.
    pub fn is_area(&self) -> bool {
        self.elt[0].is_area() || self.elt[1].is_area()
    }

    pub fn is_area_at(&self, operand: usize) -> bool {
        self.elt[operand].is_area()
    }

    pub fn is_line_at(&self, operand: usize) -> bool {
        self.elt[operand].is_line()
    }

    pub fn is_null(&self, operand: usize) -> bool {
        self.elt[operand].is_null()
    }

    pub fn is_any_null(&self, operand: usize) -> bool {
        self.elt[operand].is_any_null()
    }

    pub fn all_positions_equal(&self, operand: usize, loc: Location) -> bool {
        self.elt[operand].all_positions_equal(loc)
    }

    pub fn set_all_locations_if_null(&mut self, operand: usize, loc: Location) {
        self.elt[operand].set_all_if_null(loc);
    }
}
