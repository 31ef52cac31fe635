use planar_geom::Coordinate;
use thiserror::Error;

/// The single failure kind of the overlay engine, raised when a robustness
/// or topology problem prevents a correct result: a noding failure, an
/// unassignable free hole, an invalid edge ring, or a side-location
/// conflict while labelling. Carries the offending coordinate when known.
///
/// All other input anomalies (empty operands, degenerate rings) are normal
/// inputs with well-defined results, not errors.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TopologyError {
    message: String,
    pub coordinate: Option<Coordinate>,
}

impl TopologyError {
    pub fn new(message: impl Into<String>, coordinate: Option<Coordinate>) -> Self {
        let base = message.into();
        let message = match &coordinate {
            Some(c) => format!("{base} [ {c} ]"),
            None => base,
        };
        Self {
            message,
            coordinate,
        }
    }

    pub fn at(message: impl Into<String>, coordinate: Coordinate) -> Self {
        Self::new(message, Some(coordinate))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_includes_coordinate() {
        let err = TopologyError::at("unable to assign free hole to a shell", Coordinate::new(1.0, 2.0));
        assert_eq!(
            err.to_string(),
            "unable to assign free hole to a shell [ (1, 2) ]"
        );
        let plain = TopologyError::new("found non-noded intersection", None);
        assert_eq!(plain.to_string(), "found non-noded intersection");
    }
}
