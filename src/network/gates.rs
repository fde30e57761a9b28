use std::fmt;

use crate::logic::FiveValue;
use crate::network::LineId;

/// Basic types of logic gates
///
/// The set is closed and exhaustively matched everywhere (evaluation,
/// frontier checks, file IO, diagram rendering), so new variants are a
/// deliberate, crate-wide change.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum GateKind {
    /// N-input And gate
    And,
    /// N-input Nand gate
    Nand,
    /// N-input Or gate
    Or,
    /// N-input Nor gate
    Nor,
    /// N-input Xor gate
    Xor,
    /// N-input Xnor gate
    Xnor,
    /// Inverter
    Not,
}

impl GateKind {
    /// The input value that alone determines the gate's output
    ///
    /// Xor-like gates have no true controlling value; the returned value
    /// is an arbitrary convention.
    pub fn controlling(&self) -> FiveValue {
        use GateKind::*;
        match self {
            And | Nand => FiveValue::OFF,
            Or | Nor => FiveValue::ON,
            Xor => FiveValue::ON,
            Xnor | Not => FiveValue::OFF,
        }
    }

    /// Whether the gate inverts its controlled output
    pub fn inversion(&self) -> FiveValue {
        use GateKind::*;
        match self {
            And | Or => FiveValue::OFF,
            Nand | Nor | Xor | Xnor | Not => FiveValue::ON,
        }
    }

    /// Lowercase display name of the gate type
    pub fn name(&self) -> &'static str {
        use GateKind::*;
        match self {
            And => "and",
            Nand => "nand",
            Or => "or",
            Nor => "nor",
            Xor => "xor",
            Xnor => "xnor",
            Not => "not",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A computation node of a [`Network`](crate::network::Network)
///
/// Gates are immutable after construction; only their output line's value
/// changes during a search.
#[derive(Debug, Clone)]
pub struct Gate {
    pub(crate) kind: GateKind,
    pub(crate) inputs: Vec<LineId>,
    pub(crate) output: LineId,
    pub(crate) name: String,
}

impl Gate {
    /// The gate's function
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// The ordered input lines
    pub fn inputs(&self) -> &[LineId] {
        &self.inputs
    }

    /// The single output line
    pub fn output(&self) -> LineId {
        self.output
    }

    /// The gate's display name
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controlling_values() {
        assert!(GateKind::And.controlling().same_pair(&FiveValue::OFF));
        assert!(GateKind::Nand.controlling().same_pair(&FiveValue::OFF));
        assert!(GateKind::Or.controlling().same_pair(&FiveValue::ON));
        assert!(GateKind::Nor.controlling().same_pair(&FiveValue::ON));
        assert!(GateKind::Xor.controlling().same_pair(&FiveValue::ON));
        assert!(GateKind::Xnor.controlling().same_pair(&FiveValue::OFF));
    }

    #[test]
    fn test_inversions() {
        assert!(GateKind::And.inversion().same_pair(&FiveValue::OFF));
        assert!(GateKind::Or.inversion().same_pair(&FiveValue::OFF));
        for kind in [GateKind::Nand, GateKind::Nor, GateKind::Xor, GateKind::Xnor, GateKind::Not] {
            assert!(kind.inversion().same_pair(&FiveValue::ON));
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(GateKind::Nand.name(), "nand");
        assert_eq!(format!("{}", GateKind::Xnor), "xnor");
    }
}
