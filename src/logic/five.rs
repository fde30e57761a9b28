use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::logic::TriValue;

/// Representation of a five-valued logic signal
///
/// A pair of the good-circuit value and the faulty-circuit value of the
/// same signal. The pair is collapsed: whenever either component is X the
/// whole value becomes X/X, leaving exactly five reachable states: 1/1,
/// 0/0, X/X, 1/0 (the fault effect D) and 0/1 (D′).
///
/// Equality and hashing compare the good-circuit component only, so
/// `ON == ON_IS_OFF` holds. This narrowing is inherited behavior that the
/// test generation engine relies on; use [`FiveValue::same_pair`] to
/// compare both components.
#[derive(Clone, Copy)]
pub struct FiveValue {
    good: TriValue,
    faulty: TriValue,
}

impl FiveValue {
    /// Both circuits produce 1
    pub const ON: FiveValue = FiveValue { good: TriValue::ON, faulty: TriValue::ON };

    /// Both circuits produce 0
    pub const OFF: FiveValue = FiveValue { good: TriValue::OFF, faulty: TriValue::OFF };

    /// Value not yet determined
    pub const UNKNOWN: FiveValue = FiveValue {
        good: TriValue::UNKNOWN,
        faulty: TriValue::UNKNOWN,
    };

    /// Fault effect D: the good circuit produces 1, the faulty circuit 0
    pub const ON_IS_OFF: FiveValue = FiveValue { good: TriValue::ON, faulty: TriValue::OFF };

    /// Fault effect D′: the good circuit produces 0, the faulty circuit 1
    pub const OFF_IS_ON: FiveValue = FiveValue { good: TriValue::OFF, faulty: TriValue::ON };

    /// Create a value from its components, collapsing X
    pub fn new(good: TriValue, faulty: TriValue) -> FiveValue {
        if good == TriValue::UNKNOWN || faulty == TriValue::UNKNOWN {
            FiveValue::UNKNOWN
        } else {
            FiveValue { good, faulty }
        }
    }

    /// The good-circuit component
    pub fn good(&self) -> TriValue {
        self.good
    }

    /// The faulty-circuit component
    pub fn faulty(&self) -> TriValue {
        self.faulty
    }

    /// Returns whether the value carries a fault effect (good ≠ faulty)
    pub fn is_sensitized(&self) -> bool {
        self.good != self.faulty
    }

    /// Compare both components, unlike `==` which compares the good one only
    pub fn same_pair(&self, other: &FiveValue) -> bool {
        self.good == other.good && self.faulty == other.faulty
    }
}

impl PartialEq for FiveValue {
    fn eq(&self, other: &FiveValue) -> bool {
        self.good == other.good
    }
}

impl Eq for FiveValue {}

impl Hash for FiveValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.good.hash(state);
    }
}

impl Not for FiveValue {
    type Output = FiveValue;
    fn not(self) -> FiveValue {
        FiveValue::new(!self.good, !self.faulty)
    }
}

impl BitAnd for FiveValue {
    type Output = FiveValue;
    fn bitand(self, rhs: FiveValue) -> FiveValue {
        FiveValue::new(self.good & rhs.good, self.faulty & rhs.faulty)
    }
}

impl BitOr for FiveValue {
    type Output = FiveValue;
    fn bitor(self, rhs: FiveValue) -> FiveValue {
        FiveValue::new(self.good | rhs.good, self.faulty | rhs.faulty)
    }
}

impl BitXor for FiveValue {
    type Output = FiveValue;
    fn bitxor(self, rhs: FiveValue) -> FiveValue {
        FiveValue::new(self.good ^ rhs.good, self.faulty ^ rhs.faulty)
    }
}

impl fmt::Display for FiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.good, self.faulty)
    }
}

impl fmt::Debug for FiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
