use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::logic::TriValue;

/// Representation of a nine-valued logic signal
///
/// The same good/faulty pair as [`FiveValue`](crate::logic::FiveValue),
/// but without the X-collapse, so mixed states like 1/X are
/// representable. Nothing in the test generation engine consumes this
/// algebra; it exists for completeness.
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
pub struct NineValue {
    good: TriValue,
    faulty: TriValue,
}

impl NineValue {
    /// Both circuits produce 1
    pub const ON: NineValue = NineValue { good: TriValue::ON, faulty: TriValue::ON };

    /// Both circuits produce 0
    pub const OFF: NineValue = NineValue { good: TriValue::OFF, faulty: TriValue::OFF };

    /// Value not yet determined in either circuit
    pub const UNKNOWN: NineValue = NineValue {
        good: TriValue::UNKNOWN,
        faulty: TriValue::UNKNOWN,
    };

    /// Fault effect D: 1/0
    pub const ON_IS_OFF: NineValue = NineValue { good: TriValue::ON, faulty: TriValue::OFF };

    /// Fault effect D′: 0/1
    pub const OFF_IS_ON: NineValue = NineValue { good: TriValue::OFF, faulty: TriValue::ON };

    /// 1/X
    pub const ON_IS_UNKNOWN: NineValue = NineValue {
        good: TriValue::ON,
        faulty: TriValue::UNKNOWN,
    };

    /// 0/X
    pub const OFF_IS_UNKNOWN: NineValue = NineValue {
        good: TriValue::OFF,
        faulty: TriValue::UNKNOWN,
    };

    /// X/1
    pub const UNKNOWN_IS_ON: NineValue = NineValue {
        good: TriValue::UNKNOWN,
        faulty: TriValue::ON,
    };

    /// X/0
    pub const UNKNOWN_IS_OFF: NineValue = NineValue {
        good: TriValue::UNKNOWN,
        faulty: TriValue::OFF,
    };

    /// Create a value from its components
    pub fn new(good: TriValue, faulty: TriValue) -> NineValue {
        NineValue { good, faulty }
    }

    /// The good-circuit component
    pub fn good(&self) -> TriValue {
        self.good
    }

    /// The faulty-circuit component
    pub fn faulty(&self) -> TriValue {
        self.faulty
    }
}

impl Not for NineValue {
    type Output = NineValue;
    fn not(self) -> NineValue {
        NineValue::new(!self.good, !self.faulty)
    }
}

impl BitAnd for NineValue {
    type Output = NineValue;
    fn bitand(self, rhs: NineValue) -> NineValue {
        NineValue::new(self.good & rhs.good, self.faulty & rhs.faulty)
    }
}

impl BitOr for NineValue {
    type Output = NineValue;
    fn bitor(self, rhs: NineValue) -> NineValue {
        NineValue::new(self.good | rhs.good, self.faulty | rhs.faulty)
    }
}

impl BitXor for NineValue {
    type Output = NineValue;
    fn bitxor(self, rhs: NineValue) -> NineValue {
        NineValue::new(self.good ^ rhs.good, self.faulty ^ rhs.faulty)
    }
}

impl fmt::Display for NineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.good, self.faulty)
    }
}

impl fmt::Debug for NineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
