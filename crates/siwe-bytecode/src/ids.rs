//! Index newtypes for grammar tables.

use std::fmt;

/// Dense index of a rule in [`Grammar::rules`](crate::Grammar::rules).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub u32);

/// Dense index of a UDT in [`Grammar::udts`](crate::Grammar::udts).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UdtId(pub u32);

/// Index into the opcode list of the owning rule.
pub type OpIndex = u32;

impl RuleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl UdtId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl fmt::Display for UdtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{}", self.0)
    }
}
