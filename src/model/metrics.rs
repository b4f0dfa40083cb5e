use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Raw sums for one ballot category over a set of mesas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMetrics {
    /// Registered voters
    pub padron: i64,
    /// Valid votes
    pub validos: i64,
    /// Ballots cast (valid + null + blank)
    pub emitidos: i64,
    /// Votes received by the selected party
    pub recibidos: i64,
}

impl RawMetrics {
    pub const ZERO: RawMetrics = RawMetrics {
        padron: 0,
        validos: 0,
        emitidos: 0,
        recibidos: 0,
    };

    pub fn new(padron: i64, validos: i64, emitidos: i64, recibidos: i64) -> Self {
        Self {
            padron,
            validos,
            emitidos,
            recibidos,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for RawMetrics {
    type Output = RawMetrics;

    fn add(self, rhs: RawMetrics) -> RawMetrics {
        RawMetrics {
            padron: self.padron + rhs.padron,
            validos: self.validos + rhs.validos,
            emitidos: self.emitidos + rhs.emitidos,
            recibidos: self.recibidos + rhs.recibidos,
        }
    }
}

impl AddAssign for RawMetrics {
    fn add_assign(&mut self, rhs: RawMetrics) {
        *self = *self + rhs;
    }
}

impl Sum for RawMetrics {
    fn sum<I: Iterator<Item = RawMetrics>>(iter: I) -> RawMetrics {
        iter.fold(RawMetrics::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a RawMetrics> for RawMetrics {
    fn sum<I: Iterator<Item = &'a RawMetrics>>(iter: I) -> RawMetrics {
        iter.copied().sum()
    }
}
