use crate::core::models::residue::Terminus;
use serde::{Serialize, Serializer};
use std::fmt;

/// Decimals kept for partial charges.
pub const CHARGE_DECIMALS: u8 = 5;
/// Decimals kept for every other coefficient.
pub const PARAMETER_DECIMALS: u8 = 3;

/// A coefficient rounded to a fixed number of decimals, stored as a scaled
/// integer so that equal-after-rounding values compare and hash equal.
///
/// Negative values that round to zero become zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixedPoint {
    scaled: i64,
    decimals: u8,
}

impl FixedPoint {
    pub fn new(value: f64, decimals: u8) -> Self {
        let factor = 10f64.powi(decimals as i32);
        Self {
            scaled: (value * factor).round() as i64,
            decimals,
        }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn scaled(&self) -> i64 {
        self.scaled
    }

    pub fn value(&self) -> f64 {
        self.scaled as f64 / 10f64.powi(self.decimals as i32)
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.scaled < 0 { "-" } else { "" };
        let magnitude = self.scaled.unsigned_abs();
        if self.decimals == 0 {
            return write!(f, "{}{}", sign, magnitude);
        }
        let factor = 10u64.pow(self.decimals as u32);
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            magnitude / factor,
            magnitude % factor,
            width = self.decimals as usize
        )
    }
}

/// One periodic term of a proper torsion signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TorsionKey {
    pub k: FixedPoint,
    pub phase: FixedPoint,
    pub periodicity: FixedPoint,
}

impl TorsionKey {
    pub fn new(k: f64, phase: f64, periodicity: f64) -> Self {
        Self {
            k: FixedPoint::new(k, PARAMETER_DECIMALS),
            phase: FixedPoint::new(phase, PARAMETER_DECIMALS),
            periodicity: FixedPoint::new(periodicity, PARAMETER_DECIMALS),
        }
    }
}

/// Canonical key of one force-field term. Two terms belong to the same
/// cluster exactly when their signatures are equal.
///
/// The `Display` form is the cluster label: the rounded coefficients separated
/// by spaces, followed by the terminus tag for charges and the central atomic
/// number for impropers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signature {
    Charge {
        value: FixedPoint,
        terminus: Terminus,
    },
    Vdw {
        epsilon: FixedPoint,
        rmin: FixedPoint,
    },
    Bond {
        k: FixedPoint,
        length: FixedPoint,
    },
    Angle {
        k: FixedPoint,
        theta: FixedPoint,
    },
    Improper {
        k: FixedPoint,
        phase: FixedPoint,
        periodicity: FixedPoint,
        central_atomic_number: u8,
    },
    /// Every periodic term on one atom quadruple, in declaration order.
    Proper { terms: Vec<TorsionKey> },
}

impl Signature {
    pub fn charge(value: f64, terminus: Terminus) -> Self {
        Self::Charge {
            value: FixedPoint::new(value, CHARGE_DECIMALS),
            terminus,
        }
    }

    pub fn vdw(epsilon: f64, rmin: f64) -> Self {
        Self::Vdw {
            epsilon: FixedPoint::new(epsilon, PARAMETER_DECIMALS),
            rmin: FixedPoint::new(rmin, PARAMETER_DECIMALS),
        }
    }

    pub fn bond(k: f64, length: f64) -> Self {
        Self::Bond {
            k: FixedPoint::new(k, PARAMETER_DECIMALS),
            length: FixedPoint::new(length, PARAMETER_DECIMALS),
        }
    }

    pub fn angle(k: f64, theta: f64) -> Self {
        Self::Angle {
            k: FixedPoint::new(k, PARAMETER_DECIMALS),
            theta: FixedPoint::new(theta, PARAMETER_DECIMALS),
        }
    }

    pub fn improper(k: f64, phase: f64, periodicity: f64, central_atomic_number: u8) -> Self {
        Self::Improper {
            k: FixedPoint::new(k, PARAMETER_DECIMALS),
            phase: FixedPoint::new(phase, PARAMETER_DECIMALS),
            periodicity: FixedPoint::new(periodicity, PARAMETER_DECIMALS),
            central_atomic_number,
        }
    }

    /// Builds a proper torsion signature from `(k, phase, periodicity)` terms.
    pub fn proper<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64, f64)>,
    {
        Self::Proper {
            terms: terms
                .into_iter()
                .map(|(k, phase, periodicity)| TorsionKey::new(k, phase, periodicity))
                .collect(),
        }
    }

    /// Terminus tag of a charge signature.
    pub fn terminus(&self) -> Option<Terminus> {
        match self {
            Self::Charge { terminus, .. } => Some(*terminus),
            _ => None,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Charge { value, terminus } => write!(f, "{} {}", value, terminus),
            Self::Vdw { epsilon, rmin } => write!(f, "{} {}", epsilon, rmin),
            Self::Bond { k, length } => write!(f, "{} {}", k, length),
            Self::Angle { k, theta } => write!(f, "{} {}", k, theta),
            Self::Improper {
                k,
                phase,
                periodicity,
                central_atomic_number,
            } => write!(f, "{} {} {} {}", k, phase, periodicity, central_atomic_number),
            Self::Proper { terms } => {
                let mut first = true;
                for term in terms {
                    for value in [term.k, term.phase, term.periodicity] {
                        if !first {
                            f.write_str(" ")?;
                        }
                        write!(f, "{}", value)?;
                        first = false;
                    }
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
