use serde::Serialize;
use std::fmt;

/// Physical units attached to recorded force-field parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    ElementaryCharge,
    KcalPerMol,
    Angstrom,
    KcalPerMolAngstromSq,
    KcalPerMolRadianSq,
    Degree,
    Dimensionless,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::ElementaryCharge => "e",
            Unit::KcalPerMol => "kcal/mol",
            Unit::Angstrom => "A",
            Unit::KcalPerMolAngstromSq => "kcal/(mol*A**2)",
            Unit::KcalPerMolRadianSq => "kcal/(mol*rad**2)",
            Unit::Degree => "deg",
            Unit::Dimensionless => "dimensionless",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
