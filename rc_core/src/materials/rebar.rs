//! Deformed Reinforcing Bar Catalog (CNS 560)
//!
//! Nominal properties of standard deformed bars. The table is static and
//! read-only; every bar role (top, bottom, stirrup) looks its size up here.
//!
//! | Size | Area (cm²) | d_b (cm) | Weight (kg/m) | Perimeter (cm) |
//! |------|-----------:|---------:|--------------:|---------------:|
//! | D10  | 0.7133     | 0.953    | 0.560         | 3.00           |
//! | D13  | 1.2670     | 1.270    | 0.994         | 4.00           |
//! | D16  | 1.9860     | 1.590    | 1.560         | 5.00           |
//! | D19  | 2.8650     | 1.910    | 2.250         | 6.00           |
//! | D22  | 3.8710     | 2.220    | 3.040         | 7.00           |
//! | D25  | 5.0670     | 2.540    | 3.980         | 8.00           |
//! | D29  | 6.4690     | 2.870    | 5.080         | 9.00           |
//! | D32  | 8.1430     | 3.220    | 6.390         | 10.1           |
//! | D36  | 10.070     | 3.580    | 7.900         | 11.3           |
//! | D43  | 14.520     | 4.300    | 11.40         | 13.5           |
//!
//! ## Example
//!
//! ```rust
//! use rc_core::materials::BarSize;
//!
//! let bar: BarSize = "d22".parse().unwrap();
//! assert_eq!(bar, BarSize::D22);
//! assert_eq!(bar.area_cm2(), 3.871);
//! assert!("D99".parse::<BarSize>().is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};

/// Nominal properties of one bar size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarProperties {
    /// Cross-sectional area of one bar (cm²)
    pub area_cm2: f64,
    /// Nominal diameter (cm)
    pub diameter_cm: f64,
    /// Unit weight (kg/m)
    pub weight_kg_per_m: f64,
    /// Nominal perimeter (cm)
    pub perimeter_cm: f64,
}

/// Standard deformed bar designation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BarSize {
    D10,
    D13,
    D16,
    D19,
    D22,
    D25,
    D29,
    D32,
    D36,
    D43,
}

impl BarSize {
    /// All catalog sizes, smallest first
    pub const ALL: [BarSize; 10] = [
        BarSize::D10,
        BarSize::D13,
        BarSize::D16,
        BarSize::D19,
        BarSize::D22,
        BarSize::D25,
        BarSize::D29,
        BarSize::D32,
        BarSize::D36,
        BarSize::D43,
    ];

    /// Look a size up by designation ("D22", "d22", " D22 ").
    pub fn lookup(designation: &str) -> CalcResult<Self> {
        match designation.trim().to_uppercase().as_str() {
            "D10" => Ok(BarSize::D10),
            "D13" => Ok(BarSize::D13),
            "D16" => Ok(BarSize::D16),
            "D19" => Ok(BarSize::D19),
            "D22" => Ok(BarSize::D22),
            "D25" => Ok(BarSize::D25),
            "D29" => Ok(BarSize::D29),
            "D32" => Ok(BarSize::D32),
            "D36" => Ok(BarSize::D36),
            "D43" => Ok(BarSize::D43),
            _ => Err(CalcError::unknown_bar_size(designation)),
        }
    }

    /// Catalog entry for this size
    pub fn properties(&self) -> BarProperties {
        let (area_cm2, diameter_cm, weight_kg_per_m, perimeter_cm) = match self {
            BarSize::D10 => (0.7133, 0.953, 0.560, 3.00),
            BarSize::D13 => (1.2670, 1.270, 0.994, 4.00),
            BarSize::D16 => (1.9860, 1.590, 1.560, 5.00),
            BarSize::D19 => (2.8650, 1.910, 2.250, 6.00),
            BarSize::D22 => (3.8710, 2.220, 3.040, 7.00),
            BarSize::D25 => (5.0670, 2.540, 3.980, 8.00),
            BarSize::D29 => (6.4690, 2.870, 5.080, 9.00),
            BarSize::D32 => (8.1430, 3.220, 6.390, 10.1),
            BarSize::D36 => (10.070, 3.580, 7.900, 11.3),
            BarSize::D43 => (14.520, 4.300, 11.40, 13.5),
        };
        BarProperties {
            area_cm2,
            diameter_cm,
            weight_kg_per_m,
            perimeter_cm,
        }
    }

    /// Area of a single bar (cm²)
    pub fn area_cm2(&self) -> f64 {
        self.properties().area_cm2
    }

    /// Nominal bar diameter (cm)
    pub fn diameter_cm(&self) -> f64 {
        self.properties().diameter_cm
    }

    /// Unit weight (kg/m)
    pub fn weight_kg_per_m(&self) -> f64 {
        self.properties().weight_kg_per_m
    }

    /// Designation string (e.g., "D22")
    pub fn designation(&self) -> &'static str {
        match self {
            BarSize::D10 => "D10",
            BarSize::D13 => "D13",
            BarSize::D16 => "D16",
            BarSize::D19 => "D19",
            BarSize::D22 => "D22",
            BarSize::D25 => "D25",
            BarSize::D29 => "D29",
            BarSize::D32 => "D32",
            BarSize::D36 => "D36",
            BarSize::D43 => "D43",
        }
    }
}

impl FromStr for BarSize {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

impl std::fmt::Display for BarSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.designation())
    }
}
