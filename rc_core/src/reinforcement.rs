//! # Reinforcement Groups
//!
//! Longitudinal bar groups and transverse stirrups. Each role is a plain
//! struct; all of them read bar properties from the [`BarSize`] catalog.
//!
//! ## Sign Convention
//!
//! Layer positions `y` are measured from mid-depth, positive toward the top
//! (compression) face:
//!
//! ```text
//!   top face   ───────────  y = +h/2
//!     TopBar ● dT below top        y = +(h/2 − dT)
//!   mid-depth ───────────  y = 0
//!     BotBar ● dB above bottom     y = −(h/2 − dB)
//!   bottom face ──────────  y = −h/2
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rc_core::reinforcement::{BotBar, Stirrup};
//!
//! let bot = BotBar::new(4, "D22", 6.0).unwrap();
//! assert!((bot.area_cm2() - 15.484).abs() < 1e-9);
//! assert_eq!(bot.y_cm(60.0), -24.0);
//!
//! let stirrup = Stirrup::new("D13", 2, 20.0).unwrap();
//! assert!((stirrup.av_cm2() - 2.534).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::materials::BarSize;

/// A group of identical bars at one depth, measured from the top face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopBar {
    /// Number of bars (zero is allowed as a placeholder)
    pub quantity: u32,
    /// Bar designation
    pub size: BarSize,
    /// Distance from the top face to the bar centroid, dT (cm)
    pub distance_cm: f64,
}

/// A group of identical bars at one depth, measured from the bottom face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotBar {
    /// Number of bars (zero is allowed as a placeholder)
    pub quantity: u32,
    /// Bar designation
    pub size: BarSize,
    /// Distance from the bottom face to the bar centroid, dB (cm)
    pub distance_cm: f64,
}

/// Closed stirrup set at a constant spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stirrup {
    /// Bar designation
    pub size: BarSize,
    /// Number of vertical legs crossing a shear crack
    pub legs: u32,
    /// Longitudinal spacing s (cm)
    pub spacing_cm: f64,
}

macro_rules! impl_bar_group {
    ($type:ident, $face:literal) => {
        impl $type {
            #[doc = concat!("Create a group of `quantity` bars located `distance_cm` from the ", $face, " face.")]
            pub fn new(quantity: u32, size: &str, distance_cm: f64) -> CalcResult<Self> {
                let group = $type {
                    quantity,
                    size: BarSize::lookup(size)?,
                    distance_cm,
                };
                group.validate()?;
                Ok(group)
            }

            /// Same as [`Self::new`] with an already parsed size
            pub fn with_size(quantity: u32, size: BarSize, distance_cm: f64) -> CalcResult<Self> {
                let group = $type {
                    quantity,
                    size,
                    distance_cm,
                };
                group.validate()?;
                Ok(group)
            }

            /// Validate the distance from the near face
            pub fn validate(&self) -> CalcResult<()> {
                require_non_negative("distance_cm", self.distance_cm)
            }

            /// Total steel area of the group (cm²)
            pub fn area_cm2(&self) -> f64 {
                f64::from(self.quantity) * self.size.area_cm2()
            }

            /// Total steel weight of the group per metre of beam (kg/m)
            pub fn weight_kg_per_m(&self) -> f64 {
                f64::from(self.quantity) * self.size.weight_kg_per_m()
            }

            /// Depth of the bar centroid below the top (compression) face (cm)
            pub fn depth_from_top_cm(&self, height_cm: f64) -> f64 {
                height_cm / 2.0 - self.y_cm(height_cm)
            }

            /// Short label, e.g. "4-D22 @ 6 cm"
            pub fn label(&self) -> String {
                format!("{}-{} @ {} cm", self.quantity, self.size, self.distance_cm)
            }
        }
    };
}

impl_bar_group!(TopBar, "top");
impl_bar_group!(BotBar, "bottom");

impl TopBar {
    /// Signed position from mid-depth, +(h/2 − dT)
    pub fn y_cm(&self, height_cm: f64) -> f64 {
        height_cm / 2.0 - self.distance_cm
    }
}

impl BotBar {
    /// Signed position from mid-depth, −(h/2 − dB)
    pub fn y_cm(&self, height_cm: f64) -> f64 {
        -(height_cm / 2.0 - self.distance_cm)
    }
}

impl Stirrup {
    /// Create a stirrup set.
    pub fn new(size: &str, legs: u32, spacing_cm: f64) -> CalcResult<Self> {
        let stirrup = Stirrup {
            size: BarSize::lookup(size)?,
            legs,
            spacing_cm,
        };
        stirrup.validate()?;
        Ok(stirrup)
    }

    /// Validate leg count and spacing
    pub fn validate(&self) -> CalcResult<()> {
        if self.legs == 0 {
            return Err(CalcError::invalid_input(
                "legs",
                "0",
                "A stirrup needs at least one leg",
            ));
        }
        require_positive("spacing_cm", self.spacing_cm)
    }

    /// Total leg area Av crossing a crack (cm²)
    pub fn av_cm2(&self) -> f64 {
        f64::from(self.legs) * self.size.area_cm2()
    }

    /// Provided Av/s (cm²/cm)
    pub fn av_per_spacing(&self) -> f64 {
        self.av_cm2() / self.spacing_cm
    }

    /// Short label, e.g. "D13 x2 @ 20 cm"
    pub fn label(&self) -> String {
        format!("{} x{} @ {} cm", self.size, self.legs, self.spacing_cm)
    }
}

/// One line of steel as the neutral axis solver sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteelLayer {
    /// Total steel area (cm²)
    pub area_cm2: f64,
    /// Signed position from mid-depth, positive toward the compression face (cm)
    pub y_cm: f64,
}

impl SteelLayer {
    /// Depth below the compression face (cm)
    pub fn depth_cm(&self, height_cm: f64) -> f64 {
        height_cm / 2.0 - self.y_cm
    }
}

/// Flatten top and bottom groups into solver layers, top groups first.
pub fn steel_layers(height_cm: f64, top_bars: &[TopBar], bot_bars: &[BotBar]) -> Vec<SteelLayer> {
    let top = top_bars.iter().map(|bar| SteelLayer {
        area_cm2: bar.area_cm2(),
        y_cm: bar.y_cm(height_cm),
    });
    let bot = bot_bars.iter().map(|bar| SteelLayer {
        area_cm2: bar.area_cm2(),
        y_cm: bar.y_cm(height_cm),
    });
    top.chain(bot).collect()
}
