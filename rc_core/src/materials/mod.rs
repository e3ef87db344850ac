//! # Materials
//!
//! Concrete and reinforcing steel properties for strength design, plus the
//! CNS 560 deformed bar catalog.
//!
//! All strengths are in kgf/cm². The steel elastic modulus is a constant of
//! the crate, not a per-instance property.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::materials::Material;
//!
//! let mat = Material::new(280.0, 4200.0, 4200.0).unwrap();
//! assert_eq!(mat.beta1(), 0.85);
//! assert!((mat.yield_strain() - 4200.0 / 2.04e6).abs() < 1e-15);
//! ```

pub mod rebar;

pub use rebar::{BarProperties, BarSize};

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcResult};

/// Elastic modulus of reinforcing steel, Es (kgf/cm²)
pub const STEEL_MODULUS_KGF_CM2: f64 = 2.04e6;

/// Concrete and reinforcing steel strengths.
///
/// ## JSON Example
///
/// ```json
/// { "fc_kgf_cm2": 280.0, "fyb_kgf_cm2": 4200.0, "fys_kgf_cm2": 4200.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Specified concrete compressive strength f'c
    pub fc_kgf_cm2: f64,
    /// Yield strength of main (longitudinal) bars
    pub fyb_kgf_cm2: f64,
    /// Yield strength of stirrups
    pub fys_kgf_cm2: f64,
}

impl Material {
    /// Create a validated material. All strengths must be positive.
    pub fn new(fc_kgf_cm2: f64, fyb_kgf_cm2: f64, fys_kgf_cm2: f64) -> CalcResult<Self> {
        let mat = Material {
            fc_kgf_cm2,
            fyb_kgf_cm2,
            fys_kgf_cm2,
        };
        mat.validate()?;
        Ok(mat)
    }

    /// Validate strengths (fields are public, so deserialized values pass through here too).
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("fc_kgf_cm2", self.fc_kgf_cm2)?;
        require_positive("fyb_kgf_cm2", self.fyb_kgf_cm2)?;
        require_positive("fys_kgf_cm2", self.fys_kgf_cm2)?;
        Ok(())
    }

    /// Steel elastic modulus Es (kgf/cm²)
    pub fn es_kgf_cm2(&self) -> f64 {
        STEEL_MODULUS_KGF_CM2
    }

    /// Yield strain of the main bars, εy = fyb / Es
    pub fn yield_strain(&self) -> f64 {
        self.fyb_kgf_cm2 / STEEL_MODULUS_KGF_CM2
    }

    /// √f'c, the recurring term of the shear and minimum-steel provisions
    pub fn sqrt_fc(&self) -> f64 {
        self.fc_kgf_cm2.sqrt()
    }

    /// Stress block depth factor β1 for this concrete
    pub fn beta1(&self) -> f64 {
        beta1(self.fc_kgf_cm2)
    }

    /// Short description for reports (e.g., "f'c=280, fy=4200/4200 kgf/cm²")
    pub fn display_name(&self) -> String {
        format!(
            "f'c={:.0}, fy={:.0}/{:.0} kgf/cm²",
            self.fc_kgf_cm2, self.fyb_kgf_cm2, self.fys_kgf_cm2
        )
    }
}

impl Default for Material {
    fn default() -> Self {
        Material {
            fc_kgf_cm2: 280.0,
            fyb_kgf_cm2: 4200.0,
            fys_kgf_cm2: 4200.0,
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Equivalent rectangular stress block factor β1.
///
/// 0.85 up to f'c = 280 kgf/cm², reduced by 0.05 per 70 kgf/cm² above that,
/// never below 0.65.
pub fn beta1(fc_kgf_cm2: f64) -> f64 {
    (0.85 - 0.05 * (fc_kgf_cm2 - 280.0) / 70.0).clamp(0.65, 0.85)
}

/// Elastic-perfectly-plastic steel stress for a given strain (tension positive).
pub fn steel_stress(strain: f64, fy_kgf_cm2: f64) -> f64 {
    (strain * STEEL_MODULUS_KGF_CM2).clamp(-fy_kgf_cm2, fy_kgf_cm2)
}

/// Minimum flexural reinforcement ratio.
///
/// ρmin = max(0.8·√f'c / fy, 14 / fy), relaxed to 4/3 of the required ratio
/// when one is given and smaller.
pub fn minimum_steel_ratio(material: &Material, rho_required: Option<f64>) -> f64 {
    let fy = material.fyb_kgf_cm2;
    let rho_code = (0.8 * material.sqrt_fc() / fy).max(14.0 / fy);
    match rho_required {
        Some(rho_req) => rho_code.min(4.0 / 3.0 * rho_req),
        None => rho_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(210.0, 0.85; "below 280")]
    #[test_case(280.0, 0.85; "at 280")]
    #[test_case(350.0, 0.80; "350")]
    #[test_case(420.0, 0.75; "420")]
    #[test_case(560.0, 0.65; "560 hits floor")]
    #[test_case(700.0, 0.65; "700 floored")]
    fn test_beta1(fc: f64, expected: f64) {
        assert_relative_eq!(beta1(fc), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_steel_stress_elastic_and_clamped() {
        let fy = 4200.0;
        assert_relative_eq!(steel_stress(0.001, fy), 2040.0);
        assert_eq!(steel_stress(0.01, fy), 4200.0);
        assert_eq!(steel_stress(-0.01, fy), -4200.0);
        assert_eq!(steel_stress(0.0, fy), 0.0);
    }

    #[test]
    fn test_steel_stress_odd_symmetric() {
        let fy = 4200.0;
        for i in 0..=100 {
            let strain = i as f64 * 5.0e-5;
            assert_eq!(steel_stress(-strain, fy), -steel_stress(strain, fy));
            assert!(steel_stress(strain, fy).abs() <= fy);
        }
        // exactly at yield strain
        let ey = fy / STEEL_MODULUS_KGF_CM2;
        assert_relative_eq!(steel_stress(ey, fy), fy, epsilon = 1e-9);
    }

    #[test]
    fn test_material_validation() {
        assert!(Material::new(280.0, 4200.0, 4200.0).is_ok());
        assert!(Material::new(0.0, 4200.0, 4200.0).is_err());
        assert!(Material::new(280.0, -4200.0, 4200.0).is_err());
        assert!(Material::new(280.0, 4200.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_minimum_steel_ratio() {
        let mat = Material::default();
        // 14/4200 = 0.003333 governs over 0.8*sqrt(280)/4200 = 0.003187
        assert_relative_eq!(minimum_steel_ratio(&mat, None), 14.0 / 4200.0);
        // 4/3 of a small required ratio governs
        assert_relative_eq!(minimum_steel_ratio(&mat, Some(0.0015)), 0.002);

        let strong = Material::new(420.0, 4200.0, 4200.0).unwrap();
        assert_relative_eq!(
            minimum_steel_ratio(&strong, None),
            0.8 * 420.0_f64.sqrt() / 4200.0
        );
    }

    #[test]
    fn test_material_serialization() {
        let mat = Material::default();
        let json = serde_json::to_string(&mat).unwrap();
        assert!(json.contains("fc_kgf_cm2"));
        let parsed: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(mat, parsed);
    }
}
