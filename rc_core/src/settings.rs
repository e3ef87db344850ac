//! # Design Settings
//!
//! Code constants and solver controls shared by every calculation. The
//! defaults reproduce the strength-design provisions the engine is built
//! around; a JSON file may override any subset of them.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "solver": { "method": "Bisection", "tolerance_cm": 1e-6 },
//!   "shear": { "vc_factor": 0.85 }
//! }
//! ```
//!
//! Omitted fields keep their defaults.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::settings::{DesignSettings, SolverMethod};
//!
//! let settings = DesignSettings::from_json(r#"{ "solver": { "method": "Bisection" } }"#).unwrap();
//! assert_eq!(settings.solver.method, SolverMethod::Bisection);
//! assert_eq!(settings.solver.increments, 100);
//! assert_eq!(settings.shear.phi, 0.75);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcError, CalcResult};

/// Root settings container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Design code reference printed on reports
    pub code: String,

    /// Ultimate concrete compressive strain at the extreme fiber, εc
    pub concrete_ultimate_strain: f64,

    /// Neutral axis solver controls
    pub solver: SolverSettings,

    /// Flexural strength reduction factors
    pub flexure: FlexureFactors,

    /// Shear provisions
    pub shear: ShearFactors,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            code: "ACI 318 strength design (CNS 560 bars)".to_string(),
            concrete_ultimate_strain: 0.003,
            solver: SolverSettings::default(),
            flexure: FlexureFactors::default(),
            shear: ShearFactors::default(),
        }
    }
}

impl DesignSettings {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let settings: DesignSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let settings = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "loaded design settings");
        Ok(settings)
    }

    /// Validate every factor.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("concrete_ultimate_strain", self.concrete_ultimate_strain)?;
        self.solver.validate()?;
        self.flexure.validate()?;
        self.shear.validate()?;
        Ok(())
    }
}

/// How the neutral axis depth is searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SolverMethod {
    /// Fixed-increment scan over the section height with linear interpolation
    #[default]
    Scan,
    /// Bisection on the sign of the net axial force
    Bisection,
}

/// Neutral axis solver controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub method: SolverMethod,
    /// Number of equal depth increments for [`SolverMethod::Scan`]
    pub increments: usize,
    /// Bracket width at which bisection stops (cm)
    pub tolerance_cm: f64,
    /// Iteration cap for bisection
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            method: SolverMethod::Scan,
            increments: 100,
            tolerance_cm: 1.0e-6,
            max_iterations: 200,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if self.increments == 0 {
            return Err(CalcError::invalid_input(
                "solver.increments",
                "0",
                "At least one scan increment is required",
            ));
        }
        if self.max_iterations == 0 {
            return Err(CalcError::invalid_input(
                "solver.max_iterations",
                "0",
                "At least one bisection iteration is required",
            ));
        }
        require_positive("solver.tolerance_cm", self.tolerance_cm)
    }
}

/// Flexural strength reduction factors and strain limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexureFactors {
    /// φ for tension-controlled sections
    pub phi_tension: f64,
    /// φ for compression-controlled sections with tied transverse steel
    pub phi_compression_tied: f64,
    /// φ for compression-controlled sections with spiral transverse steel
    pub phi_compression_spiral: f64,
    /// Net tensile strain at and above which a section is tension-controlled
    pub tension_controlled_strain: f64,
    /// Rise of φ across the transition zone
    pub phi_transition_span: f64,
}

impl Default for FlexureFactors {
    fn default() -> Self {
        FlexureFactors {
            phi_tension: 0.90,
            phi_compression_tied: 0.65,
            phi_compression_spiral: 0.70,
            tension_controlled_strain: 0.005,
            phi_transition_span: 0.25,
        }
    }
}

impl FlexureFactors {
    pub fn validate(&self) -> CalcResult<()> {
        require_unit_factor("flexure.phi_tension", self.phi_tension)?;
        require_unit_factor("flexure.phi_compression_tied", self.phi_compression_tied)?;
        require_unit_factor("flexure.phi_compression_spiral", self.phi_compression_spiral)?;
        require_positive("flexure.tension_controlled_strain", self.tension_controlled_strain)?;
        require_positive("flexure.phi_transition_span", self.phi_transition_span)
    }
}

/// Shear strength reduction factor and concrete contribution modifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShearFactors {
    /// φ for shear
    pub phi: f64,
    /// Multiplier on the 0.53·√f'c concrete term (e.g., λ for lightweight concrete)
    pub vc_factor: f64,
}

impl Default for ShearFactors {
    fn default() -> Self {
        ShearFactors {
            phi: 0.75,
            vc_factor: 1.0,
        }
    }
}

impl ShearFactors {
    pub fn validate(&self) -> CalcResult<()> {
        require_unit_factor("shear.phi", self.phi)?;
        require_positive("shear.vc_factor", self.vc_factor)
    }
}

fn require_unit_factor(field: &str, value: f64) -> CalcResult<()> {
    require_positive(field, value)?;
    if value > 1.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Strength reduction factors cannot exceed 1.0",
        ));
    }
    Ok(())
}
