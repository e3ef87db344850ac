//! # Shear Capacity
//!
//! One-way shear strength of a rectangular section with vertical stirrups,
//! and the stirrup demand for a factored shear.
//!
//! ## Equations (kgf, cm)
//!
//! - `Vc = 0.53·λ·√f'c·b·d`
//! - `Vs = Av·fys·d / s`
//! - `Vn = Vc + Vs`, design strength `φVn`
//! - Required `Vs = |Vu|/φ − Vc`
//! - Minimum `Av/s = max(0.2·√f'c·b/fys, 3.5·b/fys)`
//!
//! ## Example
//!
//! ```rust
//! use rc_core::calculations::shear::{calculate, ShearCondition, ShearInput};
//! use rc_core::materials::Material;
//! use rc_core::reinforcement::Stirrup;
//! use rc_core::section::Section;
//! use rc_core::settings::DesignSettings;
//!
//! let input = ShearInput {
//!     label: "B1 support".to_string(),
//!     section: Section::new(40.0, 60.0).unwrap(),
//!     material: Material::default(),
//!     stirrup: Stirrup::new("D13", 2, 20.0).unwrap(),
//!     cover_cm: 5.0,
//!     vu_kgf: 10_000.0,
//! };
//!
//! let result = calculate(&input, &DesignSettings::default()).unwrap();
//! assert_eq!(result.condition, ShearCondition::MinimumRequired);
//! assert!((result.design_shear_kgf - 36_583.96).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{require_non_negative, CalcError, CalcResult};
use crate::materials::Material;
use crate::reinforcement::Stirrup;
use crate::section::Section;
use crate::settings::DesignSettings;

/// Input parameters for a shear check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "B1 support",
///   "section": { "width_cm": 40.0, "height_cm": 60.0 },
///   "material": { "fc_kgf_cm2": 280.0, "fyb_kgf_cm2": 4200.0, "fys_kgf_cm2": 4200.0 },
///   "stirrup": { "size": "D13", "legs": 2, "spacing_cm": 20.0 },
///   "cover_cm": 5.0,
///   "vu_kgf": 10000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearInput {
    pub label: String,
    pub section: Section,
    pub material: Material,
    pub stirrup: Stirrup,
    /// Distance from the bottom face to the tension steel centroid, dB (cm)
    pub cover_cm: f64,
    /// Factored shear Vu (kgf); only the magnitude is used
    #[serde(default)]
    pub vu_kgf: f64,
}

impl ShearInput {
    pub fn validate(&self) -> CalcResult<()> {
        self.section.validate()?;
        self.material.validate()?;
        self.stirrup.validate()?;
        require_non_negative("cover_cm", self.cover_cm)?;
        if !self.vu_kgf.is_finite() {
            return Err(CalcError::invalid_input(
                "vu_kgf",
                self.vu_kgf.to_string(),
                "Shear demand must be finite",
            ));
        }
        if self.effective_depth_cm() <= 0.0 {
            return Err(CalcError::invalid_input(
                "cover_cm",
                self.cover_cm.to_string(),
                "Effective depth h - cover must be positive",
            ));
        }
        Ok(())
    }

    /// Effective depth d = h − dB (cm)
    pub fn effective_depth_cm(&self) -> f64 {
        self.section.height_cm - self.cover_cm
    }
}

/// Which rung of the stirrup requirement ladder the demand falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShearCondition {
    /// |Vu| ≤ φVc/2
    NotRequired,
    /// φVc/2 < |Vu| ≤ φVc
    MinimumRequired,
    /// φVc < |Vu| ≤ φ(Vc + 2.12·√f'c·b·d)
    Required,
    /// Demand exceeds what any stirrup can add; enlarge the section
    SectionInadequate,
}

impl ShearCondition {
    pub fn message(&self) -> &'static str {
        match self {
            ShearCondition::NotRequired => "Stirrup is not required",
            ShearCondition::MinimumRequired => "Minimum stirrup is required",
            ShearCondition::Required => "Stirrup is required",
            ShearCondition::SectionInadequate => "Need change section",
        }
    }
}

impl std::fmt::Display for ShearCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Shear check results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearResult {
    /// Effective depth d (cm)
    pub effective_depth_cm: f64,

    // === Strengths (kgf) ===
    pub vu_kgf: f64,
    /// Concrete contribution Vc
    pub vc_kgf: f64,
    /// Provided stirrup contribution Vs
    pub vs_kgf: f64,
    /// Nominal strength Vn
    pub vn_kgf: f64,
    pub phi: f64,
    /// Design strength φVn
    pub design_shear_kgf: f64,
    /// Stirrup contribution needed for the demand, |Vu|/φ − Vc (may be negative)
    pub vs_required_kgf: f64,

    // === Stirrups (cm²/cm) ===
    pub av_s_provided: f64,
    pub av_s_required: f64,
    pub av_s_minimum: f64,

    pub condition: ShearCondition,
    /// Maximum stirrup spacing (cm)
    pub max_spacing_cm: f64,
    /// |Vu| / φVn
    pub ratio: f64,
}

impl ShearResult {
    /// Demand within design strength and the section is large enough
    pub fn passes(&self) -> bool {
        self.ratio <= 1.0 && self.condition != ShearCondition::SectionInadequate
    }

    /// Provided stirrups meet the required Av/s
    pub fn stirrups_adequate(&self) -> bool {
        self.av_s_provided >= self.av_s_required
    }
}

/// Calculate shear strength and stirrup demand.
pub fn calculate(input: &ShearInput, settings: &DesignSettings) -> CalcResult<ShearResult> {
    input.validate()?;
    settings.validate()?;

    let material = &input.material;
    let b = input.section.width_cm;
    let d = input.effective_depth_cm();
    let fys = material.fys_kgf_cm2;
    let sqrt_fc = material.sqrt_fc();
    let phi = settings.shear.phi;
    let vu = input.vu_kgf.abs();

    let vc = 0.53 * settings.shear.vc_factor * sqrt_fc * b * d;
    let vs = input.stirrup.av_cm2() * fys * d / input.stirrup.spacing_cm;
    let vn = vs.abs() + vc;
    let design_shear = phi * vn;
    let vs_required = vu / phi - vc;

    let av_s_minimum = (0.2 * sqrt_fc * b / fys).max(3.5 * b / fys);
    let vs_limit = 2.12 * sqrt_fc * b * d;

    let condition = if vu <= phi * vc / 2.0 {
        ShearCondition::NotRequired
    } else if vu <= phi * vc {
        ShearCondition::MinimumRequired
    } else if vu <= phi * (vc + vs_limit) {
        ShearCondition::Required
    } else {
        ShearCondition::SectionInadequate
    };

    let av_s_required = match condition {
        ShearCondition::NotRequired => 0.0,
        ShearCondition::MinimumRequired => av_s_minimum,
        ShearCondition::Required | ShearCondition::SectionInadequate => {
            (vs_required / (fys * d)).max(av_s_minimum)
        }
    };

    let max_spacing = if vs_required <= 1.06 * sqrt_fc * b * d {
        (d / 2.0).min(60.0)
    } else {
        (d / 4.0).min(30.0)
    };

    let ratio = vu / design_shear;

    debug!(
        label = %input.label,
        vc_kgf = vc,
        vs_kgf = vs,
        condition = ?condition,
        ratio,
        "shear calculated"
    );

    Ok(ShearResult {
        effective_depth_cm: d,
        vu_kgf: input.vu_kgf,
        vc_kgf: vc,
        vs_kgf: vs,
        vn_kgf: vn,
        phi,
        design_shear_kgf: design_shear,
        vs_required_kgf: vs_required,
        av_s_provided: input.stirrup.av_per_spacing(),
        av_s_required,
        av_s_minimum,
        condition,
        max_spacing_cm: max_spacing,
        ratio,
    })
}

/// Shear capacity with default settings. `vu_kgf` of `None` means no demand.
pub fn design_shear_capacity(
    section: &Section,
    material: &Material,
    stirrup: &Stirrup,
    effective_cover_cm: f64,
    vu_kgf: Option<f64>,
) -> CalcResult<ShearResult> {
    let input = ShearInput {
        label: String::new(),
        section: *section,
        material: *material,
        stirrup: *stirrup,
        cover_cm: effective_cover_cm,
        vu_kgf: vu_kgf.unwrap_or(0.0),
    };
    calculate(&input, &DesignSettings::default())
}
