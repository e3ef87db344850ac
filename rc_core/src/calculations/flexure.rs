//! # Flexural Capacity
//!
//! Nominal and design moment capacity of a doubly reinforced rectangular
//! section, found by strain compatibility at the solved neutral axis.
//!
//! ## Procedure
//!
//! 1. Solve the neutral axis depth `c` ([`neutral_axis::solve`])
//! 2. Recompute every layer's stress at `c`; sum steel force `Ps` and its
//!    moment `Ms` about mid-depth
//! 3. Concrete block `Pc = 0.85·f'c·(a·b − Asc)` acting at `a/2` below the top
//! 4. `Mn = Pc·(h/2 − a/2) + Ms`
//! 5. `φ` from the net tensile strain `εt` of the lowest layer
//!
//! ## Example
//!
//! ```rust
//! use rc_core::calculations::flexure::{calculate, FlexureInput};
//! use rc_core::materials::Material;
//! use rc_core::reinforcement::{BotBar, TopBar};
//! use rc_core::section::Section;
//! use rc_core::settings::DesignSettings;
//!
//! let input = FlexureInput {
//!     label: "B1 midspan".to_string(),
//!     section: Section::new(40.0, 60.0).unwrap(),
//!     material: Material::default(),
//!     top_bars: vec![TopBar::new(0, "D22", 6.0).unwrap()],
//!     bot_bars: vec![
//!         BotBar::new(4, "D22", 6.0).unwrap(),
//!         BotBar::new(4, "D22", 11.0).unwrap(),
//!     ],
//!     mu_kgf_cm: 20.0e5,
//!     spiral: false,
//! };
//!
//! let result = calculate(&input, &DesignSettings::default()).unwrap();
//! assert_eq!(result.phi, 0.90);
//! assert!(result.passes());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::neutral_axis::{self, force_balance, layer_state};
use crate::errors::{require_non_negative, CalcError, CalcResult};
use crate::materials::{minimum_steel_ratio, Material};
use crate::reinforcement::{steel_layers, BotBar, TopBar};
use crate::section::Section;
use crate::settings::{DesignSettings, FlexureFactors};

/// Input parameters for a flexural capacity check.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "B1 midspan",
///   "section": { "width_cm": 40.0, "height_cm": 60.0 },
///   "material": { "fc_kgf_cm2": 280.0, "fyb_kgf_cm2": 4200.0, "fys_kgf_cm2": 4200.0 },
///   "top_bars": [ { "quantity": 2, "size": "D22", "distance_cm": 6.0 } ],
///   "bot_bars": [ { "quantity": 4, "size": "D22", "distance_cm": 6.0 } ],
///   "mu_kgf_cm": 2000000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexureInput {
    /// User label (e.g., "B1 midspan")
    pub label: String,

    pub section: Section,

    pub material: Material,

    /// Compression-side groups, measured from the top face
    #[serde(default)]
    pub top_bars: Vec<TopBar>,

    /// Tension-side groups, measured from the bottom face
    #[serde(default)]
    pub bot_bars: Vec<BotBar>,

    /// Factored moment demand Mu (kgf·cm)
    #[serde(default)]
    pub mu_kgf_cm: f64,

    /// Spiral transverse reinforcement (raises the compression-controlled φ)
    #[serde(default)]
    pub spiral: bool,
}

impl FlexureInput {
    /// Validate geometry, materials, bar placement and demand.
    pub fn validate(&self) -> CalcResult<()> {
        self.section.validate()?;
        self.material.validate()?;
        require_non_negative("mu_kgf_cm", self.mu_kgf_cm)?;

        let h = self.section.height_cm;
        let distances = self
            .top_bars
            .iter()
            .map(|b| ("top_bars.distance_cm", b.distance_cm))
            .chain(self.bot_bars.iter().map(|b| ("bot_bars.distance_cm", b.distance_cm)));
        for (field, distance) in distances {
            require_non_negative(field, distance)?;
            if distance > h {
                return Err(CalcError::invalid_input(
                    field,
                    distance.to_string(),
                    format!("Bar lies outside the {h} cm section height"),
                ));
            }
        }

        let total = self.top_steel_area_cm2() + self.bottom_steel_area_cm2();
        if total <= 0.0 {
            return Err(CalcError::invalid_input(
                "bars",
                total.to_string(),
                "At least one bar group with a non-zero quantity is required",
            ));
        }
        Ok(())
    }

    /// Total compression-side steel (cm²)
    pub fn top_steel_area_cm2(&self) -> f64 {
        self.top_bars.iter().map(TopBar::area_cm2).sum()
    }

    /// Total tension-side steel (cm²)
    pub fn bottom_steel_area_cm2(&self) -> f64 {
        self.bot_bars.iter().map(BotBar::area_cm2).sum()
    }

    /// Longitudinal steel weight per metre of beam (kg/m)
    pub fn steel_weight_kg_per_m(&self) -> f64 {
        self.top_bars.iter().map(TopBar::weight_kg_per_m).sum::<f64>()
            + self.bot_bars.iter().map(BotBar::weight_kg_per_m).sum::<f64>()
    }

    fn layer_labels(&self) -> Vec<String> {
        self.top_bars
            .iter()
            .map(|b| format!("Top {}", b.label()))
            .chain(self.bot_bars.iter().map(|b| format!("Bot {}", b.label())))
            .collect()
    }
}

/// Strain regime of the section at nominal strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionClass {
    /// εt ≥ 0.005
    TensionControlled,
    /// εy < εt < 0.005
    Transition,
    /// εt ≤ εy
    CompressionControlled,
}

impl SectionClass {
    pub fn classify(tensile_strain: f64, yield_strain: f64, factors: &FlexureFactors) -> Self {
        if tensile_strain >= factors.tension_controlled_strain {
            SectionClass::TensionControlled
        } else if tensile_strain <= yield_strain {
            SectionClass::CompressionControlled
        } else {
            SectionClass::Transition
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SectionClass::TensionControlled => "Tension-controlled",
            SectionClass::Transition => "Transition",
            SectionClass::CompressionControlled => "Compression-controlled",
        }
    }
}

/// One steel group at the solved neutral axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerResult {
    /// Group description (e.g., "Bot 4-D22 @ 6 cm")
    pub label: String,
    pub area_cm2: f64,
    /// Signed position from mid-depth (cm)
    pub y_cm: f64,
    /// Depth below the compression face (cm)
    pub depth_cm: f64,
    /// Tension positive
    pub strain: f64,
    /// Tension positive (kgf/cm²)
    pub stress_kgf_cm2: f64,
    /// Compression positive (kgf)
    pub force_kgf: f64,
    pub in_compression_block: bool,
}

/// Flexural capacity results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexureResult {
    // === Neutral axis ===
    /// Neutral axis depth c (cm)
    pub neutral_axis_depth_cm: f64,
    /// Stress block depth a = β1·c (cm)
    pub block_depth_cm: f64,
    pub beta1: f64,

    // === Strain state ===
    /// Net tensile strain of the lowest layer, εt
    pub extreme_tension_strain: f64,
    /// Yield strain of the main bars, εy
    pub yield_strain: f64,
    pub section_class: SectionClass,
    /// Strength reduction factor φ
    pub phi: f64,

    // === Resultants ===
    /// Concrete block force Pc (kgf)
    pub concrete_force_kgf: f64,
    /// Net steel force Ps, compression positive (kgf)
    pub steel_force_kgf: f64,
    /// Moment of steel forces about mid-depth Ms (kgf·cm)
    pub steel_moment_kgf_cm: f64,

    // === Capacity ===
    /// Nominal moment Mn (kgf·cm)
    pub nominal_moment_kgf_cm: f64,
    /// Design moment φMn (kgf·cm)
    pub design_moment_kgf_cm: f64,
    /// Demand Mu (kgf·cm)
    pub mu_kgf_cm: f64,
    /// Mu / φMn, zero when there is no demand
    pub ratio: f64,

    // === Detailing ===
    /// Depth to the lowest layer (cm)
    pub effective_depth_cm: f64,
    /// Tension steel ratio ρ = As / (b·d)
    pub steel_ratio: f64,
    /// Code minimum ρmin
    pub minimum_steel_ratio: f64,

    pub layers: Vec<LayerResult>,
}

impl FlexureResult {
    /// Demand within design capacity
    pub fn passes(&self) -> bool {
        self.ratio <= 1.0
    }

    /// Tension steel at or above the code minimum
    pub fn meets_minimum_steel(&self) -> bool {
        self.steel_ratio >= self.minimum_steel_ratio
    }
}

/// Strength reduction factor for flexure from the net tensile strain.
///
/// In the transition zone φ rises linearly from the compression-controlled
/// value by `phi_transition_span`. With the default factors a spiral section
/// reaches 0.95 just below the tension-controlled limit and then drops to
/// 0.90, so φ is discontinuous at εt = 0.005 for spiral sections.
///
/// ```rust
/// use rc_core::calculations::flexure::strength_reduction_factor;
/// use rc_core::settings::FlexureFactors;
///
/// let factors = FlexureFactors::default();
/// assert_eq!(strength_reduction_factor(0.006, 0.00206, false, &factors), 0.90);
/// assert_eq!(strength_reduction_factor(0.001, 0.00206, false, &factors), 0.65);
/// assert_eq!(strength_reduction_factor(0.001, 0.00206, true, &factors), 0.70);
/// ```
pub fn strength_reduction_factor(
    tensile_strain: f64,
    yield_strain: f64,
    spiral: bool,
    factors: &FlexureFactors,
) -> f64 {
    let phi_c = if spiral {
        factors.phi_compression_spiral
    } else {
        factors.phi_compression_tied
    };
    let limit = factors.tension_controlled_strain;

    match SectionClass::classify(tensile_strain, yield_strain, factors) {
        SectionClass::TensionControlled => factors.phi_tension,
        SectionClass::CompressionControlled => phi_c,
        SectionClass::Transition => {
            phi_c + factors.phi_transition_span * (tensile_strain - yield_strain) / (limit - yield_strain)
        }
    }
}

/// Calculate the flexural capacity of a section.
///
/// # Errors
///
/// * `InvalidInput` - bad geometry, material, bar placement or demand, or a
///   non-positive design capacity against a non-zero demand
/// * `SolverDidNotConverge` - no neutral axis within the section
pub fn calculate(input: &FlexureInput, settings: &DesignSettings) -> CalcResult<FlexureResult> {
    input.validate()?;
    settings.validate()?;

    let section = &input.section;
    let material = &input.material;
    let h = section.height_cm;
    let eps_c = settings.concrete_ultimate_strain;

    let layers = steel_layers(h, &input.top_bars, &input.bot_bars);
    let c = neutral_axis::solve(section, material, &layers, settings)?;

    let balance = force_balance(section, material, &layers, c, eps_c);
    let a = balance.block_depth_cm;
    let nominal_moment =
        balance.concrete_force_kgf * (h / 2.0 - a / 2.0) + balance.steel_moment_kgf_cm;

    let layer_results: Vec<LayerResult> = layers
        .iter()
        .zip(input.layer_labels())
        .map(|(layer, label)| {
            let state = layer_state(layer, section, material, c, eps_c);
            LayerResult {
                label,
                area_cm2: state.area_cm2,
                y_cm: state.y_cm,
                depth_cm: state.depth_cm,
                strain: state.strain,
                stress_kgf_cm2: state.stress_kgf_cm2,
                force_kgf: state.force_kgf,
                in_compression_block: state.in_compression_block,
            }
        })
        .collect();

    // Lowest bar actually carrying steel; validation guarantees one exists
    let lowest = layer_results
        .iter()
        .filter(|l| l.area_cm2 > 0.0)
        .min_by(|x, y| x.y_cm.total_cmp(&y.y_cm))
        .ok_or_else(|| CalcError::calculation_failed("Flexure", "No reinforcement layer found"))?;
    let effective_depth = lowest.depth_cm;
    let tensile_strain = lowest.strain;
    if effective_depth <= 0.0 || !effective_depth.is_finite() {
        return Err(CalcError::invalid_input(
            "effective_depth_cm",
            effective_depth.to_string(),
            "Degenerate geometry: lowest reinforcement is not below the compression face",
        ));
    }

    let yield_strain = material.yield_strain();
    let section_class = SectionClass::classify(tensile_strain, yield_strain, &settings.flexure);
    let phi = strength_reduction_factor(tensile_strain, yield_strain, input.spiral, &settings.flexure);
    let design_moment = phi * nominal_moment;

    let ratio = if input.mu_kgf_cm == 0.0 {
        0.0
    } else if design_moment <= 0.0 {
        return Err(CalcError::invalid_input(
            "design_moment_kgf_cm",
            design_moment.to_string(),
            "Section has no positive design moment capacity",
        ));
    } else {
        input.mu_kgf_cm / design_moment
    };

    let steel_ratio = input.bottom_steel_area_cm2() / (section.width_cm * effective_depth);
    let rho_min = minimum_steel_ratio(material, None);
    if steel_ratio < rho_min {
        warn!(
            label = %input.label,
            steel_ratio,
            minimum = rho_min,
            "tension steel below code minimum"
        );
    }

    debug!(
        label = %input.label,
        depth_cm = c,
        tensile_strain,
        phi,
        design_moment_kgf_cm = design_moment,
        "flexure calculated"
    );

    Ok(FlexureResult {
        neutral_axis_depth_cm: c,
        block_depth_cm: a,
        beta1: material.beta1(),
        extreme_tension_strain: tensile_strain,
        yield_strain,
        section_class,
        phi,
        concrete_force_kgf: balance.concrete_force_kgf,
        steel_force_kgf: balance.steel_force_kgf,
        steel_moment_kgf_cm: balance.steel_moment_kgf_cm,
        nominal_moment_kgf_cm: nominal_moment,
        design_moment_kgf_cm: design_moment,
        mu_kgf_cm: input.mu_kgf_cm,
        ratio,
        effective_depth_cm: effective_depth,
        steel_ratio,
        minimum_steel_ratio: rho_min,
        layers: layer_results,
    })
}

/// Design moment capacity with default settings and tied transverse steel.
///
/// `mu_kgf_cm` of `None` means no demand (ratio 0).
pub fn design_moment_capacity(
    section: &Section,
    material: &Material,
    top_bars: &[TopBar],
    bot_bars: &[BotBar],
    mu_kgf_cm: Option<f64>,
) -> CalcResult<FlexureResult> {
    let input = FlexureInput {
        label: String::new(),
        section: *section,
        material: *material,
        top_bars: top_bars.to_vec(),
        bot_bars: bot_bars.to_vec(),
        mu_kgf_cm: mu_kgf_cm.unwrap_or(0.0),
        spiral: false,
    };
    calculate(&input, &DesignSettings::default())
}
