//! # Neutral Axis Solver
//!
//! Finds the depth `c` of the neutral axis below the extreme compression
//! fiber at which the axial forces on a layered section balance.
//!
//! ## Model
//!
//! - Linear strain profile with εc at the compression face
//! - Equivalent rectangular stress block of depth `a = β1·c` at 0.85·f'c
//! - Elastic-perfectly-plastic steel, tension positive
//! - Steel inside the stress block displaces its own area of concrete
//!
//! ```text
//!            εc
//!   ┌────────┐───  compression face
//!   │////////│  a = β1·c     0.85·f'c
//!   │        │─── c ─────── ε = 0
//!   │   ●●●  │  εs = εc·(d − c)/c
//!   └────────┘
//! ```
//!
//! The net axial force `F(c) = Cc + Ts` is negative (net tension) for small
//! `c` and grows with `c`, except for a step down wherever the stress block
//! reaches a bar. The root is taken at the first sign change, so both solver
//! methods work inside the same depth increment.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::calculations::neutral_axis::solve;
//! use rc_core::materials::Material;
//! use rc_core::reinforcement::SteelLayer;
//! use rc_core::section::Section;
//! use rc_core::settings::DesignSettings;
//!
//! let section = Section::new(40.0, 60.0).unwrap();
//! let material = Material::default();
//! let layers = [SteelLayer { area_cm2: 15.484, y_cm: -24.0 }];
//!
//! let c = solve(&section, &material, &layers, &DesignSettings::default()).unwrap();
//! assert!(c > 0.0 && c < 60.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{steel_stress, Material};
use crate::reinforcement::SteelLayer;
use crate::section::Section;
use crate::settings::{DesignSettings, SolverMethod};

/// Concrete stress block intensity factor (0.85·f'c)
const BLOCK_INTENSITY: f64 = 0.85;

/// Strain, stress and force of one steel layer at a trial depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerState {
    /// Signed position from mid-depth (cm)
    pub y_cm: f64,
    /// Depth below the compression face (cm)
    pub depth_cm: f64,
    /// Steel area (cm²)
    pub area_cm2: f64,
    /// Steel strain, tension positive
    pub strain: f64,
    /// Steel stress, tension positive (kgf/cm²)
    pub stress_kgf_cm2: f64,
    /// Axial force contributed to the section, compression positive (kgf)
    pub force_kgf: f64,
    /// Whether the layer lies inside the compression block
    pub in_compression_block: bool,
}

/// Resultant forces on the section at one trial neutral axis depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceBalance {
    /// Trial neutral axis depth c (cm)
    pub depth_cm: f64,
    /// Stress block depth a = β1·c (cm)
    pub block_depth_cm: f64,
    /// Concrete compression Cc = 0.85·f'c·(a·b − Asc) (kgf)
    pub concrete_force_kgf: f64,
    /// Net steel force, compression positive (kgf)
    pub steel_force_kgf: f64,
    /// Moment of the steel forces about mid-depth (kgf·cm)
    pub steel_moment_kgf_cm: f64,
    /// Steel area inside the compression block, Asc (cm²)
    pub displaced_area_cm2: f64,
    /// Cc + Ts (kgf)
    pub net_force_kgf: f64,
}

/// State of one layer at trial depth `depth_cm`. `depth_cm` must be positive.
pub fn layer_state(
    layer: &SteelLayer,
    section: &Section,
    material: &Material,
    depth_cm: f64,
    concrete_strain: f64,
) -> LayerState {
    let block_depth = material.beta1() * depth_cm;
    let d = layer.depth_cm(section.height_cm);
    let strain = concrete_strain * (d - depth_cm) / depth_cm;
    let stress = steel_stress(strain, material.fyb_kgf_cm2);
    LayerState {
        y_cm: layer.y_cm,
        depth_cm: d,
        area_cm2: layer.area_cm2,
        strain,
        stress_kgf_cm2: stress,
        force_kgf: -stress * layer.area_cm2,
        in_compression_block: d < block_depth,
    }
}

/// Resultant forces at trial depth `depth_cm`. `depth_cm` must be positive.
pub fn force_balance(
    section: &Section,
    material: &Material,
    layers: &[SteelLayer],
    depth_cm: f64,
    concrete_strain: f64,
) -> ForceBalance {
    let block_depth = material.beta1() * depth_cm;

    let mut steel_force = 0.0;
    let mut steel_moment = 0.0;
    let mut displaced_area = 0.0;
    for layer in layers {
        let state = layer_state(layer, section, material, depth_cm, concrete_strain);
        steel_force += state.force_kgf;
        steel_moment += state.force_kgf * state.y_cm;
        if state.in_compression_block {
            displaced_area += state.area_cm2;
        }
    }

    let concrete_force =
        BLOCK_INTENSITY * material.fc_kgf_cm2 * (block_depth * section.width_cm - displaced_area);

    ForceBalance {
        depth_cm,
        block_depth_cm: block_depth,
        concrete_force_kgf: concrete_force,
        steel_force_kgf: steel_force,
        steel_moment_kgf_cm: steel_moment,
        displaced_area_cm2: displaced_area,
        net_force_kgf: concrete_force + steel_force,
    }
}

/// Solve for the neutral axis depth c (cm).
///
/// # Errors
///
/// * `InvalidInput` - empty layer list, no steel area, invalid geometry, or
///   a degenerate (non-positive) root
/// * `SolverDidNotConverge` - net force never turns positive within the section
pub fn solve(
    section: &Section,
    material: &Material,
    layers: &[SteelLayer],
    settings: &DesignSettings,
) -> CalcResult<f64> {
    section.validate()?;
    material.validate()?;
    settings.validate()?;
    validate_layers(section, layers)?;

    let depth = match settings.solver.method {
        SolverMethod::Scan => solve_scan(section, material, layers, settings),
        SolverMethod::Bisection => solve_bisection(section, material, layers, settings),
    }?;

    if !depth.is_finite() || depth <= f64::EPSILON * section.height_cm {
        return Err(CalcError::invalid_input(
            "neutral_axis_depth",
            depth.to_string(),
            "Degenerate geometry: neutral axis collapsed onto the compression face",
        ));
    }
    Ok(depth)
}

fn validate_layers(section: &Section, layers: &[SteelLayer]) -> CalcResult<()> {
    if layers.is_empty() {
        return Err(CalcError::invalid_input(
            "layers",
            "[]",
            "At least one reinforcement layer is required",
        ));
    }
    for layer in layers {
        if !layer.area_cm2.is_finite() || layer.area_cm2 < 0.0 || !layer.y_cm.is_finite() {
            return Err(CalcError::invalid_input(
                "layers",
                format!("{{ area_cm2: {}, y_cm: {} }}", layer.area_cm2, layer.y_cm),
                "Layer area must be non-negative and positions finite",
            ));
        }
    }
    let total: f64 = layers.iter().map(|l| l.area_cm2).sum();
    if total <= 0.0 {
        return Err(CalcError::invalid_input(
            "layers",
            total.to_string(),
            "Total reinforcement area must be positive",
        ));
    }
    // Steel at or above the compression face is compressed at every depth
    let has_tension_side = layers
        .iter()
        .any(|l| l.area_cm2 > 0.0 && l.depth_cm(section.height_cm) > 0.0);
    if !has_tension_side {
        return Err(CalcError::invalid_input(
            "layers",
            format!("{} layer(s)", layers.len()),
            "Degenerate geometry: no reinforcement below the compression face",
        ));
    }
    Ok(())
}

/// Net force as c → 0⁺, with no concrete. Layers below the compression
/// face yield in tension, layers above it yield in compression, and a layer
/// on the face sits at -εc.
fn initial_net_force(
    section: &Section,
    material: &Material,
    layers: &[SteelLayer],
    concrete_strain: f64,
) -> f64 {
    let fy = material.fyb_kgf_cm2;
    layers
        .iter()
        .map(|l| {
            let d = l.depth_cm(section.height_cm);
            let stress = if d > 0.0 {
                fy
            } else if d < 0.0 {
                -fy
            } else {
                steel_stress(-concrete_strain, fy)
            };
            -stress * l.area_cm2
        })
        .sum()
}

/// Increment bracketing the first sign change of the net force.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    step: usize,
    lower_cm: f64,
    lower_force_kgf: f64,
    upper_cm: f64,
    upper_force_kgf: f64,
}

/// Walk the section in equal increments until the net force turns positive.
fn first_bracket(
    section: &Section,
    material: &Material,
    layers: &[SteelLayer],
    settings: &DesignSettings,
) -> CalcResult<Bracket> {
    let steps = settings.solver.increments;
    let eps_c = settings.concrete_ultimate_strain;
    let h = section.height_cm;

    let mut c_prev = 0.0;
    let mut f_prev = initial_net_force(section, material, layers, eps_c);

    // i starts at 1: c = 0 is never evaluated
    for i in 1..=steps {
        let c = i as f64 * h / steps as f64;
        let f = force_balance(section, material, layers, c, eps_c).net_force_kgf;
        trace!(step = i, depth_cm = c, net_force_kgf = f, "scan step");

        if f > 0.0 {
            debug!(step = i, lower_cm = c_prev, upper_cm = c, "neutral axis bracketed");
            return Ok(Bracket {
                step: i,
                lower_cm: c_prev,
                lower_force_kgf: f_prev,
                upper_cm: c,
                upper_force_kgf: f,
            });
        }
        c_prev = c;
        f_prev = f;
    }

    debug!(steps, last_net_force_kgf = f_prev, "scan found no sign change");
    Err(CalcError::SolverDidNotConverge {
        steps,
        last_depth_cm: c_prev,
        last_net_force_kgf: f_prev,
    })
}

fn solve_scan(
    section: &Section,
    material: &Material,
    layers: &[SteelLayer],
    settings: &DesignSettings,
) -> CalcResult<f64> {
    let b = first_bracket(section, material, layers, settings)?;
    let root = b.lower_cm
        + (0.0 - b.lower_force_kgf) / (b.upper_force_kgf - b.lower_force_kgf)
            * (b.upper_cm - b.lower_cm);
    debug!(step = b.step, depth_cm = root, "scan interpolated");
    Ok(root)
}

/// Bisection inside the scan's bracket, so both methods settle on the same
/// crossing when the net force steps down past a compression bar. The two
/// roots lie within one increment of each other.
fn solve_bisection(
    section: &Section,
    material: &Material,
    layers: &[SteelLayer],
    settings: &DesignSettings,
) -> CalcResult<f64> {
    let eps_c = settings.concrete_ultimate_strain;
    let bracket = first_bracket(section, material, layers, settings)?;

    let mut lo = bracket.lower_cm;
    let mut hi = bracket.upper_cm;
    let mut iterations = 0;
    while iterations < settings.solver.max_iterations && hi - lo >= settings.solver.tolerance_cm {
        let mid = 0.5 * (lo + hi);
        let f = force_balance(section, material, layers, mid, eps_c).net_force_kgf;
        trace!(iteration = iterations, depth_cm = mid, net_force_kgf = f, "bisection step");
        if f > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
        iterations += 1;
    }

    let root = 0.5 * (lo + hi);
    debug!(iterations, depth_cm = root, "bisection converged");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reinforcement::{steel_layers, BotBar, TopBar};
    use crate::settings::SolverSettings;
    use approx::assert_relative_eq;

    fn demo_layers() -> (Section, Material, Vec<SteelLayer>) {
        let section = Section::new(40.0, 60.0).unwrap();
        let material = Material::default();
        let top = [TopBar::new(0, "D22", 6.0).unwrap()];
        let bot = [
            BotBar::new(4, "D22", 6.0).unwrap(),
            BotBar::new(4, "D22", 11.0).unwrap(),
        ];
        let layers = steel_layers(section.height_cm, &top, &bot);
        (section, material, layers)
    }

    fn bisection_settings() -> DesignSettings {
        DesignSettings {
            solver: SolverSettings {
                method: SolverMethod::Bisection,
                ..SolverSettings::default()
            },
            ..DesignSettings::default()
        }
    }

    #[test]
    fn test_documented_example_depth() {
        let (section, material, layers) = demo_layers();
        let c = solve(&section, &material, &layers, &DesignSettings::default()).unwrap();
        assert_relative_eq!(c, 16.073356401384086, max_relative = 1e-9);
    }

    #[test]
    fn test_equilibrium_at_root() {
        let (section, material, layers) = demo_layers();
        let c = solve(&section, &material, &layers, &bisection_settings()).unwrap();
        let balance = force_balance(&section, &material, &layers, c, 0.003);
        // residual well below one bar's yield force
        assert!(balance.net_force_kgf.abs() < 1.0, "residual {}", balance.net_force_kgf);
    }

    #[test]
    fn test_scan_and_bisection_agree() {
        let (section, material, layers) = demo_layers();
        let scan = solve(&section, &material, &layers, &DesignSettings::default()).unwrap();
        let bisect = solve(&section, &material, &layers, &bisection_settings()).unwrap();
        assert!((scan - bisect).abs() < 0.1, "scan {scan} vs bisection {bisect}");

        let top = [TopBar::new(2, "D22", 6.0).unwrap()];
        let bot = [
            BotBar::new(5, "D25", 6.0).unwrap(),
            BotBar::new(5, "D25", 12.0).unwrap(),
        ];
        let layers = steel_layers(60.0, &top, &bot);
        let scan = solve(&section, &material, &layers, &DesignSettings::default()).unwrap();
        let bisect = solve(&section, &material, &layers, &bisection_settings()).unwrap();
        assert!((scan - bisect).abs() < 0.1, "scan {scan} vs bisection {bisect}");
    }

    #[test]
    fn test_bisection_follows_first_crossing() {
        // Heavy top steel makes the net force step down as the block passes it
        let section = Section::new(25.0, 75.0).unwrap();
        let material = Material::default();
        let top = [TopBar::new(7, "D29", 7.0).unwrap()];
        let bot = [BotBar::new(5, "D22", 6.0).unwrap()];
        let layers = steel_layers(75.0, &top, &bot);

        let scan = solve(&section, &material, &layers, &DesignSettings::default()).unwrap();
        let bisect = solve(&section, &material, &layers, &bisection_settings()).unwrap();
        assert_relative_eq!(scan, 8.517899432333058, max_relative = 1e-6);
        assert!((scan - bisect).abs() < 0.1, "scan {scan} vs bisection {bisect}");
    }

    #[test]
    fn test_scan_and_bisection_share_increment() {
        let material = Material::default();
        for (width, height) in [(25.0, 60.0), (30.0, 90.0)] {
            let section = Section::new(width, height).unwrap();
            let increment = height / 100.0;
            for top_qty in 0..=8 {
                for bot_qty in 1..=8 {
                    let top = [TopBar::new(top_qty, "D36", 7.0).unwrap()];
                    let bot = [BotBar::new(bot_qty, "D29", 6.0).unwrap()];
                    let layers = steel_layers(height, &top, &bot);
                    let (Ok(scan), Ok(bisect)) = (
                        solve(&section, &material, &layers, &DesignSettings::default()),
                        solve(&section, &material, &layers, &bisection_settings()),
                    ) else {
                        continue;
                    };
                    assert!(
                        (scan - bisect).abs() <= increment,
                        "{top_qty} top / {bot_qty} bottom: scan {scan} vs bisection {bisect}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_steel_only_at_compression_face_rejected() {
        let section = Section::new(40.0, 60.0).unwrap();
        let material = Material::default();
        let at_face = [SteelLayer { area_cm2: 7.742, y_cm: 30.0 }];
        let above = [SteelLayer { area_cm2: 7.742, y_cm: 35.0 }];

        for layers in [&at_face[..], &above[..]] {
            for settings in [DesignSettings::default(), bisection_settings()] {
                let err = solve(&section, &material, layers, &settings).unwrap_err();
                assert_eq!(err.error_code(), "INVALID_INPUT");
            }
        }
    }

    #[test]
    fn test_seed_counts_face_steel_in_compression() {
        let section = Section::new(40.0, 60.0).unwrap();
        let material = Material::default();
        let layers = [
            SteelLayer { area_cm2: 7.742, y_cm: 30.0 },
            SteelLayer { area_cm2: 15.484, y_cm: -24.0 },
        ];
        // Face layer at -0.003 strain: 6120 clamps to the 4200 yield stress
        let seed = initial_net_force(&section, &material, &layers, 0.003);
        assert_relative_eq!(seed, 4200.0 * 7.742 - 4200.0 * 15.484, max_relative = 1e-12);

        let c = solve(&section, &material, &layers, &DesignSettings::default()).unwrap();
        let fb = force_balance(&section, &material, &layers, c, 0.003);
        assert!(c > 0.0 && c < 60.0);
        assert!(fb.net_force_kgf.is_finite());
    }

    #[test]
    fn test_first_increment_crossing_gives_positive_depth() {
        // A single D10 balances inside the first 0.6 cm increment
        let section = Section::new(40.0, 60.0).unwrap();
        let material = Material::default();
        let layers = [SteelLayer { area_cm2: 0.7133, y_cm: -25.0 }];
        let c = solve(&section, &material, &layers, &DesignSettings::default()).unwrap();
        assert!(c > 0.0 && c < 0.6);
        assert_relative_eq!(c, 0.37022491349480974, max_relative = 1e-9);
    }

    #[test]
    fn test_no_sign_change_is_reported() {
        // Layer below the section with more tension than the whole block can resist
        let section = Section::new(40.0, 60.0).unwrap();
        let material = Material::default();
        let layers = [SteelLayer { area_cm2: 1000.0, y_cm: -60.0 }];

        let err = solve(&section, &material, &layers, &DesignSettings::default()).unwrap_err();
        match err {
            CalcError::SolverDidNotConverge {
                steps,
                last_depth_cm,
                last_net_force_kgf,
            } => {
                assert_eq!(steps, 100);
                assert_relative_eq!(last_depth_cm, 60.0);
                assert_relative_eq!(last_net_force_kgf, -2_574_480.0, max_relative = 1e-9);
            }
            other => panic!("unexpected error {other:?}"),
        }

        let err = solve(&section, &material, &layers, &bisection_settings()).unwrap_err();
        assert_eq!(err.error_code(), "SOLVER_DID_NOT_CONVERGE");
    }

    #[test]
    fn test_empty_or_zero_area_layers_rejected() {
        let section = Section::new(40.0, 60.0).unwrap();
        let material = Material::default();
        let settings = DesignSettings::default();

        let err = solve(&section, &material, &[], &settings).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let zero = [SteelLayer { area_cm2: 0.0, y_cm: -24.0 }];
        let err = solve(&section, &material, &zero, &settings).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let nan = [SteelLayer { area_cm2: f64::NAN, y_cm: -24.0 }];
        assert!(solve(&section, &material, &nan, &settings).is_err());
    }

    #[test]
    fn test_layer_state_signs() {
        let (section, material, layers) = demo_layers();
        let c = 16.0;
        let top = layer_state(&layers[0], &section, &material, c, 0.003);
        let bot = layer_state(&layers[1], &section, &material, c, 0.003);

        // top bar above the neutral axis is compressed and pushes
        assert!(top.strain < 0.0);
        assert_eq!(top.depth_cm, 6.0);
        // bottom bar is in tension and has yielded
        assert!(bot.strain > material.yield_strain());
        assert_eq!(bot.stress_kgf_cm2, 4200.0);
        assert!(bot.force_kgf < 0.0);
        assert!(!bot.in_compression_block);
    }

    #[test]
    fn test_force_balance_components() {
        let (section, material, layers) = demo_layers();
        let fb = force_balance(&section, &material, &layers, 20.0, 0.003);
        assert_relative_eq!(fb.block_depth_cm, 17.0, max_relative = 1e-12);
        assert_relative_eq!(fb.concrete_force_kgf, 0.85 * 280.0 * 17.0 * 40.0, max_relative = 1e-12);
        assert_relative_eq!(
            fb.net_force_kgf,
            fb.concrete_force_kgf + fb.steel_force_kgf
        );
        assert_eq!(fb.displaced_area_cm2, 0.0);
    }

    /// Deterministic sweep over sections, materials and layouts.
    ///
    /// The gross force (net force plus the concrete displaced by steel inside
    /// the block) never decreases with depth; the net force only steps down
    /// where the block passes a bar.
    #[test]
    fn test_net_force_monotonic_sweep() {
        let bottoms = [("D16", 2), ("D22", 4), ("D29", 8), ("D36", 12)];
        let mut checked = 0;
        for width in [25.0, 40.0] {
            for height in [45.0, 60.0, 90.0] {
                for fc in [210.0, 280.0, 420.0, 560.0] {
                    for fy in [2800.0, 4200.0] {
                        for top_qty in [0, 2, 4] {
                            for (size, qty) in bottoms {
                                let section = Section::new(width, height).unwrap();
                                let material = Material::new(fc, fy, fy).unwrap();
                                let top = [TopBar::new(top_qty, "D19", 5.0).unwrap()];
                                let bot = [
                                    BotBar::new(qty, size, 6.0).unwrap(),
                                    BotBar::new(qty / 2, size, 12.0).unwrap(),
                                ];
                                let layers = steel_layers(height, &top, &bot);

                                let mut prev: Option<ForceBalance> = None;
                                for i in 1..=100 {
                                    let c = i as f64 * height / 100.0;
                                    let fb = force_balance(&section, &material, &layers, c, 0.003);
                                    if let Some(p) = prev {
                                        let gross = |b: &ForceBalance| {
                                            b.net_force_kgf
                                                + 0.85 * fc * b.displaced_area_cm2
                                        };
                                        assert!(gross(&fb) >= gross(&p), "gross force fell at c={c}");
                                        if fb.displaced_area_cm2 == p.displaced_area_cm2 {
                                            assert!(
                                                fb.net_force_kgf >= p.net_force_kgf,
                                                "net force fell at c={c}"
                                            );
                                        }
                                        checked += 1;
                                    }
                                    prev = Some(fb);
                                }
                            }
                        }
                    }
                }
            }
        }
        assert!(checked > 50_000);
    }

    #[test]
    fn test_solver_is_deterministic() {
        let (section, material, layers) = demo_layers();
        let settings = DesignSettings::default();
        let a = solve(&section, &material, &layers, &settings).unwrap();
        let b = solve(&section, &material, &layers, &settings).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
