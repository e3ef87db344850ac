//! # rc_core - Reinforced Concrete Section Design Engine
//!
//! `rc_core` checks rectangular reinforced concrete beam sections for
//! flexure and shear by strength design, in kgf and cm. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use rc_core::{design_moment_capacity, design_shear_capacity};
//! use rc_core::{BotBar, Material, Section, Stirrup, TopBar};
//!
//! let section = Section::new(40.0, 60.0).unwrap();
//! let material = Material::new(280.0, 4200.0, 4200.0).unwrap();
//!
//! let shear = design_shear_capacity(
//!     &section,
//!     &material,
//!     &Stirrup::new("D13", 2, 20.0).unwrap(),
//!     5.0,
//!     Some(10_000.0),
//! )
//! .unwrap();
//! println!("phiVn = {:.3} tf", shear.design_shear_kgf / 1000.0);
//!
//! let flexure = design_moment_capacity(
//!     &section,
//!     &material,
//!     &[TopBar::new(0, "D22", 6.0).unwrap()],
//!     &[BotBar::new(4, "D22", 6.0).unwrap(), BotBar::new(4, "D22", 11.0).unwrap()],
//!     Some(20.0e5),
//! )
//! .unwrap();
//! println!("{flexure}");
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Neutral axis solver, flexure and shear checks
//! - [`materials`] - Concrete/steel properties and the rebar catalog
//! - [`section`] / [`reinforcement`] - Geometry and bar groups
//! - [`settings`] - Code factors and solver controls
//! - [`envelope`] - Pulse superposition for moment envelopes
//! - [`report`] / [`pdf`] - Text and PDF reports
//! - [`units`] - Presentation unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod envelope;
pub mod errors;
pub mod materials;
pub mod pdf;
pub mod reinforcement;
pub mod report;
pub mod section;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{
    design_moment_capacity, design_shear_capacity, FlexureInput, FlexureResult, ShearInput,
    ShearResult,
};
pub use errors::{CalcError, CalcResult};
pub use materials::{BarSize, Material};
pub use reinforcement::{BotBar, SteelLayer, Stirrup, TopBar};
pub use section::Section;
pub use settings::DesignSettings;
