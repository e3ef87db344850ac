//! # Section Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input, settings) -> CalcResult<*Result>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`neutral_axis`] - Force-balance neutral axis solver
//! - [`flexure`] - Moment capacity by strain compatibility
//! - [`shear`] - Concrete and stirrup shear strength

pub mod flexure;
pub mod neutral_axis;
pub mod shear;

pub use flexure::{design_moment_capacity, FlexureInput, FlexureResult, SectionClass};
pub use shear::{design_shear_capacity, ShearCondition, ShearInput, ShearResult};
