//! # Unit Types
//!
//! Type-safe wrappers for the units used in reports. All calculations run in
//! a single consistent force-length system; these wrappers only exist to make
//! presentation conversions explicit.
//!
//! ## Base System (calculations)
//!
//! - Length: centimetres (cm)
//! - Force: kilogram-force (kgf)
//! - Stress: kgf/cm²
//! - Moment: kgf·cm
//!
//! ## Presentation Units
//!
//! - Force: tonne-force (tf = 1000 kgf)
//! - Moment: tf·m (= 100 000 kgf·cm), kN·m
//! - Reinforcement density: cm²/m
//!
//! ## Example
//!
//! ```rust
//! use rc_core::units::{KgfCm, TfM, KnM};
//!
//! let mn = KgfCm(2_000_000.0);
//! let tfm: TfM = mn.into();
//! assert_eq!(tfm.0, 20.0);
//!
//! let knm: KnM = tfm.into();
//! assert!((knm.0 - 196.132).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

/// Standard gravity used for kgf to newton conversion (m/s²)
pub const GRAVITY: f64 = 9.8066;

// ============================================================================
// Force Units
// ============================================================================

/// Force in kilogram-force
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kgf(pub f64);

/// Force in tonne-force (1 tf = 1000 kgf)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tf(pub f64);

impl From<Kgf> for Tf {
    fn from(kgf: Kgf) -> Self {
        Tf(kgf.0 / 1000.0)
    }
}

impl From<Tf> for Kgf {
    fn from(tf: Tf) -> Self {
        Kgf(tf.0 * 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kgf·cm
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgfCm(pub f64);

/// Moment in tf·m (1 tf·m = 100 000 kgf·cm)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TfM(pub f64);

/// Moment in kN·m
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnM(pub f64);

impl From<KgfCm> for TfM {
    fn from(m: KgfCm) -> Self {
        TfM(m.0 / 100_000.0)
    }
}

impl From<TfM> for KgfCm {
    fn from(m: TfM) -> Self {
        KgfCm(m.0 * 100_000.0)
    }
}

impl From<TfM> for KnM {
    fn from(m: TfM) -> Self {
        KnM(m.0 * GRAVITY)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Reinforcement area per unit length, cm²/cm (the calculation unit of Av/s)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqCmPerCm(pub f64);

/// Reinforcement area per metre, cm²/m (the reporting unit of Av/s)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqCmPerM(pub f64);

impl From<SqCmPerCm> for SqCmPerM {
    fn from(a: SqCmPerCm) -> Self {
        SqCmPerM(a.0 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moment_conversions() {
        let tfm: TfM = KgfCm(5_228_889.6).into();
        assert_relative_eq!(tfm.0, 52.288896, epsilon = 1e-9);

        let back: KgfCm = TfM(20.0).into();
        assert_eq!(back.0, 2_000_000.0);

        let knm: KnM = TfM(1.0).into();
        assert_relative_eq!(knm.0, GRAVITY);
    }

    #[test]
    fn test_force_conversions() {
        let tf: Tf = Kgf(36_583.96).into();
        assert_relative_eq!(tf.0, 36.58396, epsilon = 1e-12);

        let kgf: Kgf = Tf(10.0).into();
        assert_eq!(kgf.0, 10_000.0);
    }

    #[test]
    fn test_area_density_conversion() {
        let per_m: SqCmPerM = SqCmPerCm(0.0333).into();
        assert_relative_eq!(per_m.0, 3.33, epsilon = 1e-12);
    }

    #[test]
    fn test_serialization() {
        let m = TfM(12.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "12.5");

        let roundtrip: TfM = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
