//! # Rectangular Section
//!
//! Gross concrete geometry of a rectangular beam section.

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcResult};

/// Rectangular beam section (cm).
///
/// ## JSON Example
///
/// ```json
/// { "width_cm": 40.0, "height_cm": 60.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section width b
    pub width_cm: f64,
    /// Overall section height h
    pub height_cm: f64,
}

impl Section {
    /// Create a validated section.
    ///
    /// ```rust
    /// use rc_core::section::Section;
    ///
    /// let sec = Section::new(40.0, 60.0).unwrap();
    /// assert_eq!(sec.gross_area_cm2(), 2400.0);
    /// assert!(Section::new(0.0, 60.0).is_err());
    /// ```
    pub fn new(width_cm: f64, height_cm: f64) -> CalcResult<Self> {
        let sec = Section { width_cm, height_cm };
        sec.validate()?;
        Ok(sec)
    }

    /// Validate geometry
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("width_cm", self.width_cm)?;
        require_positive("height_cm", self.height_cm)?;
        Ok(())
    }

    /// Gross area b·h (cm²)
    pub fn gross_area_cm2(&self) -> f64 {
        self.width_cm * self.height_cm
    }

    /// Distance from either face to mid-depth (cm)
    pub fn half_height_cm(&self) -> f64 {
        self.height_cm / 2.0
    }

    /// Short description for reports (e.g., "40 x 60 cm")
    pub fn display_name(&self) -> String {
        format!("{} x {} cm", self.width_cm, self.height_cm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_properties() {
        let sec = Section::new(40.0, 60.0).unwrap();
        assert_eq!(sec.gross_area_cm2(), 2400.0);
        assert_eq!(sec.half_height_cm(), 30.0);
        assert_eq!(sec.display_name(), "40 x 60 cm");
    }

    #[test]
    fn test_invalid_section() {
        assert!(Section::new(-40.0, 60.0).is_err());
        assert!(Section::new(40.0, 0.0).is_err());
        assert!(Section::new(f64::NAN, 60.0).is_err());
    }

    #[test]
    fn test_deserialized_section_still_validated() {
        let sec: Section = serde_json::from_str(r#"{"width_cm": 40.0, "height_cm": -1.0}"#).unwrap();
        assert!(sec.validate().is_err());
    }
}
