//! # Text Reports
//!
//! Fixed-width console summaries of flexure and shear results, in the
//! presentation units engineers read them in (tf, tf-m, kN-m, cm²/m).
//!
//! ```text
//! --------------------------------------------------------------------
//! c        =               16.073 cm
//! est      =               0.0071
//! phi      =                0.900
//! Mn       =               58.099 tf-m
//! phiMn    =               52.289 tf-m
//! phiMn    =              512.776 kN-m
//! Mu       =               20.000 tf-m
//! ratio    =                0.382
//! ```

use std::fmt;

use crate::calculations::{FlexureResult, ShearResult};
use crate::units::{Kgf, KgfCm, KnM, SqCmPerCm, SqCmPerM, Tf, TfM};

const RULE: &str = "--------------------------------------------------------------------";

fn tf_m(kgf_cm: f64) -> f64 {
    TfM::from(KgfCm(kgf_cm)).0
}

fn kn_m(kgf_cm: f64) -> f64 {
    KnM::from(TfM::from(KgfCm(kgf_cm))).0
}

fn tf(kgf: f64) -> f64 {
    Tf::from(Kgf(kgf)).0
}

impl fmt::Display for FlexureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "c        = {:20.3} cm", self.neutral_axis_depth_cm)?;
        writeln!(f, "est      = {:20.4}", self.extreme_tension_strain)?;
        writeln!(f, "phi      = {:20.3}", self.phi)?;
        writeln!(f, "Mn       = {:20.3} tf-m", tf_m(self.nominal_moment_kgf_cm))?;
        writeln!(f, "phiMn    = {:20.3} tf-m", tf_m(self.design_moment_kgf_cm))?;
        writeln!(f, "phiMn    = {:20.3} kN-m", kn_m(self.design_moment_kgf_cm))?;
        writeln!(f, "Mu       = {:20.3} tf-m", tf_m(self.mu_kgf_cm))?;
        writeln!(f, "ratio    = {:20.3}", self.ratio)
    }
}

impl fmt::Display for ShearResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let av_s_req = SqCmPerM::from(SqCmPerCm(self.av_s_required)).0;
        writeln!(f, "{RULE}")?;
        writeln!(f, "msg      =   {}", self.condition.message())?;
        writeln!(f, "Vu       =   {:20.3} tf", tf(self.vu_kgf))?;
        writeln!(f, "Vc       =   {:20.3} tf", tf(self.vc_kgf))?;
        writeln!(f, "Vs       =   {:20.3} tf", tf(self.vs_kgf))?;
        writeln!(f, "phiVn    =   {:20.3} tf", tf(self.design_shear_kgf))?;
        writeln!(f, "Av/S_req =   {:20.3} cm2/m", av_s_req)?;
        writeln!(f, "ratio    =   {:20.3}", self.ratio)?;
        writeln!(f, "S_max    =   {:20.3}", self.max_spacing_cm)
    }
}

/// One-line capacity summary, e.g. `phiMn= 52.289 tf-m`.
pub fn flexure_summary(result: &FlexureResult) -> String {
    format!("phiMn= {:.3} tf-m", tf_m(result.design_moment_kgf_cm))
}

/// One-line capacity summary, e.g. `phiVn= 36.584 tf`.
pub fn shear_summary(result: &ShearResult) -> String {
    format!("phiVn= {:.3} tf", tf(result.design_shear_kgf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{design_moment_capacity, design_shear_capacity};
    use crate::materials::Material;
    use crate::reinforcement::{BotBar, Stirrup, TopBar};
    use crate::section::Section;

    fn flexure() -> FlexureResult {
        design_moment_capacity(
            &Section::new(40.0, 60.0).unwrap(),
            &Material::default(),
            &[TopBar::new(0, "D22", 6.0).unwrap()],
            &[
                BotBar::new(4, "D22", 6.0).unwrap(),
                BotBar::new(4, "D22", 11.0).unwrap(),
            ],
            Some(20.0e5),
        )
        .unwrap()
    }

    fn shear() -> ShearResult {
        design_shear_capacity(
            &Section::new(40.0, 60.0).unwrap(),
            &Material::default(),
            &Stirrup::new("D13", 2, 20.0).unwrap(),
            5.0,
            Some(10_000.0),
        )
        .unwrap()
    }

    #[test]
    fn test_flexure_report_layout() {
        let text = flexure().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], format!("c        = {:>20} cm", "16.073"));
        assert_eq!(lines[3], format!("phi      = {:>20}", "0.900"));
        assert_eq!(lines[5], format!("phiMn    = {:>20} tf-m", "52.289"));
        assert_eq!(lines[6], format!("phiMn    = {:>20} kN-m", "512.776"));
        assert_eq!(lines[7], format!("Mu       = {:>20} tf-m", "20.000"));
        assert_eq!(lines[8], format!("ratio    = {:>20}", "0.382"));
    }

    #[test]
    fn test_shear_report_layout() {
        let text = shear().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[1], "msg      =   Minimum stirrup is required");
        assert_eq!(lines[3], format!("Vc       =   {:>20} tf", "19.511"));
        assert_eq!(lines[5], format!("phiVn    =   {:>20} tf", "36.584"));
        assert_eq!(lines[6], format!("Av/S_req =   {:>20} cm2/m", "3.333"));
        assert_eq!(lines[8], format!("S_max    =   {:>20}", "27.500"));
    }

    #[test]
    fn test_summaries() {
        assert_eq!(flexure_summary(&flexure()), "phiMn= 52.289 tf-m");
        assert_eq!(shear_summary(&shear()), "phiVn= 36.584 tf");
    }
}
