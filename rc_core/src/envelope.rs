//! # Moment Envelope
//!
//! Superposes rectangular pulses (a constant ordinate over `[start, end)`)
//! into a sampled envelope curve, e.g. to sketch a design moment envelope
//! from piecewise-constant load cases.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::envelope::{envelope, Pulse, DEFAULT_SAMPLES};
//!
//! let pulses = [Pulse::new(0.0, 1.0, 10.0), Pulse::new(0.2, 0.8, 5.0)];
//! let curve = envelope(&pulses, DEFAULT_SAMPLES).unwrap();
//!
//! assert_eq!(curve.points.len(), DEFAULT_SAMPLES - 1);
//! assert_eq!(curve.max().unwrap().1, 15.0);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Number of sample points used when none is given
pub const DEFAULT_SAMPLES: usize = 500;

/// Unit step: 0 before `a`, 1 from `a` on.
pub fn step(t: f64, a: f64) -> f64 {
    if t < a {
        0.0
    } else {
        1.0
    }
}

/// Rectangular pulse of height `scale` over `[start, end)`.
pub fn pulse(t: f64, start: f64, end: f64, scale: f64) -> f64 {
    scale * (step(t, start) - step(t, end))
}

/// One rectangular pulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub start: f64,
    pub end: f64,
    /// Ordinate over the pulse (e.g., t-m)
    pub scale: f64,
}

impl Pulse {
    pub fn new(start: f64, end: f64, scale: f64) -> Self {
        Pulse { start, end, scale }
    }

    pub fn value_at(&self, t: f64) -> f64 {
        pulse(t, self.start, self.end, self.scale)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !(self.start.is_finite() && self.end.is_finite() && self.scale.is_finite()) {
            return Err(CalcError::invalid_input(
                "pulse",
                self.to_string(),
                "Pulse bounds and scale must be finite",
            ));
        }
        if self.end < self.start {
            return Err(CalcError::invalid_input(
                "pulse",
                self.to_string(),
                "Pulse end must not precede its start",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for Pulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.end, self.scale)
    }
}

/// Parses `start:end:scale`, e.g. `0.2:0.8:5`.
impl FromStr for Pulse {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let [start, end, scale] = parts.as_slice() else {
            return Err(CalcError::invalid_input(
                "pulse",
                s,
                "Expected start:end:scale",
            ));
        };
        let parse = |field: &str| {
            field
                .parse::<f64>()
                .map_err(|_| CalcError::invalid_input("pulse", s, format!("'{field}' is not a number")))
        };
        let pulse = Pulse::new(parse(start)?, parse(end)?, parse(scale)?);
        pulse.validate()?;
        Ok(pulse)
    }
}

/// A flat run of the envelope between two sample positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x_start: f64,
    pub x_end: f64,
    pub value: f64,
}

/// Sampled envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeCurve {
    /// (x, y) samples in increasing x
    pub points: Vec<(f64, f64)>,
}

impl EnvelopeCurve {
    /// Largest ordinate and the first position it occurs at.
    pub fn max(&self) -> Option<(f64, f64)> {
        self.points.iter().copied().fold(None, |best, (x, y)| match best {
            Some((_, best_y)) if best_y >= y => best,
            _ => Some((x, y)),
        })
    }

    /// Smallest ordinate and the first position it occurs at.
    pub fn min(&self) -> Option<(f64, f64)> {
        self.points.iter().copied().fold(None, |best, (x, y)| match best {
            Some((_, best_y)) if best_y <= y => best,
            _ => Some((x, y)),
        })
    }

    /// Collapse runs of equal ordinates into segments for plotting.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();
        for &(x, y) in &self.points {
            match segments.last_mut() {
                Some(last) if last.value == y => last.x_end = x,
                _ => segments.push(Segment {
                    x_start: x,
                    x_end: x,
                    value: y,
                }),
            }
        }
        segments
    }

    /// Sampled x range, `None` for an empty curve
    pub fn domain(&self) -> Option<(f64, f64)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }
}

/// Sum `pulses` over `samples` evenly spaced points spanning the smallest
/// start to the largest end; the closing endpoint is dropped, leaving
/// `samples - 1` points.
///
/// # Errors
///
/// `InvalidInput` for an empty pulse list, fewer than two samples, or a pulse
/// ending before it starts.
pub fn envelope(pulses: &[Pulse], samples: usize) -> CalcResult<EnvelopeCurve> {
    if pulses.is_empty() {
        return Err(CalcError::invalid_input(
            "pulses",
            "[]",
            "At least one pulse is required",
        ));
    }
    if samples < 2 {
        return Err(CalcError::invalid_input(
            "samples",
            samples.to_string(),
            "At least two samples are required",
        ));
    }
    for p in pulses {
        p.validate()?;
    }

    let lo = pulses.iter().map(|p| p.start).fold(f64::INFINITY, f64::min);
    let hi = pulses.iter().map(|p| p.end).fold(f64::NEG_INFINITY, f64::max);
    let spacing = (hi - lo) / (samples - 1) as f64;

    let points = (0..samples - 1)
        .map(|i| {
            let x = lo + i as f64 * spacing;
            let y = pulses.iter().map(|p| p.value_at(x)).sum();
            (x, y)
        })
        .collect();

    Ok(EnvelopeCurve { points })
}
