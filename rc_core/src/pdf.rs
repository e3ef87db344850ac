//! # PDF Generation Module
//!
//! Generates design reports from section calculations using Typst.
//!
//! ## Architecture
//!
//! - The page setup is an embedded template; per-item sections are built
//!   with string formatting before compilation
//! - Only fonts bundled with `typst-assets` are used, so no system or
//!   repository font files are needed
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use rc_core::calculations::{shear, ShearInput};
//! use rc_core::materials::Material;
//! use rc_core::pdf::{render_design_pdf, ReportItem, ReportMeta};
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
//! let result = shear::calculate(&input, &DesignSettings::default()).unwrap();
//!
//! let meta = ReportMeta::new("Demo", "J. Engineer", "26-001");
//! let pdf = render_design_pdf(&[ReportItem::Shear(&input, &result)], &meta).unwrap();
//! std::fs::write("design.pdf", pdf).unwrap();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::{FlexureInput, FlexureResult, ShearInput, ShearResult};
use crate::envelope::EnvelopeCurve;
use crate::errors::{CalcError, CalcResult};
use crate::settings::DesignSettings;
use crate::units::{Kgf, KgfCm, KnM, SqCmPerCm, SqCmPerM, Tf, TfM};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Report Content
// ============================================================================

/// Title block information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub title: String,
    pub engineer: String,
    pub job_id: String,
    /// Code reference shown in the title block
    pub code: String,
}

impl ReportMeta {
    pub fn new(title: impl Into<String>, engineer: impl Into<String>, job_id: impl Into<String>) -> Self {
        ReportMeta {
            title: title.into(),
            engineer: engineer.into(),
            job_id: job_id.into(),
            code: DesignSettings::default().code,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

/// One section of the report.
#[derive(Debug, Clone, Copy)]
pub enum ReportItem<'a> {
    Flexure(&'a FlexureInput, &'a FlexureResult),
    Shear(&'a ShearInput, &'a ShearResult),
    Envelope(&'a str, &'a EnvelopeCurve),
}

const PAGE_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2.5cm, bottom: 2.5cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[RC Section Design]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 10pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Reinforced Concrete Beam Design]
    #v(4pt)
    #text(size: 14pt)[{{TITLE}}]
  ]
]

#v(12pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Project Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      row-gutter: 4pt,
      [Engineer:], [{{ENGINEER}}],
      [Job ID:], [{{JOB_ID}}],
      [Date:], [{{DATE}}],
    )
  ],
  [
    *Code Reference*
    #v(4pt)
    {{CODE}}
  ]
)
"##;

const FOOTER_NOTE: &str = r##"
#v(24pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)
#text(size: 9pt, fill: gray)[
  Units: kgf, cm. Calculations should be verified by a licensed professional engineer.
]
"##;

fn tf_m(kgf_cm: f64) -> f64 {
    TfM::from(KgfCm(kgf_cm)).0
}

fn tf(kgf: f64) -> f64 {
    Tf::from(Kgf(kgf)).0
}

/// Build the Typst source for a report without compiling it.
pub fn report_source(items: &[ReportItem<'_>], meta: &ReportMeta) -> String {
    let date = Utc::now().format("%Y-%m-%d").to_string();
    let mut source = PAGE_TEMPLATE
        .replace("{{TITLE}}", &escape_typst(&meta.title))
        .replace("{{ENGINEER}}", &escape_typst(&meta.engineer))
        .replace("{{JOB_ID}}", &escape_typst(&meta.job_id))
        .replace("{{CODE}}", &escape_typst(&meta.code))
        .replace("{{DATE}}", &date);

    for (i, item) in items.iter().enumerate() {
        source.push_str("\n#v(16pt)\n#line(length: 100%, stroke: 0.5pt)\n#v(8pt)\n");
        match item {
            ReportItem::Flexure(input, result) => source.push_str(&flexure_section(i + 1, input, result)),
            ReportItem::Shear(input, result) => source.push_str(&shear_section(i + 1, input, result)),
            ReportItem::Envelope(label, curve) => source.push_str(&envelope_section(i + 1, label, curve)),
        }
    }

    source.push_str(FOOTER_NOTE);
    source
}

/// Render a design report to PDF.
///
/// # Errors
///
/// `Internal` if Typst compilation or PDF export fails.
pub fn render_design_pdf(items: &[ReportItem<'_>], meta: &ReportMeta) -> CalcResult<Vec<u8>> {
    let source = report_source(items, meta);
    tracing::debug!(items = items.len(), bytes = source.len(), "compiling report");

    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    Ok(pdf_bytes)
}

fn status_banner(passes: bool, detail: &str) -> String {
    let (fill, headline) = if passes {
        ("#d4edda", "DESIGN ADEQUATE")
    } else {
        ("#f8d7da", "DESIGN INADEQUATE")
    };
    format!(
        r##"
#v(12pt)
#align(center)[
  #block(width: auto, fill: rgb("{fill}"), inset: 14pt, radius: 4pt)[
    #text(size: 14pt, weight: "bold")[{headline}]
    #v(4pt)
    #text(size: 11pt)[{detail}]
  ]
]
"##,
        detail = escape_typst(detail),
    )
}

fn flexure_section(number: usize, input: &FlexureInput, result: &FlexureResult) -> String {
    let layer_rows: String = result
        .layers
        .iter()
        .map(|l| {
            format!(
                "  [{}], [{:.3}], [{:.2}], [{:.5}], [{:.0}], [{:.3}],\n",
                escape_typst(&l.label),
                l.area_cm2,
                l.depth_cm,
                l.strain,
                l.stress_kgf_cm2,
                tf(l.force_kgf),
            )
        })
        .collect();

    let detail = format!(
        "{} | ratio = {:.3}",
        result.section_class.display_name(),
        result.ratio
    );

    format!(
        r##"
== Flexure {number}: {label}

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Parameter*], [*Value*], [*Unit*]),
  [Section b x h], [{section}], [cm],
  [Material], [{material}], [],
  [Transverse steel], [{transverse}], [],
  [Longitudinal steel], [{weight:.2}], [kg/m],
  [Demand M#sub[u]], [{mu:.3}], [tf-m],
)

#v(8pt)

#table(
  columns: (1fr, auto, auto, auto, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, right, right, right, right),
  table.header([*Layer*], [*A (cm#super[2])*], [*d (cm)*], [*Strain*], [*f#sub[s] (kgf/cm#super[2])*], [*F (tf)*]),
{layer_rows})

#v(8pt)

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Result*], [*Value*], [*Unit*]),
  [Neutral axis depth c], [{c:.3}], [cm],
  [Stress block depth a = beta1 c], [{a:.3}], [cm],
  [Net tensile strain], [{et:.5}], [],
  [phi], [{phi:.3}], [],
  [M#sub[n]], [{mn:.3}], [tf-m],
  [phi M#sub[n]], [{phi_mn:.3}], [tf-m],
  [phi M#sub[n]], [{phi_mn_kn:.3}], [kN-m],
  [rho / rho#sub[min]], [{rho:.5} / {rho_min:.5}], [],
)
{banner}"##,
        label = escape_typst(&input.label),
        section = input.section.display_name().trim_end_matches(" cm"),
        material = escape_typst(&input.material.display_name()),
        transverse = if input.spiral { "Spiral" } else { "Tied" },
        weight = input.steel_weight_kg_per_m(),
        mu = tf_m(input.mu_kgf_cm),
        c = result.neutral_axis_depth_cm,
        a = result.block_depth_cm,
        et = result.extreme_tension_strain,
        phi = result.phi,
        mn = tf_m(result.nominal_moment_kgf_cm),
        phi_mn = tf_m(result.design_moment_kgf_cm),
        phi_mn_kn = KnM::from(TfM::from(KgfCm(result.design_moment_kgf_cm))).0,
        rho = result.steel_ratio,
        rho_min = result.minimum_steel_ratio,
        banner = status_banner(result.passes(), &detail),
    )
}

fn shear_section(number: usize, input: &ShearInput, result: &ShearResult) -> String {
    let per_m = |av_s: f64| SqCmPerM::from(SqCmPerCm(av_s)).0;
    let detail = format!("{} | ratio = {:.3}", result.condition.message(), result.ratio);

    format!(
        r##"
== Shear {number}: {label}

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Parameter*], [*Value*], [*Unit*]),
  [Section b x h], [{section}], [cm],
  [Material], [{material}], [],
  [Stirrups], [{stirrup}], [],
  [Effective depth d], [{d:.2}], [cm],
  [Demand V#sub[u]], [{vu:.3}], [tf],
)

#v(8pt)

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Result*], [*Value*], [*Unit*]),
  [V#sub[c]], [{vc:.3}], [tf],
  [V#sub[s]], [{vs:.3}], [tf],
  [phi V#sub[n]], [{phi_vn:.3}], [tf],
  [A#sub[v]/s provided], [{av_prov:.3}], [cm#super[2]/m],
  [A#sub[v]/s required], [{av_req:.3}], [cm#super[2]/m],
  [s#sub[max]], [{s_max:.2}], [cm],
)
{banner}"##,
        label = escape_typst(&input.label),
        section = input.section.display_name().trim_end_matches(" cm"),
        material = escape_typst(&input.material.display_name()),
        stirrup = escape_typst(&input.stirrup.label()),
        d = result.effective_depth_cm,
        vu = tf(result.vu_kgf),
        vc = tf(result.vc_kgf),
        vs = tf(result.vs_kgf),
        phi_vn = tf(result.design_shear_kgf),
        av_prov = per_m(result.av_s_provided),
        av_req = per_m(result.av_s_required),
        s_max = result.max_spacing_cm,
        banner = status_banner(result.passes(), &detail),
    )
}

/// Plot area (pt)
const PLOT_WIDTH: f64 = 400.0;
const PLOT_HEIGHT: f64 = 180.0;

/// Step plot of an envelope as absolutely placed line segments.
fn envelope_plot(curve: &EnvelopeCurve) -> String {
    let segments = curve.segments();
    let Some((x_min, x_max)) = curve.domain() else {
        return "No samples".to_string();
    };
    let y_max = curve.max().map_or(0.0, |(_, y)| y).max(0.0);
    let y_min = curve.min().map_or(0.0, |(_, y)| y).min(0.0);

    let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
    let y_span = if y_max > y_min { (y_max - y_min) * 1.1 } else { 1.0 };
    let px = |x: f64| (x - x_min) / x_span * PLOT_WIDTH;
    let py = |y: f64| PLOT_HEIGHT - (y - y_min) / y_span * PLOT_HEIGHT;

    let stroke = r#"(paint: red, thickness: 1pt, dash: "dashed")"#;
    let line = |x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str| {
        format!("  #place(line(start: ({x1:.2}pt, {y1:.2}pt), end: ({x2:.2}pt, {y2:.2}pt), stroke: {stroke}))\n")
    };

    let mut body = String::new();
    // axes
    body.push_str(&line(0.0, py(0.0), PLOT_WIDTH, py(0.0), "0.5pt + black"));
    body.push_str(&line(0.0, 0.0, 0.0, PLOT_HEIGHT, "0.5pt + black"));

    for (i, seg) in segments.iter().enumerate() {
        let x_end = segments.get(i + 1).map_or(seg.x_end, |next| next.x_start);
        body.push_str(&line(px(seg.x_start), py(seg.value), px(x_end), py(seg.value), stroke));
        if let Some(next) = segments.get(i + 1) {
            body.push_str(&line(px(x_end), py(seg.value), px(x_end), py(next.value), stroke));
        }
    }

    format!(
        r##"#align(center)[
#box(width: {w}pt, height: {h}pt)[
{body}  #place(top + left, dx: 4pt)[#text(size: 8pt)[{y_top:.3}]]
  #place(bottom + left, dy: 12pt)[#text(size: 8pt)[{x_min:.3}]]
  #place(bottom + right, dy: 12pt)[#text(size: 8pt)[{x_max:.3}]]
  #place(bottom + center, dy: 24pt)[x]
  #place(left + horizon, dx: -28pt)[#rotate(-90deg, reflow: true)[Moment (t-m)]]
]
]
#v(32pt)
"##,
        w = PLOT_WIDTH,
        h = PLOT_HEIGHT,
        y_top = y_min + y_span,
    )
}

fn envelope_section(number: usize, label: &str, curve: &EnvelopeCurve) -> String {
    let peak = curve
        .max()
        .map(|(x, y)| format!("max {y:.3} t-m at x = {x:.3}"))
        .unwrap_or_else(|| "no samples".to_string());

    format!(
        r##"
== Moment Envelope {number}: {label}

{samples} samples, {peak}

#v(8pt)
{plot}"##,
        label = escape_typst(label),
        samples = curve.points.len(),
        plot = envelope_plot(curve),
    )
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{flexure, shear};
    use crate::envelope::{envelope, Pulse, DEFAULT_SAMPLES};
    use crate::materials::Material;
    use crate::reinforcement::{BotBar, Stirrup, TopBar};
    use crate::section::Section;

    fn flexure_case() -> (FlexureInput, FlexureResult) {
        let input = FlexureInput {
            label: "B1 midspan".to_string(),
            section: Section::new(40.0, 60.0).unwrap(),
            material: Material::default(),
            top_bars: vec![TopBar::new(0, "D22", 6.0).unwrap()],
            bot_bars: vec![
                BotBar::new(4, "D22", 6.0).unwrap(),
                BotBar::new(4, "D22", 11.0).unwrap(),
            ],
            mu_kgf_cm: 20.0e5,
            spiral: false,
        };
        let result = flexure::calculate(&input, &DesignSettings::default()).unwrap();
        (input, result)
    }

    fn shear_case() -> (ShearInput, ShearResult) {
        let input = ShearInput {
            label: "B1 support".to_string(),
            section: Section::new(40.0, 60.0).unwrap(),
            material: Material::default(),
            stirrup: Stirrup::new("D13", 2, 20.0).unwrap(),
            cover_cm: 5.0,
            vu_kgf: 100_000.0,
        };
        let result = shear::calculate(&input, &DesignSettings::default()).unwrap();
        (input, result)
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("B#1 [A]"), "B\\#1 \\[A\\]");
        assert_eq!(escape_typst("plain"), "plain");
    }

    #[test]
    fn test_report_source_contents() {
        let (f_in, f_res) = flexure_case();
        let (s_in, s_res) = shear_case();
        let curve = envelope(&[Pulse::new(0.0, 1.0, 10.0), Pulse::new(0.2, 0.8, 5.0)], DEFAULT_SAMPLES).unwrap();
        let meta = ReportMeta::new("Test_Job", "Engineer", "26-001");

        let source = report_source(
            &[
                ReportItem::Flexure(&f_in, &f_res),
                ReportItem::Shear(&s_in, &s_res),
                ReportItem::Envelope("Demo", &curve),
            ],
            &meta,
        );

        assert!(source.contains("Test\\_Job"));
        assert!(source.contains("== Flexure 1: B1 midspan"));
        assert!(source.contains("[52.289]"));
        assert!(source.contains("== Shear 2: B1 support"));
        assert!(source.contains("Need change section"));
        assert!(source.contains("DESIGN INADEQUATE"));
        assert!(source.contains("== Moment Envelope 3: Demo"));
        assert!(source.contains("dash: \"dashed\""));
        assert!(source.contains("Moment (t-m)"));
        assert!(!source.contains("{{"));
    }

    #[test]
    fn test_pdf_generation() {
        let (f_in, f_res) = flexure_case();
        let curve = envelope(&[Pulse::new(0.0, 1.0, 10.0)], 50).unwrap();
        let meta = ReportMeta::new("Demo", "Test Engineer", "TEST-001");

        let pdf = render_design_pdf(
            &[ReportItem::Flexure(&f_in, &f_res), ReportItem::Envelope("Single", &curve)],
            &meta,
        );
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
