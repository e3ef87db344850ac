use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ArgAction;
use serde::Serialize;
use tracing::{debug, info};

use rc_core::calculations::{flexure, shear};
use rc_core::envelope::{envelope, EnvelopeCurve, Pulse, DEFAULT_SAMPLES};
use rc_core::pdf::{render_design_pdf, ReportItem, ReportMeta};
use rc_core::report::{flexure_summary, shear_summary};
use rc_core::units::{Kgf, KgfCm, Tf, TfM};
use rc_core::{
    BarSize, BotBar, DesignSettings, FlexureInput, FlexureResult, Material, Section, ShearInput,
    ShearResult, Stirrup, TopBar,
};

/// Bar group as typed on the command line: `4xD22@6`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGroupArg {
    pub quantity: u32,
    pub size: BarSize,
    pub distance_cm: f64,
}

/// Parse `<qty>x<size>@<distance>`, e.g. `4xD22@6`.
fn parse_bar_group(s: &str) -> Result<BarGroupArg, String> {
    let (bars, distance) = s
        .split_once('@')
        .ok_or_else(|| format!("'{s}' should look like 4xD22@6"))?;
    let (quantity, size) = bars
        .to_ascii_uppercase()
        .split_once('X')
        .map(|(q, z)| (q.trim().to_string(), z.trim().to_string()))
        .ok_or_else(|| format!("'{s}' should look like 4xD22@6"))?;

    Ok(BarGroupArg {
        quantity: quantity
            .parse()
            .map_err(|_| format!("'{quantity}' is not a bar count"))?,
        size: BarSize::lookup(&size).map_err(|e| e.to_string())?,
        distance_cm: distance
            .trim()
            .parse()
            .map_err(|_| format!("'{distance}' is not a distance"))?,
    })
}

/// Parse `<size>x<legs>@<spacing>`, e.g. `D13x2@20`.
fn parse_stirrup(s: &str) -> Result<Stirrup, String> {
    let (bar, spacing) = s
        .split_once('@')
        .ok_or_else(|| format!("'{s}' should look like D13x2@20"))?;
    let upper = bar.to_ascii_uppercase();
    let (size, legs) = upper
        .split_once('X')
        .ok_or_else(|| format!("'{s}' should look like D13x2@20"))?;
    let legs: u32 = legs
        .trim()
        .parse()
        .map_err(|_| format!("'{legs}' is not a leg count"))?;
    let spacing: f64 = spacing
        .trim()
        .parse()
        .map_err(|_| format!("'{spacing}' is not a spacing"))?;
    Stirrup::new(size.trim(), legs, spacing).map_err(|e| e.to_string())
}

fn parse_pulse(s: &str) -> Result<Pulse, String> {
    s.parse().map_err(|e: rc_core::CalcError| e.to_string())
}

#[derive(Debug, clap::Parser)]
#[command(name = "rc", version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print inputs and results as JSON instead of text reports
    #[arg(long, global = true)]
    pub json: bool,

    /// Also write a PDF report to this path
    #[arg(long, global = true)]
    pdf: Option<PathBuf>,

    /// JSON file overriding the default design settings
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let settings = match &self.settings {
            Some(path) => DesignSettings::load(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => DesignSettings::default(),
        };

        let command = self.command.unwrap_or(Command::Demo);
        let demo = matches!(command, Command::Demo);
        let outcome = command.execute(&settings)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            outcome.print(demo);
        }

        if let Some(path) = &self.pdf {
            outcome.write_pdf(path, &settings)?;
        }
        Ok(())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout carries reports and JSON
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Run the worked shear, flexure and envelope examples (default)
    Demo,

    /// Flexural capacity of a rectangular section
    Flexure(FlexureArgs),

    /// Shear capacity and stirrup demand
    Shear(ShearArgs),

    /// Superpose rectangular pulses into a moment envelope
    Envelope(EnvelopeArgs),
}

#[derive(Debug, clap::Args)]
pub struct FlexureArgs {
    /// Label shown on reports
    #[arg(long, default_value = "Flexure")]
    label: String,

    /// Section width (cm)
    #[arg(long, default_value_t = 40.0)]
    width: f64,

    /// Section height (cm)
    #[arg(long, default_value_t = 60.0)]
    height: f64,

    /// Concrete strength f'c (kgf/cm²)
    #[arg(long, default_value_t = 280.0)]
    fc: f64,

    /// Main bar yield strength (kgf/cm²)
    #[arg(long, default_value_t = 4200.0)]
    fyb: f64,

    /// Top bar group, distance from the top face (repeatable): 2xD22@6
    #[arg(long = "top", value_parser = parse_bar_group)]
    top: Vec<BarGroupArg>,

    /// Bottom bar group, distance from the bottom face (repeatable): 4xD22@6
    #[arg(long = "bot", value_parser = parse_bar_group, default_values = ["4xD22@6", "4xD22@11"])]
    bot: Vec<BarGroupArg>,

    /// Factored moment Mu (tf-m)
    #[arg(long, default_value_t = 0.0)]
    mu: f64,

    /// Spiral transverse reinforcement
    #[arg(long)]
    spiral: bool,
}

impl FlexureArgs {
    fn to_input(&self) -> anyhow::Result<FlexureInput> {
        let top_bars = self
            .top
            .iter()
            .map(|g| TopBar::with_size(g.quantity, g.size, g.distance_cm))
            .collect::<Result<Vec<_>, _>>()?;
        let bot_bars = self
            .bot
            .iter()
            .map(|g| BotBar::with_size(g.quantity, g.size, g.distance_cm))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FlexureInput {
            label: self.label.clone(),
            section: Section::new(self.width, self.height)?,
            material: Material::new(self.fc, self.fyb, self.fyb)?,
            top_bars,
            bot_bars,
            mu_kgf_cm: KgfCm::from(TfM(self.mu)).0,
            spiral: self.spiral,
        })
    }
}

#[derive(Debug, clap::Args)]
pub struct ShearArgs {
    /// Label shown on reports
    #[arg(long, default_value = "Shear")]
    label: String,

    /// Section width (cm)
    #[arg(long, default_value_t = 40.0)]
    width: f64,

    /// Section height (cm)
    #[arg(long, default_value_t = 60.0)]
    height: f64,

    /// Concrete strength f'c (kgf/cm²)
    #[arg(long, default_value_t = 280.0)]
    fc: f64,

    /// Stirrup yield strength (kgf/cm²)
    #[arg(long, default_value_t = 4200.0)]
    fys: f64,

    /// Stirrup size, legs and spacing: D13x2@20
    #[arg(long, value_parser = parse_stirrup, default_value = "D13x2@20")]
    stirrup: Stirrup,

    /// Bottom face to tension steel centroid (cm)
    #[arg(long, default_value_t = 5.0)]
    cover: f64,

    /// Factored shear Vu (tf)
    #[arg(long, default_value_t = 0.0)]
    vu: f64,
}

impl ShearArgs {
    fn to_input(&self) -> anyhow::Result<ShearInput> {
        Ok(ShearInput {
            label: self.label.clone(),
            section: Section::new(self.width, self.height)?,
            // main bar strength does not enter the shear check
            material: Material::new(self.fc, self.fys, self.fys)?,
            stirrup: self.stirrup,
            cover_cm: self.cover,
            vu_kgf: Kgf::from(Tf(self.vu)).0,
        })
    }
}

#[derive(Debug, clap::Args)]
pub struct EnvelopeArgs {
    /// Label shown on reports
    #[arg(long, default_value = "Envelope")]
    label: String,

    /// Pulse as start:end:scale (repeatable)
    #[arg(long = "pulse", value_parser = parse_pulse, required = true)]
    pulses: Vec<Pulse>,

    /// Evenly spaced sample count (the closing point is dropped)
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,
}

#[derive(Debug, Serialize)]
pub struct FlexureCase {
    pub input: FlexureInput,
    pub result: FlexureResult,
}

#[derive(Debug, Serialize)]
pub struct ShearCase {
    pub input: ShearInput,
    pub result: ShearResult,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeCase {
    pub label: String,
    pub pulses: Vec<Pulse>,
    pub curve: EnvelopeCurve,
}

/// Everything one invocation calculated.
#[derive(Debug, Default, Serialize)]
pub struct Outcome {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shear: Vec<ShearCase>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flexure: Vec<FlexureCase>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub envelopes: Vec<EnvelopeCase>,
}

impl Command {
    pub fn execute(self, settings: &DesignSettings) -> anyhow::Result<Outcome> {
        let mut outcome = Outcome::default();
        match self {
            Self::Demo => {
                outcome.shear.push(run_shear(demo_shear()?, settings)?);
                outcome.flexure.push(run_flexure(demo_flexure()?, settings)?);
                outcome
                    .envelopes
                    .push(run_envelope("Demo envelope", demo_pulses(), DEFAULT_SAMPLES)?);
            }
            Self::Flexure(args) => outcome.flexure.push(run_flexure(args.to_input()?, settings)?),
            Self::Shear(args) => outcome.shear.push(run_shear(args.to_input()?, settings)?),
            Self::Envelope(args) => {
                outcome
                    .envelopes
                    .push(run_envelope(&args.label, args.pulses, args.samples)?);
            }
        }
        Ok(outcome)
    }
}

fn run_flexure(input: FlexureInput, settings: &DesignSettings) -> anyhow::Result<FlexureCase> {
    let result = flexure::calculate(&input, settings)
        .with_context(|| format!("flexure check '{}' failed", input.label))?;
    Ok(FlexureCase { input, result })
}

fn run_shear(input: ShearInput, settings: &DesignSettings) -> anyhow::Result<ShearCase> {
    let result = shear::calculate(&input, settings)
        .with_context(|| format!("shear check '{}' failed", input.label))?;
    Ok(ShearCase { input, result })
}

fn run_envelope(label: &str, pulses: Vec<Pulse>, samples: usize) -> anyhow::Result<EnvelopeCase> {
    let curve = envelope(&pulses, samples).with_context(|| format!("envelope '{label}' failed"))?;
    Ok(EnvelopeCase {
        label: label.to_string(),
        pulses,
        curve,
    })
}

fn demo_shear() -> anyhow::Result<ShearInput> {
    Ok(ShearInput {
        label: "Demo shear".to_string(),
        section: Section::new(40.0, 60.0)?,
        material: Material::new(280.0, 4200.0, 4200.0)?,
        stirrup: Stirrup::new("D13", 2, 20.0)?,
        cover_cm: 5.0,
        vu_kgf: 10_000.0,
    })
}

fn demo_flexure() -> anyhow::Result<FlexureInput> {
    Ok(FlexureInput {
        label: "Demo flexure".to_string(),
        section: Section::new(40.0, 60.0)?,
        material: Material::new(280.0, 4200.0, 4200.0)?,
        top_bars: vec![TopBar::new(0, "D22", 6.0)?],
        bot_bars: vec![BotBar::new(4, "D22", 6.0)?, BotBar::new(4, "D22", 11.0)?],
        mu_kgf_cm: 20.0 * 100_000.0,
        spiral: false,
    })
}

fn demo_pulses() -> Vec<Pulse> {
    vec![Pulse::new(0.0, 1.0, 10.0), Pulse::new(0.2, 0.8, 5.0)]
}

impl Outcome {
    fn print(&self, demo: bool) {
        for case in &self.shear {
            print!("{}", case.result);
        }
        if demo {
            for case in &self.shear {
                println!("{}", shear_summary(&case.result));
            }
        }
        for case in &self.flexure {
            print!("{}", case.result);
        }
        if demo {
            for case in &self.flexure {
                println!("{}", flexure_summary(&case.result));
            }
        }
        for case in &self.envelopes {
            println!("--------------------------------------------------------------------");
            println!("envelope {}: {} samples", case.label, case.curve.points.len());
            for seg in case.curve.segments() {
                println!("  x {:>8.3} .. {:>8.3}   {:>10.3} t-m", seg.x_start, seg.x_end, seg.value);
            }
            if let Some((x, y)) = case.curve.max() {
                println!("  max {y:.3} t-m at x = {x:.3}");
            }
        }
    }

    fn report_items(&self) -> Vec<ReportItem<'_>> {
        let shear = self.shear.iter().map(|c| ReportItem::Shear(&c.input, &c.result));
        let flexure = self.flexure.iter().map(|c| ReportItem::Flexure(&c.input, &c.result));
        let envelopes = self
            .envelopes
            .iter()
            .map(|c| ReportItem::Envelope(c.label.as_str(), &c.curve));
        shear.chain(flexure).chain(envelopes).collect()
    }

    fn write_pdf(&self, path: &Path, settings: &DesignSettings) -> anyhow::Result<()> {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Design report".to_string());
        let meta = ReportMeta::new(title, "", "").with_code(settings.code.clone());

        let items = self.report_items();
        debug!(items = items.len(), "rendering PDF report");
        let bytes = render_design_pdf(&items, &meta).context("failed to render PDF report")?;
        std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote PDF report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use test_case::test_case;

    #[test_case("4xD22@6", 4, BarSize::D22, 6.0; "lowercase x")]
    #[test_case("0XD25@5.5", 0, BarSize::D25, 5.5; "uppercase x")]
    #[test_case("2xd13@ 4", 2, BarSize::D13, 4.0; "lowercase size")]
    fn test_parse_bar_group(s: &str, quantity: u32, size: BarSize, distance_cm: f64) {
        let group = parse_bar_group(s).unwrap();
        assert_eq!(
            group,
            BarGroupArg {
                quantity,
                size,
                distance_cm
            }
        );
    }

    #[test_case("4D22@6"; "missing x")]
    #[test_case("4xD22"; "missing distance")]
    #[test_case("4xD23@6"; "unknown size")]
    #[test_case("fourxD22@6"; "bad count")]
    fn test_parse_bar_group_errors(s: &str) {
        assert!(parse_bar_group(s).is_err());
    }

    #[test]
    fn test_parse_stirrup() {
        let stirrup = parse_stirrup("D13x2@20").unwrap();
        assert_eq!(stirrup, Stirrup::new("D13", 2, 20.0).unwrap());
        assert!(parse_stirrup("D13x0@20").is_err());
        assert!(parse_stirrup("D13@20").is_err());
    }

    #[test]
    fn test_default_command_is_demo() {
        let cli = Cli::try_parse_from(["rc"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_demo_outcome() {
        let outcome = Command::Demo.execute(&DesignSettings::default()).unwrap();
        assert_eq!(shear_summary(&outcome.shear[0].result), "phiVn= 36.584 tf");
        assert_eq!(flexure_summary(&outcome.flexure[0].result), "phiMn= 52.289 tf-m");
        assert_eq!(outcome.envelopes[0].curve.points.len(), DEFAULT_SAMPLES - 1);
        assert_eq!(outcome.report_items().len(), 3);
    }

    #[test]
    fn test_flexure_args_defaults_match_demo() {
        let cli = Cli::try_parse_from(["rc", "flexure", "--mu", "20"]).unwrap();
        let Some(Command::Flexure(args)) = cli.command else {
            panic!("expected flexure command");
        };
        assert_eq!(args.to_input().unwrap().bot_bars.len(), 2);

        let outcome = Command::Flexure(args).execute(&DesignSettings::default()).unwrap();
        let result = &outcome.flexure[0].result;
        assert!((result.neutral_axis_depth_cm - 16.073).abs() < 1e-3);
        assert!((result.ratio - 0.3825).abs() < 1e-4);
    }

    #[test]
    fn test_shear_args_units() {
        let cli = Cli::try_parse_from(["rc", "--json", "shear", "--vu", "100", "--stirrup", "D13x2@15"]).unwrap();
        assert!(cli.json);
        let Some(Command::Shear(args)) = cli.command else {
            panic!("expected shear command");
        };
        let input = args.to_input().unwrap();
        assert_eq!(input.vu_kgf, 100_000.0);
        assert_eq!(input.stirrup.spacing_cm, 15.0);

        let outcome = Command::Shear(args).execute(&DesignSettings::default()).unwrap();
        assert_eq!(outcome.shear[0].result.condition.message(), "Need change section");
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("SectionInadequate"));
        assert!(!json.contains("envelopes"));
    }

    #[test]
    fn test_envelope_args() {
        let cli = Cli::try_parse_from([
            "rc", "envelope", "--pulse", "0:1:10", "--pulse", "0.2:0.8:5", "--samples", "100",
        ])
        .unwrap();
        let Some(command) = cli.command else {
            panic!("expected envelope command");
        };
        let outcome = command.execute(&DesignSettings::default()).unwrap();
        let curve = &outcome.envelopes[0].curve;
        assert_eq!(curve.points.len(), 99);
        assert_eq!(curve.max().unwrap().1, 15.0);

        assert!(Cli::try_parse_from(["rc", "envelope"]).is_err());
        assert!(Cli::try_parse_from(["rc", "envelope", "--pulse", "1:0:3"]).is_err());
    }

    #[test]
    fn test_invalid_flexure_reports_context() {
        let cli = Cli::try_parse_from(["rc", "flexure", "--bot", "0xD22@6"]).unwrap();
        let Some(command) = cli.command else {
            panic!("expected flexure command");
        };
        let err = command.execute(&DesignSettings::default()).unwrap_err();
        assert!(err.to_string().contains("flexure check 'Flexure' failed"));
        assert!(err.downcast_ref::<rc_core::CalcError>().is_some());
    }
}
