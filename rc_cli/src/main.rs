//! # rc
//!
//! Command-line front end for reinforced concrete beam section checks.
//!
//! ```text
//! rc                                   # worked examples
//! rc flexure --bot 4xD22@6 --mu 20     # moment capacity, Mu in tf-m
//! rc shear --stirrup D13x2@20 --vu 10  # shear capacity, Vu in tf
//! rc envelope --pulse 0:1:10 --pulse 0.2:0.8:5
//! ```

use std::process::ExitCode;

use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json {
                if let Some(calc) = err.downcast_ref::<rc_core::CalcError>() {
                    if let Ok(text) = serde_json::to_string_pretty(calc) {
                        println!("{text}");
                    }
                }
            }
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
