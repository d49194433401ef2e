//! Entry point for the atmos-vert application.
//! Handles CLI parsing and logging setup, then prints thickness or sigma-coordinate columns.

use atmos_vert::{
    dp_from_p, dp_from_phalf, int_dp_g, level_thickness, pfull_from_phalf, phalf_from_ps,
    to_pascal, PressureField, PA_PER_HPA,
};
use chrono::Utc;
use clap::Parser;
use ndarray::{arr0, Array1, ArrayD, Axis};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Args, Command};

/// JSON form of the `thickness` subcommand output
#[derive(Debug, Serialize)]
struct ThicknessReport {
    levels_pa: Vec<f64>,
    surface_pressure_pa: Option<f64>,
    /// `None` marks levels below the surface
    thickness_pa: Vec<Option<f64>>,
    column_mass_kg_m2: f64,
    history: String,
}

/// JSON form of the `sigma` subcommand output
#[derive(Debug, Serialize)]
struct SigmaReport {
    surface_pressure_pa: f64,
    phalf_pa: Vec<f64>,
    pfull_pa: Vec<f64>,
    dp_pa: Vec<f64>,
    column_mass_kg_m2: f64,
    history: String,
}

fn history() -> String {
    format!("Created by atmos-vert on {}", Utc::now().to_rfc3339())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Mass per unit area of a column with layer thicknesses `dp`, kg m^-2.
fn column_mass(dp: &ArrayD<f64>) -> atmos_vert::Result<f64> {
    let ones = ArrayD::<f64>::ones(dp.raw_dim());
    let mass = int_dp_g(ones.view(), dp.view(), 0)?;
    Ok(mass.sum())
}

fn finite(value: f64) -> Option<f64> {
    Some(value).filter(|v| v.is_finite())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Thickness { levels, ps } => {
            let mut levels = Array1::from(levels.0);
            to_pascal(&mut levels, PressureField::Level);

            let (dp, surface_pressure) = match ps {
                Some(ps) => {
                    let mut ps = arr0(ps).into_dyn();
                    to_pascal(&mut ps, PressureField::Level);
                    (dp_from_p(levels.view(), ps.view())?, Some(ps.sum()))
                }
                None => (level_thickness(levels.view())?.into_dyn(), None),
            };
            let mass = column_mass(&dp)?;

            if args.json {
                let report = ThicknessReport {
                    levels_pa: levels.to_vec(),
                    surface_pressure_pa: surface_pressure,
                    thickness_pa: dp.iter().copied().map(finite).collect(),
                    column_mass_kg_m2: mass,
                    history: history(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("\n Layer Thickness");
            println!("=================");
            if let Some(ps) = surface_pressure {
                println!("   Surface pressure: {:.2} hPa", ps / PA_PER_HPA);
            }
            println!("   {:>10}  {:>10}", "p (hPa)", "dp (hPa)");
            for (p, dp) in levels.iter().zip(dp.iter()) {
                match finite(*dp) {
                    Some(dp) => println!("   {:>10.2}  {:>10.2}", p / PA_PER_HPA, dp / PA_PER_HPA),
                    None => println!("   {:>10.2}  {:>10}", p / PA_PER_HPA, "masked"),
                }
            }
            println!("\n✅ Column mass: {:.1} kg m-2", mass);
        }
        Command::Sigma { bk, pk, ps } => {
            let bk = Array1::from(bk.0);
            let pk = Array1::from(pk.0);
            let mut ps = arr0(ps).into_dyn();
            to_pascal(&mut ps, PressureField::Level);

            let phalf = phalf_from_ps(bk.view(), pk.view(), ps.view())?;
            let pfull = pfull_from_phalf(phalf.view(), Axis(0))?;
            let dp = dp_from_phalf(phalf.view(), Axis(0))?;
            let mass = column_mass(&dp)?;

            if args.json {
                let report = SigmaReport {
                    surface_pressure_pa: ps.sum(),
                    phalf_pa: phalf.iter().copied().collect(),
                    pfull_pa: pfull.iter().copied().collect(),
                    dp_pa: dp.iter().copied().collect(),
                    column_mass_kg_m2: mass,
                    history: history(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("\n Sigma Column");
            println!("==============");
            println!("   Surface pressure: {:.2} hPa", ps.sum() / PA_PER_HPA);
            println!("   {:>5}  {:>10}  {:>10}", "layer", "pfull", "dp (hPa)");
            for (k, (pf, dp)) in pfull.iter().zip(dp.iter()).enumerate() {
                println!("   {:>5}  {:>10.2}  {:>10.2}", k, pf / PA_PER_HPA, dp / PA_PER_HPA);
            }
            println!("\n✅ Column mass: {:.1} kg m-2", mass);
        }
    }

    Ok(())
}
