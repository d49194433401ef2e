//! Defines command-line interface options using `clap` for the atmos-vert application.

use clap::{Parser, Subcommand};

/// A CLI tool for inspecting vertical pressure coordinates
#[derive(Parser, Debug)]
#[command(
    version,
    name = "atmos-vert",
    about = "Layer thickness, half/full-level pressure and column mass for a single column"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Print the result as JSON instead of a table.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Thickness of pressure levels, clipped at the surface when --ps is given
    Thickness {
        /// Level pressures (Pa or hPa), comma separated, e.g. 1000,850,500,200
        #[arg(long, value_parser = parse_column)]
        levels: Column,

        /// Surface pressure (Pa or hPa)
        #[arg(long)]
        ps: Option<f64>,
    },

    /// Half-level, full-level and thickness columns from hybrid sigma coefficients
    Sigma {
        /// Sigma coefficients, top of atmosphere first, comma separated
        #[arg(long, value_parser = parse_column)]
        bk: Column,

        /// Pressure coefficients in Pa, top of atmosphere first, comma separated
        #[arg(long, value_parser = parse_column)]
        pk: Column,

        /// Surface pressure (Pa or hPa)
        #[arg(long)]
        ps: f64,
    },
}

/// Comma-separated list of values along the vertical
#[derive(Debug, Clone)]
pub struct Column(pub Vec<f64>);

fn parse_column(s: &str) -> Result<Column, String> {
    let values = s
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .map_err(|_| format!("Invalid number '{}' in column", part))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    if values.is_empty() {
        return Err("Invalid format: Expected comma-separated numbers".to_string());
    }
    Ok(Column(values))
}
