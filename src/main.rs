//! `gridglow` binary: opens the background in a native window.

use std::path::{Path, PathBuf};

use clap::Parser;
use gridglow::{options::Options, viewer::Viewer, GridGlowError};

#[derive(Parser, Debug)]
#[command(name = "gridglow", about = "Instanced capsule-grid background viewer")]
struct Cli {
    /// Options file (TOML) to run with; missing fields use defaults
    #[arg(value_name = "OPTIONS.toml")]
    options: Option<PathBuf>,
    /// Write the default options to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["options", "write_schema"])]
    write_defaults: Option<PathBuf>,
    /// Write the options JSON Schema to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with = "options")]
    write_schema: Option<PathBuf>,
}

fn write_schema(path: &Path) -> Result<(), GridGlowError> {
    let schema = serde_json::to_string_pretty(&Options::json_schema())
        .map_err(|e| GridGlowError::OptionsParse(e.to_string()))?;
    std::fs::write(path, schema)?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), GridGlowError> {
    if let Some(path) = cli.write_defaults {
        Options::default().save(&path)?;
        log::info!("wrote default options to {}", path.display());
        return Ok(());
    }
    if let Some(path) = cli.write_schema {
        write_schema(&path)?;
        log::info!("wrote options schema to {}", path.display());
        return Ok(());
    }

    let options = match cli.options {
        Some(path) => {
            let options = Options::load(&path)?;
            log::info!("loaded options from {}", path.display());
            options
        }
        None => Options::default(),
    };

    Viewer::builder().with_options(options).build().run()
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
