use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

const WASM_TARGET: &str = "wasm32-unknown-unknown";

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for gridglow")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the wasm module and JS bindings into web/pkg
    BuildWeb {
        /// Build without optimizations
        #[arg(long)]
        dev: bool,
    },
    /// Write the options JSON Schema to web/options.schema.json
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = workspace_root();

    match cli.command {
        Commands::BuildWeb { dev } => build_web(&root, dev)?,
        Commands::Schema => write_schema(&root)?,
    }

    Ok(())
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn run(cmd: &mut Command, what: &str) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("failed to spawn {what}"))?;
    if !status.success() {
        bail!("{what} failed");
    }
    Ok(())
}

fn build_web(root: &Path, dev: bool) -> Result<()> {
    println!("==> Building gridglow for {WASM_TARGET}");
    let mut rustc = Command::new("cargo");
    let _ = rustc.current_dir(root).args([
        "rustc",
        "--package",
        "gridglow",
        "--lib",
        "--crate-type",
        "cdylib",
        "--target",
        WASM_TARGET,
        "--no-default-features",
        "--features",
        "web",
    ]);
    if !dev {
        let _ = rustc.arg("--release");
    }
    run(&mut rustc, "cargo rustc")?;

    let profile = if dev { "debug" } else { "release" };
    let wasm = root
        .join("target")
        .join(WASM_TARGET)
        .join(profile)
        .join("gridglow.wasm");
    let out_dir = root.join("web").join("pkg");

    println!("==> Generating JS bindings in {}", out_dir.display());
    run(
        Command::new("wasm-bindgen")
            .arg(&wasm)
            .arg("--out-dir")
            .arg(&out_dir)
            .args(["--target", "web", "--no-typescript"]),
        "wasm-bindgen (install with `cargo install wasm-bindgen-cli`)",
    )
}

fn write_schema(root: &Path) -> Result<()> {
    let out = root.join("web").join("options.schema.json");
    println!("==> Writing {}", out.display());
    run(
        Command::new("cargo").current_dir(root).args([
            "run",
            "--package",
            "gridglow",
            "--",
            "--write-schema",
        ]).arg(&out),
        "cargo run --write-schema",
    )
}
