use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ninepatcher", version, about = "Generate 9-patch images from a declarative config")]
struct Cli {
    /// Config file (JSON with comments). Defaults to `ninepatcher.json`
    /// in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Working directory used to resolve relative paths.
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Directory the generated images are written to (default: `<cwd>/out`).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let request = ninepatcher::GeneratorConfig {
        cwd: cli.cwd,
        config: cli.config,
        out_dir: cli.out_dir,
        images: Vec::new(),
    };
    let config = request.resolve().context("load configuration")?;
    let summary = ninepatcher::generate(&config)?;

    for path in &summary.written {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
