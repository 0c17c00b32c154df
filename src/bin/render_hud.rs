use aerohud::{HudError, scene::Scene};
use clap::Parser;
use log::{LevelFilter, info};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the scene description.
    scene: PathBuf,

    /// Optional path to write draw lists to, one JSON object per line.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log more; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// `RUST_LOG`, when set, takes precedence over `-v`.
fn init_logger(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(verbosity(verbose))
        .parse_default_env()
        .init();
}

fn main() -> Result<(), HudError> {
    let args = Args::parse();
    init_logger(args.verbose);

    let scene = Scene::from_path(&args.scene)?;
    let frames = scene.render()?;

    let mut writer: Box<dyn Write> = match args.output {
        Some(path_buf) => Box::new(BufWriter::new(File::create(path_buf)?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    for frame in &frames {
        serde_json::to_writer(&mut writer, frame)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!("wrote {} frames", frames.len());

    Ok(())
}
