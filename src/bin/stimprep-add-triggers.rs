//! Batch utility that multiplexes trigger channels into stimulus media.

use std::path::PathBuf;

use rand::{SeedableRng, rngs::StdRng};
use stimprep::config;
use stimprep::logging;
use stimprep::pipeline;
use stimprep::video::EncodeSettings;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

struct Options {
    config: Option<PathBuf>,
    media_root: Option<PathBuf>,
    overwrite: bool,
    seed: Option<u64>,
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let mut config = match &options.config {
        Some(path) => config::load_from(path).map_err(|err| err.to_string())?,
        None => config::load_or_default().map_err(|err| err.to_string())?,
    };
    if let Some(media_root) = options.media_root {
        config.media_root = media_root;
    }
    config::require_media_root(&config).map_err(|err| err.to_string())?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let summary = pipeline::run_batch(
        &config.media_tree(),
        &config.trigger,
        &EncodeSettings::default(),
        options.overwrite,
        &mut rng,
    )
    .map_err(|err| err.to_string())?;

    println!(
        "Processed {} file(s), skipped {}, failed {}.",
        summary.processed, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        return Err(format!("{} file(s) failed; see the log", summary.failed));
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(None);
    }
    let mut options = Options {
        config: None,
        media_root: None,
        overwrite: false,
        seed: None,
    };
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --config".to_string())?;
                options.config = Some(PathBuf::from(value));
            }
            "--media-root" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --media-root".to_string())?;
                options.media_root = Some(PathBuf::from(value));
            }
            "--overwrite" => options.overwrite = true,
            "--seed" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --seed".to_string())?;
                options.seed = Some(
                    value
                        .parse()
                        .map_err(|err| format!("Invalid --seed: {err}"))?,
                );
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }
    Ok(Some(options))
}

fn print_help() {
    println!("Usage: stimprep-add-triggers [options]");
    println!();
    println!("Adds a trigger pulse channel to every file in");
    println!("Add_Triggers/original_stimuli under the configured media root.");
    println!();
    println!("Options:");
    println!("  --config <path>      Config file (defaults to the app data dir)");
    println!("  --media-root <path>  Override the configured media root");
    println!("  --overwrite          Reprocess files whose output already exists");
    println!("  --seed <n>           Seed the pulse spacing RNG (for reproducible runs)");
}
