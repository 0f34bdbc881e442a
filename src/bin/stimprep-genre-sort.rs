//! Copies processed stimuli into category folders based on their genre tag.

use std::path::PathBuf;

use stimprep::config;
use stimprep::genre;
use stimprep::logging;

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

    let genres = if config.genres.is_empty() {
        config::AppConfig::default_genres()
    } else {
        config.genres.clone()
    };
    let summary = genre::route_by_genre(&config.media_tree(), &genres, options.overwrite)
        .map_err(|err| err.to_string())?;

    println!(
        "Copied {} file(s), {} unmapped, {} already present.",
        summary.copied, summary.unmapped, summary.skipped_existing
    );
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
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }
    Ok(Some(options))
}

fn print_help() {
    println!("Usage: stimprep-genre-sort [options]");
    println!();
    println!("Reads the genre tag of every file in Add_Triggers/stimuli_with_triggers");
    println!("and copies mapped files into Create_Playlists/media/<category>.");
    println!();
    println!("Options:");
    println!("  --config <path>      Config file (defaults to the app data dir)");
    println!("  --media-root <path>  Override the configured media root");
    println!("  --overwrite          Replace files already in a category folder");
}
