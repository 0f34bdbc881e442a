//! Builds the playlist manifest from the category folders.

use std::path::PathBuf;

use stimprep::config;
use stimprep::logging;
use stimprep::manifest;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

struct Options {
    config: Option<PathBuf>,
    media_root: Option<PathBuf>,
    priority_list: Option<PathBuf>,
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
    if let Some(priority_list) = options.priority_list {
        config.playlist.priority_list = Some(priority_list);
    }
    config::require_media_root(&config).map_err(|err| err.to_string())?;

    let tree = config.media_tree();
    let built = manifest::build_manifest(&tree, &config.playlist).map_err(|err| err.to_string())?;
    let path = manifest::write_manifest(
        &built,
        &tree.playlist_metadata(),
        &config.playlist.manifest_name,
    )
    .map_err(|err| err.to_string())?;

    println!("Saved playlist as {}", path.display());
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
        priority_list: None,
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
            "--priority-list" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --priority-list".to_string())?;
                options.priority_list = Some(PathBuf::from(value));
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }
    Ok(Some(options))
}

fn print_help() {
    println!("Usage: stimprep-playlist [options]");
    println!();
    println!("Collects metadata from every category folder under");
    println!("Create_Playlists/media and writes the playlist manifest JSON.");
    println!();
    println!("Options:");
    println!("  --config <path>         Config file (defaults to the app data dir)");
    println!("  --media-root <path>     Override the configured media root");
    println!("  --priority-list <path>  CSV with a `filename` column of priority stimuli");
}
