//! Generates thumbnail images for video stimuli.

use std::path::{Path, PathBuf};

use stimprep::config;
use stimprep::logging;
use stimprep::video;

const THUMBNAIL_HEIGHT: u32 = 400;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

struct Options {
    config: Option<PathBuf>,
    media_root: Option<PathBuf>,
    videos: Option<PathBuf>,
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

    let tree = config.media_tree();
    let thumbnail_dir = tree.video_thumbnails();
    std::fs::create_dir_all(&thumbnail_dir)
        .map_err(|err| format!("Failed to create {}: {err}", thumbnail_dir.display()))?;

    let videos = match &options.videos {
        Some(dir) => collect_videos(dir)?,
        None => collect_category_videos(&tree.playlist_media())?,
    };
    if videos.is_empty() {
        println!("No videos found.");
        return Ok(());
    }

    let summary = video::generate_thumbnails(
        &videos,
        &thumbnail_dir,
        Some(THUMBNAIL_HEIGHT),
        options.overwrite,
    );
    println!(
        "Thumbnail generation completed, {} image(s) written, {} skipped, {} failed.",
        summary.written, summary.skipped_existing, summary.failed
    );
    if summary.failed > 0 {
        return Err(format!("{} video(s) failed; see the log", summary.failed));
    }
    Ok(())
}

fn collect_videos(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let mut videos: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|err| format!("Failed to scan {}: {err}", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"))
        })
        .collect();
    videos.sort();
    Ok(videos)
}

fn collect_category_videos(media_dir: &Path) -> Result<Vec<PathBuf>, String> {
    let mut videos = Vec::new();
    let entries = std::fs::read_dir(media_dir)
        .map_err(|err| format!("Failed to scan {}: {err}", media_dir.display()))?;
    let mut categories: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    categories.sort();
    for category in categories {
        videos.extend(collect_videos(&category)?);
    }
    Ok(videos)
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(None);
    }
    let mut options = Options {
        config: None,
        media_root: None,
        videos: None,
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
            "--videos" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --videos".to_string())?;
                options.videos = Some(PathBuf::from(value));
            }
            "--overwrite" => options.overwrite = true,
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }
    Ok(Some(options))
}

fn print_help() {
    println!("Usage: stimprep-thumbnails [options]");
    println!();
    println!("Extracts one frame per .mp4 (a fifth of the way in, scaled to");
    println!("{THUMBNAIL_HEIGHT} px height) into images/Video thumbnails.");
    println!();
    println!("Options:");
    println!("  --config <path>      Config file (defaults to the app data dir)");
    println!("  --media-root <path>  Override the configured media root");
    println!("  --videos <path>      Scan this directory instead of the category folders");
    println!("  --overwrite          Regenerate thumbnails that already exist");
}
