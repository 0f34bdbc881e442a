//! Generates the stereo pause cue tone used between acquisition blocks.

use std::path::PathBuf;

use stimprep::cue::PauseTone;
use stimprep::logging;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

struct Options {
    out_dir: PathBuf,
    tone: PauseTone,
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let path = options
        .tone
        .write_to_dir(&options.out_dir)
        .map_err(|err| err.to_string())?;
    println!("Created {}", path.display());
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(None);
    }
    let mut options = Options {
        out_dir: PathBuf::from("."),
        tone: PauseTone::default(),
    };
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--out" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --out".to_string())?;
                options.out_dir = PathBuf::from(value);
            }
            "--duration" => {
                options.tone.sound_duration = parse_value(it.next(), "--duration")?;
            }
            "--pulse-start" => {
                options.tone.trigger_start = parse_value(it.next(), "--pulse-start")?;
            }
            "--pulse-width" => {
                options.tone.trigger_duration = parse_value(it.next(), "--pulse-width")?;
            }
            "--amplitude" => {
                options.tone.amplitude = parse_value(it.next(), "--amplitude")?;
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }
    if options.tone.sound_duration <= 0.0 {
        return Err("--duration must be positive".to_string());
    }
    Ok(Some(options))
}

fn parse_value<T: std::str::FromStr>(value: Option<String>, flag: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let value = value.ok_or_else(|| format!("Missing value for {flag}"))?;
    value.parse().map_err(|err| format!("Invalid {flag}: {err}"))
}

fn print_help() {
    println!("Usage: stimprep-pause-tone [options]");
    println!();
    println!("Writes a stereo WAV that is silent on channel 1 and carries a");
    println!("single pulse on channel 2, named trigger_pause_<ms>ms.wav.");
    println!();
    println!("Options:");
    println!("  --out <dir>        Output directory (defaults to the current directory)");
    println!("  --duration <s>     File duration in seconds (default 0.5)");
    println!("  --pulse-start <s>  Pulse onset in seconds (default 0.05)");
    println!("  --pulse-width <s>  Pulse width in seconds (default 0.0035)");
    println!("  --amplitude <a>    Pulse amplitude 0..1 (default 1.0)");
    println!();
    println!("Example: stimprep-pause-tone --out assets/ --duration 0.5");
}
