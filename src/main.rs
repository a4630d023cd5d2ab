//! dacapo: repair broken M3U playlists against a music library.
//!
//! Usage:
//!   dacapo <playlist.m3u> <music-root>...
//!   dacapo apply <playlist.m3u> <identity> <chosen-path>
//!
//! All repair logic lives behind the session controller; this entry point
//! only parses arguments, loads settings and prints results.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dacapo::config::Settings;
use dacapo::{Error, Result, Session};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dacapo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("apply") => run_apply(&args[1..]),
        Some(_) => run_repair(&args),
        None => {
            print_usage();
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: dacapo <playlist.m3u> <music-root>...");
    eprintln!("       dacapo apply <playlist.m3u> <identity> <chosen-path>");
}

fn run_repair(args: &[String]) -> Result<()> {
    let [playlist_path, roots @ ..] = args else {
        unreachable!("caller checked for at least one argument");
    };
    if roots.is_empty() {
        print_usage();
        std::process::exit(2);
    }
    let playlist_path = PathBuf::from(playlist_path);
    let roots: Vec<PathBuf> = roots.iter().map(PathBuf::from).collect();

    let settings = load_settings()?;
    let mut session = Session::new(settings);

    let stats = session.build_index(&roots)?;
    println!(
        "Indexed {} of {} files ({} unsupported skipped)",
        stats.indexed, stats.files_seen, stats.skipped_unsupported
    );

    session.import_playlist(&playlist_path)?;
    let summary = session.repair()?;

    println!();
    for row in session.report_rows() {
        match &row.resolved_path {
            Some(path) => println!(
                "  [{:<9}] #{} {} -> {}",
                row.status.as_str(),
                row.ordinal,
                row.original_path,
                path.display()
            ),
            None => println!(
                "  [{:<9}] #{} {} ({} candidates)",
                row.status.as_str(),
                row.ordinal,
                row.original_path,
                row.candidate_count
            ),
        }
    }

    println!();
    println!("Entries:   {}", summary.total);
    println!("Kept:      {}", summary.kept);
    println!("Repaired:  {}", summary.repaired);
    println!("Ambiguous: {}", summary.ambiguous);
    println!("Failed:    {}", summary.failed);
    println!("Selected:  {}", summary.manual);

    if summary.unresolved() > 0 {
        println!();
        println!("Needs a manual pick (dacapo apply <playlist> <identity> <path>):");
        for entry in session.unresolved() {
            println!("  {}", entry.identity);
            for candidate in entry.resolution.candidates() {
                println!("      candidate: {}", candidate.path.display());
            }
        }
    }

    let out_path = session.save()?;
    println!();
    println!("Wrote {}", out_path.display());
    Ok(())
}

fn run_apply(args: &[String]) -> Result<()> {
    let [playlist_path, identity, chosen] = args else {
        print_usage();
        std::process::exit(2);
    };

    let settings = load_settings()?;
    let mut session = Session::new(settings);
    session.import_playlist(Path::new(playlist_path))?;
    session.apply_selection(identity, Path::new(chosen))?;
    let out_path = session.save()?;

    println!("Recorded selection for {identity}");
    println!("Wrote {}", out_path.display());
    Ok(())
}

fn load_settings() -> Result<Settings> {
    let settings = Settings::load()?;
    settings.validate().map_err(Error::Settings)?;
    Ok(settings)
}
