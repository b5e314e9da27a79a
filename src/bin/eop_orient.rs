//! Earth Orientation Matrix Tool
//!
//! Loads an IERS `finals.all` series, prints the interpolated Earth
//! orientation parameters for an instant, and the precession, nutation and
//! full orientation matrices with and without those parameters.
//!
//! Usage:
//!   cargo run --bin eop_orient -- [now | JD | YYYY-MM-DD[THH:MM:SS]] [path/to/finals.all]

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{ArgAction, Parser};
use earth_orientation::constants::{ASEC2RAD, MAS2RAD, MJD_OFFSET};
use earth_orientation::eop::finals::{Bulletin, FinalsOptions};
use earth_orientation::time::calendar;
use earth_orientation::{
    ComposerConfig, EopStore, Epoch, FallbackPolicy, Fidelity, FrameComposer, Timescale,
};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Earth Orientation Matrix Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Shows Earth orientation parameters and frame rotation matrices for an instant",
    long_about = None
)]
struct Args {
    /// UTC instant: "now", a Julian date, or an ISO date/time
    #[arg(default_value = "now")]
    time: String,

    /// IERS finals.all file (optionally gzipped)
    #[arg(default_value = "finals.all")]
    eop_file: String,

    /// Largest interpolation window in days (overrides the config file)
    #[arg(short, long)]
    window: Option<usize>,

    /// JSON composer configuration
    #[arg(short, long)]
    config: Option<String>,

    /// Bulletin columns to read: A (rapid service) or B (final values)
    #[arg(short, long, default_value = "a")]
    bulletin: Bulletin,

    /// Fail instead of degrading when EOPs are unavailable
    #[arg(long, action = ArgAction::SetTrue)]
    strict: bool,
}

/// Parse "now", a Julian date or an ISO 8601 date/time into a UTC Julian date
fn parse_time(text: &str) -> Result<f64> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("now") {
        return Ok(Timescale::jd_from_datetime(Utc::now()));
    }
    if let Ok(jd) = text.parse::<f64>() {
        return Ok(jd);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Timescale::jd_from_datetime(dt.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Timescale::jd_from_datetime(naive.and_utc()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Timescale::jd_from_datetime(naive.and_utc()));
        }
    }
    Err(format!("Unrecognised time '{}'", text).into())
}

fn print_matrix(matrix: &[f64; 9]) {
    for row in matrix.chunks(3) {
        println!("{:15.11} {:15.11} {:15.11}", row[0], row[1], row[2]);
    }
}

fn print_matrices(composer: &FrameComposer, epoch: Epoch) -> Result<()> {
    let labels = [
        (Fidelity::Precession, "IAU1976 precession, no nutation:"),
        (Fidelity::PrecessionNutation, "With IAU1980 nutation:"),
        (Fidelity::FullOrientation, "Full orientation"),
    ];
    for (fidelity, label) in labels {
        let orientation = composer.compose(fidelity, epoch)?;
        println!("{}", label);
        print_matrix(&orientation.row_major());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ComposerConfig::from_json_file(path)?,
        None => ComposerConfig::default(),
    };
    if let Some(window) = args.window {
        config = config.max_window(window);
    }
    if args.strict {
        config = config.fallback(FallbackPolicy::Strict);
    }

    let jd_utc = parse_time(&args.time)?;
    let mut store =
        EopStore::default().with_options(FinalsOptions::default().bulletin(args.bulletin));
    let utc = Epoch::utc(jd_utc);
    let tdt = store.timescale().to_tdt(utc);

    match store.load(&args.eop_file) {
        Ok(_) => {
            if let Some(range) = store.range() {
                println!("EOPs start MJD {} = {}", range.first, calendar::format_mjd(range.first));
                println!(
                    "EOPs run to MJD {} = {} (including predictions)",
                    range.predicted_end,
                    calendar::format_mjd(range.predicted_end)
                );
                println!(
                    "EOPs run to MJD {} = {} (without extrapolation)",
                    range.observed_end,
                    calendar::format_mjd(range.observed_end)
                );
            }
        }
        Err(e) => println!("Problem loading EOPs from '{}': {}", args.eop_file, e),
    }

    println!("For JD {:.6} = {} UTC", jd_utc, calendar::format_datetime(jd_utc));

    let query = store.query(tdt, config.max_window);
    let timescale = store.timescale();
    if let Some(values) = query.values {
        println!(
            "Polar motion: {:.6} x, {:.6} y (arcseconds)",
            values.dx / ASEC2RAD,
            values.dy / ASEC2RAD
        );
        println!("TDT - UT1 = {:.6} seconds", values.tdt_minus_ut1);
        println!(
            "dPsi {:.6}; dEps {:.6} (milliarcseconds)",
            values.dpsi / MAS2RAD,
            values.deps / MAS2RAD
        );
        println!(
            "UT1 - UTC = {:.6}",
            timescale.tdt_minus_utc(jd_utc) - values.tdt_minus_ut1
        );
    }
    println!(
        "TDT - UT1 = {:.6} seconds (from 'standard' function)",
        timescale.delta_t(tdt.jd)
    );
    if !query.flags.is_empty() {
        println!(
            "Couldn't get some/all EOPs for MJD {:.3}: {:?} ({:?})",
            jd_utc - MJD_OFFSET,
            query.status(),
            query.flags
        );
    }

    if query.is_available() {
        println!("With EOPs :");
        print_matrices(&FrameComposer::with_config(&store, config), utc)?;
        store.unload();
    }

    println!("Without EOPs :");
    let without = config.fallback(FallbackPolicy::Degrade);
    print_matrices(&FrameComposer::with_config(&store, without), utc)?;

    Ok(())
}
