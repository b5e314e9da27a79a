//! Reader for the IERS `finals.all` (IAU 1980) fixed-width format
//!
//! Each row is one UTC day. Columns are 1-based and inclusive:
//!
//! | field           | Bulletin A | Bulletin B | unit |
//! |-----------------|------------|------------|------|
//! | MJD             | 8–15       |            | day  |
//! | PM flag         | 17         |            | I/P  |
//! | PM-x            | 19–27      | 135–144    | ″    |
//! | PM-y            | 38–46      | 145–154    | ″    |
//! | UT1 flag        | 58         |            | I/P  |
//! | UT1−UTC         | 59–68      | 155–165    | s    |
//! | nutation flag   | 96         |            | I/P  |
//! | dPsi            | 98–106     | 166–175    | mas  |
//! | dEps            | 117–125    | 176–185    | mas  |
//!
//! Files ending in `.gz` are decompressed on the fly.

use super::errors::{io_err, EopError, Result};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Which set of values to read from each row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bulletin {
    /// Rapid service values, including predictions
    #[default]
    A,
    /// Final values; present only for older rows
    B,
}

/// Options controlling how a finals file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinalsOptions {
    pub bulletin: Bulletin,
}

impl FromStr for Bulletin {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Bulletin::A),
            "b" => Ok(Bulletin::B),
            other => Err(format!("unknown bulletin '{}', expected A or B", other)),
        }
    }
}

impl FinalsOptions {
    pub fn bulletin(mut self, bulletin: Bulletin) -> Self {
        self.bulletin = bulletin;
        self
    }
}

/// One parsed row, still in file units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalsRow {
    /// 1-based line number the row came from
    pub line: usize,
    /// Whole-day Modified Julian date (UTC midnight)
    pub mjd: i32,
    /// Both polar motion and UT1 are flagged as IERS (measured) values
    pub observed: bool,
    /// PM-x and PM-y in arcseconds
    pub polar_motion: Option<(f64, f64)>,
    /// UT1−UTC in seconds
    pub ut1_minus_utc: Option<f64>,
    /// dPsi and dEps in milliarcseconds
    pub nutation: Option<(f64, f64)>,
}

impl FinalsRow {
    /// Row carries polar motion or UT1
    pub fn has_rotation_data(&self) -> bool {
        self.polar_motion.is_some() || self.ut1_minus_utc.is_some()
    }
}

struct Columns {
    pm_x: (usize, usize),
    pm_y: (usize, usize),
    ut1: (usize, usize),
    dpsi: (usize, usize),
    deps: (usize, usize),
}

const MJD_COLUMNS: (usize, usize) = (8, 15);
const PM_FLAG_COLUMN: usize = 17;
const UT1_FLAG_COLUMN: usize = 58;

const BULLETIN_A: Columns = Columns {
    pm_x: (19, 27),
    pm_y: (38, 46),
    ut1: (59, 68),
    dpsi: (98, 106),
    deps: (117, 125),
};

const BULLETIN_B: Columns = Columns {
    pm_x: (135, 144),
    pm_y: (145, 154),
    ut1: (155, 165),
    dpsi: (166, 175),
    deps: (176, 185),
};

impl Bulletin {
    fn columns(self) -> &'static Columns {
        match self {
            Bulletin::A => &BULLETIN_A,
            Bulletin::B => &BULLETIN_B,
        }
    }
}

/// Text of a 1-based inclusive column range, `None` when blank or past the end
fn field(line: &str, (start, end): (usize, usize)) -> Option<&str> {
    let end = end.min(line.len());
    if start > end {
        return None;
    }
    let text = line[start - 1..end].trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn flag(line: &str, column: usize) -> Option<u8> {
    line.as_bytes().get(column - 1).copied()
}

fn number(line_no: usize, name: &str, text: &str) -> Result<f64> {
    text.parse::<f64>().map_err(|_| EopError::Parse {
        line: line_no,
        message: format!("{} is not a number: {:?}", name, text),
    })
}

fn optional_number(line_no: usize, name: &str, text: Option<&str>) -> Result<Option<f64>> {
    text.map(|t| number(line_no, name, t)).transpose()
}

/// A pair of fields that must be present together
fn pair(
    line_no: usize,
    names: (&str, &str),
    values: (Option<f64>, Option<f64>),
) -> Result<Option<(f64, f64)>> {
    match values {
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (None, None) => Ok(None),
        _ => Err(EopError::Parse {
            line: line_no,
            message: format!("{} and {} must both be present", names.0, names.1),
        }),
    }
}

/// Parse a single non-blank line
pub fn parse_line(line_no: usize, line: &str, options: &FinalsOptions) -> Result<FinalsRow> {
    if !line.is_ascii() {
        return Err(EopError::Parse {
            line: line_no,
            message: "non-ASCII text in fixed-width row".to_string(),
        });
    }

    let mjd_text = field(line, MJD_COLUMNS).ok_or_else(|| EopError::Parse {
        line: line_no,
        message: "missing MJD".to_string(),
    })?;
    let mjd = number(line_no, "MJD", mjd_text)?;
    if mjd.fract() != 0.0 {
        return Err(EopError::Parse {
            line: line_no,
            message: format!("MJD {} is not a whole day", mjd),
        });
    }

    let columns = options.bulletin.columns();
    let pm_x = optional_number(line_no, "PM-x", field(line, columns.pm_x))?;
    let pm_y = optional_number(line_no, "PM-y", field(line, columns.pm_y))?;
    let ut1_minus_utc = optional_number(line_no, "UT1-UTC", field(line, columns.ut1))?;
    let dpsi = optional_number(line_no, "dPsi", field(line, columns.dpsi))?;
    let deps = optional_number(line_no, "dEps", field(line, columns.deps))?;

    let polar_motion = pair(line_no, ("PM-x", "PM-y"), (pm_x, pm_y))?;
    let nutation = pair(line_no, ("dPsi", "dEps"), (dpsi, deps))?;

    let observed = flag(line, PM_FLAG_COLUMN) == Some(b'I')
        && flag(line, UT1_FLAG_COLUMN) == Some(b'I')
        && polar_motion.is_some()
        && ut1_minus_utc.is_some();

    Ok(FinalsRow {
        line: line_no,
        mjd: mjd as i32,
        observed,
        polar_motion,
        ut1_minus_utc,
        nutation,
    })
}

/// Parse every row from a reader, skipping blank lines
pub fn parse_finals<R: BufRead>(reader: R, options: &FinalsOptions) -> Result<Vec<FinalsRow>> {
    let mut rows = Vec::new();
    let mut blank = 0usize;

    for (index, line_result) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line_result.map_err(|e| EopError::Parse {
            line: line_no,
            message: e.to_string(),
        })?;
        if line.trim().is_empty() {
            blank += 1;
            continue;
        }
        rows.push(parse_line(line_no, &line, options)?);
    }

    debug!("Parsed {} finals rows ({} blank lines skipped)", rows.len(), blank);

    if rows.is_empty() {
        return Err(EopError::Empty);
    }
    Ok(rows)
}

/// Read a finals file from disk (plain or gzipped)
pub fn read_finals<P: AsRef<Path>>(path: P, options: &FinalsOptions) -> Result<Vec<FinalsRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_err(path, e))?;

    let is_gzipped = path.extension().map_or(false, |ext| ext == "gz");
    let reader: Box<dyn BufRead> = if is_gzipped {
        debug!("Reading gzipped finals file: {}", path.display());
        let decoder = flate2::read::GzDecoder::new(BufReader::new(file));
        Box::new(BufReader::new(decoder))
    } else {
        debug!("Reading finals file: {}", path.display());
        Box::new(BufReader::new(file))
    };

    parse_finals(reader, options)
}

/// Format one row in Bulletin A columns
///
/// Values are written at the precision IERS publishes. Used to produce
/// fixtures and trimmed copies of a series. A value too wide for its
/// column is an error rather than being cut short.
pub fn format_row(row: &FinalsRow) -> Result<String> {
    let mut buf = vec![b' '; 125];
    let mut put = |(start, end): (usize, usize), text: String| -> Result<()> {
        let width = end - start + 1;
        if text.len() > width {
            return Err(EopError::Malformed(format!(
                "MJD {}: '{}' does not fit columns {}-{}",
                row.mjd, text, start, end
            )));
        }
        let padded = format!("{:>width$}", text, width = width);
        buf[start - 1..end].copy_from_slice(padded.as_bytes());
        Ok(())
    };

    put(MJD_COLUMNS, format!("{:.2}", row.mjd as f64))?;
    let status = if row.observed { "I" } else { "P" };
    if let Some((x, y)) = row.polar_motion {
        put((PM_FLAG_COLUMN, PM_FLAG_COLUMN), status.to_string())?;
        put(BULLETIN_A.pm_x, format!("{:.6}", x))?;
        put(BULLETIN_A.pm_y, format!("{:.6}", y))?;
    }
    if let Some(dut1) = row.ut1_minus_utc {
        put((UT1_FLAG_COLUMN, UT1_FLAG_COLUMN), status.to_string())?;
        put(BULLETIN_A.ut1, format!("{:.7}", dut1))?;
    }
    if let Some((dpsi, deps)) = row.nutation {
        put((96, 96), status.to_string())?;
        put(BULLETIN_A.dpsi, format!("{:.3}", dpsi))?;
        put(BULLETIN_A.deps, format!("{:.3}", deps))?;
    }

    Ok(String::from_utf8_lossy(&buf).trim_end().to_string())
}
