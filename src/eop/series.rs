//! A validated, day-indexed series of Earth orientation parameters

use super::errors::{EopError, Result};
use super::finals::FinalsRow;
use crate::constants::{ASEC2RAD, MAS2RAD, MJD_OFFSET};
use crate::time::Timescale;
use log::debug;

/// Interpolated or stored EOP values at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EopValues {
    /// Polar motion x (radians)
    pub dx: f64,
    /// Polar motion y (radians)
    pub dy: f64,
    /// Nutation correction in longitude (radians)
    pub dpsi: f64,
    /// Nutation correction in obliquity (radians)
    pub deps: f64,
    /// TDT−UT1 (seconds)
    pub tdt_minus_ut1: f64,
}

/// One stored day of the series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EopSample {
    /// UTC Modified Julian date of the row
    pub mjd: i32,
    pub values: EopValues,
}

/// Boundary markers of a series as whole-day MJDs
///
/// `first <= observed_end <= predicted_end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EopRange {
    pub first: i32,
    /// Last day whose polar motion and UT1 are both measured
    pub observed_end: i32,
    /// Last day carrying polar motion or UT1
    pub predicted_end: i32,
}

impl EopRange {
    pub fn contains(&self, mjd: f64) -> bool {
        mjd >= self.first as f64 && mjd <= self.predicted_end as f64
    }

    /// Number of days spanned
    pub fn len(&self) -> usize {
        (self.predicted_end - self.first + 1) as usize
    }
}

/// Per-field sample columns, each a prefix of the day index
///
/// Fields may end at different days. Index `i` of every column is day
/// `range.first + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct EopSeries {
    range: EopRange,
    dx: Vec<f64>,
    dy: Vec<f64>,
    dpsi: Vec<f64>,
    deps: Vec<f64>,
    tdt_minus_ut1: Vec<f64>,
}

/// Push a field value, enforcing that the field's coverage stays a prefix
fn push_prefix<T>(
    column: &mut Vec<T>,
    ended: &mut bool,
    value: Option<T>,
    name: &str,
    row: &FinalsRow,
) -> Result<()> {
    match value {
        Some(_) if *ended => Err(EopError::Malformed(format!(
            "{} resumes on line {} (MJD {}) after a gap",
            name, row.line, row.mjd
        ))),
        Some(v) => {
            column.push(v);
            Ok(())
        }
        None => {
            *ended = true;
            Ok(())
        }
    }
}

impl EopSeries {
    /// Build a series from parsed finals rows
    ///
    /// Trailing rows with neither polar motion nor UT1 are dropped. TDT−UT1
    /// is derived from UT1−UTC and the leap second table of `timescale`.
    pub fn from_rows(rows: &[FinalsRow], timescale: &Timescale) -> Result<Self> {
        let used = rows
            .iter()
            .rposition(FinalsRow::has_rotation_data)
            .map(|last| &rows[..=last])
            .ok_or(EopError::Empty)?;
        let skipped = rows.len() - used.len();

        let first = used[0].mjd;
        let mut observed_end = None;
        let mut pm = Vec::with_capacity(used.len());
        let mut ut1 = Vec::with_capacity(used.len());
        let mut nutation = Vec::with_capacity(used.len());
        let (mut pm_ended, mut ut1_ended, mut nutation_ended) = (false, false, false);

        for (i, row) in used.iter().enumerate() {
            let expected = i32::try_from(i)
                .ok()
                .and_then(|offset| first.checked_add(offset))
                .ok_or_else(|| {
                    EopError::Malformed(format!(
                        "line {} runs past the last representable MJD",
                        row.line
                    ))
                })?;
            if row.mjd != expected {
                return Err(EopError::Malformed(format!(
                    "line {} has MJD {}, expected {}",
                    row.line, row.mjd, expected
                )));
            }
            if row.observed {
                observed_end = Some(row.mjd);
            }

            let tdt_minus_ut1 = row
                .ut1_minus_utc
                .map(|dut1| timescale.tdt_minus_utc(row.mjd as f64 + MJD_OFFSET) - dut1);

            push_prefix(&mut pm, &mut pm_ended, row.polar_motion, "polar motion", row)?;
            push_prefix(&mut ut1, &mut ut1_ended, tdt_minus_ut1, "UT1-UTC", row)?;
            push_prefix(&mut nutation, &mut nutation_ended, row.nutation, "nutation", row)?;
        }

        let observed_end = observed_end
            .ok_or_else(|| EopError::Malformed("no observed (IERS) rows".to_string()))?;
        if nutation.is_empty() {
            return Err(EopError::Malformed("no nutation corrections".to_string()));
        }
        if pm.is_empty() || ut1.is_empty() {
            return Err(EopError::Malformed(
                "polar motion and UT1 must start on the first row".to_string(),
            ));
        }

        let range = EopRange {
            first,
            observed_end,
            predicted_end: used[used.len() - 1].mjd,
        };

        debug!(
            "EOP series MJD {}..{} (observed to {}): {} polar motion, {} UT1, {} nutation days, {} trailing rows skipped",
            range.first,
            range.predicted_end,
            range.observed_end,
            pm.len(),
            ut1.len(),
            nutation.len(),
            skipped
        );

        Ok(Self {
            range,
            dx: pm.iter().map(|&(x, _)| x * ASEC2RAD).collect(),
            dy: pm.iter().map(|&(_, y)| y * ASEC2RAD).collect(),
            dpsi: nutation.iter().map(|&(p, _)| p * MAS2RAD).collect(),
            deps: nutation.iter().map(|&(_, e)| e * MAS2RAD).collect(),
            tdt_minus_ut1: ut1,
        })
    }

    pub fn range(&self) -> EopRange {
        self.range
    }

    /// Number of days in the series
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Stored values for a day, if every field covers it
    pub fn sample(&self, mjd: i32) -> Option<EopSample> {
        let i = usize::try_from(mjd.checked_sub(self.range.first)?).ok()?;
        Some(EopSample {
            mjd,
            values: EopValues {
                dx: *self.dx.get(i)?,
                dy: *self.dy.get(i)?,
                dpsi: *self.dpsi.get(i)?,
                deps: *self.deps.get(i)?,
                tdt_minus_ut1: *self.tdt_minus_ut1.get(i)?,
            },
        })
    }

    pub(crate) fn polar_motion_columns(&self) -> (&[f64], &[f64]) {
        (&self.dx, &self.dy)
    }

    pub(crate) fn nutation_columns(&self) -> (&[f64], &[f64]) {
        (&self.dpsi, &self.deps)
    }

    pub(crate) fn tdt_minus_ut1_column(&self) -> &[f64] {
        &self.tdt_minus_ut1
    }
}
