//! Owner of the loaded EOP series

use super::errors::Result;
use super::finals::{read_finals, FinalsOptions, FinalsRow};
use super::interpolate::{interpolate, EopFlags, EopQuery};
use super::series::{EopRange, EopSeries};
use crate::constants::MJD_OFFSET;
use crate::time::{Epoch, Timescale};
use log::{info, warn};
use std::path::Path;

/// Holds at most one EOP series and answers queries against it
///
/// Loading replaces the series only on success; a failed load leaves the
/// previous series in place.
#[derive(Debug, Clone, Default)]
pub struct EopStore {
    timescale: Timescale,
    options: FinalsOptions,
    series: Option<EopSeries>,
}

impl EopStore {
    pub fn new(timescale: Timescale) -> Self {
        Self {
            timescale,
            options: FinalsOptions::default(),
            series: None,
        }
    }

    pub fn with_options(mut self, options: FinalsOptions) -> Self {
        self.options = options;
        self
    }

    pub fn timescale(&self) -> &Timescale {
        &self.timescale
    }

    /// Load a finals file, returning the number of days stored
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let result = read_finals(path, &self.options).and_then(|rows| self.load_rows(&rows));
        if let Err(e) = &result {
            warn!(
                "Failed to load EOP series from {}: {} (keeping {})",
                path.display(),
                e,
                if self.is_loaded() { "previous series" } else { "no series" }
            );
        }
        result
    }

    /// Replace the series with one built from already parsed rows
    pub fn load_rows(&mut self, rows: &[FinalsRow]) -> Result<usize> {
        let series = EopSeries::from_rows(rows, &self.timescale)?;
        let range = series.range();
        info!(
            "Loaded EOP series: MJD {} to {} (observed to {}), {} days",
            range.first,
            range.predicted_end,
            range.observed_end,
            series.len()
        );
        let count = series.len();
        self.series = Some(series);
        Ok(count)
    }

    /// Release the series; later queries report `NO_SERIES`
    pub fn unload(&mut self) {
        if self.series.take().is_some() {
            info!("Unloaded EOP series");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.series.is_some()
    }

    pub fn series(&self) -> Option<&EopSeries> {
        self.series.as_ref()
    }

    pub fn range(&self) -> Option<EopRange> {
        self.series.as_ref().map(EopSeries::range)
    }

    /// Interpolated EOPs at `epoch`
    ///
    /// The series is indexed by UTC day. TDT epochs are converted with the
    /// leap second table; UT1 epochs are used as UTC directly.
    pub fn query(&self, epoch: Epoch, max_window: usize) -> EopQuery {
        match &self.series {
            None => EopQuery::unavailable(EopFlags::NO_SERIES),
            Some(series) => {
                let mjd_utc = self.timescale.to_utc(epoch).jd - MJD_OFFSET;
                interpolate(series, mjd_utc, max_window)
            }
        }
    }
}
