//! Local Lagrange interpolation over an [`EopSeries`]
//!
//! Each field is interpolated on its own column with a stencil of at most
//! four samples (cubic), centred on the target and shifted inward at the
//! edges of the column. Past the end of a column the field is frozen at its
//! last sample and the matching flag is raised.

use super::series::{EopSeries, EopValues};
use bitflags::bitflags;

/// Widest stencil ever used (cubic)
pub const MAX_STENCIL: usize = 4;

bitflags! {
    /// Degradation markers attached to an EOP query
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EopFlags: u32 {
        /// No series is loaded
        const NO_SERIES = 1 << 0;
        /// Target lies outside `[first, predicted_end]`
        const OUT_OF_RANGE = 1 << 1;
        /// Target lies past the last observed day
        const PREDICTED = 1 << 2;
        /// Polar motion held at its last sample
        const POLAR_MOTION_FROZEN = 1 << 3;
        /// TDT−UT1 held at its last sample
        const UT1_FROZEN = 1 << 4;
        /// Nutation corrections held at their last sample
        const NUTATION_FROZEN = 1 << 5;
        /// A field had fewer samples than the requested stencil
        const WINDOW_CLIPPED = 1 << 6;
        /// Earth rotation used the model ΔT instead of measured UT1
        const FALLBACK_DELTA_T = 1 << 7;

        /// Flags meaning no values could be produced
        const UNAVAILABLE = Self::NO_SERIES.bits() | Self::OUT_OF_RANGE.bits();
    }
}

/// Overall outcome of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EopStatus {
    /// Every field interpolated at full precision
    Full,
    /// Values returned, but some are degraded (see the flags)
    Partial,
    /// No values
    Unavailable,
}

/// Result of an EOP lookup; owns its values and never borrows the series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EopQuery {
    pub values: Option<EopValues>,
    pub flags: EopFlags,
}

impl EopQuery {
    pub fn unavailable(flags: EopFlags) -> Self {
        Self {
            values: None,
            flags,
        }
    }

    pub fn status(&self) -> EopStatus {
        if self.values.is_none() || self.flags.intersects(EopFlags::UNAVAILABLE) {
            EopStatus::Unavailable
        } else if self.flags.is_empty() {
            EopStatus::Full
        } else {
            EopStatus::Partial
        }
    }

    pub fn is_available(&self) -> bool {
        self.status() != EopStatus::Unavailable
    }
}

/// Lagrange polynomial through `(xs[i], ys[i])` evaluated at `x`
pub fn lagrange(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let mut sum = 0.0;
    for (i, (&xi, &yi)) in xs.iter().zip(ys).enumerate() {
        let mut weight = 1.0;
        for (j, &xj) in xs.iter().enumerate() {
            if i != j {
                weight *= (x - xj) / (xi - xj);
            }
        }
        sum += weight * yi;
    }
    sum
}

/// One field's interpolated value
#[derive(Debug, Clone, Copy, PartialEq)]
struct FieldValue {
    value: f64,
    frozen: bool,
    clipped: bool,
}

/// Interpolate one column at offset `x` (days since the first sample)
///
/// `x` must be non-negative and `column` non-empty.
fn interpolate_column(column: &[f64], x: f64, stencil: usize) -> FieldValue {
    let n = column.len();
    let last = (n - 1) as f64;

    if x >= last {
        return FieldValue {
            value: column[n - 1],
            frozen: x > last,
            clipped: false,
        };
    }
    if x.fract() == 0.0 {
        return FieldValue {
            value: column[x as usize],
            frozen: false,
            clipped: false,
        };
    }

    let clipped = n < stencil;
    let width = stencil.min(n);
    let centred = (x - (width - 1) as f64 / 2.0).round().max(0.0) as usize;
    let start = centred.min(n - width);

    let xs: Vec<f64> = (start..start + width).map(|i| i as f64).collect();
    FieldValue {
        value: lagrange(x, &xs, &column[start..start + width]),
        frozen: false,
        clipped,
    }
}

/// Query a series at a UTC Modified Julian date
///
/// `max_window` is the largest stencil allowed, in samples; it is raised to
/// at least one and capped at [`MAX_STENCIL`].
///
/// Near either end of a column the stencil keeps its full width and is
/// shifted inward. That shift is not flagged; `WINDOW_CLIPPED` is raised
/// only when a column holds fewer samples than the stencil.
pub fn interpolate(series: &EopSeries, mjd_utc: f64, max_window: usize) -> EopQuery {
    let range = series.range();
    if !range.contains(mjd_utc) {
        return EopQuery::unavailable(EopFlags::OUT_OF_RANGE);
    }

    let stencil = max_window.clamp(1, MAX_STENCIL);
    let x = mjd_utc - range.first as f64;
    let mut flags = EopFlags::empty();
    if mjd_utc > range.observed_end as f64 {
        flags |= EopFlags::PREDICTED;
    }

    let mut field = |column: &[f64], frozen_flag: EopFlags| {
        let result = interpolate_column(column, x, stencil);
        if result.frozen {
            flags |= frozen_flag;
        }
        if result.clipped {
            flags |= EopFlags::WINDOW_CLIPPED;
        }
        result.value
    };

    let (dx_column, dy_column) = series.polar_motion_columns();
    let (dpsi_column, deps_column) = series.nutation_columns();
    let values = EopValues {
        dx: field(dx_column, EopFlags::POLAR_MOTION_FROZEN),
        dy: field(dy_column, EopFlags::POLAR_MOTION_FROZEN),
        dpsi: field(dpsi_column, EopFlags::NUTATION_FROZEN),
        deps: field(deps_column, EopFlags::NUTATION_FROZEN),
        tdt_minus_ut1: field(series.tdt_minus_ut1_column(), EopFlags::UT1_FROZEN),
    };

    EopQuery {
        values: Some(values),
        flags,
    }
}
