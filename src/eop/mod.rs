//! Earth orientation parameters (EOPs)
//!
//! This module loads the IERS `finals.all` series and interpolates polar
//! motion, nutation corrections and TDT−UT1 at arbitrary epochs.
//!
//! # Main Components
//!
//! - `finals`: fixed-width reader for `finals.all` (plain or gzipped)
//! - `series`: the validated, day-indexed series and its range markers
//! - `interpolate`: Lagrange interpolation and the degradation flags
//! - `store`: load/unload lifecycle and the query entry point

pub mod errors;
pub mod finals;
pub mod interpolate;
pub mod series;
pub mod store;

pub use self::errors::EopError;
pub use self::finals::{Bulletin, FinalsOptions, FinalsRow};
pub use self::interpolate::{EopFlags, EopQuery, EopStatus};
pub use self::series::{EopRange, EopSample, EopSeries, EopValues};
pub use self::store::EopStore;
