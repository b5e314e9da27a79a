//! Earth orientation: IAU 1976 precession, IAU 1980 nutation and IERS EOPs
//!
//! This crate computes the rotation between the J2000.0 mean celestial frame
//! and the Earth-fixed frame at a given instant, at three levels of fidelity:
//! precession only, precession and model nutation, or the full orientation
//! including Earth rotation and the measured Earth orientation parameters
//! (polar motion, UT1−UTC, nutation corrections) from an IERS `finals.all`
//! series.
//!
//! ```no_run
//! use earth_orientation::{EopStore, Epoch, Fidelity, FrameComposer};
//!
//! let mut store = EopStore::default();
//! store.load("finals.all")?;
//! let composer = FrameComposer::new(&store);
//! let orientation = composer.compose(Fidelity::FullOrientation, Epoch::utc(2457601.75))?;
//! println!("{:?}", orientation.row_major());
//! # Ok::<(), earth_orientation::OrientationError>(())
//! ```

use thiserror::Error;

pub mod constants;
pub mod earthlib;
pub mod eop;
pub mod framelib;
pub mod nutationlib;
pub mod precessionlib;
pub mod rotation;
pub mod time;

// Re-export commonly used types
pub use eop::{EopError, EopFlags, EopQuery, EopRange, EopStatus, EopStore, EopValues};
pub use framelib::{ComposerConfig, FallbackPolicy, Fidelity, FrameComposer, Orientation};
pub use time::{Epoch, Scale, Timescale};

/// Main error type for the earth-orientation library
#[derive(Debug, Error)]
pub enum OrientationError {
    #[error("EOP error: {0}")]
    Eop(#[from] EopError),

    #[error("EOPs unavailable ({flags:?}) and fallback is disabled")]
    EopUnavailable { flags: EopFlags },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for earth-orientation operations
pub type Result<T> = std::result::Result<T, OrientationError>;
