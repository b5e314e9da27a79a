//! Composition of precession, nutation, Earth rotation and polar motion

use crate::constants::{DAY_S, J2000_YEAR};
use crate::earthlib::{earth_rotation_matrix, gast, polar_motion_matrix};
use crate::eop::{EopFlags, EopStore};
use crate::nutationlib::{mean_obliquity, nutation_angles, nutation_matrix_from_angles};
use crate::precessionlib::{precession_from_j2000, precession_matrix};
use crate::rotation::to_row_major;
use crate::time::Epoch;
use crate::{OrientationError, Result};
use log::warn;
use nalgebra::Matrix3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// How much of the Earth's orientation to model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fidelity {
    /// J2000.0 mean frame to mean frame of date
    Precession,
    /// J2000.0 mean frame to true frame of date (model nutation)
    PrecessionNutation,
    /// J2000.0 mean frame to the Earth-fixed frame, with EOP corrections
    FullOrientation,
}

/// What full orientation does when no EOPs are available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Use model nutation and ΔT, skip polar motion, flag the result
    #[default]
    Degrade,
    /// Fail with [`OrientationError::EopUnavailable`]
    Strict,
}

/// Composer settings, loadable from JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Largest interpolation stencil in days
    pub max_window: usize,
    pub fallback: FallbackPolicy,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_window: 31,
            fallback: FallbackPolicy::Degrade,
        }
    }
}

impl ComposerConfig {
    /// Read a configuration such as `{"max_window": 4, "fallback": "strict"}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        if config.max_window == 0 {
            return Err(OrientationError::Config(
                "max_window must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn max_window(mut self, max_window: usize) -> Self {
        self.max_window = max_window;
        self
    }

    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

/// A composed frame rotation and how it was obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub fidelity: Fidelity,
    pub matrix: Matrix3<f64>,
    /// Flags from the EOP lookup, empty unless fidelity is full
    pub eop_flags: EopFlags,
    /// Whether measured EOPs went into the matrix
    pub eop_applied: bool,
}

impl Orientation {
    fn model(fidelity: Fidelity, matrix: Matrix3<f64>) -> Self {
        Self {
            fidelity,
            matrix,
            eop_flags: EopFlags::empty(),
            eop_applied: false,
        }
    }

    /// Full orientation computed without measured EOPs
    pub fn is_degraded(&self) -> bool {
        self.fidelity == Fidelity::FullOrientation && !self.eop_applied
    }

    pub fn row_major(&self) -> [f64; 9] {
        to_row_major(&self.matrix)
    }
}

/// Builds orientation matrices against an EOP store
///
/// Every matrix maps vectors in the J2000.0 mean frame (column vectors) into
/// the target frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameComposer<'a> {
    store: &'a EopStore,
    config: ComposerConfig,
}

impl<'a> FrameComposer<'a> {
    pub fn new(store: &'a EopStore) -> Self {
        Self::with_config(store, ComposerConfig::default())
    }

    pub fn with_config(store: &'a EopStore, config: ComposerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Precession between two Julian epoch years (TDT)
    pub fn setup_precession(&self, year_from: f64, year_to: f64) -> Matrix3<f64> {
        precession_matrix(year_from, year_to)
    }

    /// Model nutation times precession from J2000.0, `N · P`
    pub fn setup_with_nutation(&self, epoch: Epoch) -> Matrix3<f64> {
        let t = self.store.timescale().to_tdt(epoch).julian_centuries();
        let (dpsi, deps) = nutation_angles(t);
        nutation_matrix_from_angles(mean_obliquity(t), dpsi, deps) * precession_from_j2000(t)
    }

    /// J2000.0 mean frame to Earth-fixed, `W · R3(GAST) · N · P`
    ///
    /// Nutation corrections, polar motion and UT1 come from the store. When
    /// the store cannot answer, the result is degraded (or an error under
    /// [`FallbackPolicy::Strict`]). UT1 input epochs are converted to TDT with
    /// the model ΔT.
    pub fn setup_full(&self, epoch: Epoch) -> Result<Orientation> {
        let timescale = self.store.timescale();
        let tdt = timescale.to_tdt(epoch);
        let t = tdt.julian_centuries();

        let precession = precession_from_j2000(t);
        let obliquity = mean_obliquity(t);
        let (mut dpsi, mut deps) = nutation_angles(t);

        let query = self.store.query(tdt, self.config.max_window);
        let (polar_motion, tdt_minus_ut1, eop_flags, eop_applied) = match query.values {
            Some(values) => {
                dpsi += values.dpsi;
                deps += values.deps;
                (
                    polar_motion_matrix(values.dx, values.dy),
                    values.tdt_minus_ut1,
                    query.flags,
                    true,
                )
            }
            None => {
                if self.config.fallback == FallbackPolicy::Strict {
                    return Err(OrientationError::EopUnavailable { flags: query.flags });
                }
                warn!(
                    "No EOPs for {} ({:?}); using model nutation and ΔT without polar motion",
                    epoch, query.flags
                );
                (
                    Matrix3::identity(),
                    timescale.delta_t(tdt.jd),
                    query.flags | EopFlags::FALLBACK_DELTA_T,
                    false,
                )
            }
        };

        let jd_ut1 = tdt.jd - tdt_minus_ut1 / DAY_S;
        let nutation = nutation_matrix_from_angles(obliquity, dpsi, deps);
        let rotation = earth_rotation_matrix(gast(jd_ut1, t, dpsi, obliquity));

        Ok(Orientation {
            fidelity: Fidelity::FullOrientation,
            matrix: polar_motion * rotation * nutation * precession,
            eop_flags,
            eop_applied,
        })
    }

    /// Orientation at `epoch` for the requested fidelity
    ///
    /// Precession runs from J2000.0 to the epoch's Julian year.
    pub fn compose(&self, fidelity: Fidelity, epoch: Epoch) -> Result<Orientation> {
        match fidelity {
            Fidelity::Precession => {
                let year = self.store.timescale().to_tdt(epoch).julian_year();
                Ok(Orientation::model(fidelity, self.setup_precession(J2000_YEAR, year)))
            }
            Fidelity::PrecessionNutation => {
                Ok(Orientation::model(fidelity, self.setup_with_nutation(epoch)))
            }
            Fidelity::FullOrientation => self.setup_full(epoch),
        }
    }
}
