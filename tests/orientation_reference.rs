//! End-to-end checks of the orientation pipeline against published values
//!
//! The reference matrix comes from the Paris Observatory Earth orientation
//! matrix calculator for 2016-08-01 06:00 UTC:
//! https://hpiers.obspm.fr/eop-pc/index.php?index=matrice

use approx::assert_abs_diff_eq;
use earth_orientation::constants::{ASEC2RAD, MAS2RAD, MJD_OFFSET};
use earth_orientation::eop::finals::{format_row, FinalsRow};
use earth_orientation::rotation::orthogonality_error;
use earth_orientation::{
    EopFlags, EopStatus, EopStore, Epoch, Fidelity, FrameComposer, Timescale,
};
use nalgebra::Matrix3;
use std::io::Write;
use tempfile::NamedTempFile;

const EPOCH_JD_UTC: f64 = 2457601.75;
const FIRST_MJD: i32 = 57571;
const DAYS: usize = 61;
const OBSERVED_DAYS: usize = 40;

// EOPs interpolated from finals.all at the epoch
const PM_X: f64 = 0.213166;
const PM_Y: f64 = 0.449051;
const UT1_MINUS_UTC: f64 = -0.225540;
const DPSI_MAS: f64 = -103.915177;
const DEPS_MAS: f64 = -13.507789;

fn reference_matrix() -> Matrix3<f64> {
    Matrix3::new(
        0.765292427840, 0.643681651530, -0.001196400550,
        -0.643680769394, 0.765293361626, 0.001066660273,
        0.001602187045, -0.000046207004, 0.999998715430,
    )
}

/// A series holding the epoch's EOPs constant over two months
fn constant_rows() -> Vec<FinalsRow> {
    (0..DAYS)
        .map(|i| FinalsRow {
            line: i + 1,
            mjd: FIRST_MJD + i as i32,
            observed: i < OBSERVED_DAYS,
            polar_motion: Some((PM_X, PM_Y)),
            ut1_minus_utc: Some(UT1_MINUS_UTC),
            nutation: Some((DPSI_MAS, DEPS_MAS)),
        })
        .collect()
}

/// Daily rates from the genuine 2016-07-31 and 2016-08-01 finals rows
const PM_X_RATE: f64 = 0.213166 - 0.212262;
const PM_Y_RATE: f64 = 0.449051 - 0.450225;
const UT1_RATE: f64 = -0.2255402 + 0.2252563;
const DPSI_RATE: f64 = -103.915 + 103.952;
const DEPS_RATE: f64 = -13.508 + 13.519;

/// A series that varies day to day and passes through the epoch's EOPs
///
/// Each field is a cubic in time, which the four-point stencil reproduces.
fn varying_rows() -> Vec<FinalsRow> {
    let epoch_mjd = EPOCH_JD_UTC - MJD_OFFSET;
    let shape = |value: f64, rate: f64, d: f64| {
        value + rate * d * (1.0 + 0.02 * d - 1e-3 * d * d)
    };
    (0..DAYS)
        .map(|i| {
            let mjd = FIRST_MJD + i as i32;
            let d = mjd as f64 - epoch_mjd;
            FinalsRow {
                line: i + 1,
                mjd,
                observed: i < OBSERVED_DAYS,
                polar_motion: Some((shape(PM_X, PM_X_RATE, d), shape(PM_Y, PM_Y_RATE, d))),
                ut1_minus_utc: Some(shape(UT1_MINUS_UTC, UT1_RATE, d)),
                nutation: Some((shape(DPSI_MAS, DPSI_RATE, d), shape(DEPS_MAS, DEPS_RATE, d))),
            }
        })
        .collect()
}

fn write_finals(rows: &[FinalsRow]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(file, "{}", format_row(row).unwrap()).unwrap();
    }
    file.flush().unwrap();
    file
}

fn mjd_epoch(mjd: i32) -> Epoch {
    Epoch::utc(mjd as f64 + MJD_OFFSET)
}

#[test]
fn full_orientation_reproduces_reference_matrix() {
    let mut store = EopStore::new(Timescale::default());
    store.load_rows(&constant_rows()).unwrap();

    let orientation = FrameComposer::new(&store)
        .compose(Fidelity::FullOrientation, Epoch::utc(EPOCH_JD_UTC))
        .unwrap();

    assert!(orientation.eop_applied);
    assert!(orientation.eop_flags.is_empty());
    assert_abs_diff_eq!(orientation.matrix, reference_matrix(), epsilon = 1e-8);
    assert!(orthogonality_error(&orientation.matrix) < 1e-12);
}

#[test]
fn full_orientation_from_file_reproduces_reference_matrix() {
    // The file format rounds nutation corrections to 1 µas
    let file = write_finals(&constant_rows());
    let mut store = EopStore::default();
    assert_eq!(store.load(file.path()).unwrap(), DAYS);

    let query = store.query(Epoch::utc(EPOCH_JD_UTC), 31);
    assert_eq!(query.status(), EopStatus::Full);
    let values = query.values.unwrap();
    assert_abs_diff_eq!(values.tdt_minus_ut1, 68.409540, epsilon = 1e-9);

    let orientation = FrameComposer::new(&store)
        .setup_full(Epoch::utc(EPOCH_JD_UTC))
        .unwrap();
    assert_abs_diff_eq!(orientation.matrix, reference_matrix(), epsilon = 1e-8);
}

#[test]
fn interpolated_series_reproduces_reference_matrix() {
    let mut store = EopStore::default();
    store.load_rows(&varying_rows()).unwrap();
    let epoch = Epoch::utc(EPOCH_JD_UTC);

    let query = store.query(epoch, 31);
    assert_eq!(query.status(), EopStatus::Full);
    let values = query.values.unwrap();
    assert_abs_diff_eq!(values.dx, PM_X * ASEC2RAD, epsilon = 1e-15);
    assert_abs_diff_eq!(values.dpsi, DPSI_MAS * MAS2RAD, epsilon = 1e-15);
    assert_abs_diff_eq!(values.tdt_minus_ut1, 68.184 - UT1_MINUS_UTC, epsilon = 1e-9);

    // The day's own sample is far enough off that interpolation matters
    let day = store.series().unwrap().sample(57601).unwrap().values;
    assert!((day.tdt_minus_ut1 - values.tdt_minus_ut1).abs() > 5e-5);

    let orientation = FrameComposer::new(&store).setup_full(epoch).unwrap();
    assert!(orientation.eop_applied);
    assert_abs_diff_eq!(orientation.matrix, reference_matrix(), epsilon = 1e-8);
}

#[test]
fn precession_level_matches_published_values() {
    let store = EopStore::default();
    let orientation = FrameComposer::new(&store)
        .compose(Fidelity::Precession, Epoch::utc(EPOCH_JD_UTC))
        .unwrap();
    let expected = [
        0.99999182608, -0.00370830410, -0.00161128711,
        0.00370830409, 0.99999312421, -0.00000299239,
        0.00161128713, -0.00000298278, 0.99999870187,
    ];
    for (got, want) in orientation.row_major().iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-8);
    }
}

#[test]
fn range_boundaries() {
    let mut store = EopStore::default();
    store.load_rows(&constant_rows()).unwrap();
    let range = store.range().unwrap();
    assert_eq!(range.first, FIRST_MJD);
    assert_eq!(range.observed_end, FIRST_MJD + OBSERVED_DAYS as i32 - 1);
    assert_eq!(range.predicted_end, FIRST_MJD + DAYS as i32 - 1);

    let before = store.query(mjd_epoch(range.first - 1), 31);
    assert_eq!(before.status(), EopStatus::Unavailable);
    assert!(before.flags.contains(EopFlags::OUT_OF_RANGE));

    let after = store.query(mjd_epoch(range.predicted_end + 1), 31);
    assert_eq!(after.status(), EopStatus::Unavailable);

    let predicted = store.query(mjd_epoch(range.observed_end + 1), 31);
    assert_eq!(predicted.status(), EopStatus::Partial);
    assert!(predicted.flags.contains(EopFlags::PREDICTED));

    assert_eq!(store.query(mjd_epoch(range.first), 31).status(), EopStatus::Full);
    assert_eq!(
        store.query(mjd_epoch(range.predicted_end), 31).status(),
        EopStatus::Partial
    );
}

#[test]
fn reloading_the_same_file_is_idempotent() {
    let file = write_finals(&constant_rows());
    let mut store = EopStore::default();
    store.load(file.path()).unwrap();
    let epoch = Epoch::utc(EPOCH_JD_UTC + 0.3);
    let first_query = store.query(epoch, 31);
    let first_matrix = FrameComposer::new(&store).setup_full(epoch).unwrap();

    store.load(file.path()).unwrap();
    assert_eq!(store.query(epoch, 31), first_query);
    assert_eq!(FrameComposer::new(&store).setup_full(epoch).unwrap(), first_matrix);
}

#[test]
fn unloading_degrades_full_orientation() {
    let mut store = EopStore::default();
    store.load_rows(&constant_rows()).unwrap();
    let epoch = Epoch::utc(EPOCH_JD_UTC);
    let with_eops = FrameComposer::new(&store).setup_full(epoch).unwrap();

    store.unload();
    let query = store.query(epoch, 31);
    assert_eq!(query.status(), EopStatus::Unavailable);
    assert_eq!(query.flags, EopFlags::NO_SERIES);

    let degraded = FrameComposer::new(&store).setup_full(epoch).unwrap();
    assert!(degraded.is_degraded());
    assert!(degraded.eop_flags.contains(EopFlags::FALLBACK_DELTA_T));
    assert!(orthogonality_error(&degraded.matrix) < 1e-12);

    // Without polar motion the pole row is that of N · P, since R3 leaves it alone
    let nutation = FrameComposer::new(&store).setup_with_nutation(epoch);
    assert_abs_diff_eq!(
        degraded.matrix.row(2).into_owned(),
        nutation.row(2).into_owned(),
        epsilon = 1e-15
    );
    assert!((degraded.matrix - with_eops.matrix).amax() > 1e-6);
}
