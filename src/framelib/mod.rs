//! Reference frame orientation
//!
//! Composes the precession, nutation, Earth rotation and polar motion
//! matrices into a single rotation at one of three [`Fidelity`] levels.

pub mod composer;

pub use self::composer::{ComposerConfig, FallbackPolicy, Fidelity, FrameComposer, Orientation};
