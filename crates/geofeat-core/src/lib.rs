//! geofeat core - Geometry and feature models, errors, and configuration
//!
//! This crate holds the GeoJSON-shaped domain types shared by the codec, the
//! proximity planner, and the command-line front end.

pub mod config;
pub mod error;
pub mod models;

pub use error::{GeofeatError, Result};
