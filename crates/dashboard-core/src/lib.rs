//! Core domain layer for the study dashboard.
//!
//! Defines the study-record data model, the grading scale, the error
//! taxonomy shared by all dashboard crates, shell settings, and display
//! formatting helpers. Everything in this crate is pure and synchronous.

pub mod error;
pub mod formatting;
pub mod grading;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
