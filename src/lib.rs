//! Service library for the ONQO digital readiness audit.
//!
//! The interesting pieces live in [`audit`]: a deterministic scoring rubric,
//! a gap-selection heuristic, and the progressive-disclosure state machine
//! that gates report detail behind an email capture. Everything else is the
//! plumbing a small lead-generation service needs: configuration, telemetry,
//! persistence, PDF export, and a JSON HTTP surface.

pub mod audit;
pub mod config;
pub mod error;
pub mod telemetry;
