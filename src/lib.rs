//! `dynacard` library crate.
//!
//! The binary (`dyna`) is a thin wrapper around this library so that:
//!
//! - the card pipeline is testable without spawning processes
//! - the classifier can be embedded where samples arrive by other means
//!
//! Data flow: samples -> `card::extract_cycle` -> `card::split_loop` ->
//! `card::DynaCard::classify` -> `domain::CardShape`.

pub mod app;
pub mod card;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod metrics;
pub mod plot;
pub mod report;
