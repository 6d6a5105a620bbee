//! Core types and definitions for the RANGEFIRE simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! commands, events, state snapshots, weapon and difficulty configuration,
//! and constants. It has no dependency on any runtime or rendering framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod difficulty;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
pub mod weapons;
