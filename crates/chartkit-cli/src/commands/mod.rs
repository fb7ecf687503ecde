//! CLI commands

pub mod inspect;
pub mod list;
pub mod synth;
