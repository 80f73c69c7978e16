//! CLI infrastructure for the `ttt-mdp` binary
//!
//! Training, evaluating and comparing the three agents from the command line.

pub mod commands;
pub mod config;
pub mod output;
