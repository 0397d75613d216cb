//! Command-line front end for the tax estimator.

pub mod app;
pub mod cli;
pub mod overrides;
pub mod render;
