//! Core library for the `scalesweep` CLI.
//!
//! A sweep locates a running server process, then runs an external load
//! generator once per concurrency level. Metric lines from the generator are
//! paired with server CPU samples, everything past the warmup period is
//! averaged, and one aggregate per level goes to an experiment tracker keyed
//! by thread count. The binary wires the OS-backed adapters in `process` and
//! a `tracker` backend into `application::SweepController`.
pub mod application;
pub mod args;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod process;
pub mod tracker;
