//! Sweep orchestration and the ports it drives.
pub mod ports;
mod progress;
mod state;
mod sweep;


pub use ports::{
    ChildProcessRunner, ExperimentLogger, LineStream, Pause, ProcessLocator, ServerHandle,
    TokioPause,
};
pub use progress::ProgressTicker;
pub use state::SweepState;
pub use sweep::{SweepController, SweepReport};
