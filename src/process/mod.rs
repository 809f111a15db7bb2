//! OS-backed process adapters: server discovery and load-generator runs.
mod command;
mod locator;
mod runner;

pub use command::{GeneratorCommand, GeneratorSettings, TASKSET_BIN};
pub use locator::{SysinfoLocator, SysinfoServerHandle};
pub use runner::{ChildLineStream, LoadGeneratorRunner};
