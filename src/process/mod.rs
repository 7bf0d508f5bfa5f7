pub mod progress;
pub mod runner;

pub use runner::{CommandSpec, ProcessEvent, ProcessRunner};
