pub mod error;
pub mod model;
pub mod preset;

pub use error::AppError;
pub use model::{ConversionRequest, DownloadRequest, JobKind, JobPhase, ProcessOutcome};
pub use preset::{AudioFormat, DownloadPreset};
