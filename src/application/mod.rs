pub mod job_coordinator;

pub use job_coordinator::{JobCoordinator, JobEvent, JobReport};
