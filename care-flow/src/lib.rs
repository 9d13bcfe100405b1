pub mod error;
pub mod runner;
pub mod task;

// Re-export commonly used types
pub use error::{FlowError, Result};
pub use runner::{ConcurrencyPolicy, FlowRunner, RequestStatus, Snapshot};
pub use task::{DEFAULT_FAILURE_MESSAGE, Task};
