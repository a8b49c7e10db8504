pub mod engine;
pub mod retry;

pub use engine::{DateRange, ReconcileEngine, ReconcileOutcome, RemoteService, Strategy};
pub use retry::RetryPolicy;
