pub mod batch;
pub mod pool;

pub use batch::{solve_batch, BatchOutcome};
pub use pool::WorkerPool;
