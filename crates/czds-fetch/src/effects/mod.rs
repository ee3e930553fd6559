//! Effect layer: worker pools, stage handlers and the pipeline coordinator.

mod pipeline;
mod pool;
mod probe;
mod ticket;
mod transfer;

pub use pipeline::Pipeline;
pub use pool::WorkerPool;
pub use ticket::Ticket;
pub use transfer::transfer;
