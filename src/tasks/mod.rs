//! Background tasks driving jobs into a sink.
//!
//! These are the host side of the jobs: a periodic runner per timer job and a
//! reader for the in-process queue. Both stop on the broadcast shutdown signal.

mod queue_task;
mod timer_task;

pub use queue_task::QueueTask;
pub use timer_task::TimerTask;
