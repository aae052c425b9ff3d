pub mod journey;
pub mod lock;
pub mod role;
pub mod rrgt;
pub mod task;

pub use journey::*;
pub use role::TeamRole;
pub use task::{CompletionStatus, JourneyStatus, TaskPriority, TaskStatus};
