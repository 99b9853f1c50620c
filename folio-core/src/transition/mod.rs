//! # Transition 模块
//!
//! 视图过渡：场景与阶段、锚点注册表、调度器、状态快照和编排器。

mod anchors;
mod orchestrator;
mod phase;
mod scheduler;
mod snapshot;

pub use anchors::{AnchorHandle, AnchorRegistry};
pub use orchestrator::{Cue, IgnoreReason, NavigateOutcome, TransitionEvent, TransitionOrchestrator};
pub use phase::{Scene, TransitionPhase, TransitionRoute};
pub use scheduler::{Scheduler, SchedulerEvent, TimerKind};
pub use snapshot::{PhaseChange, TransitionSnapshot};
