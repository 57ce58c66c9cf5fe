//! Cooperative construction of the section graph.
//!
//! A run visits every paintable object, a few steps per frame, until the
//! [`BuildScheduler`] reports ready.

mod progress;
mod scheduler;
mod systems;
mod visit;

pub use progress::{BuildProgress, BuildReport};
pub use scheduler::{
    BuildContext, BuildScheduler, BuildState, DEFAULT_FRAME_SLICE, FrameClock, RealClock, Visit,
    VisitStep,
};
pub use systems::drive_build;
pub use visit::{ObjectVisit, SceneVisit};
