//! Frame-budgeted, resumable construction of the section graph.

use std::time::{Duration, Instant};

use bevy::prelude::*;

use super::progress::{BuildProgress, BuildReport, ProgressTracker};
use super::visit::SceneVisit;
use crate::section::{PaintBackend, SectionRegistry};

/// Default time a run may spend per frame.
pub const DEFAULT_FRAME_SLICE: Duration = Duration::from_nanos(1_000_000_000 / 128);

/// What a [`Visit`] wants after taking one step.
pub enum VisitStep {
    /// Call `step` again.
    Continue,
    /// Run this sub-visit to completion first, then resume the caller.
    Descend(Box<dyn Visit>),
    /// This visit is finished.
    Done,
}

/// One unit of resumable build work.
///
/// Visits never recurse. Nested work is handed back as
/// [`VisitStep::Descend`] and the scheduler keeps the pending visits on an
/// explicit stack, so a run can stop after any step and pick up where it
/// left off next frame.
pub trait Visit: Send + Sync {
    fn step(&mut self, cx: &mut BuildContext) -> VisitStep;

    /// Give back anything acquired so far. Called on cancellation, innermost
    /// visit first.
    fn abort(&mut self, _cx: &mut BuildContext) {}
}

/// Everything a visit may touch while stepping.
pub struct BuildContext<'a> {
    pub registry: &'a mut SectionRegistry,
    pub backend: &'a mut dyn PaintBackend,
    pub report: &'a mut BuildReport,
    pub(crate) progress: &'a mut ProgressTracker,
}

impl BuildContext<'_> {
    /// Announce that `object` is being visited.
    pub fn begin_object(&mut self, object: Entity) {
        self.progress.report(Some(object));
    }

    /// Count the current object as processed.
    pub fn finish_object(&mut self) {
        self.progress.processed += 1;
    }
}

/// Source of monotonic time for slice accounting.
pub trait FrameClock: Send + Sync {
    /// Time elapsed since some fixed origin.
    fn now(&self) -> Duration;
}

/// Wall-clock [`FrameClock`].
#[derive(Debug, Clone, Copy)]
pub struct RealClock {
    origin: Instant,
}

impl Default for RealClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl FrameClock for RealClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuildState {
    #[default]
    Idle,
    Running,
    Ready,
    Cancelled,
}

/// Drives a build run a slice at a time.
#[derive(Resource)]
pub struct BuildScheduler {
    slice: Duration,
    clock: Box<dyn FrameClock>,
    stack: Vec<Box<dyn Visit>>,
    state: BuildState,
    cancel_requested: bool,
    progress: ProgressTracker,
    report: BuildReport,
}

impl Default for BuildScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_SLICE)
    }
}

impl BuildScheduler {
    pub fn new(slice: Duration) -> Self {
        Self {
            slice,
            clock: Box::new(RealClock::default()),
            stack: Vec::new(),
            state: BuildState::Idle,
            cancel_requested: false,
            progress: ProgressTracker::default(),
            report: BuildReport::default(),
        }
    }

    pub fn with_clock(mut self, clock: impl FrameClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn slice(&self) -> Duration {
        self.slice
    }

    pub fn set_slice(&mut self, slice: Duration) {
        self.slice = slice;
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == BuildState::Running
    }

    pub fn is_ready(&self) -> bool {
        self.state == BuildState::Ready
    }

    pub fn report(&self) -> BuildReport {
        self.report
    }

    /// Completed share of the current or last run.
    pub fn progress(&self) -> f32 {
        self.progress.fraction()
    }

    /// Depth of the pending visit stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Begin a run over `objects`, visited in order.
    ///
    /// Returns `false` if a run is already in progress; cancel it first.
    pub fn start(&mut self, objects: Vec<Entity>) -> bool {
        self.start_with(objects.len(), Box::new(SceneVisit::new(objects)))
    }

    /// Begin a run driven by an arbitrary root visit.
    pub fn start_with(&mut self, total: usize, root: Box<dyn Visit>) -> bool {
        if self.is_running() {
            warn!("Build already running; ignoring start request");
            return false;
        }

        self.stack = vec![root];
        self.state = BuildState::Running;
        self.cancel_requested = false;
        self.progress.reset(total);
        self.report = BuildReport::default();
        true
    }

    /// Ask a running build to stop. Takes effect on the next [`resume`](Self::resume).
    pub fn cancel(&mut self) {
        if self.is_running() {
            self.cancel_requested = true;
        }
    }

    /// Cancel and immediately release whatever the run holds.
    pub fn abort(&mut self, registry: &mut SectionRegistry, backend: &mut dyn PaintBackend) {
        self.cancel();
        self.resume(registry, backend);
    }

    /// Forget a finished or cancelled run. Has no effect while running.
    pub fn reset(&mut self) {
        if self.is_running() {
            return;
        }
        self.stack.clear();
        self.state = BuildState::Idle;
        self.progress.reset(0);
        self.report = BuildReport::default();
    }

    /// Progress reports queued since the last drain.
    pub fn drain_progress(&mut self) -> Vec<BuildProgress> {
        std::mem::take(&mut self.progress.pending)
    }

    /// Run visits until the stack empties or the frame slice is used up.
    pub fn resume(
        &mut self,
        registry: &mut SectionRegistry,
        backend: &mut dyn PaintBackend,
    ) -> BuildState {
        if self.state != BuildState::Running {
            return self.state;
        }

        let mut cx = BuildContext {
            registry,
            backend,
            report: &mut self.report,
            progress: &mut self.progress,
        };

        if self.cancel_requested {
            while let Some(mut visit) = self.stack.pop() {
                visit.abort(&mut cx);
            }
            self.cancel_requested = false;
            self.state = BuildState::Cancelled;
            info!(
                "Build cancelled after {}/{} objects",
                cx.progress.processed, cx.progress.total
            );
            return self.state;
        }

        let slice_start = self.clock.now();
        loop {
            let Some(visit) = self.stack.last_mut() else {
                break;
            };

            match visit.step(&mut cx) {
                VisitStep::Continue => {}
                VisitStep::Descend(child) => self.stack.push(child),
                VisitStep::Done => {
                    self.stack.pop();
                }
            }

            if self.stack.is_empty() {
                break;
            }
            if self.clock.now().saturating_sub(slice_start) > self.slice {
                return self.state;
            }
        }

        cx.progress.processed = cx.progress.total;
        cx.progress.report(None);
        self.state = BuildState::Ready;

        let report = *cx.report;
        info!(
            "Build finished: {} hosts, {} sections, {} partial failures",
            report.hosts, report.sections, report.partial_failures
        );
        if cx.registry.is_empty() {
            warn!("Nothing paintable found in the scene");
        }
        self.state
    }
}
