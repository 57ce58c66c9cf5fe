use bevy::prelude::*;

use super::progress::BuildProgress;
use super::scheduler::BuildScheduler;
use crate::section::{PainterBackend, SectionRegistry};

/// Advance a running build by one frame slice and publish its progress.
pub fn drive_build(
    mut scheduler: ResMut<BuildScheduler>,
    mut registry: ResMut<SectionRegistry>,
    backend: Option<ResMut<PainterBackend>>,
    mut progress: MessageWriter<BuildProgress>,
) {
    if !scheduler.is_running() {
        return;
    }
    // Runs are only started with a backend present.
    let Some(mut backend) = backend else {
        return;
    };

    scheduler.resume(&mut registry, backend.0.as_mut());
    for report in scheduler.drain_progress() {
        progress.write(report);
    }
}
