//! Concrete visits: the scene, then one visit per object.

use bevy::prelude::*;

use super::scheduler::{BuildContext, Visit, VisitStep};
use crate::section::{HostBuildError, HostBuilder};

/// Visits every object of the scene in order.
pub struct SceneVisit {
    objects: Vec<Entity>,
    next: usize,
}

impl SceneVisit {
    pub fn new(objects: Vec<Entity>) -> Self {
        Self { objects, next: 0 }
    }
}

impl Visit for SceneVisit {
    fn step(&mut self, cx: &mut BuildContext) -> VisitStep {
        let Some(&object) = self.objects.get(self.next) else {
            return VisitStep::Done;
        };
        self.next += 1;
        cx.begin_object(object);
        VisitStep::Descend(Box::new(ObjectVisit::new(object)))
    }
}

enum Stage {
    Discover,
    Resolve(HostBuilder),
    Attach(HostBuilder),
    Finished,
}

/// Builds the host for one object, one capability per step.
///
/// The host only reaches the registry on the final step, so a cancelled
/// visit never leaves a half-built host behind.
pub struct ObjectVisit {
    object: Entity,
    stage: Stage,
}

impl ObjectVisit {
    pub fn new(object: Entity) -> Self {
        Self {
            object,
            stage: Stage::Discover,
        }
    }

    fn skip(&self, cx: &mut BuildContext, error: HostBuildError) -> VisitStep {
        debug!("Skipping {:?}: {}", self.object, error);
        if error == HostBuildError::NotPaintable {
            cx.report.not_paintable += 1;
        }
        cx.finish_object();
        VisitStep::Done
    }
}

impl Visit for ObjectVisit {
    fn step(&mut self, cx: &mut BuildContext) -> VisitStep {
        match std::mem::replace(&mut self.stage, Stage::Finished) {
            Stage::Discover => match HostBuilder::discover(self.object, cx.backend) {
                Ok(builder) => {
                    self.stage = Stage::Resolve(builder);
                    VisitStep::Continue
                }
                Err(e) => self.skip(cx, e),
            },
            Stage::Resolve(mut builder) => {
                if builder.resolve_next(cx.backend) {
                    self.stage = Stage::Resolve(builder);
                    return VisitStep::Continue;
                }
                cx.report.partial_failures += builder.partial_failures();
                match builder.assemble() {
                    Ok(()) => {
                        self.stage = Stage::Attach(builder);
                        VisitStep::Continue
                    }
                    Err(e) => {
                        builder.release(cx.backend);
                        self.skip(cx, e)
                    }
                }
            }
            Stage::Attach(mut builder) => {
                if builder.attach_next(cx.backend) {
                    self.stage = Stage::Attach(builder);
                    return VisitStep::Continue;
                }
                let host = builder.finish();
                cx.report.hosts += 1;
                cx.report.sections += host.sections().len();
                cx.registry.insert(host, cx.backend);
                cx.finish_object();
                VisitStep::Done
            }
            Stage::Finished => VisitStep::Done,
        }
    }

    fn abort(&mut self, cx: &mut BuildContext) {
        match std::mem::replace(&mut self.stage, Stage::Finished) {
            Stage::Resolve(builder) | Stage::Attach(builder) => builder.release(cx.backend),
            Stage::Discover | Stage::Finished => {}
        }
    }
}
