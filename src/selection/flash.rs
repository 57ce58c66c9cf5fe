use std::time::Duration;

use bevy::prelude::*;

/// Ask the renderer to flash (or stop flashing) an object.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionFlash {
    pub object: Entity,
    pub on: bool,
}

/// The object currently flashed after an eyedropper, and when it stops.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct EyedropperFlash {
    active: Option<(Entity, Duration)>,
}

impl EyedropperFlash {
    pub fn active(&self) -> Option<Entity> {
        self.active.map(|(object, _)| object)
    }

    /// Flash `object` until `now + duration`, returning messages for the
    /// transition. A previous flash on another object is switched off.
    pub fn start(&mut self, object: Entity, now: Duration, duration: Duration) -> Vec<SectionFlash> {
        let mut out = Vec::new();
        match self.active {
            Some((previous, _)) if previous == object => {}
            Some((previous, _)) => {
                out.push(SectionFlash {
                    object: previous,
                    on: false,
                });
                out.push(SectionFlash { object, on: true });
            }
            None => out.push(SectionFlash { object, on: true }),
        }
        self.active = Some((object, now + duration));
        out
    }

    /// Switch off an expired flash.
    pub fn tick(&mut self, now: Duration) -> Option<SectionFlash> {
        match self.active {
            Some((object, until)) if now >= until => {
                self.active = None;
                Some(SectionFlash { object, on: false })
            }
            _ => None,
        }
    }

    /// Switch off any flash immediately.
    pub fn stop(&mut self) -> Option<SectionFlash> {
        self.active
            .take()
            .map(|(object, _)| SectionFlash { object, on: false })
    }
}

pub fn tick_flash(
    time: Res<Time>,
    mut flash: ResMut<EyedropperFlash>,
    mut flashes: MessageWriter<SectionFlash>,
) {
    if let Some(off) = flash.tick(time.elapsed()) {
        flashes.write(off);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_expires() {
        let mut world = World::new();
        let object = world.spawn_empty().id();
        let mut flash = EyedropperFlash::default();

        let on = flash.start(object, Duration::from_secs(1), Duration::from_millis(500));
        assert_eq!(on, vec![SectionFlash { object, on: true }]);

        assert_eq!(flash.tick(Duration::from_millis(1200)), None);
        assert_eq!(
            flash.tick(Duration::from_millis(1500)),
            Some(SectionFlash { object, on: false })
        );
        assert_eq!(flash.active(), None);
    }

    #[test]
    fn test_restart_on_other_object() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut flash = EyedropperFlash::default();

        flash.start(a, Duration::ZERO, Duration::from_millis(500));
        let out = flash.start(b, Duration::from_millis(100), Duration::from_millis(500));
        assert_eq!(
            out,
            vec![
                SectionFlash { object: a, on: false },
                SectionFlash { object: b, on: true },
            ]
        );

        // Same object again only extends the deadline.
        assert!(flash.start(b, Duration::from_millis(200), Duration::from_millis(500)).is_empty());
        assert_eq!(flash.tick(Duration::from_millis(650)), None);
        assert_eq!(flash.stop(), Some(SectionFlash { object: b, on: false }));
    }
}
