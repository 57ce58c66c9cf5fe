use bevy::prelude::*;

/// Progress of a build run, emitted as each object is started and once
/// more when the run completes.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildProgress {
    /// Objects fully visited so far.
    pub processed: usize,
    pub total: usize,
    /// Object just started, `None` on the final report.
    pub current: Option<Entity>,
}

impl BuildProgress {
    /// Completed share of the run in `0.0..=1.0`. An empty run counts as done.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f32 / self.total as f32
        }
    }
}

/// What a build run produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub hosts: usize,
    pub sections: usize,
    /// Sections skipped because their regions could not be resolved.
    pub partial_failures: usize,
    /// Objects without any recolourable section.
    pub not_paintable: usize,
}

#[derive(Debug, Default)]
pub(crate) struct ProgressTracker {
    pub processed: usize,
    pub total: usize,
    pub pending: Vec<BuildProgress>,
}

impl ProgressTracker {
    pub fn reset(&mut self, total: usize) {
        self.processed = 0;
        self.total = total;
        self.pending.clear();
    }

    pub fn report(&mut self, current: Option<Entity>) {
        self.pending.push(BuildProgress {
            processed: self.processed,
            total: self.total,
            current,
        });
    }

    pub fn fraction(&self) -> f32 {
        BuildProgress {
            processed: self.processed,
            total: self.total,
            current: None,
        }
        .fraction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        let p = BuildProgress {
            processed: 1,
            total: 4,
            current: None,
        };
        assert_eq!(p.fraction(), 0.25);

        let empty = BuildProgress {
            processed: 0,
            total: 0,
            current: None,
        };
        assert_eq!(empty.fraction(), 1.0);
    }
}
