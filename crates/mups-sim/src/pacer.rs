use std::time::Instant;

use mups_core::time::FixedStep;

/// Blocks the calling thread so ticks are released at wall-clock rate.
pub struct FramePacer {
    clock: FixedStep,
    last: Instant,
}

impl FramePacer {
    pub fn new(hz: f32) -> Self {
        Self {
            clock: FixedStep::new(hz),
            last: Instant::now(),
        }
    }

    /// Sleep until at least one tick is due and return how many to run.
    pub fn wait(&mut self) -> u32 {
        loop {
            let now = Instant::now();
            let due = self.clock.advance(now - self.last);
            self.last = now;
            if due > 0 {
                return due;
            }
            std::thread::sleep(self.clock.until_next());
        }
    }
}
