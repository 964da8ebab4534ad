use std::thread;
use std::time::Duration;

use crate::render::Pacer;

pub const ANIMATION_DELAY_MICROS: u64 = 3500; // ~285 structural changes per second.

pub struct SleepPacer {
    pub delay: Duration,
}

impl SleepPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SleepPacer {
    fn default() -> Self {
        Self::new(Duration::from_micros(ANIMATION_DELAY_MICROS))
    }
}

impl Pacer for SleepPacer {
    fn pace(&mut self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}
