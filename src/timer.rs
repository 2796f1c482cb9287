/// An 8-bit countdown timer, decremented once per executed instruction.
///
/// Real-time pacing is the host's job; at the historical 60 steps/second call
/// cadence this decays at the original 60 Hz rate.
#[derive(Debug)]
pub struct Timer {
    count: u8,
}

impl Timer {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn get(&self) -> u8 {
        self.count
    }

    /// Counts down one step, stopping at zero. Returns true on the tick that
    /// passes through 1, which is the sound timer's one-shot tone trigger.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_counts_down_and_stops_at_zero() {
        let mut timer = Timer::new();
        timer.set(2);
        assert!(!timer.tick());
        assert_eq!(timer.get(), 1);
        assert!(timer.tick());
        assert_eq!(timer.get(), 0);
        assert!(!timer.tick());
        assert_eq!(timer.get(), 0);
    }

    #[test]
    fn trigger_fires_exactly_once() {
        let mut timer = Timer::new();
        timer.set(3);
        let triggers = (0..10).filter(|_| timer.tick()).count();
        assert_eq!(triggers, 1);
    }
}
