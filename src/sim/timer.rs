/// Round countdown: one-second granularity, at most one running.
///
/// The countdown does not own a thread or an OS timer. The game loop
/// feeds it wall-clock time via `advance()`, which reports how many
/// whole seconds are due; the controller then applies `tick()` once
/// per due second. Starting replaces any running countdown and
/// stopping discards the pending fraction, so a stale countdown can
/// never fire into a new round.

use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickResult {
    /// Not running; nothing happened.
    Idle,
    /// One second elapsed, time remains.
    Ticked { remaining: u32 },
    /// Reached zero and stopped itself.
    Expired,
}

#[derive(Clone, Debug)]
pub struct Countdown {
    remaining: u32,
    running: bool,
    /// Elapsed time not yet converted into a tick.
    carry: Duration,
    /// Length of one countdown second.
    second: Duration,
}

impl Countdown {
    pub fn new(second: Duration) -> Self {
        Countdown {
            remaining: 0,
            running: false,
            carry: Duration::ZERO,
            // A zero-length second would make every advance() infinite
            second: second.max(Duration::from_millis(1)),
        }
    }

    /// Begin counting down from `seconds`, cancelling any running countdown.
    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.running = seconds > 0;
        self.carry = Duration::ZERO;
    }

    /// Cancel ticking. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.running = false;
        self.carry = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// One elapsed second.
    pub fn tick(&mut self) -> TickResult {
        if !self.running {
            return TickResult::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stop();
            TickResult::Expired
        } else {
            TickResult::Ticked { remaining: self.remaining }
        }
    }

    /// Accumulate `elapsed` wall time; returns the number of whole
    /// seconds now due. Returns 0 while stopped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.carry += elapsed;
        let mut due = 0u32;
        while self.carry >= self.second {
            self.carry -= self.second;
            due += 1;
        }
        // Never report more ticks than there are seconds left
        due.min(self.remaining)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Countdown::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_expires() {
        let mut t = Countdown::default();
        t.start(3);
        assert_eq!(t.tick(), TickResult::Ticked { remaining: 2 });
        assert_eq!(t.tick(), TickResult::Ticked { remaining: 1 });
        assert_eq!(t.tick(), TickResult::Expired);
        assert!(!t.is_running());
        assert_eq!(t.remaining(), 0);
        assert_eq!(t.tick(), TickResult::Idle);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut t = Countdown::default();
        t.stop();
        t.start(5);
        t.stop();
        t.stop();
        assert!(!t.is_running());
        assert_eq!(t.tick(), TickResult::Idle);
        assert_eq!(t.remaining(), 5);
    }

    #[test]
    fn restart_replaces_running_countdown() {
        let mut t = Countdown::default();
        t.start(10);
        t.tick();
        t.start(4);
        assert_eq!(t.remaining(), 4);
        assert_eq!(t.tick(), TickResult::Ticked { remaining: 3 });
    }

    #[test]
    fn advance_carries_fractions() {
        let mut t = Countdown::new(Duration::from_millis(1000));
        t.start(10);
        assert_eq!(t.advance(Duration::from_millis(400)), 0);
        assert_eq!(t.advance(Duration::from_millis(400)), 0);
        assert_eq!(t.advance(Duration::from_millis(400)), 1);
        assert_eq!(t.advance(Duration::from_millis(2600)), 2);
    }

    #[test]
    fn advance_is_zero_when_stopped_and_restart_drops_carry() {
        let mut t = Countdown::new(Duration::from_millis(1000));
        assert_eq!(t.advance(Duration::from_secs(5)), 0);
        t.start(10);
        t.advance(Duration::from_millis(900));
        t.start(10);
        assert_eq!(t.advance(Duration::from_millis(200)), 0);
    }

    #[test]
    fn advance_caps_at_remaining() {
        let mut t = Countdown::new(Duration::from_millis(100));
        t.start(2);
        assert_eq!(t.advance(Duration::from_secs(10)), 2);
    }

    #[test]
    fn zero_start_does_not_run() {
        let mut t = Countdown::default();
        t.start(0);
        assert!(!t.is_running());
        assert_eq!(t.tick(), TickResult::Idle);
    }
}
