use std::time::{Duration, Instant};

/// Pause-aware stopwatch. The playback thread derives the playhead from it:
/// paused while the sink is paused, running otherwise.
#[derive(Debug)]
pub struct Timer {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: None,
        }
    }

    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + since.elapsed(),
            None => self.accumulated,
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn elapsed_freezes_while_paused() {
        let mut timer = Timer::new();
        timer.resume();
        sleep(Duration::from_millis(20));
        timer.pause();

        let frozen = timer.elapsed();
        sleep(Duration::from_millis(20));
        assert_eq!(timer.elapsed(), frozen);

        timer.resume();
        sleep(Duration::from_millis(10));
        assert!(timer.elapsed() > frozen);
    }

    #[test]
    fn redundant_resume_does_not_restart() {
        let mut timer = Timer::new();
        timer.resume();
        sleep(Duration::from_millis(10));
        timer.resume();
        assert!(timer.elapsed() >= Duration::from_millis(10));
    }
}
