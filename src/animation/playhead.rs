/// Wall-clock playback position of a played (not scrubbed) timeline.
///
/// The playhead is a small state machine: it either runs forward, runs backward, or
/// is halted. Control calls mark it dirty so the next [`Playhead::advance`] reports a
/// change even when no time elapsed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playhead {
    time: f64,
    duration: f64,
    delay_left: f64,
    direction: Direction,
    running: bool,
    dirty: bool,
}

/// Playback direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Toward `duration`.
    Forward,
    /// Toward 0.
    Backward,
}

impl Playhead {
    /// Halted at 0, waiting for a control call.
    pub fn paused(duration: f64) -> Self {
        Self {
            time: 0.0,
            duration: duration.max(0.0),
            delay_left: 0.0,
            direction: Direction::Forward,
            running: false,
            dirty: true,
        }
    }

    /// Plays forward once after `delay` seconds.
    pub fn autoplay(duration: f64, delay: f64) -> Self {
        Self {
            delay_left: delay.max(0.0),
            running: true,
            ..Self::paused(duration)
        }
    }

    /// Current time in `[0, duration]`.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Timeline duration.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether the playhead is still moving (or waiting out its delay).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Run forward from the current time.
    pub fn play(&mut self) {
        self.direction = Direction::Forward;
        self.running = self.time < self.duration;
        self.dirty = true;
    }

    /// Run backward from the current time.
    pub fn reverse(&mut self) {
        self.direction = Direction::Backward;
        self.running = self.time > 0.0;
        self.dirty = true;
    }

    /// Jump to 0 and run forward.
    pub fn restart(&mut self) {
        self.time = 0.0;
        self.delay_left = 0.0;
        self.play();
    }

    /// Jump to 0 and halt.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.delay_left = 0.0;
        self.running = false;
        self.direction = Direction::Forward;
        self.dirty = true;
    }

    /// Jump to the end and halt.
    pub fn complete(&mut self) {
        self.time = self.duration;
        self.delay_left = 0.0;
        self.running = false;
        self.dirty = true;
    }

    /// Halt without moving.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Continue in the last direction.
    pub fn resume(&mut self) {
        match self.direction {
            Direction::Forward => self.play(),
            Direction::Backward => self.reverse(),
        }
    }

    /// Move by `dt` seconds of wall time. Returns `true` if the time changed or a
    /// control call requested a render.
    pub fn advance(&mut self, dt: f64) -> bool {
        let mut changed = std::mem::take(&mut self.dirty);
        if !self.running || dt.is_nan() || dt <= 0.0 {
            return changed;
        }

        let mut dt = dt;
        if self.delay_left > 0.0 {
            let used = self.delay_left.min(dt);
            self.delay_left -= used;
            dt -= used;
            if dt <= 0.0 {
                return changed;
            }
        }

        let before = self.time;
        match self.direction {
            Direction::Forward => {
                self.time = (self.time + dt).min(self.duration);
                if self.time >= self.duration {
                    self.running = false;
                }
            }
            Direction::Backward => {
                self.time = (self.time - dt).max(0.0);
                if self.time <= 0.0 {
                    self.running = false;
                }
            }
        }
        changed |= self.time != before;
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/playhead.rs"]
mod tests;
