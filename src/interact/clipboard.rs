use std::collections::VecDeque;

/// How long the "copied" flag stays up, seconds.
pub const COPIED_RESET_SECS: f64 = 2.0;

/// Host text clipboard.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn write_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// In-memory clipboard keeping every write, newest last.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    history: VecDeque<String>,
}

impl MemoryClipboard {
    /// Most recent contents.
    pub fn contents(&self) -> Option<&str> {
        self.history.back().map(String::as_str)
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.history.len()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.history.push_back(text.to_string());
        Ok(())
    }
}

/// "Copied!" feedback for a copy button: raised on a successful write, lowered after
/// [`COPIED_RESET_SECS`] of frame time. A failed write leaves it lowered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CopyIndicator {
    remaining: Option<f64>,
}

impl CopyIndicator {
    /// Write `text` and raise the flag on success. Copying again restarts the timer.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard, text: &str) -> anyhow::Result<()> {
        match clipboard.write_text(text) {
            Ok(()) => {
                self.remaining = Some(COPIED_RESET_SECS);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "clipboard write failed");
                Err(err)
            }
        }
    }

    /// Whether the flag is up.
    pub fn copied(&self) -> bool {
        self.remaining.is_some()
    }

    /// Count down by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        if let Some(left) = self.remaining.as_mut() {
            if dt.is_finite() && dt > 0.0 {
                *left -= dt;
            }
            if *left <= 0.0 {
                self.remaining = None;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/clipboard.rs"]
mod tests;
