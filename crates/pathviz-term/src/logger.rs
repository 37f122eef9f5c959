//! In-app message log.
//!
//! The terminal is in raw mode on the alternate screen, so log records
//! cannot go to stderr. [`MessageLog`] implements [`log::Log`] and keeps the
//! most recent records in a bounded [`LogBuffer`], which the visualizer
//! draws in its log panel.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// One line of the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    pub text: String,
    /// How many identical records immediately followed this one.
    pub dups: u32,
}

impl LogLine {
    /// The text as displayed, with a repeat counter when collapsed.
    pub fn display(&self) -> String {
        if self.dups > 0 {
            format!("{} ({}×)", self.text, self.dups + 1)
        } else {
            self.text.clone()
        }
    }
}

/// Shared, bounded store of recent log lines.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogLine>> {
        // A panic while holding the lock leaves the lines intact.
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a line. Consecutive duplicates are collapsed into one.
    pub fn push(&self, level: Level, text: impl Into<String>) {
        let text = text.into();
        let mut lines = self.lock();
        if let Some(last) = lines.back_mut() {
            if last.level == level && last.text == text {
                last.dups += 1;
                return;
            }
        }
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(LogLine {
            level,
            text,
            dups: 0,
        });
    }

    /// Up to `n` of the newest lines, oldest first.
    pub fn recent(&self, n: usize) -> Vec<LogLine> {
        let lines = self.lock();
        let skip = lines.len().saturating_sub(n);
        lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// [`log::Log`] implementation writing into a [`LogBuffer`].
pub struct MessageLog {
    buffer: LogBuffer,
    level: LevelFilter,
}

impl MessageLog {
    pub fn new(buffer: LogBuffer, level: LevelFilter) -> Self {
        Self { buffer, level }
    }

    /// Install a `MessageLog` as the global logger and return its buffer.
    pub fn install(
        capacity: usize,
        level: LevelFilter,
    ) -> Result<LogBuffer, log::SetLoggerError> {
        let buffer = LogBuffer::new(capacity);
        let logger: &'static MessageLog = Box::leak(Box::new(Self::new(buffer.clone(), level)));
        log::set_logger(logger)?;
        log::set_max_level(level);
        Ok(buffer)
    }
}

impl Log for MessageLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.buffer.push(record.level(), record.args().to_string());
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_lines() {
        let buf = LogBuffer::new(3);
        for i in 0..5 {
            buf.push(Level::Info, format!("line {i}"));
        }
        let texts: Vec<String> = buf.recent(10).into_iter().map(|l| l.text).collect();
        assert_eq!(texts, ["line 2", "line 3", "line 4"]);
        assert_eq!(buf.recent(1)[0].text, "line 4");
    }

    #[test]
    fn collapses_repeats() {
        let buf = LogBuffer::new(8);
        buf.push(Level::Warn, "grid is locked");
        buf.push(Level::Warn, "grid is locked");
        buf.push(Level::Info, "grid is locked");
        let lines = buf.recent(8);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].display(), "grid is locked (2×)");
        assert_eq!(lines[1].display(), "grid is locked");
    }

    #[test]
    fn filters_by_level() {
        let buf = LogBuffer::new(8);
        let logger = MessageLog::new(buf.clone(), LevelFilter::Info);
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("hidden"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("shown {}", 1))
                .build(),
        );
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.recent(1)[0].text, "shown 1");
        assert_eq!(buf.recent(1)[0].level, Level::Warn);
    }
}
