//! Scan progress tracking.
//!
//! The scanner reports traversal events to a [`Tracker`] as pure side
//! effects; no tracker behavior can alter a scan result. [`NoopTracker`] is
//! the default. [`StatusTracker`] prints liveness information to stderr for
//! scans that take minutes on a large tree.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Minimum gap between periodic status lines.
const STATUS_INTERVAL: Duration = Duration::from_secs(2);

/// Receives traversal events from the scanner.
pub trait Tracker: Sync {
    /// A batch of paths has been identified as pending work.
    fn open_paths(&self, paths: &[PathBuf]);

    /// One path has finished processing.
    fn close_path(&self, path: &Path);

    /// The scanner entered a new directory.
    fn current_path(&self, path: &Path);

    /// The scan is over; release any live display resources. Called exactly
    /// once, even when the traversal unwinds early.
    fn finish(&self);
}

/// Default tracker that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracker;

impl Tracker for NoopTracker {
    fn open_paths(&self, _paths: &[PathBuf]) {}
    fn close_path(&self, _path: &Path) {}
    fn current_path(&self, _path: &Path) {}
    fn finish(&self) {}
}

/// Tracker printing open/close counts and slow paths to stderr.
pub struct StatusTracker {
    /// Paths announced as pending.
    opened: AtomicUsize,
    /// Paths finished.
    closed: AtomicUsize,
    /// Scan start time.
    started: Instant,
    /// Display state serialized across worker threads.
    display: Mutex<DisplayState>,
}

/// Throttling and slow-path bookkeeping behind the display lock.
struct DisplayState {
    /// When the last periodic status line was printed.
    last_status: Instant,
    /// When the last close event arrived.
    last_close: Instant,
    /// Largest gap observed between two close events.
    slowest_gap: Duration,
}

impl StatusTracker {
    /// Tracker with zeroed counters starting now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            opened: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
            started: now,
            display: Mutex::new(DisplayState {
                last_status: now,
                last_close: now,
                slowest_gap: Duration::ZERO,
            }),
        }
    }

    /// Paths announced as pending so far.
    #[must_use]
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }

    /// Paths finished so far.
    #[must_use]
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::Relaxed)
    }

    /// Render a duration without sub-millisecond noise.
    fn short(duration: Duration) -> String {
        humantime::format_duration(Duration::from_millis(
            u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        ))
        .to_string()
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker for StatusTracker {
    fn open_paths(&self, paths: &[PathBuf]) {
        self.opened.fetch_add(paths.len(), Ordering::Relaxed);
    }

    fn close_path(&self, path: &Path) {
        let closed = self.closed.fetch_add(1, Ordering::Relaxed) + 1;

        let Ok(mut display) = self.display.lock() else {
            return;
        };
        let now = Instant::now();

        // Surface the slowest single path seen so far; on a stuck scan this
        // names the directory responsible
        let gap = now.duration_since(display.last_close);
        if gap > display.slowest_gap {
            display.slowest_gap = gap;
            eprintln!("{:>10} {}", Self::short(gap), path.display());
        }
        display.last_close = now;

        if now.duration_since(display.last_status) > STATUS_INTERVAL {
            display.last_status = now;
            eprintln!(
                "{:>8} {:>7} / {:<7}",
                Self::short(now.duration_since(self.started)),
                closed,
                self.opened(),
            );
        }
    }

    fn current_path(&self, _path: &Path) {}

    fn finish(&self) {
        eprintln!(
            "scanned {} paths in {}",
            self.closed(),
            Self::short(self.started.elapsed()),
        );
    }
}
