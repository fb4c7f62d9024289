//! Wall-clock timing for comparable host/device measurement windows.

use std::time::{Duration, Instant};

/// Run `f` and return its value together with the elapsed wall-clock time.
///
/// `Instant` is monotonic, so the returned duration is never negative and
/// sub-millisecond intervals are resolved. The same helper wraps both the
/// host reference path and the device stages so the durations are directly
/// comparable.
pub fn time_section<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}
