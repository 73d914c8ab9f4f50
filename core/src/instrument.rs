//! Wall-clock timing of report tasks.

use std::time::{Duration, Instant};
use tracing::info;

/// A value together with the time it took to compute.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Timed<U> {
        Timed {
            value: f(self.value),
            elapsed: self.elapsed,
        }
    }
}

impl<T, E> Timed<Result<T, E>> {
    /// Move the error out so `?` can be applied to a timed fallible task.
    pub fn transpose(self) -> Result<Timed<T>, E> {
        let elapsed = self.elapsed;
        self.value.map(|value| Timed { value, elapsed })
    }
}

/// Run `f`, log how long it took under `task` and return both.
pub fn timed<T>(task: &str, f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let value = f();
    let elapsed = start.elapsed();
    info!(
        task,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Task finished"
    );
    Timed { value, elapsed }
}
