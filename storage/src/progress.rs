use std::{fmt, sync::Arc};

pub type ProgressFn = dyn Fn(u8) + Send + Sync;

/// Relays upload progress to an optional callback as an integer percentage.
#[derive(Clone, Default)]
pub struct Progress {
    callback: Option<Arc<ProgressFn>>,
}

impl Progress {
    pub fn new(callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Progress {
            callback: Some(Arc::new(callback)),
        }
    }

    pub fn none() -> Self {
        Progress::default()
    }

    /// Report a completion fraction between 0 and 1.
    pub fn report_fraction(&self, fraction: f64) {
        self.emit(percent(fraction));
    }

    pub fn reset(&self) {
        self.emit(0);
    }

    fn emit(&self, percent: u8) {
        if let Some(callback) = &self.callback {
            callback(percent);
        }
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

fn percent(fraction: f64) -> u8 {
    if fraction.is_nan() {
        return 0;
    }

    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}
