//! The enforcement switch.
//!
//! A single process-wide boolean, default on, read by every enforcement
//! entry point. `Switch` is the configuration handle wrappers hold: the
//! default handle aliases the global flag, while `Switch::local` carries an
//! independent flag for wrapper-scoped configuration and tests. Toggling is
//! atomic; relaxed ordering suffices because the flag guards no other data.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

static GLOBAL_ENABLED: AtomicBool = AtomicBool::new(true);

/// Handle to an enforcement flag.
#[derive(Clone, Debug, Default)]
pub enum Switch {
    /// The process-wide flag mutated by [`enable`] and [`disable`].
    #[default]
    Global,
    /// An independent flag scoped to the wrappers holding this handle.
    Local(Arc<AtomicBool>),
}

impl Switch {
    /// A new independent flag, detached from the global one.
    pub fn local(enabled: bool) -> Self {
        Switch::Local(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.flag().load(Ordering::Relaxed)
    }

    /// Idempotent.
    pub fn enable(&self) {
        self.flag().store(true, Ordering::Relaxed);
        debug!("enforcement enabled");
    }

    /// Idempotent.
    pub fn disable(&self) {
        self.flag().store(false, Ordering::Relaxed);
        debug!("enforcement disabled");
    }

    fn flag(&self) -> &AtomicBool {
        match self {
            Switch::Global => &GLOBAL_ENABLED,
            Switch::Local(flag) => flag,
        }
    }
}

/// Enable all enforcement behaviors process-wide.
pub fn enable() {
    Switch::Global.enable();
}

/// Disable all enforcement behaviors process-wide.
pub fn disable() {
    Switch::Global.disable();
}

/// Read the process-wide flag.
pub fn is_enabled() -> bool {
    Switch::Global.is_enabled()
}
