use std::sync::atomic::{AtomicBool, Ordering};

/// Capability to schedule precise, wake-capable timers. On platforms that
/// gate exact alarms behind a runtime grant this reflects the platform's
/// current answer; elsewhere it is always granted.
///
/// `request_capability` is fire-and-forget: it navigates the user to the
/// platform's grant surface and returns immediately. Callers re-query
/// `has_exact_capability` later instead of assuming a synchronous grant.
pub trait ExactAlarmGate: Send + Sync {
    fn has_exact_capability(&self) -> bool;

    fn request_capability(&self);
}

/// Gate for platforms without exact-alarm gating.
pub struct AlwaysGranted;

impl ExactAlarmGate for AlwaysGranted {
    fn has_exact_capability(&self) -> bool {
        true
    }

    fn request_capability(&self) {
        log::debug!("exact scheduling is not gated on this platform");
    }
}

/// Gate whose grant state is pushed in from outside, the way a mobile host
/// relays the platform's answer after returning from the settings surface.
pub struct ManualGate {
    granted: AtomicBool,
    requested: AtomicBool,
}

impl ManualGate {
    pub fn new(granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
            requested: AtomicBool::new(false),
        }
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn was_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

impl ExactAlarmGate for ManualGate {
    fn has_exact_capability(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn request_capability(&self) {
        self.requested.store(true, Ordering::SeqCst);
        log::info!("opening the exact-alarm grant surface");
    }
}
