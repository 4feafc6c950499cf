//! User-facing notification surface

use std::time::Duration;

/// How long the "added to cart" notification stays visible. Wall-clock
/// based, not frame based.
pub const NOTIFICATION_WINDOW: Duration = Duration::from_secs(3);

/// Sink for transient toast messages. The cart reports aggregate
/// outcomes here; it never raises modal errors.
pub trait ToastSink: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}
