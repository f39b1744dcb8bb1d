//! Notification sinks for user-facing route messages.

use tracing::{error, info, warn};

use crate::core::types::NotificationKind;

/// Receives the toast-style messages emitted by store operations.
pub trait Notifier {
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// Diagnostic-log fallback used when no presentation layer is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Info | NotificationKind::Success => {
                info!(kind = kind.as_str(), "{message}");
            }
            NotificationKind::Warning => warn!(kind = kind.as_str(), "{message}"),
            NotificationKind::Error => error!(kind = kind.as_str(), "{message}"),
        }
    }
}

/// CLI toast: `[KIND] message` on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl StderrNotifier {
    pub fn format(message: &str, kind: NotificationKind) -> String {
        format!("[{}] {}", kind.as_str().to_uppercase(), message)
    }
}

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        eprintln!("{}", Self::format(message, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_format_uppercases_kind() {
        assert_eq!(
            StderrNotifier::format("Route canceled: Recife", NotificationKind::Success),
            "[SUCCESS] Route canceled: Recife"
        );
    }
}
