use crate::host::{Confirmer, Notifier};
use tracing::info;

/// [`Notifier`] that forwards notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!("{message}");
    }
}

/// [`Confirmer`] with a fixed answer, for non-interactive runs.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirmer for AutoConfirm {
    fn confirm(&self, _title: &str, _message: &str) -> bool {
        self.0
    }
}
