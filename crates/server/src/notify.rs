/// Fire-and-forget user notification channel (the host's toast surface).
///
/// Success and error strings only; never consulted for control flow.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, is_error: bool);
}

/// Default notifier that routes toasts to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, is_error: bool) {
        if is_error {
            log::error!("{message}");
        } else {
            log::info!("{message}");
        }
    }
}
