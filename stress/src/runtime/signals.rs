//! Termination signal translation
//!
//! Turns the process's termination signals into a shutdown trigger. This is
//! the only place that touches process-wide signal state; runners only ever
//! see the resulting `ShutdownSignal`.

use stress_shared::{WorkerId, logging, worker_warn};
use tokio::task::JoinHandle;

use crate::runtime::runner::EXIT_ABORT;
use crate::runtime::shutdown::ShutdownTrigger;

/// Register SIGHUP, SIGTERM and SIGINT handlers and fire `trigger` on the
/// first one delivered
///
/// A second signal while teardown or cleanup is still running exits the
/// process immediately with the abort status.
pub fn spawn_signal_listener(trigger: ShutdownTrigger) -> std::io::Result<JoinHandle<()>> {
    spawn_signal_listener_with(trigger, |name| {
        worker_warn!(WorkerId::Driver, "⚠️ Received {} again, exiting without teardown", name);
        std::process::exit(EXIT_ABORT);
    })
}

/// Like [`spawn_signal_listener`], calling `on_repeat` for every signal after
/// the first instead of exiting
///
/// Handlers are registered before this returns, so a signal raised right
/// after the call is not lost.
#[cfg(unix)]
pub fn spawn_signal_listener_with<F>(
    trigger: ShutdownTrigger,
    mut on_repeat: F,
) -> std::io::Result<JoinHandle<()>>
where
    F: FnMut(&str) + Send + 'static,
{
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    Ok(tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                _ = hangup.recv() => "SIGHUP",
                _ = terminate.recv() => "SIGTERM",
                _ = interrupt.recv() => "SIGINT",
            };
            if trigger.is_triggered() {
                on_repeat(name);
            } else {
                logging::log_shutdown(&WorkerId::Driver, &format!("received {name}"));
                trigger.trigger();
            }
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_signal_listener_with<F>(
    trigger: ShutdownTrigger,
    mut on_repeat: F,
) -> std::io::Result<JoinHandle<()>>
where
    F: FnMut(&str) + Send + 'static,
{
    Ok(tokio::spawn(async move {
        loop {
            if let Err(err) = tokio::signal::ctrl_c().await {
                logging::log_error(&WorkerId::Driver, "Signal handling", &err);
                return;
            }
            if trigger.is_triggered() {
                on_repeat("ctrl-c");
            } else {
                logging::log_shutdown(&WorkerId::Driver, "received ctrl-c");
                trigger.trigger();
            }
        }
    }))
}
