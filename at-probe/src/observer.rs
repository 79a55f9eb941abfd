use at_command::observe::{Event, Observer};
use at_command::LineKind;

/// Forwards engine events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&mut self, event: &Event<'_>) {
        match *event {
            Event::Transmitting { command } => {
                tracing::debug!(
                    command = command.mnemonic().trim_end(),
                    parameters = command.parameters().map(str::trim_end),
                    "sending command"
                );
            }
            Event::PostEcho { text } => tracing::debug!(text, "prompted, sending post-echo"),
            Event::Collected {
                length,
                termination,
            } => tracing::trace!(length, ?termination, "response collected"),
            Event::Line { line, classified } => match classified.kind() {
                LineKind::Unclassified => {
                    tracing::trace!(line = %String::from_utf8_lossy(line), "unclassified line")
                }
                kind => tracing::debug!(line = %String::from_utf8_lossy(line), ?kind, "received"),
            },
            Event::Payload { written } => tracing::trace!(written, "payload copied"),
            Event::Attempt { attempt, of } if attempt > 1 => {
                tracing::info!(attempt, of, "retrying")
            }
            Event::Attempt { .. } => {}
            Event::Completed { success: true } => tracing::debug!("acknowledged"),
            Event::Completed { success: false } => tracing::warn!("not acknowledged"),
        }
    }
}
