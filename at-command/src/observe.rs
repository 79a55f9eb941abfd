//! Hooks for watching a transaction unfold.

use crate::{
    assembler::Termination,
    classifier::ClassifiedLine,
    command::Command,
};

/// Something the engine did or saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event<'a> {
    /// A command is about to be put on the wire.
    Transmitting { command: Command<'a> },
    /// The device prompted and the post-echo text is being sent.
    PostEcho { text: &'a str },
    /// Collection stopped.
    Collected {
        length: usize,
        termination: Termination,
    },
    /// A terminated line was classified.
    Line {
        line: &'a [u8],
        classified: ClassifiedLine<'a>,
    },
    /// A payload was copied out to the caller.
    Payload { written: usize },
    /// An attempt of a retried transaction is starting (1-based).
    Attempt { attempt: u8, of: u8 },
    Completed { success: bool },
}

/// Receives every [`Event`] of a transaction.
pub trait Observer {
    fn on_event(&mut self, event: &Event<'_>);
}

impl<F> Observer for F
where
    F: FnMut(&Event<'_>),
{
    #[inline]
    fn on_event(&mut self, event: &Event<'_>) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Quiet;

impl Observer for Quiet {
    #[inline]
    fn on_event(&mut self, _event: &Event<'_>) {}
}

/// Logs events through `defmt`.
#[cfg(feature = "defmt")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DefmtObserver;

#[cfg(feature = "defmt")]
impl Observer for DefmtObserver {
    fn on_event(&mut self, event: &Event<'_>) {
        match *event {
            Event::Transmitting { command } => {
                defmt::debug!("sending command: {=str}", command.mnemonic())
            }
            Event::PostEcho { text } => defmt::debug!("prompted, sending {=str}", text),
            Event::Collected {
                length,
                termination,
            } => defmt::trace!("collected {=usize} bytes ({})", length, termination),
            Event::Line { line, classified } => {
                defmt::debug!("received {=[u8]:a} -> {}", line, classified.kind())
            }
            Event::Payload { written } => defmt::debug!("payload of {=usize} bytes", written),
            Event::Attempt { attempt, of } => {
                defmt::debug!("attempt {=u8} of {=u8}", attempt, of)
            }
            Event::Completed { success: true } => defmt::debug!("acknowledged"),
            Event::Completed { success: false } => defmt::warn!("not acknowledged"),
        }
    }
}
