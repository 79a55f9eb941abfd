//! Scripted stand-ins for a modem and a timer.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::transport::Transport;

/// A modem that answers each burst of transmitted
/// bytes with the next scripted reply.
pub struct ScriptedModem<'s> {
    replies: &'s [&'s [u8]],
    next_reply: usize,
    current: &'s [u8],
    awaiting_command: bool,
    /// Misses reported before every delivered byte.
    gap: usize,
    missed: usize,
    /// Refuse every other transmit offer.
    reluctant: bool,
    offers: usize,
    pub sent: Vec<u8, 512>,
    pub exchanges: usize,
}

impl<'s> ScriptedModem<'s> {
    pub fn new(replies: &'s [&'s [u8]]) -> Self {
        Self {
            replies,
            next_reply: 0,
            current: &[],
            awaiting_command: true,
            gap: 0,
            missed: 0,
            reluctant: false,
            offers: 0,
            sent: Vec::new(),
            exchanges: 0,
        }
    }

    pub fn silent() -> Self {
        Self::new(&[])
    }

    pub fn with_gap(self, gap: usize) -> Self {
        Self { gap, ..self }
    }

    pub fn reluctant(self) -> Self {
        Self {
            reluctant: true,
            ..self
        }
    }

    pub fn offers(&self) -> usize {
        self.offers
    }
}

impl Transport for ScriptedModem<'_> {
    fn try_transmit(&mut self, byte: u8) -> bool {
        self.offers += 1;

        if self.reluctant && self.offers % 2 == 1 {
            return false;
        }

        if self.awaiting_command {
            self.awaiting_command = false;
            self.exchanges += 1;
            self.current = self
                .replies
                .get(self.next_reply)
                .copied()
                .unwrap_or_default();
            self.next_reply += 1;
        }

        self.sent.push(byte).is_ok()
    }

    fn try_receive(&mut self) -> Option<u8> {
        self.awaiting_command = true;

        if self.current.is_empty() {
            return None;
        }

        if self.missed < self.gap {
            self.missed += 1;
            return None;
        }

        let (&byte, rest) = self.current.split_first()?;
        self.current = rest;
        self.missed = 0;

        Some(byte)
    }
}

/// A timer that only keeps count.
#[derive(Debug, Default)]
pub struct FakeDelay {
    pub calls: usize,
    pub elapsed_ms: u64,
    elapsed_ns: u64,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self::default()
    }

    fn advance(&mut self, ns: u64) {
        self.calls += 1;
        self.elapsed_ns += ns;
        self.elapsed_ms = self.elapsed_ns / 1_000_000;
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(u64::from(ms) * 1_000_000);
    }
}
