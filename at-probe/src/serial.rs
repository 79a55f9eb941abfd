//! Host-side collaborators: a serial port and a sleeping delay.

use std::io::{Read, Write};
use std::time::Duration;

use anyhow::Context;
use at_command::Transport;
use embedded_hal::delay::DelayNs;
use serialport::SerialPort;

/// A serial port polled one byte at a time.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    pub fn open(path: &str, baud_rate: u32) -> anyhow::Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(Duration::from_millis(10))
            .open()
            .with_context(|| format!("failed to open {path} @ {baud_rate} baud"))?;

        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn try_transmit(&mut self, byte: u8) -> bool {
        match self.port.write(&[byte]) {
            Ok(1) => true,
            Ok(_) => false,
            Err(err) => {
                tracing::trace!(%err, "byte not accepted");
                false
            }
        }
    }

    fn try_receive(&mut self) -> Option<u8> {
        match self.port.bytes_to_read() {
            Ok(0) => return None,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(%err, "failed to query serial port");
                return None;
            }
        }

        let mut byte = [0u8];

        match self.port.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(%err, "failed to read serial port");
                None
            }
        }
    }
}

/// Blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
