//! Collects the bytes of a response under a bounded wait.
//!
//! The wait is bounded by a watchdog: a budget of ticks that is
//! spent one at a time whenever the transport has nothing to offer.
//! Received bytes never refill the budget, so a chatty device
//! shortens the total wait rather than extending it.

use embedded_hal::delay::DelayNs;

use crate::{response_buffer::RawResponse, transport::Transport};

/// Bounds on how long to wait for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchdogConfig {
    /// Misses tolerated before the device is considered silent.
    pub ticks: u32,
    /// Delay after each miss.
    pub tick_delay_ms: u32,
}

impl WatchdogConfig {
    /// 200 ticks of 1 ms.
    pub const DEFAULT: Self = Self {
        ticks: 200,
        tick_delay_ms: 1,
    };
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Why collection stopped.
///
/// Both causes mean the same thing to a transaction:
/// stop reading now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Termination {
    /// The watchdog budget ran out.
    SilenceTimeout,
    /// The response buffer has no room left.
    BufferExhausted,
}

struct Watchdog {
    remaining: u32,
}

impl Watchdog {
    const fn new(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    #[inline]
    fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    #[inline]
    fn expired(&self) -> bool {
        self.remaining == 0
    }
}

/// Poll `transport` into `raw` until the watchdog expires
/// or the buffer is exhausted.
///
/// Bytes are appended to whatever `raw` already holds.
pub fn assemble<T, D, const N: usize>(
    transport: &mut T,
    delay: &mut D,
    config: &WatchdogConfig,
    raw: &mut RawResponse<N>,
) -> Termination
where
    T: Transport + ?Sized,
    D: DelayNs + ?Sized,
{
    let mut watchdog = Watchdog::new(config.ticks);

    loop {
        if raw.is_exhausted() {
            break Termination::BufferExhausted;
        }

        match transport.try_receive() {
            Some(byte) => {
                if raw.push(byte).is_err() {
                    break Termination::BufferExhausted;
                }
            }
            None => {
                watchdog.tick();
                delay.delay_ms(config.tick_delay_ms);

                if watchdog.expired() {
                    break Termination::SilenceTimeout;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FakeDelay, ScriptedModem};

    mod silence {
        use super::*;

        #[test]
        fn silent_device() {
            let mut modem = ScriptedModem::silent();
            let mut delay = FakeDelay::new();
            let mut raw = RawResponse::<64>::new();

            let termination = assemble(&mut modem, &mut delay, &WatchdogConfig::DEFAULT, &mut raw);

            assert_eq!(Termination::SilenceTimeout, termination);
            assert_eq!(0, raw.len());
            assert_eq!(200, delay.calls);
            assert_eq!(200, delay.elapsed_ms);
        }

        #[test]
        fn through_trait_object() {
            let replies: &[&[u8]] = &[b"AT\r\r\nOK\r\n"];
            let mut modem = ScriptedModem::new(replies);
            let mut delay = FakeDelay::new();
            let mut raw = RawResponse::<64>::new();

            let mut transport: &mut dyn Transport = &mut modem;
            Transport::transmit_all(&mut transport, *b"AT\r\n");

            assert_eq!(
                Termination::SilenceTimeout,
                assemble(transport, &mut delay, &WatchdogConfig::DEFAULT, &mut raw)
            );
            assert_eq!(b"AT\r\rOK\r", raw.as_bytes());
        }

        #[test]
        fn zero_budget_polls_once() {
            let mut modem = ScriptedModem::silent();
            let mut delay = FakeDelay::new();
            let mut raw = RawResponse::<64>::new();

            let config = WatchdogConfig {
                ticks: 0,
                tick_delay_ms: 5,
            };

            assert_eq!(
                Termination::SilenceTimeout,
                assemble(&mut modem, &mut delay, &config, &mut raw)
            );
            assert_eq!(1, delay.calls);
            assert_eq!(5, delay.elapsed_ms);
        }

        #[test]
        fn budget_spent_only_on_misses() {
            let replies: &[&[u8]] = &[b"OK\r\n"];
            let mut modem = ScriptedModem::new(replies);
            let mut delay = FakeDelay::new();
            let mut raw = RawResponse::<64>::new();

            modem.transmit_all(*b"AT\r\n");

            assemble(&mut modem, &mut delay, &WatchdogConfig::DEFAULT, &mut raw);

            assert_eq!(b"OK\r", raw.as_bytes());
            assert_eq!(200, delay.calls);
        }

        #[test]
        fn budget_never_refilled() {
            let replies: &[&[u8]] = &[b"ABCDE"];
            let mut modem = ScriptedModem::new(replies).with_gap(50);
            let mut delay = FakeDelay::new();
            let mut raw = RawResponse::<64>::new();

            modem.transmit_all(*b"AT\r\n");

            let termination = assemble(&mut modem, &mut delay, &WatchdogConfig::DEFAULT, &mut raw);

            // 50 misses precede each byte; the fourth never arrives
            assert_eq!(Termination::SilenceTimeout, termination);
            assert_eq!(b"ABC", raw.as_bytes());
        }
    }

    mod capacity {
        use super::*;

        #[test]
        fn one_short_of_capacity() {
            let replies: &[&[u8]] = &[b"+CGMM: G510\r\nOK\r\n"];
            let mut modem = ScriptedModem::new(replies);
            let mut delay = FakeDelay::new();
            // 15 bytes once line feeds are dropped
            let mut raw = RawResponse::<16>::new();

            modem.transmit_all(*b"AT+CGMM\r\n");

            let termination = assemble(&mut modem, &mut delay, &WatchdogConfig::DEFAULT, &mut raw);

            assert_eq!(Termination::BufferExhausted, termination);
            assert_eq!(b"+CGMM: G510\rOK\r", raw.as_bytes());
            assert_eq!(2, raw.lines().count());
            assert_eq!(0, delay.calls);
        }

        #[test]
        fn stops_before_overflow() {
            let replies: &[&[u8]] = &[b"+CGMM: G510\r\nOK\r\n"];
            let mut modem = ScriptedModem::new(replies);
            let mut delay = FakeDelay::new();
            let mut raw = RawResponse::<15>::new();

            modem.transmit_all(*b"AT+CGMM\r\n");

            let termination = assemble(&mut modem, &mut delay, &WatchdogConfig::DEFAULT, &mut raw);

            assert_eq!(Termination::BufferExhausted, termination);
            assert_eq!(14, raw.len());
            assert_eq!(b"+CGMM: G510\rOK", raw.as_bytes());
            // the unterminated "OK" is not a line
            assert_eq!(1, raw.lines().count());
        }

        #[test]
        fn appends() {
            let replies: &[&[u8]] = &[b"> ", b"\r\nOK\r\n"];
            let mut modem = ScriptedModem::new(replies);
            let mut delay = FakeDelay::new();
            let mut raw = RawResponse::<32>::new();

            modem.transmit_all(*b"AT+CMGS=1\r\n");
            assemble(&mut modem, &mut delay, &WatchdogConfig::DEFAULT, &mut raw);

            modem.transmit_all(*b"hi\x1a");
            assemble(&mut modem, &mut delay, &WatchdogConfig::DEFAULT, &mut raw);

            assert_eq!(b"> \rOK\r", raw.as_bytes());
        }
    }
}
