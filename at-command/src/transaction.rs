use embedded_hal::delay::DelayNs;

use crate::{
    assembler::{assemble, WatchdogConfig},
    classifier::{ClassifiedLine, Classifier, FramingConvention},
    command::Command,
    error,
    observe::{Event, Observer, Quiet},
    response_buffer::RawResponse,
    transport::Transport,
};

/// The device asks for post-echo text with this.
const PROMPT: u8 = b'>';

/// Tunables of a [`TransactionEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub watchdog: WatchdogConfig,
    pub framing: FramingConvention,
}

impl Config {
    pub const DEFAULT: Self = Self {
        watchdog: WatchdogConfig::DEFAULT,
        framing: FramingConvention::DEFAULT,
    };
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The outcome of one command/response cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransactionResult {
    /// An `OK` line was seen.
    pub success: bool,
    /// Payload bytes written to the output buffer,
    /// if a data reply was seen.
    pub payload: Option<usize>,
    /// An `ERROR` line was seen.
    pub nack: bool,
}

impl TransactionResult {
    pub fn failure(&self) -> Option<error::Failure> {
        match (self.success, self.nack) {
            (true, _) => None,
            (false, true) => Some(error::Failure::DeviceNack),
            (false, false) => Some(error::Failure::NoAck),
        }
    }

    /// The payload within the output buffer
    /// this result was produced with.
    pub fn payload<'o>(&self, output: &'o [u8]) -> Option<&'o [u8]> {
        output.get(..self.payload?)
    }
}

/// Drives AT command transactions over a [`Transport`].
///
/// One transaction is in flight at a time; the response
/// buffer of `N` bytes is reused by every call.
pub struct TransactionEngine<T, D, O, const N: usize> {
    transport: T,
    delay: D,
    observer: O,
    config: Config,
    raw: RawResponse<N>,
}

impl<T, D, const N: usize> TransactionEngine<T, D, Quiet, N>
where
    T: Transport,
    D: DelayNs,
{
    pub const fn new(transport: T, delay: D) -> Self {
        Self {
            transport,
            delay,
            observer: Quiet,
            config: Config::DEFAULT,
            raw: RawResponse::new(),
        }
    }
}

impl<T, D, O, const N: usize> TransactionEngine<T, D, O, N>
where
    T: Transport,
    D: DelayNs,
    O: Observer,
{
    pub fn with_observer<P: Observer>(self, observer: P) -> TransactionEngine<T, D, P, N> {
        TransactionEngine {
            transport: self.transport,
            delay: self.delay,
            observer,
            config: self.config,
            raw: self.raw,
        }
    }

    pub fn with_config(self, config: Config) -> Self {
        Self { config, ..self }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The response collected by the most recent transaction.
    #[inline]
    pub fn last_response(&self) -> &RawResponse<N> {
        &self.raw
    }

    /// Give back the transport and the delay.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    /// Send `command` and interpret the response.
    ///
    /// Every line of the response is classified. A data reply
    /// payload is copied into `output`, truncated to its length;
    /// if several arrive the last one wins.
    pub fn transact(&mut self, command: &Command<'_>, output: &mut [u8]) -> TransactionResult {
        self.observer
            .on_event(&Event::Transmitting { command: *command });

        self.raw.clear();
        self.transport.transmit_all(command.bytes());

        let mut termination = assemble(
            &mut self.transport,
            &mut self.delay,
            &self.config.watchdog,
            &mut self.raw,
        );

        if let Some(text) = command.post_echo() {
            if self.raw.tail().first() == Some(&PROMPT) {
                self.observer.on_event(&Event::PostEcho { text });
                self.transport.transmit_all(text.bytes());

                termination = assemble(
                    &mut self.transport,
                    &mut self.delay,
                    &self.config.watchdog,
                    &mut self.raw,
                );
            }
        }

        self.observer.on_event(&Event::Collected {
            length: self.raw.len(),
            termination,
        });

        let classifier = Classifier::new(command, &self.config.framing);
        let mut result = TransactionResult::default();

        for line in self.raw.lines() {
            let classified = classifier.classify(line);

            self.observer.on_event(&Event::Line { line, classified });

            match classified {
                ClassifiedLine::Ack => result.success = true,
                ClassifiedLine::Nack => result.nack = true,
                ClassifiedLine::DataReply { payload } => {
                    let written = self.config.framing.copy_payload(payload, output);

                    self.observer.on_event(&Event::Payload { written });
                    result.payload = Some(written);
                }
                ClassifiedLine::Echo | ClassifiedLine::Unclassified => {}
            }
        }

        self.observer.on_event(&Event::Completed {
            success: result.success,
        });

        result
    }

    /// Repeat [`transact`](Self::transact) up to `repeat` times until
    /// the device acknowledges, waiting `inter_attempt_delay_ms`
    /// between attempts.
    pub fn transact_with_retries(
        &mut self,
        command: &Command<'_>,
        output: &mut [u8],
        repeat: u8,
        inter_attempt_delay_ms: u32,
    ) -> bool {
        self.transact_until(command, output, repeat, inter_attempt_delay_ms, |result| {
            result.success
        })
        .is_some()
    }

    /// Like [`transact_with_retries`](Self::transact_with_retries),
    /// with the success condition chosen by `accept`.
    ///
    /// Returns the accepted result. No delay follows the
    /// final attempt.
    pub fn transact_until(
        &mut self,
        command: &Command<'_>,
        output: &mut [u8],
        repeat: u8,
        inter_attempt_delay_ms: u32,
        mut accept: impl FnMut(&TransactionResult) -> bool,
    ) -> Option<TransactionResult> {
        for attempt in 1..=repeat {
            self.observer
                .on_event(&Event::Attempt { attempt, of: repeat });

            let result = self.transact(command, output);

            if accept(&result) {
                return Some(result);
            }

            if attempt < repeat {
                self.delay.delay_ms(inter_attempt_delay_ms);
            }
        }

        None
    }
}
