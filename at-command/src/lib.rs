//! A synchronous request/response engine for driving a modem
//! with textual AT commands over a byte-oriented serial link.

#![no_std]

pub mod assembler;
pub mod classifier;
pub mod command;
pub mod identity;
pub mod observe;
pub mod response_buffer;
pub mod transaction;
pub mod transport;

#[cfg(test)]
mod mock;

pub use assembler::WatchdogConfig;
pub use classifier::{FramingConvention, LineKind, PayloadLength};
pub use command::Command;
pub use response_buffer::RawResponse;
pub use transaction::{Config, TransactionEngine, TransactionResult};
pub use transport::{IoTransport, Transport};

/// Capacity of the response buffer used when
/// nothing smaller is called for.
pub const DEFAULT_RESPONSE_CAPACITY: usize = 1000;

pub mod error {
    /// The mnemonic of a command did not begin with `"AT"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct InvalidMnemonic;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Overflow;

    /// Why a completed transaction was not successful.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Failure {
        /// The device answered with `ERROR`.
        DeviceNack,
        /// No `OK` was seen before the device fell silent
        /// or the response buffer filled.
        NoAck,
    }
}
