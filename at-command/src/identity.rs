//! Querying who made a modem and which one it is.

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::{
    command::{standard, Command},
    observe::Observer,
    transaction::TransactionEngine,
    transport::Transport,
};

/// Longest identification value kept.
pub const FIELD_CAPACITY: usize = 64;

pub type Field = String<FIELD_CAPACITY>;

/// What a modem reported about itself.
///
/// Fields the device never acknowledged are `None`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    /// The device acknowledged `AT`.
    pub responsive: bool,
    pub manufacturer: Option<Field>,
    pub model: Option<Field>,
    pub revision: Option<Field>,
    pub serial_number: Option<Field>,
}

/// Run the identification cycle: attention, then manufacturer,
/// model, revision and serial number.
///
/// Each command is retried up to `repeat` times with
/// `inter_attempt_delay_ms` between attempts.
pub fn identify<T, D, O, const N: usize>(
    engine: &mut TransactionEngine<T, D, O, N>,
    repeat: u8,
    inter_attempt_delay_ms: u32,
) -> DeviceIdentity
where
    T: Transport,
    D: DelayNs,
    O: Observer,
{
    let responsive = engine.transact_with_retries(
        &standard::ATTENTION,
        &mut [],
        repeat,
        inter_attempt_delay_ms,
    );

    let mut query = |command: &Command<'_>| -> Option<Field> {
        let mut output = [0u8; FIELD_CAPACITY];

        let result = engine.transact_until(
            command,
            &mut output,
            repeat,
            inter_attempt_delay_ms,
            |result| result.success,
        )?;

        let text = core::str::from_utf8(result.payload(&output)?).ok()?;

        let mut field = Field::new();
        field.push_str(text.trim()).ok()?;

        Some(field)
    };

    DeviceIdentity {
        responsive,
        manufacturer: query(&standard::MANUFACTURER),
        model: query(&standard::MODEL),
        revision: query(&standard::REVISION),
        serial_number: query(&standard::SERIAL_NUMBER),
    }
}
