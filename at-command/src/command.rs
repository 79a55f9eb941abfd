use crate::error;

/// The two-character prefix every AT mnemonic begins with.
pub const PREFIX: &str = "AT";

/// An AT command as it will be put on the wire.
///
/// The mnemonic is transmitted verbatim, so it carries its own
/// `"\r\n"` terminator when the command is sent standalone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command<'a> {
    mnemonic: &'a str,
    parameters: Option<&'a str>,
    post_echo: Option<&'a str>,
}

impl<'a> Command<'a> {
    pub const fn new(mnemonic: &'a str) -> Result<Self, error::InvalidMnemonic> {
        let bytes = mnemonic.as_bytes();

        if bytes.len() < 2 || bytes[0] != b'A' || bytes[1] != b'T' {
            return Err(error::InvalidMnemonic);
        }

        Ok(Self {
            mnemonic,
            parameters: None,
            post_echo: None,
        })
    }

    /// Parameters are appended directly after the
    /// mnemonic with no separator injected.
    pub const fn with_parameters(self, parameters: &'a str) -> Self {
        Self {
            parameters: Some(parameters),
            ..self
        }
    }

    /// Text to send if the device prompts with `'>'`.
    pub const fn with_post_echo(self, post_echo: &'a str) -> Self {
        Self {
            post_echo: Some(post_echo),
            ..self
        }
    }

    #[inline]
    pub const fn mnemonic(&self) -> &'a str {
        self.mnemonic
    }

    #[inline]
    pub const fn parameters(&self) -> Option<&'a str> {
        self.parameters
    }

    #[inline]
    pub const fn post_echo(&self) -> Option<&'a str> {
        self.post_echo
    }

    /// Every byte to transmit, in order.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + 'a {
        self.mnemonic
            .bytes()
            .chain(self.parameters.unwrap_or_default().bytes())
    }
}

/// Commands issued when identifying a device.
pub mod standard {
    use super::Command;

    macro_rules! standard_command {
        ($(#[$meta:meta])* $NAME:ident, $TEXT:expr) => {
            $(#[$meta])*
            pub const $NAME: Command<'static> = match Command::new($TEXT) {
                Ok(command) => command,
                Err(_) => panic!("standard commands begin with AT"),
            };
        };
    }

    standard_command!(
        /// Attention; the device answers `OK` when alive.
        ATTENTION,
        "AT\r\n"
    );
    standard_command!(MANUFACTURER, "AT+CGMI\r\n");
    standard_command!(MODEL, "AT+CGMM\r\n");
    standard_command!(REVISION, "AT+CGMR\r\n");
    standard_command!(
        /// Product serial number (IMEI on GSM devices).
        SERIAL_NUMBER,
        "AT+CGSN\r\n"
    );
}
