use crate::{command::Command, response_buffer::RawResponse};

pub use lines::Lines;

mod lines;

/// Marker a successful response ends with.
pub const ACK: &[u8] = b"OK";
/// Marker a rejected command ends with.
pub const NACK: &[u8] = b"ERROR";

/// A data reply must be longer than this.
const DATA_REPLY_MIN_LEN: usize = 4;

/// The tag of a classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineKind {
    Ack,
    Nack,
    Echo,
    DataReply,
    Unclassified,
}

/// A response line after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClassifiedLine<'a> {
    Ack,
    Nack,
    Echo,
    /// A `<command-without-AT>: <value>` line.
    DataReply { payload: &'a [u8] },
    Unclassified,
}

impl ClassifiedLine<'_> {
    pub fn kind(&self) -> LineKind {
        match self {
            Self::Ack => LineKind::Ack,
            Self::Nack => LineKind::Nack,
            Self::Echo => LineKind::Echo,
            Self::DataReply { .. } => LineKind::DataReply,
            Self::Unclassified => LineKind::Unclassified,
        }
    }
}

/// How many payload bytes are copied out of a data reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadLength {
    /// Copy through the final character of the line.
    ToLineEnd,
    /// Copy through the final character of the line,
    /// then one more byte: a `0` terminator.
    NulTerminated,
}

/// The prefix arithmetic used to recognize echoes and
/// data replies.
///
/// For a mnemonic of length `L` an echo is compared against
/// the first `L - terminator_width` bytes, and a data reply
/// against the `L - prefix_width - terminator_width` bytes
/// following the `"AT"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FramingConvention {
    /// Width of the `"\r\n"` ending a mnemonic.
    pub terminator_width: usize,
    /// Width of the `"AT"` a data reply omits.
    pub prefix_width: usize,
    /// Bytes skipped between the matched prefix and the payload.
    pub separator_width: usize,
    pub payload_length: PayloadLength,
}

impl FramingConvention {
    /// `"+CGMI: ACME"` yields `"ACME"`.
    pub const DEFAULT: Self = Self {
        terminator_width: 2,
        prefix_width: 2,
        separator_width: 2,
        payload_length: PayloadLength::ToLineEnd,
    };

    /// Skips only the colon: `"+CGMI: ACME"` yields `" ACME"`.
    pub const COLON_ONLY: Self = Self {
        separator_width: 1,
        ..Self::DEFAULT
    };

    /// The bytes an echo of `mnemonic` begins with.
    pub fn echo_prefix<'c>(&self, mnemonic: &'c [u8]) -> &'c [u8] {
        let end = mnemonic.len().saturating_sub(self.terminator_width);

        &mnemonic[..end]
    }

    /// The bytes a data reply to `mnemonic` begins with.
    pub fn data_prefix<'c>(&self, mnemonic: &'c [u8]) -> &'c [u8] {
        let end = mnemonic.len().saturating_sub(self.terminator_width);

        mnemonic.get(self.prefix_width..end).unwrap_or_default()
    }

    /// Copy a payload into `dst`, never past its end.
    ///
    /// Returns the number of payload bytes written, not
    /// counting any terminator.
    pub fn copy_payload(&self, payload: &[u8], dst: &mut [u8]) -> usize {
        let count = payload.len().min(dst.len());

        dst[..count].copy_from_slice(&payload[..count]);

        if self.payload_length == PayloadLength::NulTerminated {
            if let Some(slot) = dst.get_mut(count) {
                *slot = 0;
            }
        }

        count
    }
}

impl Default for FramingConvention {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Classifies response lines against the command
/// that produced them.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'c> {
    echo_prefix: &'c [u8],
    data_prefix: &'c [u8],
    separator_width: usize,
}

impl<'c> Classifier<'c> {
    pub fn new(command: &Command<'c>, framing: &FramingConvention) -> Self {
        let mnemonic = command.mnemonic().as_bytes();

        Self {
            echo_prefix: framing.echo_prefix(mnemonic),
            data_prefix: framing.data_prefix(mnemonic),
            separator_width: framing.separator_width,
        }
    }

    /// Classify a single line. The first matching rule wins.
    pub fn classify<'a>(&self, line: &'a [u8]) -> ClassifiedLine<'a> {
        if line.starts_with(ACK) {
            ClassifiedLine::Ack
        } else if line.starts_with(NACK) {
            ClassifiedLine::Nack
        } else if matches(line, self.echo_prefix) {
            ClassifiedLine::Echo
        } else if line.len() > DATA_REPLY_MIN_LEN && matches(line, self.data_prefix) {
            let start = self.data_prefix.len() + self.separator_width;

            ClassifiedLine::DataReply {
                payload: line.get(start..).unwrap_or_default(),
            }
        } else {
            ClassifiedLine::Unclassified
        }
    }

    /// Classify every terminated line of a response.
    pub fn classify_all<'a, const N: usize>(
        &self,
        raw: &'a RawResponse<N>,
    ) -> impl Iterator<Item = ClassifiedLine<'a>> + 'a
    where
        'c: 'a,
    {
        let classifier: Classifier<'a> = *self;

        raw.lines().map(move |line| classifier.classify(line))
    }
}

/// An empty prefix carries no information and matches nothing.
#[inline]
fn matches(line: &[u8], prefix: &[u8]) -> bool {
    !prefix.is_empty() && line.starts_with(prefix)
}
