use heapless::Vec;

use crate::{classifier::Lines, error};

/// Line feeds never enter the buffer.
const LINE_FEED: u8 = b'\n';

/// The flat byte buffer a single response is
/// assembled into.
///
/// One byte of the capacity is always held in reserve,
/// so at most `N - 1` bytes are ever stored.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawResponse<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> Default for RawResponse<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RawResponse<N> {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Ingest one received byte.
    ///
    /// Line feeds are silently discarded.
    pub fn push(&mut self, byte: u8) -> Result<(), error::Overflow> {
        if byte == LINE_FEED {
            return Ok(());
        }

        if self.is_exhausted() {
            Err(error::Overflow)?;
        }

        self.buf.push(byte).map_err(|_| error::Overflow)
    }

    /// Ingest a run of received bytes.
    pub fn ingest<'a>(
        &mut self,
        src: impl IntoIterator<Item = &'a u8>,
    ) -> Result<(), error::Overflow> {
        src.into_iter().try_for_each(|&byte| self.push(byte))
    }

    /// Whether another byte would eat into the reserve.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.len() + 1 >= N
    }

    /// Get the capacity (maximum length) of the buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Get the current length of the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Every carriage-return terminated line, in order.
    #[inline]
    pub fn lines(&self) -> Lines<'_> {
        Lines::new(self.as_bytes())
    }

    /// The bytes after the last carriage return, i.e.
    /// a line the device has not finished yet.
    pub fn tail(&self) -> &[u8] {
        let bytes = self.as_bytes();

        match bytes.iter().rposition(|&byte| byte == b'\r') {
            Some(end) => &bytes[end + 1..],
            None => bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RawResponse;

    mod ingestion {
        use super::*;

        #[test]
        fn basic() {
            let mut raw = RawResponse::<10>::new();

            raw.ingest(b"OK\r".iter()).unwrap();

            assert_eq!(raw.len(), 3);
            assert_eq!(raw.as_bytes(), b"OK\r");
        }

        #[test]
        fn line_feeds_dropped() {
            let mut raw = RawResponse::<16>::new();

            raw.ingest(b"\nAT\r\n\nOK\r\n".iter()).unwrap();

            assert_eq!(raw.as_bytes(), b"AT\rOK\r");
        }

        #[test]
        fn one_short_of_capacity() {
            let mut raw = RawResponse::<10>::new();

            let test_buf = b"+CGMI: A\r";

            raw.ingest(test_buf.iter()).unwrap();

            assert_eq!(raw.len(), raw.capacity() - 1);
            assert!(raw.is_exhausted());
        }

        #[test]
        fn overflow() {
            let mut raw = RawResponse::<8>::new();

            let test_buf = [0xde, 0xad, 0xbe, 0xef, 0x15, 0xba, 0xdb, 0xad, 0xf0, 0x0d];

            assert!(raw.ingest(test_buf.iter()).is_err());

            assert_eq!(raw.len(), raw.capacity() - 1);
            assert_eq!(raw.as_bytes(), &test_buf[..7]);
        }

        #[test]
        fn degenerate_capacity() {
            let mut raw = RawResponse::<1>::new();

            assert!(raw.push(b'O').is_err());
            assert!(raw.is_empty());
        }
    }

    mod view {
        use super::*;

        #[test]
        fn tail() {
            let mut raw = RawResponse::<32>::new();

            raw.ingest(b"AT+CMGS=1\r\r\n> ".iter()).unwrap();

            assert_eq!(raw.tail(), b"> ");

            raw.ingest(b"hi\r".iter()).unwrap();

            assert_eq!(raw.tail(), b"");
        }

        #[test]
        fn clear() {
            let mut raw = RawResponse::<32>::new();

            raw.ingest(b"ERROR\r\n".iter()).unwrap();
            raw.clear();

            assert!(raw.is_empty());
            assert_eq!(raw.lines().count(), 0);
        }
    }
}
