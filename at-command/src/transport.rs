use embedded_io::{Read, ReadReady, Write, WriteReady};

/// A duplex byte channel to the modem.
///
/// Both operations must return immediately.
pub trait Transport {
    /// Offer one byte for transmission.
    ///
    /// Returns `false` if the byte was not accepted
    /// and must be offered again.
    fn try_transmit(&mut self, byte: u8) -> bool;

    /// Take one received byte, if one is available now.
    fn try_receive(&mut self) -> Option<u8>;

    /// Transmit every byte, busy-waiting on backpressure.
    fn transmit_all(&mut self, bytes: impl IntoIterator<Item = u8>)
    where
        Self: Sized,
    {
        for byte in bytes {
            while !self.try_transmit(byte) {}
        }
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    #[inline]
    fn try_transmit(&mut self, byte: u8) -> bool {
        T::try_transmit(self, byte)
    }

    #[inline]
    fn try_receive(&mut self) -> Option<u8> {
        T::try_receive(self)
    }
}

/// Adapts an [`embedded_io`] port to [`Transport`].
///
/// I/O errors are indistinguishable from the
/// port not being ready.
#[derive(Debug)]
pub struct IoTransport<P> {
    port: P,
}

impl<P> IoTransport<P>
where
    P: Read + ReadReady + Write + WriteReady,
{
    pub const fn new(port: P) -> Self {
        Self { port }
    }

    pub fn into_inner(self) -> P {
        self.port
    }
}

impl<P> Transport for IoTransport<P>
where
    P: Read + ReadReady + Write + WriteReady,
{
    fn try_transmit(&mut self, byte: u8) -> bool {
        matches!(self.port.write_ready(), Ok(true)) && matches!(self.port.write(&[byte]), Ok(1))
    }

    fn try_receive(&mut self) -> Option<u8> {
        if !matches!(self.port.read_ready(), Ok(true)) {
            return None;
        }

        let mut byte = [0];

        match self.port.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}
