const CARRIAGE_RETURN: u8 = b'\r';

/// An iterator over the carriage-return terminated
/// lines of an assembled response.
///
/// A trailing segment with no terminator is never
/// yielded, the device has not finished it yet.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a [u8],
}

impl<'a> Lines<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.rest.iter().position(|&byte| byte == CARRIAGE_RETURN)?;

        let line = &self.rest[..end];
        self.rest = &self.rest[end + 1..];

        Some(line)
    }
}
