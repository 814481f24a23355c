//! Little-endian field encoding for fixed-layout records.

/// Appends little-endian fields to a buffer.
pub(crate) struct Encoder<'a> {
    buf: &'a mut Vec<u8>,
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        Self { buf }
    }

    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// A NUL-padded string of exactly `width` bytes. The string is truncated
    /// on a character boundary so that at least one NUL always terminates it.
    pub fn fixed_str(&mut self, s: &str, width: usize) {
        let mut end = s.len().min(width.saturating_sub(1));
        while !s.is_char_boundary(end) {
            end -= 1;
        }

        self.buf.extend_from_slice(&s.as_bytes()[..end]);
        self.zeros(width - end);
    }

    pub fn zeros(&mut self, count: usize) {
        self.buf.resize(self.buf.len() + count, 0);
    }
}

/// Reads little-endian fields from a slice whose length the caller has
/// already checked against the record size.
pub(crate) struct Decoder<'a> {
    data: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let (head, tail) = self.data.split_at(N);
        self.data = tail;
        head.try_into().unwrap()
    }

    pub fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    pub fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    pub fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    pub fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take())
    }

    pub fn f32(&mut self) -> f32 {
        f32::from_le_bytes(self.take())
    }

    pub fn f64(&mut self) -> f64 {
        f64::from_le_bytes(self.take())
    }

    /// Reads a NUL-padded string of `width` bytes. Returns `None` if the bytes
    /// before the first NUL are not UTF-8.
    pub fn fixed_str(&mut self, width: usize) -> Option<String> {
        let (head, tail) = self.data.split_at(width);
        self.data = tail;

        let end = head.iter().position(|b| *b == 0).unwrap_or(width);
        std::str::from_utf8(&head[..end]).ok().map(str::to_string)
    }

    pub fn skip(&mut self, count: usize) {
        self.data = &self.data[count..];
    }
}
