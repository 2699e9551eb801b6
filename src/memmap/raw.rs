// Fixed-size byte storage for one allocated region of a codeplug image.

use std::fmt;

/// Owned byte buffer with a fixed length.
///
/// Unlike a plain `Vec<u8>` this never grows or shrinks after creation; a
/// region's size is part of the device layout and resizing it would shift
/// every field behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBuffer {
    data: Vec<u8>,
}

impl RawBuffer {
    /// Create a zero-filled buffer of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0u8; size],
        }
    }

    /// Take ownership of existing bytes.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fill the whole buffer with `byte`.
    pub fn fill(&mut self, byte: u8) {
        self.data.fill(byte);
    }

    /// Hex representation of a byte range, `hexdump -C` style.
    pub fn printable(&self, start: usize, end: usize) -> String {
        let end = end.min(self.data.len());
        let start = start.min(end);
        hexdump(&self.data[start..end])
    }
}

impl AsRef<[u8]> for RawBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl AsMut<[u8]> for RawBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl fmt::Display for RawBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawBuffer({} bytes)", self.data.len())
    }
}

fn hexdump(data: &[u8]) -> String {
    let mut out = String::new();
    for (line, chunk) in data.chunks(16).enumerate() {
        out.push_str(&format!("{:08x} ", line * 16));
        for col in 0..16 {
            if col % 8 == 0 {
                out.push(' ');
            }
            match chunk.get(col) {
                Some(byte) => out.push_str(&format!("{:02x} ", byte)),
                None => out.push_str("   "),
            }
        }
        out.push_str(" |");
        for &byte in chunk {
            let printable = byte.is_ascii_graphic() || byte == b' ';
            out.push(if printable { byte as char } else { '.' });
        }
        out.push_str("|\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_size() {
        let mut buf = RawBuffer::new(16);
        assert_eq!(buf.len(), 16);
        buf.fill(0xff);
        assert_eq!(buf.as_ref(), &[0xff; 16]);
        buf.as_mut()[3] = 0x42;
        assert_eq!(buf.as_ref()[3], 0x42);
        assert_eq!(buf.len(), 16);
    }

    #[test]
    fn test_hexdump() {
        let buf = RawBuffer::from_vec(vec![
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f, 0x41, 0x42, 0x43,
        ]);
        let dump = buf.printable(0, buf.len());
        assert!(dump.contains("00 01 02 03"));
        assert!(dump.contains("41 42 43"));
        assert!(dump.contains("|"));
    }
}
