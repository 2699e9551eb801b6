// Bounds-checked field accessors over a fixed-size byte region.
//
// An `Element` is a transient view into one entity of a codeplug image (a
// channel, a contact, a bitmap, ...). Every device catalog fixes its field
// offsets against the element start, so all accessors take element-relative
// byte (and bit) offsets. Out-of-range accesses are recovered locally: they
// log an error and return a zero value or skip the write. A single corrupt
// field must never abort decoding the rest of the image, and no access may
// ever touch memory outside the declared element size.

/// Bounds-checked view over a byte region.
///
/// Generic over the storage so the same accessor set works for shared
/// (`&[u8]`), mutable (`&mut [u8]`) and owned (`Vec<u8>`) regions.
#[derive(Debug)]
pub struct Element<T> {
    data: T,
}

impl<T: AsRef<[u8]>> Element<T> {
    /// Wrap a byte region. The region length is the declared element size.
    pub fn new(data: T) -> Self {
        Self { data }
    }

    /// Declared size of this element in bytes.
    pub fn size(&self) -> usize {
        self.data.as_ref().len()
    }

    /// Raw bytes of the element.
    pub fn bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Verify that `width` bytes at `offset` lie inside the element.
    /// Violations are logged with enough context to locate the bad access.
    fn check(&self, offset: usize, width: usize, what: &str) -> bool {
        let size = self.size();
        if offset + width > size {
            tracing::error!(
                offset = format_args!("{:#06x}", offset),
                width,
                size = format_args!("{:#06x}", size),
                "{} outside element bounds",
                what
            );
            return false;
        }
        true
    }

    /// Read a single bit. `bit` counts from the LSB of the byte at `offset`.
    pub fn get_bit(&self, offset: usize, bit: u8) -> bool {
        if !self.check(offset, 1, "bit read") {
            return false;
        }
        (self.data.as_ref()[offset] >> bit) & 0x01 != 0
    }

    /// Read an unsigned sub-byte field of `bits` bits starting at `bit`
    /// within the byte at `offset`. The field must not cross a byte boundary.
    fn get_subbyte(&self, offset: usize, bit: u8, bits: u8) -> u8 {
        if !self.check(offset, 1, "sub-byte read") {
            return 0;
        }
        let mask = (1u16 << bits) - 1;
        ((self.data.as_ref()[offset] >> bit) as u16 & mask) as u8
    }

    pub fn get_uint2(&self, offset: usize, bit: u8) -> u8 {
        self.get_subbyte(offset, bit, 2)
    }

    pub fn get_uint3(&self, offset: usize, bit: u8) -> u8 {
        self.get_subbyte(offset, bit, 3)
    }

    pub fn get_uint4(&self, offset: usize, bit: u8) -> u8 {
        self.get_subbyte(offset, bit, 4)
    }

    pub fn get_uint5(&self, offset: usize, bit: u8) -> u8 {
        self.get_subbyte(offset, bit, 5)
    }

    pub fn get_uint6(&self, offset: usize, bit: u8) -> u8 {
        self.get_subbyte(offset, bit, 6)
    }

    pub fn get_u8(&self, offset: usize) -> u8 {
        if !self.check(offset, 1, "u8 read") {
            return 0;
        }
        self.data.as_ref()[offset]
    }

    pub fn get_i8(&self, offset: usize) -> i8 {
        self.get_u8(offset) as i8
    }

    pub fn get_u16_be(&self, offset: usize) -> u16 {
        if !self.check(offset, 2, "u16 read") {
            return 0;
        }
        let d = self.data.as_ref();
        u16::from_be_bytes([d[offset], d[offset + 1]])
    }

    pub fn get_u16_le(&self, offset: usize) -> u16 {
        if !self.check(offset, 2, "u16 read") {
            return 0;
        }
        let d = self.data.as_ref();
        u16::from_le_bytes([d[offset], d[offset + 1]])
    }

    pub fn get_u24_be(&self, offset: usize) -> u32 {
        if !self.check(offset, 3, "u24 read") {
            return 0;
        }
        let d = self.data.as_ref();
        u32::from_be_bytes([0, d[offset], d[offset + 1], d[offset + 2]])
    }

    pub fn get_u24_le(&self, offset: usize) -> u32 {
        if !self.check(offset, 3, "u24 read") {
            return 0;
        }
        let d = self.data.as_ref();
        u32::from_le_bytes([d[offset], d[offset + 1], d[offset + 2], 0])
    }

    pub fn get_u32_be(&self, offset: usize) -> u32 {
        if !self.check(offset, 4, "u32 read") {
            return 0;
        }
        let d = self.data.as_ref();
        u32::from_be_bytes([d[offset], d[offset + 1], d[offset + 2], d[offset + 3]])
    }

    pub fn get_u32_le(&self, offset: usize) -> u32 {
        if !self.check(offset, 4, "u32 read") {
            return 0;
        }
        let d = self.data.as_ref();
        u32::from_le_bytes([d[offset], d[offset + 1], d[offset + 2], d[offset + 3]])
    }

    pub fn get_u64_be(&self, offset: usize) -> u64 {
        if !self.check(offset, 8, "u64 read") {
            return 0;
        }
        let d = self.data.as_ref();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&d[offset..offset + 8]);
        u64::from_be_bytes(bytes)
    }

    pub fn get_u64_le(&self, offset: usize) -> u64 {
        if !self.check(offset, 8, "u64 read") {
            return 0;
        }
        let d = self.data.as_ref();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&d[offset..offset + 8]);
        u64::from_le_bytes(bytes)
    }

    /// Read two BCD digits from one byte (high nibble first).
    pub fn get_bcd2(&self, offset: usize) -> u8 {
        if !self.check(offset, 1, "bcd2 read") {
            return 0;
        }
        let b = self.data.as_ref()[offset];
        (b >> 4) * 10 + (b & 0x0f)
    }

    /// Read four BCD digits from two bytes, most significant byte first.
    pub fn get_bcd4_be(&self, offset: usize) -> u16 {
        if !self.check(offset, 2, "bcd4 read") {
            return 0;
        }
        let d = self.data.as_ref();
        let mut val = 0u16;
        for &b in &d[offset..offset + 2] {
            val = val * 100 + ((b >> 4) as u16) * 10 + (b & 0x0f) as u16;
        }
        val
    }

    /// Read four BCD digits from two bytes, least significant byte first.
    pub fn get_bcd4_le(&self, offset: usize) -> u16 {
        if !self.check(offset, 2, "bcd4 read") {
            return 0;
        }
        let d = self.data.as_ref();
        let mut val = 0u16;
        for &b in d[offset..offset + 2].iter().rev() {
            val = val * 100 + ((b >> 4) as u16) * 10 + (b & 0x0f) as u16;
        }
        val
    }

    /// Read eight BCD digits from four bytes, most significant byte first.
    pub fn get_bcd8_be(&self, offset: usize) -> u32 {
        if !self.check(offset, 4, "bcd8 read") {
            return 0;
        }
        let d = self.data.as_ref();
        let mut val = 0u32;
        for &b in &d[offset..offset + 4] {
            val = val * 100 + ((b >> 4) as u32) * 10 + (b & 0x0f) as u32;
        }
        val
    }

    /// Read eight BCD digits from four bytes, least significant byte first.
    pub fn get_bcd8_le(&self, offset: usize) -> u32 {
        if !self.check(offset, 4, "bcd8 read") {
            return 0;
        }
        let d = self.data.as_ref();
        let mut val = 0u32;
        for &b in d[offset..offset + 4].iter().rev() {
            val = val * 100 + ((b >> 4) as u32) * 10 + (b & 0x0f) as u32;
        }
        val
    }

    /// Read a fixed-width Latin-1 string of at most `max_len` bytes.
    /// Reading stops at the first `fill` byte or at `max_len`.
    pub fn read_ascii(&self, offset: usize, max_len: usize, fill: u8) -> String {
        if !self.check(offset, max_len, "ascii read") {
            return String::new();
        }
        let d = self.data.as_ref();
        d[offset..offset + max_len]
            .iter()
            .take_while(|&&b| b != fill)
            .map(|&b| char::from(b))
            .collect()
    }

    /// Read a fixed-width UTF-16LE string of at most `max_len` code units.
    /// Reading stops at the first `fill` word or at `max_len`.
    pub fn read_unicode(&self, offset: usize, max_len: usize, fill: u16) -> String {
        if !self.check(offset, 2 * max_len, "unicode read") {
            return String::new();
        }
        let d = self.data.as_ref();
        let units: Vec<u16> = (0..max_len)
            .map(|i| u16::from_le_bytes([d[offset + 2 * i], d[offset + 2 * i + 1]]))
            .take_while(|&u| u != fill)
            .collect();
        String::from_utf16_lossy(&units)
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Element<T> {
    /// Raw mutable bytes of the element.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.data.as_mut()
    }

    /// Fill the whole element with `byte`.
    pub fn fill(&mut self, byte: u8) {
        self.data.as_mut().fill(byte);
    }

    /// Write a single bit, preserving the other bits of the byte.
    pub fn set_bit(&mut self, offset: usize, bit: u8, value: bool) {
        if !self.check(offset, 1, "bit write") {
            return;
        }
        let b = &mut self.data.as_mut()[offset];
        if value {
            *b |= 1 << bit;
        } else {
            *b &= !(1 << bit);
        }
    }

    pub fn clear_bit(&mut self, offset: usize, bit: u8) {
        self.set_bit(offset, bit, false);
    }

    /// Write an unsigned sub-byte field, read-modify-write: bits outside the
    /// field are preserved. Values wider than the field are masked.
    fn set_subbyte(&mut self, offset: usize, bit: u8, bits: u8, value: u8) {
        if !self.check(offset, 1, "sub-byte write") {
            return;
        }
        let mask = (((1u16 << bits) - 1) as u8) << bit;
        let b = &mut self.data.as_mut()[offset];
        *b = (*b & !mask) | ((value << bit) & mask);
    }

    pub fn set_uint2(&mut self, offset: usize, bit: u8, value: u8) {
        self.set_subbyte(offset, bit, 2, value)
    }

    pub fn set_uint3(&mut self, offset: usize, bit: u8, value: u8) {
        self.set_subbyte(offset, bit, 3, value)
    }

    pub fn set_uint4(&mut self, offset: usize, bit: u8, value: u8) {
        self.set_subbyte(offset, bit, 4, value)
    }

    pub fn set_uint5(&mut self, offset: usize, bit: u8, value: u8) {
        self.set_subbyte(offset, bit, 5, value)
    }

    pub fn set_uint6(&mut self, offset: usize, bit: u8, value: u8) {
        self.set_subbyte(offset, bit, 6, value)
    }

    pub fn set_u8(&mut self, offset: usize, value: u8) {
        if !self.check(offset, 1, "u8 write") {
            return;
        }
        self.data.as_mut()[offset] = value;
    }

    pub fn set_i8(&mut self, offset: usize, value: i8) {
        self.set_u8(offset, value as u8)
    }

    pub fn set_u16_be(&mut self, offset: usize, value: u16) {
        if !self.check(offset, 2, "u16 write") {
            return;
        }
        self.data.as_mut()[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }

    pub fn set_u16_le(&mut self, offset: usize, value: u16) {
        if !self.check(offset, 2, "u16 write") {
            return;
        }
        self.data.as_mut()[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    pub fn set_u24_be(&mut self, offset: usize, value: u32) {
        if !self.check(offset, 3, "u24 write") {
            return;
        }
        self.data.as_mut()[offset..offset + 3].copy_from_slice(&value.to_be_bytes()[1..]);
    }

    pub fn set_u24_le(&mut self, offset: usize, value: u32) {
        if !self.check(offset, 3, "u24 write") {
            return;
        }
        self.data.as_mut()[offset..offset + 3].copy_from_slice(&value.to_le_bytes()[..3]);
    }

    pub fn set_u32_be(&mut self, offset: usize, value: u32) {
        if !self.check(offset, 4, "u32 write") {
            return;
        }
        self.data.as_mut()[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    pub fn set_u32_le(&mut self, offset: usize, value: u32) {
        if !self.check(offset, 4, "u32 write") {
            return;
        }
        self.data.as_mut()[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn set_u64_be(&mut self, offset: usize, value: u64) {
        if !self.check(offset, 8, "u64 write") {
            return;
        }
        self.data.as_mut()[offset..offset + 8].copy_from_slice(&value.to_be_bytes());
    }

    pub fn set_u64_le(&mut self, offset: usize, value: u64) {
        if !self.check(offset, 8, "u64 write") {
            return;
        }
        self.data.as_mut()[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }

    /// Write two BCD digits into one byte. Values above 99 truncate to the
    /// low two decimal digits (`value % 100`).
    pub fn set_bcd2(&mut self, offset: usize, value: u8) {
        if !self.check(offset, 1, "bcd2 write") {
            return;
        }
        let v = value % 100;
        self.data.as_mut()[offset] = ((v / 10) << 4) | (v % 10);
    }

    /// Write four BCD digits, most significant byte first; truncates to
    /// `value % 10_000`.
    pub fn set_bcd4_be(&mut self, offset: usize, value: u16) {
        if !self.check(offset, 2, "bcd4 write") {
            return;
        }
        let mut v = value % 10_000;
        for i in (0..2).rev() {
            let two = (v % 100) as u8;
            v /= 100;
            self.data.as_mut()[offset + i] = ((two / 10) << 4) | (two % 10);
        }
    }

    /// Write four BCD digits, least significant byte first; truncates to
    /// `value % 10_000`.
    pub fn set_bcd4_le(&mut self, offset: usize, value: u16) {
        if !self.check(offset, 2, "bcd4 write") {
            return;
        }
        let mut v = value % 10_000;
        for i in 0..2 {
            let two = (v % 100) as u8;
            v /= 100;
            self.data.as_mut()[offset + i] = ((two / 10) << 4) | (two % 10);
        }
    }

    /// Write eight BCD digits, most significant byte first; truncates to
    /// `value % 100_000_000`.
    pub fn set_bcd8_be(&mut self, offset: usize, value: u32) {
        if !self.check(offset, 4, "bcd8 write") {
            return;
        }
        let mut v = value % 100_000_000;
        for i in (0..4).rev() {
            let two = (v % 100) as u8;
            v /= 100;
            self.data.as_mut()[offset + i] = ((two / 10) << 4) | (two % 10);
        }
    }

    /// Write eight BCD digits, least significant byte first; truncates to
    /// `value % 100_000_000`.
    pub fn set_bcd8_le(&mut self, offset: usize, value: u32) {
        if !self.check(offset, 4, "bcd8 write") {
            return;
        }
        let mut v = value % 100_000_000;
        for i in 0..4 {
            let two = (v % 100) as u8;
            v /= 100;
            self.data.as_mut()[offset + i] = ((two / 10) << 4) | (two % 10);
        }
    }

    /// Write a fixed-width Latin-1 string: the first `min(len, max_len)`
    /// characters of `text`, then `fill` up to `max_len`. A string of exactly
    /// `max_len` characters occupies the whole field with no terminator.
    /// Characters outside Latin-1 encode as `?`.
    pub fn write_ascii(&mut self, offset: usize, text: &str, max_len: usize, fill: u8) {
        if !self.check(offset, max_len, "ascii write") {
            return;
        }
        let mut chars = text.chars();
        for i in 0..max_len {
            let b = match chars.next() {
                Some(c) if (c as u32) < 0x100 => c as u8,
                Some(_) => b'?',
                None => fill,
            };
            self.data.as_mut()[offset + i] = b;
        }
    }

    /// Write a fixed-width UTF-16LE string padded with the `fill` word.
    pub fn write_unicode(&mut self, offset: usize, text: &str, max_len: usize, fill: u16) {
        if !self.check(offset, 2 * max_len, "unicode write") {
            return;
        }
        let mut units = text.encode_utf16();
        for i in 0..max_len {
            let u = units.next().unwrap_or(fill);
            self.data.as_mut()[offset + 2 * i..offset + 2 * i + 2]
                .copy_from_slice(&u.to_le_bytes());
        }
    }
}
