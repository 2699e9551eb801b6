// Analog selective-call signaling: CTCSS sub-audible tones and DCS codes.
//
// The canonical value space is closed: 38 standard CTCSS tones and 104
// standard DCS codes, each usable in normal or inverted polarity. Everything
// else degrades to `None`. Tones are carried in deci-hertz so equality and
// hashing stay exact; DCS codes are carried as their three-digit octal
// numeral (D023N is `code: 23`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The 38 standard CTCSS tones in deci-hertz (67.0 Hz .. 250.3 Hz).
pub const CTCSS_TONES: [u16; 38] = [
    670, 719, 744, 770, 797, 825, 854, 885, 915, 948, 974, 1000, 1035, 1072, 1109, 1148, 1188,
    1230, 1273, 1318, 1365, 1413, 1462, 1514, 1567, 1622, 1679, 1738, 1799, 1862, 1928, 2035,
    2107, 2181, 2257, 2336, 2418, 2503,
];

/// The 104 standard DCS codes as octal numerals.
pub const DCS_CODES: [u16; 104] = [
    23, 25, 26, 31, 32, 36, 43, 47, 51, 53, 54, 71, 72, 73, 74, 114, 115, 116, 122, 125, 131,
    132, 134, 143, 145, 152, 155, 156, 162, 165, 172, 174, 205, 212, 223, 225, 226, 243, 244,
    245, 246, 251, 252, 255, 261, 263, 265, 266, 267, 271, 274, 306, 311, 315, 325, 331, 332,
    343, 346, 351, 356, 364, 365, 371, 411, 412, 413, 423, 431, 432, 445, 446, 452, 454, 455,
    462, 464, 465, 466, 503, 506, 516, 523, 526, 532, 546, 565, 606, 612, 624, 627, 631, 632,
    654, 662, 664, 703, 712, 723, 731, 732, 734, 743, 754,
];

/// A channel's receive or transmit squelch setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SelectiveCall {
    /// Carrier squelch, no selective call.
    #[default]
    None,
    /// Sub-audible tone squelch; the tone in deci-hertz.
    Ctcss { tone: u16 },
    /// Digital-coded squelch; `code` is the octal numeral (D023N -> 23).
    Dcs { code: u16, inverted: bool },
}

impl SelectiveCall {
    /// Validated CTCSS constructor. Tones outside the canonical table
    /// degrade to `None`.
    pub fn ctcss(deci_hz: u16) -> Self {
        if CTCSS_TONES.contains(&deci_hz) {
            SelectiveCall::Ctcss { tone: deci_hz }
        } else {
            tracing::warn!(deci_hz, "non-standard CTCSS tone, dropping signaling");
            SelectiveCall::None
        }
    }

    /// Validated DCS constructor. Codes outside the canonical table degrade
    /// to `None`.
    pub fn dcs(code: u16, inverted: bool) -> Self {
        if DCS_CODES.contains(&code) {
            SelectiveCall::Dcs { code, inverted }
        } else {
            tracing::warn!(code, "non-standard DCS code, dropping signaling");
            SelectiveCall::None
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SelectiveCall::None)
    }

    pub fn is_ctcss(&self) -> bool {
        matches!(self, SelectiveCall::Ctcss { .. })
    }

    pub fn is_dcs(&self) -> bool {
        matches!(self, SelectiveCall::Dcs { .. })
    }

    pub fn is_dcs_normal(&self) -> bool {
        matches!(self, SelectiveCall::Dcs { inverted: false, .. })
    }

    pub fn is_dcs_inverted(&self) -> bool {
        matches!(self, SelectiveCall::Dcs { inverted: true, .. })
    }

    /// Tone frequency in hertz, for CTCSS settings.
    pub fn ctcss_frequency(&self) -> Option<f32> {
        match self {
            SelectiveCall::Ctcss { tone } => Some(*tone as f32 / 10.0),
            _ => None,
        }
    }

    /// Validated constructor from a frequency in hertz.
    pub fn from_ctcss_frequency(hz: f32) -> Self {
        Self::ctcss((hz * 10.0).round() as u16)
    }

    /// Octal code numeral, for DCS settings.
    pub fn dcs_number(&self) -> Option<u16> {
        match self {
            SelectiveCall::Dcs { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for SelectiveCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectiveCall::None => write!(f, "none"),
            SelectiveCall::Ctcss { tone } => {
                write!(f, "{}.{} Hz", tone / 10, tone % 10)
            }
            SelectiveCall::Dcs { code, inverted } => {
                write!(f, "D{:03}{}", code, if *inverted { 'I' } else { 'N' })
            }
        }
    }
}

/// Reinterpret the digits of an octal numeral as decimal: 0o23 -> 23.
/// Many devices store DCS codes this way on the wire.
pub fn oct_to_dec(oct: u16) -> u16 {
    let mut dec = 0u16;
    let mut mul = 1u16;
    let mut rest = oct;
    while rest > 0 {
        dec += (rest & 0x7) * mul;
        rest >>= 3;
        mul *= 10;
    }
    dec
}

/// Reinterpret the digits of a decimal numeral as octal: 23 -> 0o23.
/// Returns `None` when a digit is 8 or 9, which no octal numeral has.
pub fn dec_to_oct(dec: u16) -> Option<u16> {
    let mut oct = 0u16;
    let mut shift = 0u32;
    let mut rest = dec;
    while rest > 0 {
        let digit = rest % 10;
        if digit > 7 {
            return None;
        }
        oct += digit << shift;
        rest /= 10;
        shift += 3;
    }
    Some(oct)
}

/// Pack a DCS setting into the common u16 wire form: the octal numeral
/// written out in decimal, plus 512 for inverted polarity. Non-DCS settings
/// pack to zero.
pub fn dcs_wire_encode(call: SelectiveCall) -> u16 {
    match call {
        SelectiveCall::Dcs { code, inverted } => code + if inverted { 512 } else { 0 },
        _ => 0,
    }
}

/// Unpack the u16 DCS wire form. Unknown codes degrade to `None`.
pub fn dcs_wire_decode(wire: u16) -> SelectiveCall {
    let (numeral, inverted) = if wire >= 512 {
        (wire - 512, true)
    } else {
        (wire, false)
    };
    // A valid wire numeral only uses octal digits.
    if dec_to_oct(numeral).is_none() {
        tracing::warn!(wire, "malformed DCS wire value");
        return SelectiveCall::None;
    }
    SelectiveCall::dcs(numeral, inverted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shapes() {
        assert_eq!(CTCSS_TONES.len(), 38);
        assert_eq!(DCS_CODES.len(), 104);
        assert!(CTCSS_TONES.windows(2).all(|w| w[0] < w[1]));
        assert!(DCS_CODES.windows(2).all(|w| w[0] < w[1]));
        // Every canonical code is an octal numeral.
        assert!(DCS_CODES.iter().all(|&c| dec_to_oct(c).is_some()));
    }

    #[test]
    fn test_validated_constructors() {
        assert_eq!(SelectiveCall::ctcss(670), SelectiveCall::Ctcss { tone: 670 });
        assert_eq!(SelectiveCall::ctcss(671), SelectiveCall::None);
        assert_eq!(
            SelectiveCall::dcs(23, false),
            SelectiveCall::Dcs { code: 23, inverted: false }
        );
        assert_eq!(SelectiveCall::dcs(24, false), SelectiveCall::None);
    }

    #[test]
    fn test_octal_decimal_digits() {
        assert_eq!(oct_to_dec(0o023), 23);
        assert_eq!(oct_to_dec(0o754), 754);
        assert_eq!(dec_to_oct(23), Some(0o023));
        assert_eq!(dec_to_oct(754), Some(0o754));
        assert_eq!(dec_to_oct(28), None);
        assert_eq!(oct_to_dec(dec_to_oct(445).unwrap()), 445);
    }

    #[test]
    fn test_dcs_wire_roundtrip() {
        let normal = SelectiveCall::dcs(23, false);
        let inverted = SelectiveCall::dcs(23, true);
        assert_eq!(dcs_wire_encode(normal), 23);
        assert_eq!(dcs_wire_encode(inverted), 535);
        assert_eq!(dcs_wire_decode(23), normal);
        assert_eq!(dcs_wire_decode(535), inverted);
        // Unknown numeral degrades to None.
        assert_eq!(dcs_wire_decode(24), SelectiveCall::None);
        assert_eq!(dcs_wire_decode(98), SelectiveCall::None);
    }

    #[test]
    fn test_frequency_conversions() {
        let call = SelectiveCall::from_ctcss_frequency(67.0);
        assert_eq!(call, SelectiveCall::Ctcss { tone: 670 });
        assert_eq!(call.ctcss_frequency(), Some(67.0));
        assert_eq!(SelectiveCall::from_ctcss_frequency(68.0), SelectiveCall::None);
        assert_eq!(SelectiveCall::dcs(23, true).dcs_number(), Some(23));
        assert!(SelectiveCall::dcs(23, true).is_dcs_inverted());
        assert!(SelectiveCall::dcs(23, false).is_dcs_normal());
    }

    #[test]
    fn test_display() {
        assert_eq!(SelectiveCall::ctcss(670).to_string(), "67.0 Hz");
        assert_eq!(SelectiveCall::ctcss(1035).to_string(), "103.5 Hz");
        assert_eq!(SelectiveCall::dcs(23, false).to_string(), "D023N");
        assert_eq!(SelectiveCall::dcs(754, true).to_string(), "D754I");
    }
}
