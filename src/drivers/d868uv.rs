// AnyTone AT-D868UV codeplug codec.
//
// Sparse memory layout with fixed-capacity banks; entries are addressed by
// device index and never compacted. Presence bitmaps tell the firmware which
// entries are valid.
//
// Address map (all element sizes fixed):
// - Channels: 32 banks of 128 x 64 B from 0x00800000, bank stride 0x40000;
//   bitmap (4000 bits) at 0x024C1500.
// - Zones: names 16 B ASCII at 0x02540000 + i*0x20, member lists of
//   250 x u16-LE at 0x01000000 + i*0x400; bitmap at 0x024C1300.
// - Contacts: 10 banks of 1000 x 100 B from 0x02680000, bank stride
//   0x40000; bitmap at 0x02640000.
// - DTMF contacts: 128 x 24 B from 0x02940000; index list at 0x02900000,
//   presence bytemap (0xff empty, 0x00 valid) at 0x02900100.
// - Group lists: 250 x 288 B at 0x02980000 + i*0x200; bitmap at 0x025C0B10.
// - Scan lists: 16 banks of 16 x 144 B from 0x01080000, bank stride
//   0x40000, entry stride 0x200; bitmap at 0x024C1340.
// - Radio IDs: 250 x 32 B from 0x02580000; bitmap at 0x024C1320.
// - General settings: 256 B at 0x02500000.

use crate::bitwise::Element;
use crate::codeplug::{
    BitmapElement, BytemapElement, Codeplug, CodeplugError, ErrorStack, Flags, Result,
};
use crate::config::{
    AnalogAdmit, AnalogChannel, Bandwidth, BootDisplay, CallType, Channel, ChannelRef, Config,
    Contact, DigitalAdmit, DigitalChannel, DmrContact, DtmfContact, GeneralSettings, GroupList,
    Power, PriorityMode, RadioId, RepeaterMode, ScanList, TimeSlot, Zone,
};
use crate::context::{Context, ObjectKind};
use crate::memmap::Image;
use crate::signaling::{self, SelectiveCall, CTCSS_TONES};

const NUM_CHANNELS: usize = 4000;
const CHANNELS_PER_BANK: usize = 128;
const CHANNEL_SIZE: usize = 0x40;
const CHANNEL_BANK_0: u32 = 0x00800000;
const CHANNEL_BANK_STRIDE: u32 = 0x00040000;
const CHANNEL_BITMAP: u32 = 0x024C1500;
const CHANNEL_BITMAP_SIZE: usize = 0x200;

const NUM_ZONES: usize = 250;
const CHANNELS_PER_ZONE: usize = 250;
const ZONE_NAME_0: u32 = 0x02540000;
const ZONE_NAME_STRIDE: u32 = 0x20;
const ZONE_NAME_SIZE: usize = 0x20;
const ZONE_CHANNELS_0: u32 = 0x01000000;
const ZONE_CHANNELS_STRIDE: u32 = 0x400;
const ZONE_CHANNELS_SIZE: usize = 2 * CHANNELS_PER_ZONE;
const ZONE_BITMAP: u32 = 0x024C1300;
const ZONE_BITMAP_SIZE: usize = 0x20;

const NUM_CONTACTS: usize = 10000;
const CONTACTS_PER_BANK: usize = 1000;
const CONTACT_SIZE: usize = 100;
const CONTACT_BANK_0: u32 = 0x02680000;
const CONTACT_BANK_STRIDE: u32 = 0x00040000;
const CONTACT_BITMAP: u32 = 0x02640000;
const CONTACT_BITMAP_SIZE: usize = 0x500;

const NUM_DTMF_CONTACTS: usize = 128;
const DTMF_CONTACT_SIZE: usize = 0x18;
const DTMF_CONTACT_0: u32 = 0x02940000;
const DTMF_INDEX: u32 = 0x02900000;
const DTMF_INDEX_SIZE: usize = NUM_DTMF_CONTACTS;
const DTMF_BYTEMAP: u32 = 0x02900100;
const DTMF_BYTEMAP_SIZE: usize = 0x80;

const NUM_GROUP_LISTS: usize = 250;
const GROUP_LIST_SIZE: usize = 0x120;
const GROUP_LIST_0: u32 = 0x02980000;
const GROUP_LIST_STRIDE: u32 = 0x200;
const GROUP_LIST_MEMBERS: usize = 64;
const GROUP_LIST_BITMAP: u32 = 0x025C0B10;
const GROUP_LIST_BITMAP_SIZE: usize = 0x20;

const NUM_SCAN_LISTS: usize = 250;
const SCAN_LISTS_PER_BANK: usize = 16;
const SCAN_LIST_SIZE: usize = 0x90;
const SCAN_LIST_BANK_0: u32 = 0x01080000;
const SCAN_LIST_BANK_STRIDE: u32 = 0x00040000;
const SCAN_LIST_STRIDE: u32 = 0x200;
const SCAN_LIST_MEMBERS: usize = 50;
const SCAN_LIST_BITMAP: u32 = 0x024C1340;
const SCAN_LIST_BITMAP_SIZE: usize = 0x20;

const NUM_RADIO_IDS: usize = 250;
const RADIO_ID_SIZE: usize = 0x20;
const RADIO_ID_0: u32 = 0x02580000;
const RADIO_ID_BITMAP: u32 = 0x024C1320;
const RADIO_ID_BITMAP_SIZE: usize = 0x20;

const SETTINGS_ADDR: u32 = 0x02500000;
const SETTINGS_SIZE: usize = 0x100;

const NAME_LEN: usize = 16;

/// The device's 52-slot CTCSS table in deci-hertz (62.5 .. 254.1 Hz).
/// 14 of the slots carry frequencies outside the 38-tone standard set.
const DEVICE_CTCSS: [u16; 52] = [
    625, 670, 693, 719, 744, 770, 797, 825, 854, 885, 915, 948, 974, 1000, 1035, 1072, 1109,
    1148, 1188, 1230, 1273, 1318, 1365, 1413, 1462, 1500, 1514, 1567, 1598, 1622, 1655, 1679,
    1713, 1738, 1773, 1799, 1835, 1862, 1899, 1928, 1966, 1995, 2035, 2065, 2107, 2181, 2257,
    2291, 2336, 2418, 2503, 2541,
];

/// Device CTCSS index for a signaling setting. Anything the device table
/// cannot express canonicalizes to index 0 (the firmware convention for
/// "no tone").
fn ctcss_index(call: SelectiveCall) -> u8 {
    if let SelectiveCall::Ctcss { tone } = call {
        if let Some(pos) = DEVICE_CTCSS.iter().position(|&t| t == tone) {
            return pos as u8;
        }
    }
    0
}

/// Signaling setting for a device CTCSS index. Slots holding non-standard
/// frequencies decode to `None`.
fn ctcss_from_index(index: u8) -> SelectiveCall {
    match DEVICE_CTCSS.get(index as usize) {
        Some(&tone) if CTCSS_TONES.contains(&tone) => SelectiveCall::Ctcss { tone },
        Some(_) => SelectiveCall::None,
        None => {
            tracing::warn!(index, "CTCSS index out of range");
            SelectiveCall::None
        }
    }
}

fn channel_address(index: usize) -> u32 {
    CHANNEL_BANK_0
        + (index / CHANNELS_PER_BANK) as u32 * CHANNEL_BANK_STRIDE
        + (index % CHANNELS_PER_BANK) as u32 * CHANNEL_SIZE as u32
}

fn zone_name_address(index: usize) -> u32 {
    ZONE_NAME_0 + index as u32 * ZONE_NAME_STRIDE
}

fn zone_channels_address(index: usize) -> u32 {
    ZONE_CHANNELS_0 + index as u32 * ZONE_CHANNELS_STRIDE
}

fn contact_address(index: usize) -> u32 {
    CONTACT_BANK_0
        + (index / CONTACTS_PER_BANK) as u32 * CONTACT_BANK_STRIDE
        + (index % CONTACTS_PER_BANK) as u32 * CONTACT_SIZE as u32
}

fn dtmf_contact_address(index: usize) -> u32 {
    DTMF_CONTACT_0 + index as u32 * DTMF_CONTACT_SIZE as u32
}

fn group_list_address(index: usize) -> u32 {
    GROUP_LIST_0 + index as u32 * GROUP_LIST_STRIDE
}

fn scan_list_address(index: usize) -> u32 {
    SCAN_LIST_BANK_0
        + (index / SCAN_LISTS_PER_BANK) as u32 * SCAN_LIST_BANK_STRIDE
        + (index % SCAN_LISTS_PER_BANK) as u32 * SCAN_LIST_STRIDE
}

fn radio_id_address(index: usize) -> u32 {
    RADIO_ID_0 + index as u32 * RADIO_ID_SIZE as u32
}

/// Channel entry, 64 bytes.
///
/// 0x00 rx frequency BCD8-BE, 10 Hz units
/// 0x04 repeater offset BCD8-BE, 10 Hz units
/// 0x08 mode:2 @0, power:2 @2, bandwidth:1 @4, repeater mode:2 @6
/// 0x09 rx tone mode:2 @0, tx tone mode:2 @2, rx only:1 @5
/// 0x0a/0x0b rx/tx CTCSS device index
/// 0x0c/0x0e rx/tx DCS wire code u16-LE
/// 0x14 tx contact index u32-LE, 0xffffffff unset
/// 0x18 radio ID index
/// 0x19 squelch level
/// 0x1a admit criterion
/// 0x1b scan list index, 0xff unset
/// 0x1c group list index, 0xff unset
/// 0x1d color code
/// 0x1e time slot:1 @0
/// 0x30 name, 16 ASCII zero-filled
struct ChannelElement<T> {
    el: Element<T>,
}

impl<T: AsRef<[u8]>> ChannelElement<T> {
    fn new(el: Element<T>) -> Self {
        Self { el }
    }

    fn rx_frequency_hz(&self) -> u64 {
        self.el.get_bcd8_be(0x00) as u64 * 10
    }

    fn repeater_offset_hz(&self) -> u64 {
        self.el.get_bcd8_be(0x04) as u64 * 10
    }

    fn is_digital(&self) -> bool {
        self.el.get_uint2(0x08, 0) == 1
    }

    fn power(&self) -> Power {
        match self.el.get_uint2(0x08, 2) {
            0 => Power::Low,
            1 => Power::Mid,
            2 => Power::High,
            _ => Power::Turbo,
        }
    }

    fn bandwidth(&self) -> Bandwidth {
        if self.el.get_bit(0x08, 4) {
            Bandwidth::Wide
        } else {
            Bandwidth::Narrow
        }
    }

    fn repeater_mode(&self) -> RepeaterMode {
        match self.el.get_uint2(0x08, 6) {
            1 => RepeaterMode::Positive,
            2 => RepeaterMode::Negative,
            _ => RepeaterMode::Simplex,
        }
    }

    fn tx_frequency_hz(&self) -> u64 {
        let rx = self.rx_frequency_hz();
        let offset = self.repeater_offset_hz();
        match self.repeater_mode() {
            RepeaterMode::Simplex => rx,
            RepeaterMode::Positive => rx + offset,
            RepeaterMode::Negative => rx.saturating_sub(offset),
        }
    }

    fn rx_only(&self) -> bool {
        self.el.get_bit(0x09, 5)
    }

    /// Decode one side's signaling from tone mode + CTCSS index + DCS wire.
    fn tone(&self, mode_bit: u8, ctcss_offset: usize, dcs_offset: usize) -> SelectiveCall {
        match self.el.get_uint2(0x09, mode_bit) {
            0 => SelectiveCall::None,
            1 => ctcss_from_index(self.el.get_u8(ctcss_offset)),
            2 => signaling::dcs_wire_decode(self.el.get_u16_le(dcs_offset)),
            m => {
                tracing::warn!(mode = m, "unknown tone mode, dropping signaling");
                SelectiveCall::None
            }
        }
    }

    fn rx_tone(&self) -> SelectiveCall {
        self.tone(0, 0x0a, 0x0c)
    }

    fn tx_tone(&self) -> SelectiveCall {
        self.tone(2, 0x0b, 0x0e)
    }

    fn contact_index(&self) -> Option<u32> {
        match self.el.get_u32_le(0x14) {
            0xffff_ffff => None,
            idx => Some(idx),
        }
    }

    fn radio_id_index(&self) -> u8 {
        self.el.get_u8(0x18)
    }

    fn squelch(&self) -> u8 {
        self.el.get_u8(0x19)
    }

    fn analog_admit(&self) -> AnalogAdmit {
        match self.el.get_u8(0x1a) {
            0 => AnalogAdmit::Always,
            1 => AnalogAdmit::Free,
            2 => AnalogAdmit::Tone,
            v => {
                tracing::warn!(value = v, "unknown admit criterion, using always");
                AnalogAdmit::Always
            }
        }
    }

    fn digital_admit(&self) -> DigitalAdmit {
        match self.el.get_u8(0x1a) {
            0 => DigitalAdmit::Always,
            1 => DigitalAdmit::Free,
            2 => DigitalAdmit::ColorCode,
            v => {
                tracing::warn!(value = v, "unknown admit criterion, using always");
                DigitalAdmit::Always
            }
        }
    }

    fn scan_list_index(&self) -> Option<u8> {
        match self.el.get_u8(0x1b) {
            0xff => None,
            idx => Some(idx),
        }
    }

    fn group_list_index(&self) -> Option<u8> {
        match self.el.get_u8(0x1c) {
            0xff => None,
            idx => Some(idx),
        }
    }

    fn color_code(&self) -> u8 {
        self.el.get_u8(0x1d)
    }

    fn time_slot(&self) -> TimeSlot {
        if self.el.get_bit(0x1e, 0) {
            TimeSlot::Ts2
        } else {
            TimeSlot::Ts1
        }
    }

    fn name(&self) -> String {
        self.el.read_ascii(0x30, NAME_LEN, 0x00)
    }

    /// Build the configuration object, cross-references left unresolved.
    fn decode(&self) -> Channel {
        if self.is_digital() {
            Channel::Digital(DigitalChannel {
                name: self.name(),
                rx_frequency: self.rx_frequency_hz(),
                tx_frequency: self.tx_frequency_hz(),
                power: self.power(),
                admit: self.digital_admit(),
                color_code: self.color_code(),
                time_slot: self.time_slot(),
                rx_only: self.rx_only(),
                tx_contact: None,
                group_list: None,
                radio_id: None,
                scan_list: None,
            })
        } else {
            Channel::Analog(AnalogChannel {
                name: self.name(),
                rx_frequency: self.rx_frequency_hz(),
                tx_frequency: self.tx_frequency_hz(),
                power: self.power(),
                bandwidth: self.bandwidth(),
                admit: self.analog_admit(),
                squelch: self.squelch(),
                rx_tone: self.rx_tone(),
                tx_tone: self.tx_tone(),
                rx_only: self.rx_only(),
                scan_list: None,
            })
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> ChannelElement<T> {
    /// Power-on default bytes.
    fn clear(&mut self) {
        self.el.fill(0x00);
        self.el.set_u32_le(0x14, 0xffff_ffff);
        self.el.set_u8(0x1b, 0xff);
        self.el.set_u8(0x1c, 0xff);
    }

    fn set_frequencies(&mut self, rx_hz: u64, tx_hz: u64) {
        self.el.set_bcd8_be(0x00, (rx_hz / 10) as u32);
        let mode = RepeaterMode::from_frequencies(rx_hz, tx_hz);
        let offset = rx_hz.abs_diff(tx_hz);
        self.el.set_bcd8_be(0x04, (offset / 10) as u32);
        let raw = match mode {
            RepeaterMode::Simplex => 0,
            RepeaterMode::Positive => 1,
            RepeaterMode::Negative => 2,
        };
        self.el.set_uint2(0x08, 6, raw);
    }

    fn set_digital(&mut self, digital: bool) {
        self.el.set_uint2(0x08, 0, digital as u8);
    }

    fn set_power(&mut self, power: Power) {
        let raw = match power {
            Power::Low => 0,
            Power::Mid => 1,
            Power::High => 2,
            Power::Turbo => 3,
        };
        self.el.set_uint2(0x08, 2, raw);
    }

    fn set_bandwidth(&mut self, bandwidth: Bandwidth) {
        self.el.set_bit(0x08, 4, bandwidth == Bandwidth::Wide);
    }

    fn set_rx_only(&mut self, rx_only: bool) {
        self.el.set_bit(0x09, 5, rx_only);
    }

    fn set_tone(&mut self, call: SelectiveCall, mode_bit: u8, ctcss_offset: usize, dcs_offset: usize) {
        let mode = match call {
            SelectiveCall::None => 0,
            SelectiveCall::Ctcss { .. } => 1,
            SelectiveCall::Dcs { .. } => 2,
        };
        self.el.set_uint2(0x09, mode_bit, mode);
        self.el.set_u8(ctcss_offset, ctcss_index(call));
        self.el.set_u16_le(dcs_offset, signaling::dcs_wire_encode(call));
    }

    fn set_rx_tone(&mut self, call: SelectiveCall) {
        self.set_tone(call, 0, 0x0a, 0x0c);
    }

    fn set_tx_tone(&mut self, call: SelectiveCall) {
        self.set_tone(call, 2, 0x0b, 0x0e);
    }

    fn set_contact_index(&mut self, index: Option<u32>) {
        self.el.set_u32_le(0x14, index.unwrap_or(0xffff_ffff));
    }

    fn set_radio_id_index(&mut self, index: u8) {
        self.el.set_u8(0x18, index);
    }

    fn set_squelch(&mut self, level: u8) {
        self.el.set_u8(0x19, level);
    }

    fn set_analog_admit(&mut self, admit: AnalogAdmit) {
        let raw = match admit {
            AnalogAdmit::Always => 0,
            AnalogAdmit::Free => 1,
            AnalogAdmit::Tone => 2,
        };
        self.el.set_u8(0x1a, raw);
    }

    fn set_digital_admit(&mut self, admit: DigitalAdmit) {
        let raw = match admit {
            DigitalAdmit::Always => 0,
            DigitalAdmit::Free => 1,
            DigitalAdmit::ColorCode => 2,
        };
        self.el.set_u8(0x1a, raw);
    }

    fn set_scan_list_index(&mut self, index: Option<u8>) {
        self.el.set_u8(0x1b, index.unwrap_or(0xff));
    }

    fn set_group_list_index(&mut self, index: Option<u8>) {
        self.el.set_u8(0x1c, index.unwrap_or(0xff));
    }

    fn set_color_code(&mut self, cc: u8) {
        self.el.set_u8(0x1d, cc);
    }

    fn set_time_slot(&mut self, ts: TimeSlot) {
        self.el.set_bit(0x1e, 0, ts == TimeSlot::Ts2);
    }

    fn set_name(&mut self, name: &str) {
        self.el.write_ascii(0x30, name, NAME_LEN, 0x00);
    }

    /// Write every modeled field of `channel`; references are written
    /// separately by the caller.
    fn encode(&mut self, channel: &Channel) {
        self.set_frequencies(channel.rx_frequency(), channel.tx_frequency());
        self.set_power(channel.power());
        self.set_name(channel.name());
        match channel {
            Channel::Analog(c) => {
                self.set_digital(false);
                self.set_bandwidth(c.bandwidth);
                self.set_analog_admit(c.admit);
                self.set_squelch(c.squelch);
                self.set_rx_tone(c.rx_tone);
                self.set_tx_tone(c.tx_tone);
                self.set_rx_only(c.rx_only);
            }
            Channel::Digital(c) => {
                self.set_digital(true);
                self.set_digital_admit(c.admit);
                self.set_color_code(c.color_code);
                self.set_time_slot(c.time_slot);
                self.set_rx_only(c.rx_only);
            }
        }
    }
}

/// DMR contact entry, 100 bytes: call type @0x00, name @0x01,
/// number BCD8-BE @0x23, ring @0x27.
struct ContactElement<T> {
    el: Element<T>,
}

impl<T: AsRef<[u8]>> ContactElement<T> {
    fn new(el: Element<T>) -> Self {
        Self { el }
    }

    fn call_type(&self) -> CallType {
        match self.el.get_u8(0x00) {
            0 => CallType::Private,
            1 => CallType::Group,
            2 => CallType::All,
            v => {
                tracing::warn!(value = v, "unknown call type, using group");
                CallType::Group
            }
        }
    }

    fn decode(&self) -> DmrContact {
        DmrContact {
            name: self.el.read_ascii(0x01, NAME_LEN, 0x00),
            number: self.el.get_bcd8_be(0x23),
            call_type: self.call_type(),
            ring: self.el.get_u8(0x27) != 0,
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> ContactElement<T> {
    fn clear(&mut self) {
        self.el.fill(0x00);
    }

    fn encode(&mut self, contact: &DmrContact) {
        let raw = match contact.call_type {
            CallType::Private => 0,
            CallType::Group => 1,
            CallType::All => 2,
        };
        self.el.set_u8(0x00, raw);
        self.el.write_ascii(0x01, &contact.name, NAME_LEN, 0x00);
        self.el.set_bcd8_be(0x23, contact.number);
        self.el.set_u8(0x27, contact.ring as u8);
    }
}

/// DTMF contact entry, 24 bytes: digit nibbles @0x00 (up to 14 digits,
/// high nibble first), digit count @0x07, name @0x08 (15 ASCII).
struct DtmfContactElement<T> {
    el: Element<T>,
}

const DTMF_DIGITS: &[u8; 16] = b"0123456789ABCD*#";
const DTMF_MAX_DIGITS: usize = 14;
const DTMF_NAME_LEN: usize = 15;

impl<T: AsRef<[u8]>> DtmfContactElement<T> {
    fn new(el: Element<T>) -> Self {
        Self { el }
    }

    fn decode(&self) -> DtmfContact {
        let count = (self.el.get_u8(0x07) as usize).min(DTMF_MAX_DIGITS);
        let number = (0..count)
            .map(|i| {
                let nibble = if i % 2 == 0 {
                    self.el.get_uint4(i / 2, 4)
                } else {
                    self.el.get_uint4(i / 2, 0)
                };
                DTMF_DIGITS[nibble as usize] as char
            })
            .collect();
        DtmfContact {
            name: self.el.read_ascii(0x08, DTMF_NAME_LEN, 0x00),
            number,
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> DtmfContactElement<T> {
    fn clear(&mut self) {
        self.el.fill(0x00);
    }

    fn encode(&mut self, contact: &DtmfContact) {
        let digits: Vec<u8> = contact
            .number
            .chars()
            .filter_map(|c| {
                let pos = DTMF_DIGITS
                    .iter()
                    .position(|&d| d as char == c.to_ascii_uppercase());
                if pos.is_none() {
                    tracing::warn!(digit = %c, "invalid DTMF digit, skipping");
                }
                pos.map(|p| p as u8)
            })
            .take(DTMF_MAX_DIGITS)
            .collect();
        for (i, digit) in digits.iter().enumerate() {
            if i % 2 == 0 {
                self.el.set_uint4(i / 2, 4, *digit);
            } else {
                self.el.set_uint4(i / 2, 0, *digit);
            }
        }
        self.el.set_u8(0x07, digits.len() as u8);
        self.el.write_ascii(0x08, &contact.name, DTMF_NAME_LEN, 0x00);
    }
}

/// Group list entry, 288 bytes: 64 member contact indices u32-LE @0x00
/// (0xffffffff unset), name @0x100.
struct GroupListElement<T> {
    el: Element<T>,
}

impl<T: AsRef<[u8]>> GroupListElement<T> {
    fn new(el: Element<T>) -> Self {
        Self { el }
    }

    fn name(&self) -> String {
        self.el.read_ascii(0x100, NAME_LEN, 0x00)
    }

    fn member_indices(&self) -> Vec<u32> {
        (0..GROUP_LIST_MEMBERS)
            .map(|i| self.el.get_u32_le(4 * i))
            .filter(|&m| m != 0xffff_ffff)
            .collect()
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> GroupListElement<T> {
    fn clear(&mut self) {
        self.el.fill(0x00);
        for i in 0..GROUP_LIST_MEMBERS {
            self.el.set_u32_le(4 * i, 0xffff_ffff);
        }
    }

    fn set_name(&mut self, name: &str) {
        self.el.write_ascii(0x100, name, NAME_LEN, 0x00);
    }

    fn set_member_indices(&mut self, members: &[u32]) {
        for i in 0..GROUP_LIST_MEMBERS {
            let value = members.get(i).copied().unwrap_or(0xffff_ffff);
            self.el.set_u32_le(4 * i, value);
        }
    }
}

/// Scan list entry, 144 bytes.
///
/// 0x01 priority mode
/// 0x02/0x04 primary/secondary priority channel u16-LE, offset-by-one
///   (0xffff unset, 0 selected channel, i+1 channel index i)
/// 0x06/0x08 look-back intervals A/B, 0x0a dropout delay, 0x0c dwell,
///   all u16-LE milliseconds
/// 0x0e revert channel (0 selected, 0xff unset)
/// 0x0f name, 16 ASCII
/// 0x20 50 member channel indices u16-LE, 0xffff unset
struct ScanListElement<T> {
    el: Element<T>,
}

impl<T: AsRef<[u8]>> ScanListElement<T> {
    fn new(el: Element<T>) -> Self {
        Self { el }
    }

    fn priority_mode(&self) -> PriorityMode {
        match self.el.get_u8(0x01) {
            0 => PriorityMode::Off,
            1 => PriorityMode::Primary,
            2 => PriorityMode::Secondary,
            3 => PriorityMode::Both,
            v => {
                tracing::warn!(value = v, "unknown priority mode, using off");
                PriorityMode::Off
            }
        }
    }

    fn primary_raw(&self) -> u16 {
        self.el.get_u16_le(0x02)
    }

    fn secondary_raw(&self) -> u16 {
        self.el.get_u16_le(0x04)
    }

    fn look_back_a(&self) -> u16 {
        self.el.get_u16_le(0x06)
    }

    fn look_back_b(&self) -> u16 {
        self.el.get_u16_le(0x08)
    }

    fn dropout_delay(&self) -> u16 {
        self.el.get_u16_le(0x0a)
    }

    fn dwell(&self) -> u16 {
        self.el.get_u16_le(0x0c)
    }

    fn revert_raw(&self) -> u8 {
        self.el.get_u8(0x0e)
    }

    fn name(&self) -> String {
        self.el.read_ascii(0x0f, NAME_LEN, 0x00)
    }

    fn member_indices(&self) -> Vec<u16> {
        (0..SCAN_LIST_MEMBERS)
            .map(|i| self.el.get_u16_le(0x20 + 2 * i))
            .filter(|&m| m != 0xffff)
            .collect()
    }

    fn decode(&self) -> ScanList {
        ScanList {
            name: self.name(),
            priority_mode: self.priority_mode(),
            primary: None,
            secondary: None,
            revert: None,
            look_back_a: self.look_back_a(),
            look_back_b: self.look_back_b(),
            dropout_delay: self.dropout_delay(),
            dwell: self.dwell(),
            channels: Vec::new(),
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> ScanListElement<T> {
    fn clear(&mut self) {
        self.el.fill(0x00);
        self.el.set_u16_le(0x02, 0xffff);
        self.el.set_u16_le(0x04, 0xffff);
        self.el.set_u8(0x0e, 0xff);
        for i in 0..SCAN_LIST_MEMBERS {
            self.el.set_u16_le(0x20 + 2 * i, 0xffff);
        }
    }

    fn set_priority_mode(&mut self, mode: PriorityMode) {
        let raw = match mode {
            PriorityMode::Off => 0,
            PriorityMode::Primary => 1,
            PriorityMode::Secondary => 2,
            PriorityMode::Both => 3,
        };
        self.el.set_u8(0x01, raw);
    }

    fn set_primary_raw(&mut self, raw: u16) {
        self.el.set_u16_le(0x02, raw);
    }

    fn set_secondary_raw(&mut self, raw: u16) {
        self.el.set_u16_le(0x04, raw);
    }

    fn set_timing(&mut self, list: &ScanList) {
        self.el.set_u16_le(0x06, list.look_back_a);
        self.el.set_u16_le(0x08, list.look_back_b);
        self.el.set_u16_le(0x0a, list.dropout_delay);
        self.el.set_u16_le(0x0c, list.dwell);
    }

    fn set_revert_raw(&mut self, raw: u8) {
        self.el.set_u8(0x0e, raw);
    }

    fn set_name(&mut self, name: &str) {
        self.el.write_ascii(0x0f, name, NAME_LEN, 0x00);
    }

    fn set_member_indices(&mut self, members: &[u16]) {
        for i in 0..SCAN_LIST_MEMBERS {
            let value = members.get(i).copied().unwrap_or(0xffff);
            self.el.set_u16_le(0x20 + 2 * i, value);
        }
    }
}

/// Radio ID entry, 32 bytes: DMR ID BCD8-BE @0x00, name @0x05.
struct RadioIdElement<T> {
    el: Element<T>,
}

impl<T: AsRef<[u8]>> RadioIdElement<T> {
    fn new(el: Element<T>) -> Self {
        Self { el }
    }

    fn decode(&self) -> RadioId {
        RadioId {
            name: self.el.read_ascii(0x05, NAME_LEN, 0x00),
            number: self.el.get_bcd8_be(0x00),
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> RadioIdElement<T> {
    fn clear(&mut self) {
        self.el.fill(0x00);
    }

    fn encode(&mut self, id: &RadioId) {
        self.el.set_bcd8_be(0x00, id.number);
        self.el.write_ascii(0x05, &id.name, NAME_LEN, 0x00);
    }
}

/// General settings, 256 bytes: key tone @0x00, boot display @0x01,
/// mic gain @0x02, VOX level @0x03, VOX delay u16-LE @0x04, GPS @0x06,
/// default zone @0x07 (0xff unset).
struct GeneralSettingsElement<T> {
    el: Element<T>,
}

impl<T: AsRef<[u8]>> GeneralSettingsElement<T> {
    fn new(el: Element<T>) -> Self {
        Self { el }
    }

    fn default_zone_index(&self) -> Option<u8> {
        match self.el.get_u8(0x07) {
            0xff => None,
            idx => Some(idx),
        }
    }

    fn decode(&self) -> GeneralSettings {
        let boot_display = match self.el.get_u8(0x01) {
            0 => BootDisplay::Default,
            1 => BootDisplay::CustomText,
            2 => BootDisplay::Picture,
            v => {
                tracing::warn!(value = v, "unknown boot display, using default");
                BootDisplay::Default
            }
        };
        GeneralSettings {
            mic_gain: self.el.get_u8(0x02),
            vox_level: self.el.get_u8(0x03),
            vox_delay_ms: self.el.get_u16_le(0x04),
            key_tone: self.el.get_u8(0x00) != 0,
            boot_display,
            gps_enable: self.el.get_u8(0x06) != 0,
            default_zone: None,
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> GeneralSettingsElement<T> {
    fn clear(&mut self) {
        self.el.fill(0x00);
        self.el.set_u8(0x07, 0xff);
    }

    fn encode(&mut self, settings: &GeneralSettings) {
        self.el.set_u8(0x00, settings.key_tone as u8);
        let boot = match settings.boot_display {
            BootDisplay::Default => 0,
            BootDisplay::CustomText => 1,
            BootDisplay::Picture => 2,
        };
        self.el.set_u8(0x01, boot);
        self.el.set_u8(0x02, settings.mic_gain);
        self.el.set_u8(0x03, settings.vox_level);
        self.el.set_u16_le(0x04, settings.vox_delay_ms);
        self.el.set_u8(0x06, settings.gps_enable as u8);
    }

    fn set_default_zone_index(&mut self, index: Option<u8>) {
        self.el.set_u8(0x07, index.unwrap_or(0xff));
    }
}

/// Codeplug codec for the AnyTone AT-D868UV.
#[derive(Debug, Default)]
pub struct D868uvCodeplug {
    image: Image,
}

impl D868uvCodeplug {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_capacity(
        kind: &'static str,
        count: usize,
        limit: usize,
        err: &mut ErrorStack,
    ) -> Result<()> {
        if count > limit {
            err.push(
                "index",
                None,
                format!("{} {} exceed the device limit of {}", count, kind, limit),
            );
            return Err(CodeplugError::CapacityExceeded { kind, count, limit });
        }
        Ok(())
    }

    /// Encode a scan-list priority reference in the offset-by-one scheme.
    fn priority_raw(reference: Option<ChannelRef>, ctx: &Context) -> u16 {
        match reference {
            None => 0xffff,
            Some(ChannelRef::Selected) => 0,
            Some(ChannelRef::Channel(slot)) => match ctx.index(ObjectKind::Channel, slot) {
                Some(index) => index as u16 + 1,
                None => {
                    tracing::warn!(slot, "priority channel not indexed, dropping");
                    0xffff
                }
            },
        }
    }

    /// Decode an offset-by-one priority reference.
    fn priority_ref(raw: u16, ctx: &Context) -> Option<ChannelRef> {
        match raw {
            0xffff => None,
            0 => Some(ChannelRef::Selected),
            v => match ctx.obj(ObjectKind::Channel, v as usize - 1) {
                Some(slot) => Some(ChannelRef::Channel(slot)),
                None => {
                    tracing::warn!(index = v - 1, "priority channel not present, dropping");
                    None
                }
            },
        }
    }

    fn bitmap_ranges() -> [(u32, usize); 7] {
        [
            (CHANNEL_BITMAP, CHANNEL_BITMAP_SIZE),
            (ZONE_BITMAP, ZONE_BITMAP_SIZE),
            (CONTACT_BITMAP, CONTACT_BITMAP_SIZE),
            (DTMF_BYTEMAP, DTMF_BYTEMAP_SIZE),
            (GROUP_LIST_BITMAP, GROUP_LIST_BITMAP_SIZE),
            (SCAN_LIST_BITMAP, SCAN_LIST_BITMAP_SIZE),
            (RADIO_ID_BITMAP, RADIO_ID_BITMAP_SIZE),
        ]
    }

    fn set_bitmap(&mut self, address: u32, size: usize, ctx: &Context, kind: ObjectKind) {
        let Some(el) = self.image.element_mut(address, size) else {
            return;
        };
        let mut bitmap = BitmapElement::new(el);
        bitmap.clear();
        for (_, index) in ctx.entries(kind) {
            bitmap.enable(index);
        }
    }

    /// Indices marked present in the bitmap at `address`, up to `limit`.
    fn encoded_indices(&self, address: u32, size: usize, limit: usize) -> Vec<usize> {
        match self.image.element(address, size) {
            Some(el) => {
                let bitmap = BitmapElement::new(el);
                (0..limit).filter(|&i| bitmap.is_encoded(i)).collect()
            }
            None => Vec::new(),
        }
    }

    /// Indices marked present in the DTMF contact bytemap.
    fn encoded_dtmf_indices(&self) -> Vec<usize> {
        match self.image.element(DTMF_BYTEMAP, DTMF_BYTEMAP_SIZE) {
            Some(el) => {
                let map = BytemapElement::new(el);
                (0..NUM_DTMF_CONTACTS).filter(|&i| map.is_encoded(i)).collect()
            }
            None => Vec::new(),
        }
    }
}

impl Codeplug for D868uvCodeplug {
    fn image(&self) -> &Image {
        &self.image
    }

    fn image_mut(&mut self) -> &mut Image {
        &mut self.image
    }

    fn index(&self, config: &Config, ctx: &mut Context, err: &mut ErrorStack) -> Result<()> {
        ctx.add_table(ObjectKind::Channel);
        ctx.add_table(ObjectKind::Contact);
        ctx.add_table(ObjectKind::DtmfContact);
        ctx.add_table(ObjectKind::GroupList);
        ctx.add_table(ObjectKind::ScanList);
        ctx.add_table(ObjectKind::Zone);
        ctx.add_table(ObjectKind::RadioId);

        Self::check_capacity("channels", config.channels.len(), NUM_CHANNELS, err)?;
        Self::check_capacity("group lists", config.group_lists.len(), NUM_GROUP_LISTS, err)?;
        Self::check_capacity("scan lists", config.scan_lists.len(), NUM_SCAN_LISTS, err)?;
        Self::check_capacity("zones", config.zones.len(), NUM_ZONES, err)?;
        Self::check_capacity("radio IDs", config.radio_ids.len(), NUM_RADIO_IDS, err)?;

        for slot in 0..config.channels.len() {
            ctx.add(ObjectKind::Channel, slot, slot)?;
        }

        // DMR and DTMF contacts occupy separate index spaces.
        let mut dmr = 0;
        let mut dtmf = 0;
        for (slot, contact) in config.contacts.iter().enumerate() {
            match contact {
                Contact::Dmr(_) => {
                    ctx.add(ObjectKind::DmrContact, slot, dmr)?;
                    dmr += 1;
                }
                Contact::Dtmf(_) => {
                    ctx.add(ObjectKind::DtmfContact, slot, dtmf)?;
                    dtmf += 1;
                }
            }
        }
        Self::check_capacity("contacts", dmr, NUM_CONTACTS, err)?;
        Self::check_capacity("DTMF contacts", dtmf, NUM_DTMF_CONTACTS, err)?;

        for slot in 0..config.group_lists.len() {
            ctx.add(ObjectKind::GroupList, slot, slot)?;
        }
        for slot in 0..config.scan_lists.len() {
            ctx.add(ObjectKind::ScanList, slot, slot)?;
        }
        for slot in 0..config.zones.len() {
            ctx.add(ObjectKind::Zone, slot, slot)?;
        }
        for slot in 0..config.radio_ids.len() {
            ctx.add(ObjectKind::RadioId, slot, slot)?;
        }
        Ok(())
    }

    fn allocate_bitmaps(&mut self) -> Result<()> {
        for (address, size) in Self::bitmap_ranges() {
            self.image.add_element(address, size)?;
        }
        Ok(())
    }

    fn set_bitmaps(&mut self, ctx: &Context) {
        self.set_bitmap(CHANNEL_BITMAP, CHANNEL_BITMAP_SIZE, ctx, ObjectKind::Channel);
        self.set_bitmap(ZONE_BITMAP, ZONE_BITMAP_SIZE, ctx, ObjectKind::Zone);
        self.set_bitmap(CONTACT_BITMAP, CONTACT_BITMAP_SIZE, ctx, ObjectKind::Contact);
        if let Some(el) = self.image.element_mut(DTMF_BYTEMAP, DTMF_BYTEMAP_SIZE) {
            let mut map = BytemapElement::new(el);
            map.clear();
            for (_, index) in ctx.entries(ObjectKind::DtmfContact) {
                map.enable(index);
            }
        }
        self.set_bitmap(
            GROUP_LIST_BITMAP,
            GROUP_LIST_BITMAP_SIZE,
            ctx,
            ObjectKind::GroupList,
        );
        self.set_bitmap(
            SCAN_LIST_BITMAP,
            SCAN_LIST_BITMAP_SIZE,
            ctx,
            ObjectKind::ScanList,
        );
        self.set_bitmap(RADIO_ID_BITMAP, RADIO_ID_BITMAP_SIZE, ctx, ObjectKind::RadioId);
    }

    fn allocate_updated(&mut self) -> Result<()> {
        self.image.add_element(SETTINGS_ADDR, SETTINGS_SIZE)?;
        Ok(())
    }

    fn allocate_for_encoding(&mut self, ctx: &Context) -> Result<()> {
        for (_, index) in ctx.entries(ObjectKind::Channel) {
            self.image.add_element(channel_address(index), CHANNEL_SIZE)?;
        }
        for (_, index) in ctx.entries(ObjectKind::Zone) {
            self.image.add_element(zone_name_address(index), ZONE_NAME_SIZE)?;
            self.image
                .add_element(zone_channels_address(index), ZONE_CHANNELS_SIZE)?;
        }
        for (_, index) in ctx.entries(ObjectKind::Contact) {
            self.image.add_element(contact_address(index), CONTACT_SIZE)?;
        }
        for (_, index) in ctx.entries(ObjectKind::DtmfContact) {
            self.image
                .add_element(dtmf_contact_address(index), DTMF_CONTACT_SIZE)?;
        }
        self.image.add_element(DTMF_INDEX, DTMF_INDEX_SIZE)?;
        for (_, index) in ctx.entries(ObjectKind::GroupList) {
            self.image
                .add_element(group_list_address(index), GROUP_LIST_SIZE)?;
        }
        for (_, index) in ctx.entries(ObjectKind::ScanList) {
            self.image
                .add_element(scan_list_address(index), SCAN_LIST_SIZE)?;
        }
        for (_, index) in ctx.entries(ObjectKind::RadioId) {
            self.image.add_element(radio_id_address(index), RADIO_ID_SIZE)?;
        }
        self.image.add_element(SETTINGS_ADDR, SETTINGS_SIZE)?;
        Ok(())
    }

    fn allocate_for_decoding(&mut self) -> Result<()> {
        self.allocate_bitmaps()?;
        self.image.add_element(SETTINGS_ADDR, SETTINGS_SIZE)?;
        for bank in 0..NUM_CHANNELS / CHANNELS_PER_BANK {
            self.image.add_element(
                CHANNEL_BANK_0 + bank as u32 * CHANNEL_BANK_STRIDE,
                CHANNELS_PER_BANK * CHANNEL_SIZE,
            )?;
        }
        for zone in 0..NUM_ZONES {
            self.image.add_element(zone_name_address(zone), ZONE_NAME_SIZE)?;
            self.image
                .add_element(zone_channels_address(zone), ZONE_CHANNELS_SIZE)?;
        }
        for bank in 0..NUM_CONTACTS / CONTACTS_PER_BANK {
            self.image.add_element(
                CONTACT_BANK_0 + bank as u32 * CONTACT_BANK_STRIDE,
                CONTACTS_PER_BANK * CONTACT_SIZE,
            )?;
        }
        for dtmf in 0..NUM_DTMF_CONTACTS {
            self.image
                .add_element(dtmf_contact_address(dtmf), DTMF_CONTACT_SIZE)?;
        }
        self.image.add_element(DTMF_INDEX, DTMF_INDEX_SIZE)?;
        for list in 0..NUM_GROUP_LISTS {
            self.image.add_element(group_list_address(list), GROUP_LIST_SIZE)?;
        }
        for list in 0..NUM_SCAN_LISTS {
            self.image.add_element(scan_list_address(list), SCAN_LIST_SIZE)?;
        }
        for id in 0..NUM_RADIO_IDS {
            self.image.add_element(radio_id_address(id), RADIO_ID_SIZE)?;
        }
        Ok(())
    }

    fn encode_elements(
        &mut self,
        flags: Flags,
        config: &Config,
        ctx: &Context,
        err: &mut ErrorStack,
    ) -> Result<()> {
        // Radio IDs.
        for (slot, id) in config.radio_ids.iter().enumerate() {
            let Some(index) = ctx.index(ObjectKind::RadioId, slot) else {
                continue;
            };
            let address = radio_id_address(index);
            let Some(el) = self.image.element_mut(address, RADIO_ID_SIZE) else {
                err.push("encode radio id", Some(address), "region not allocated");
                continue;
            };
            let mut el = RadioIdElement::new(el);
            if !flags.update_codeplug {
                el.clear();
            }
            el.encode(id);
        }

        // General settings.
        {
            let Some(el) = self.image.element_mut(SETTINGS_ADDR, SETTINGS_SIZE) else {
                err.push("encode settings", Some(SETTINGS_ADDR), "region not allocated");
                return Err(CodeplugError::MissingRegion {
                    address: SETTINGS_ADDR,
                    size: SETTINGS_SIZE,
                });
            };
            let mut el = GeneralSettingsElement::new(el);
            if !flags.update_codeplug {
                el.clear();
            }
            el.encode(&config.settings);
            let zone_index = config
                .settings
                .default_zone
                .and_then(|slot| ctx.index(ObjectKind::Zone, slot))
                .map(|index| index as u8);
            el.set_default_zone_index(zone_index);
        }

        // Channels, with every cross-reference resolved through the context.
        for (slot, channel) in config.channels.iter().enumerate() {
            let Some(index) = ctx.index(ObjectKind::Channel, slot) else {
                continue;
            };
            let address = channel_address(index);
            let Some(el) = self.image.element_mut(address, CHANNEL_SIZE) else {
                err.push("encode channel", Some(address), "region not allocated");
                continue;
            };
            let mut el = ChannelElement::new(el);
            el.clear();
            el.encode(channel);
            let scan = channel
                .scan_list()
                .and_then(|slot| ctx.index(ObjectKind::ScanList, slot))
                .map(|index| index as u8);
            el.set_scan_list_index(scan);
            if let Channel::Digital(c) = channel {
                let contact = c
                    .tx_contact
                    .and_then(|slot| ctx.index(ObjectKind::Contact, slot))
                    .map(|index| index as u32);
                el.set_contact_index(contact);
                let group = c
                    .group_list
                    .and_then(|slot| ctx.index(ObjectKind::GroupList, slot))
                    .map(|index| index as u8);
                el.set_group_list_index(group);
                let radio_id = c
                    .radio_id
                    .and_then(|slot| ctx.index(ObjectKind::RadioId, slot))
                    .unwrap_or(0);
                el.set_radio_id_index(radio_id as u8);
            }
        }

        // Contacts.
        for (slot, contact) in config.contacts.iter().enumerate() {
            match contact {
                Contact::Dmr(c) => {
                    let Some(index) = ctx.index(ObjectKind::Contact, slot) else {
                        continue;
                    };
                    let address = contact_address(index);
                    let Some(el) = self.image.element_mut(address, CONTACT_SIZE) else {
                        err.push("encode contact", Some(address), "region not allocated");
                        continue;
                    };
                    let mut el = ContactElement::new(el);
                    el.clear();
                    el.encode(c);
                }
                Contact::Dtmf(c) => {
                    let Some(index) = ctx.index(ObjectKind::DtmfContact, slot) else {
                        continue;
                    };
                    let address = dtmf_contact_address(index);
                    let Some(el) = self.image.element_mut(address, DTMF_CONTACT_SIZE) else {
                        err.push("encode dtmf contact", Some(address), "region not allocated");
                        continue;
                    };
                    let mut el = DtmfContactElement::new(el);
                    el.clear();
                    el.encode(c);
                }
            }
        }

        // DTMF index list: 0xff filled, identity entry per encoded contact.
        if let Some(mut el) = self.image.element_mut(DTMF_INDEX, DTMF_INDEX_SIZE) {
            el.fill(0xff);
            for (_, index) in ctx.entries(ObjectKind::DtmfContact) {
                el.set_u8(index, index as u8);
            }
        }

        // Group lists.
        for (slot, list) in config.group_lists.iter().enumerate() {
            let Some(index) = ctx.index(ObjectKind::GroupList, slot) else {
                continue;
            };
            let address = group_list_address(index);
            let Some(el) = self.image.element_mut(address, GROUP_LIST_SIZE) else {
                err.push("encode group list", Some(address), "region not allocated");
                continue;
            };
            let mut el = GroupListElement::new(el);
            el.clear();
            el.set_name(&list.name);
            let members: Vec<u32> = list
                .contacts
                .iter()
                .filter_map(|&slot| {
                    let index = ctx.index(ObjectKind::Contact, slot);
                    if index.is_none() {
                        tracing::warn!(slot, "group list member not indexed, dropping");
                    }
                    index.map(|i| i as u32)
                })
                .collect();
            el.set_member_indices(&members);
        }

        // Zones.
        for (slot, zone) in config.zones.iter().enumerate() {
            let Some(index) = ctx.index(ObjectKind::Zone, slot) else {
                continue;
            };
            let name_address = zone_name_address(index);
            match self.image.element_mut(name_address, ZONE_NAME_SIZE) {
                Some(mut el) => el.write_ascii(0, &zone.name, NAME_LEN, 0x00),
                None => {
                    err.push("encode zone", Some(name_address), "region not allocated");
                    continue;
                }
            }
            let members_address = zone_channels_address(index);
            let Some(mut el) = self.image.element_mut(members_address, ZONE_CHANNELS_SIZE)
            else {
                err.push("encode zone", Some(members_address), "region not allocated");
                continue;
            };
            let members: Vec<u16> = zone
                .channels
                .iter()
                .filter_map(|&slot| {
                    let index = ctx.index(ObjectKind::Channel, slot);
                    if index.is_none() {
                        tracing::warn!(slot, "zone member not indexed, dropping");
                    }
                    index.map(|i| i as u16)
                })
                .collect();
            for i in 0..CHANNELS_PER_ZONE {
                let value = members.get(i).copied().unwrap_or(0xffff);
                el.set_u16_le(2 * i, value);
            }
        }

        // Scan lists.
        for (slot, list) in config.scan_lists.iter().enumerate() {
            let Some(index) = ctx.index(ObjectKind::ScanList, slot) else {
                continue;
            };
            let address = scan_list_address(index);
            let Some(el) = self.image.element_mut(address, SCAN_LIST_SIZE) else {
                err.push("encode scan list", Some(address), "region not allocated");
                continue;
            };
            let mut el = ScanListElement::new(el);
            el.clear();
            el.set_name(&list.name);
            el.set_priority_mode(list.priority_mode);
            el.set_primary_raw(Self::priority_raw(list.primary, ctx));
            el.set_secondary_raw(Self::priority_raw(list.secondary, ctx));
            el.set_timing(list);
            let revert = match list.revert {
                None => 0xff,
                Some(ChannelRef::Selected) => 0,
                Some(ChannelRef::Channel(_)) => {
                    tracing::warn!("revert to a fixed channel is not supported, using selected");
                    0
                }
            };
            el.set_revert_raw(revert);
            let members: Vec<u16> = list
                .channels
                .iter()
                .filter_map(|&slot| {
                    let index = ctx.index(ObjectKind::Channel, slot);
                    if index.is_none() {
                        tracing::warn!(slot, "scan list member not indexed, dropping");
                    }
                    index.map(|i| i as u16)
                })
                .collect();
            el.set_member_indices(&members);
        }

        Ok(())
    }

    fn decode_elements(
        &self,
        config: &mut Config,
        ctx: &mut Context,
        err: &mut ErrorStack,
    ) -> Result<()> {
        ctx.add_table(ObjectKind::Channel);
        ctx.add_table(ObjectKind::Contact);
        ctx.add_table(ObjectKind::DtmfContact);
        ctx.add_table(ObjectKind::GroupList);
        ctx.add_table(ObjectKind::ScanList);
        ctx.add_table(ObjectKind::Zone);
        ctx.add_table(ObjectKind::RadioId);

        for index in self.encoded_indices(RADIO_ID_BITMAP, RADIO_ID_BITMAP_SIZE, NUM_RADIO_IDS) {
            let address = radio_id_address(index);
            let Some(el) = self.image.element(address, RADIO_ID_SIZE) else {
                err.push("decode radio id", Some(address), "region not allocated");
                continue;
            };
            let slot = config.radio_ids.len();
            config.radio_ids.push(RadioIdElement::new(el).decode());
            if let Err(e) = ctx.add(ObjectKind::RadioId, slot, index) {
                err.push("decode radio id", Some(address), e.to_string());
            }
        }

        if let Some(el) = self.image.element(SETTINGS_ADDR, SETTINGS_SIZE) {
            config.settings = GeneralSettingsElement::new(el).decode();
        }

        for index in self.encoded_indices(CHANNEL_BITMAP, CHANNEL_BITMAP_SIZE, NUM_CHANNELS) {
            let address = channel_address(index);
            let Some(el) = self.image.element(address, CHANNEL_SIZE) else {
                err.push("decode channel", Some(address), "region not allocated");
                continue;
            };
            let slot = config.channels.len();
            config.channels.push(ChannelElement::new(el).decode());
            if let Err(e) = ctx.add(ObjectKind::Channel, slot, index) {
                err.push("decode channel", Some(address), e.to_string());
            }
        }

        for index in self.encoded_indices(CONTACT_BITMAP, CONTACT_BITMAP_SIZE, NUM_CONTACTS) {
            let address = contact_address(index);
            let Some(el) = self.image.element(address, CONTACT_SIZE) else {
                err.push("decode contact", Some(address), "region not allocated");
                continue;
            };
            let slot = config.contacts.len();
            config
                .contacts
                .push(Contact::Dmr(ContactElement::new(el).decode()));
            if let Err(e) = ctx.add(ObjectKind::DmrContact, slot, index) {
                err.push("decode contact", Some(address), e.to_string());
            }
        }

        for index in self.encoded_dtmf_indices() {
            let address = dtmf_contact_address(index);
            let Some(el) = self.image.element(address, DTMF_CONTACT_SIZE) else {
                err.push("decode dtmf contact", Some(address), "region not allocated");
                continue;
            };
            let slot = config.contacts.len();
            config
                .contacts
                .push(Contact::Dtmf(DtmfContactElement::new(el).decode()));
            if let Err(e) = ctx.add(ObjectKind::DtmfContact, slot, index) {
                err.push("decode dtmf contact", Some(address), e.to_string());
            }
        }

        for index in
            self.encoded_indices(GROUP_LIST_BITMAP, GROUP_LIST_BITMAP_SIZE, NUM_GROUP_LISTS)
        {
            let address = group_list_address(index);
            let Some(el) = self.image.element(address, GROUP_LIST_SIZE) else {
                err.push("decode group list", Some(address), "region not allocated");
                continue;
            };
            let el = GroupListElement::new(el);
            let slot = config.group_lists.len();
            config.group_lists.push(GroupList {
                name: el.name(),
                contacts: Vec::new(),
            });
            if let Err(e) = ctx.add(ObjectKind::GroupList, slot, index) {
                err.push("decode group list", Some(address), e.to_string());
            }
        }

        for index in self.encoded_indices(ZONE_BITMAP, ZONE_BITMAP_SIZE, NUM_ZONES) {
            let address = zone_name_address(index);
            let Some(el) = self.image.element(address, ZONE_NAME_SIZE) else {
                err.push("decode zone", Some(address), "region not allocated");
                continue;
            };
            let slot = config.zones.len();
            config.zones.push(Zone {
                name: el.read_ascii(0, NAME_LEN, 0x00),
                channels: Vec::new(),
            });
            if let Err(e) = ctx.add(ObjectKind::Zone, slot, index) {
                err.push("decode zone", Some(address), e.to_string());
            }
        }

        for index in
            self.encoded_indices(SCAN_LIST_BITMAP, SCAN_LIST_BITMAP_SIZE, NUM_SCAN_LISTS)
        {
            let address = scan_list_address(index);
            let Some(el) = self.image.element(address, SCAN_LIST_SIZE) else {
                err.push("decode scan list", Some(address), "region not allocated");
                continue;
            };
            let slot = config.scan_lists.len();
            config.scan_lists.push(ScanListElement::new(el).decode());
            if let Err(e) = ctx.add(ObjectKind::ScanList, slot, index) {
                err.push("decode scan list", Some(address), e.to_string());
            }
        }

        Ok(())
    }

    fn link_elements(
        &self,
        config: &mut Config,
        ctx: &Context,
        err: &mut ErrorStack,
    ) -> Result<()> {
        let _ = err;

        // Group lists first; channels may point at them.
        for (slot, index) in ctx.entries(ObjectKind::GroupList) {
            let Some(el) = self.image.element(group_list_address(index), GROUP_LIST_SIZE) else {
                continue;
            };
            let el = GroupListElement::new(el);
            for member in el.member_indices() {
                match ctx.obj(ObjectKind::Contact, member as usize) {
                    Some(contact_slot) => config.group_lists[slot].contacts.push(contact_slot),
                    None => {
                        tracing::warn!(index = member, "group list member missing, dropping")
                    }
                }
            }
        }

        for (slot, index) in ctx.entries(ObjectKind::Zone) {
            let Some(el) = self
                .image
                .element(zone_channels_address(index), ZONE_CHANNELS_SIZE)
            else {
                continue;
            };
            for i in 0..CHANNELS_PER_ZONE {
                let raw = el.get_u16_le(2 * i);
                if raw == 0xffff {
                    continue;
                }
                match ctx.obj(ObjectKind::Channel, raw as usize) {
                    Some(channel_slot) => config.zones[slot].channels.push(channel_slot),
                    None => tracing::warn!(index = raw, "zone member missing, dropping"),
                }
            }
        }

        for (slot, index) in ctx.entries(ObjectKind::ScanList) {
            let Some(el) = self.image.element(scan_list_address(index), SCAN_LIST_SIZE) else {
                continue;
            };
            let el = ScanListElement::new(el);
            let list = &mut config.scan_lists[slot];
            list.primary = Self::priority_ref(el.primary_raw(), ctx);
            list.secondary = Self::priority_ref(el.secondary_raw(), ctx);
            list.revert = match el.revert_raw() {
                0xff => None,
                0 => Some(ChannelRef::Selected),
                v => {
                    tracing::warn!(value = v, "unknown revert channel, dropping");
                    None
                }
            };
            for member in el.member_indices() {
                match ctx.obj(ObjectKind::Channel, member as usize) {
                    Some(channel_slot) => list.channels.push(channel_slot),
                    None => tracing::warn!(index = member, "scan list member missing, dropping"),
                }
            }
        }

        for (slot, index) in ctx.entries(ObjectKind::Channel) {
            let Some(el) = self.image.element(channel_address(index), CHANNEL_SIZE) else {
                continue;
            };
            let el = ChannelElement::new(el);
            let scan_list = el.scan_list_index().and_then(|raw| {
                let resolved = ctx.obj(ObjectKind::ScanList, raw as usize);
                if resolved.is_none() {
                    tracing::warn!(index = raw, "channel scan list missing, dropping");
                }
                resolved
            });
            config.channels[slot].set_scan_list(scan_list);

            if let Channel::Digital(channel) = &mut config.channels[slot] {
                channel.tx_contact = el.contact_index().and_then(|raw| {
                    let resolved = ctx.obj(ObjectKind::Contact, raw as usize);
                    if resolved.is_none() {
                        tracing::warn!(index = raw, "channel tx contact missing, dropping");
                    }
                    resolved
                });
                channel.group_list = el.group_list_index().and_then(|raw| {
                    let resolved = ctx.obj(ObjectKind::GroupList, raw as usize);
                    if resolved.is_none() {
                        tracing::warn!(index = raw, "channel group list missing, dropping");
                    }
                    resolved
                });
                channel.radio_id = ctx.obj(ObjectKind::RadioId, el.radio_id_index() as usize);
            }
        }

        if let Some(el) = self.image.element(SETTINGS_ADDR, SETTINGS_SIZE) {
            let el = GeneralSettingsElement::new(el);
            config.settings.default_zone = el
                .default_zone_index()
                .and_then(|raw| ctx.obj(ObjectKind::Zone, raw as usize));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(config: &Config) -> D868uvCodeplug {
        let mut plug = D868uvCodeplug::new();
        let mut err = ErrorStack::new();
        plug.encode(config, Flags::default(), &mut err)
            .unwrap_or_else(|e| panic!("encode failed: {} / {}", e, err));
        assert!(err.is_empty(), "diagnostics: {}", err);
        plug
    }

    fn decode(plug: &D868uvCodeplug) -> Config {
        let mut config = Config::new();
        let mut err = ErrorStack::new();
        plug.decode(&mut config, &mut err).expect("decode failed");
        assert!(err.is_empty(), "diagnostics: {}", err);
        config
    }

    #[test]
    fn test_device_ctcss_table() {
        assert_eq!(DEVICE_CTCSS.len(), 52);
        let gaps = DEVICE_CTCSS
            .iter()
            .filter(|t| !CTCSS_TONES.contains(t))
            .count();
        assert_eq!(gaps, 14);

        // Supported tones survive the index round trip.
        for &tone in CTCSS_TONES.iter() {
            let call = SelectiveCall::Ctcss { tone };
            assert_eq!(ctcss_from_index(ctcss_index(call)), call);
        }
        // 67.0 Hz is slot 1; slot 0 holds the unsupported 62.5 Hz.
        assert_eq!(ctcss_index(SelectiveCall::Ctcss { tone: 670 }), 1);
        assert_eq!(ctcss_index(SelectiveCall::None), 0);
        assert_eq!(ctcss_from_index(0), SelectiveCall::None);
        assert_eq!(ctcss_from_index(60), SelectiveCall::None);
    }

    #[test]
    fn test_cleared_channel_sentinels() {
        let mut el = ChannelElement::new(Element::new(vec![0xa5u8; CHANNEL_SIZE]));
        el.clear();
        assert_eq!(el.contact_index(), None);
        assert_eq!(el.scan_list_index(), None);
        assert_eq!(el.group_list_index(), None);
        assert_eq!(el.rx_frequency_hz(), 0);
        assert_eq!(el.name(), "");
    }

    #[test]
    fn test_analog_simplex_channel_roundtrip() {
        let mut config = Config::new();
        config.channels.push(Channel::Analog(AnalogChannel {
            name: "Simplex".into(),
            rx_frequency: 146_520_000,
            tx_frequency: 146_520_000,
            power: Power::High,
            bandwidth: Bandwidth::Wide,
            admit: AnalogAdmit::Free,
            squelch: 3,
            rx_tone: SelectiveCall::ctcss(885),
            tx_tone: SelectiveCall::None,
            rx_only: false,
            scan_list: None,
        }));

        let plug = encode(&config);
        // BCD frequency, 10 Hz units: 146.52 MHz -> 14652000.
        let el = plug.image().element(channel_address(0), CHANNEL_SIZE).unwrap();
        assert_eq!(el.bytes()[0..4], [0x14, 0x65, 0x20, 0x00]);
        // Simplex: zero offset, repeater mode 0.
        assert_eq!(el.bytes()[4..8], [0x00, 0x00, 0x00, 0x00]);
        assert_eq!(el.get_uint2(0x08, 6), 0);
        // 88.5 Hz is device CTCSS slot 9, rx tone mode CTCSS.
        assert_eq!(el.get_uint2(0x09, 0), 1);
        assert_eq!(el.get_u8(0x0a), 9);
        assert_eq!(el.get_uint2(0x09, 2), 0);

        assert_eq!(decode(&plug), config);
    }

    #[test]
    fn test_analog_ctcss_both_sides_roundtrip() {
        let mut config = Config::new();
        config.channels.push(Channel::Analog(AnalogChannel {
            name: "Call".into(),
            rx_frequency: 145_500_000,
            tx_frequency: 145_500_000,
            rx_tone: SelectiveCall::ctcss(670),
            tx_tone: SelectiveCall::ctcss(670),
            ..Default::default()
        }));

        let plug = encode(&config);
        let el = plug.image().element(channel_address(0), CHANNEL_SIZE).unwrap();
        // 145.5 MHz in 10 Hz units, BCD big-endian.
        assert_eq!(el.bytes()[0..4], [0x14, 0x55, 0x00, 0x00]);
        // 67.0 Hz is device CTCSS slot 1, tone mode CTCSS on both sides.
        assert_eq!(el.get_uint2(0x09, 0), 1);
        assert_eq!(el.get_uint2(0x09, 2), 1);
        assert_eq!(el.get_u8(0x0a), 1);
        assert_eq!(el.get_u8(0x0b), 1);

        assert_eq!(decode(&plug), config);
    }

    #[test]
    fn test_digital_negative_offset_channel_roundtrip() {
        let mut config = Config::new();
        config.radio_ids.push(RadioId {
            name: "Own".into(),
            number: 2621234,
        });
        config.contacts.push(Contact::Dmr(DmrContact {
            name: "World".into(),
            number: 91,
            call_type: CallType::Group,
            ring: false,
        }));
        config.channels.push(Channel::Digital(DigitalChannel {
            name: "Repeater".into(),
            rx_frequency: 439_087_000,
            tx_frequency: 431_487_000,
            power: Power::Mid,
            admit: DigitalAdmit::ColorCode,
            color_code: 1,
            time_slot: TimeSlot::Ts2,
            rx_only: false,
            tx_contact: Some(0),
            group_list: None,
            radio_id: Some(0),
            scan_list: None,
        }));

        let plug = encode(&config);
        let el = plug.image().element(channel_address(0), CHANNEL_SIZE).unwrap();
        // 439.0870 MHz in 10 Hz units, BCD big-endian.
        assert_eq!(el.bytes()[0..4], [0x43, 0x90, 0x87, 0x00]);
        // 7.6 MHz offset, negative direction.
        assert_eq!(el.bytes()[4..8], [0x00, 0x76, 0x00, 0x00]);
        assert_eq!(el.get_uint2(0x08, 6), 2);
        assert_eq!(el.get_uint2(0x08, 0), 1);
        // Contact index 0, not the 0xffffffff sentinel.
        assert_eq!(el.get_u32_le(0x14), 0);
        assert!(el.get_bit(0x1e, 0));

        assert_eq!(decode(&plug), config);
    }

    #[test]
    fn test_group_list_sparse_tail() {
        let mut config = Config::new();
        for i in 0..3u32 {
            config.contacts.push(Contact::Dmr(DmrContact {
                name: format!("TG{}", i + 1),
                number: i + 1,
                call_type: CallType::Group,
                ring: false,
            }));
        }
        config.group_lists.push(GroupList {
            name: "Locals".into(),
            contacts: vec![0, 1, 2],
        });

        // Group lists live above the analog-contact area.
        assert_eq!(group_list_address(0), 0x0298_0000);
        assert_eq!(group_list_address(1), 0x0298_0200);

        let plug = encode(&config);
        let el = plug
            .image()
            .element(group_list_address(0), GROUP_LIST_SIZE)
            .unwrap();
        assert_eq!(el.get_u32_le(0), 0);
        assert_eq!(el.get_u32_le(4), 1);
        assert_eq!(el.get_u32_le(8), 2);
        // Unused member entries carry the sentinel, all the way down.
        for i in 3..GROUP_LIST_MEMBERS {
            assert_eq!(el.get_u32_le(4 * i), 0xffff_ffff);
        }

        let decoded = decode(&plug);
        assert_eq!(decoded.group_lists[0].contacts, vec![0, 1, 2]);
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_scan_list_cleared_priority_reencode_is_byte_exact() {
        let mut config = Config::new();
        config.channels.push(Channel::Analog(AnalogChannel {
            name: "Member".into(),
            rx_frequency: 145_500_000,
            tx_frequency: 145_500_000,
            ..Default::default()
        }));
        config.scan_lists.push(ScanList {
            name: "Watch".into(),
            priority_mode: PriorityMode::Primary,
            primary: Some(ChannelRef::Selected),
            secondary: None,
            revert: Some(ChannelRef::Selected),
            channels: vec![0],
            ..Default::default()
        });
        config.channels[0].set_scan_list(Some(0));

        let plug = encode(&config);
        let first: Vec<u8> = plug
            .image()
            .element(scan_list_address(0), SCAN_LIST_SIZE)
            .unwrap()
            .bytes()
            .to_vec();
        // Selected-channel primary is 0; the cleared secondary keeps 0xffff.
        assert_eq!(u16::from_le_bytes([first[2], first[3]]), 0);
        assert_eq!(u16::from_le_bytes([first[4], first[5]]), 0xffff);

        let decoded = decode(&plug);
        assert_eq!(decoded.scan_lists[0].primary, Some(ChannelRef::Selected));
        assert_eq!(decoded.scan_lists[0].secondary, None);
        assert_eq!(decoded, config);

        // Re-encoding the decoded configuration reproduces the exact bytes.
        let again = encode(&decoded);
        let second: Vec<u8> = again
            .image()
            .element(scan_list_address(0), SCAN_LIST_SIZE)
            .unwrap()
            .bytes()
            .to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_priority_reference_to_fixed_channel() {
        let mut ctx = Context::new();
        ctx.add_table(ObjectKind::Channel);
        ctx.add(ObjectKind::Channel, 0, 12).unwrap();

        // Offset-by-one: channel index 12 stores as 13.
        let raw = D868uvCodeplug::priority_raw(Some(ChannelRef::Channel(0)), &ctx);
        assert_eq!(raw, 13);
        assert_eq!(
            D868uvCodeplug::priority_ref(raw, &ctx),
            Some(ChannelRef::Channel(0))
        );
        assert_eq!(D868uvCodeplug::priority_ref(0xffff, &ctx), None);
        // Dangling reference degrades to no reference.
        assert_eq!(D868uvCodeplug::priority_ref(100, &ctx), None);
    }

    #[test]
    fn test_full_codeplug_roundtrip() {
        let mut config = Config::new();
        config.radio_ids.push(RadioId {
            name: "Primary".into(),
            number: 2620001,
        });
        // Decoding lists the DMR contact bank before the DTMF bank, so a
        // config built in that order survives the round trip position-exact.
        config.contacts.push(Contact::Dmr(DmrContact {
            name: "Worldwide".into(),
            number: 91,
            call_type: CallType::Group,
            ring: false,
        }));
        config.contacts.push(Contact::Dmr(DmrContact {
            name: "Ops".into(),
            number: 26200,
            call_type: CallType::Private,
            ring: true,
        }));
        config.contacts.push(Contact::Dtmf(DtmfContact {
            name: "Echolink".into(),
            number: "9983#".into(),
        }));
        config.group_lists.push(GroupList {
            name: "All".into(),
            contacts: vec![0, 1],
        });
        config.channels.push(Channel::Digital(DigitalChannel {
            name: "DMR Rpt".into(),
            rx_frequency: 439_562_500,
            tx_frequency: 431_962_500,
            power: Power::High,
            admit: DigitalAdmit::ColorCode,
            color_code: 2,
            time_slot: TimeSlot::Ts1,
            rx_only: false,
            tx_contact: Some(0),
            group_list: Some(0),
            radio_id: Some(0),
            scan_list: Some(0),
        }));
        config.channels.push(Channel::Analog(AnalogChannel {
            name: "FM Call".into(),
            rx_frequency: 145_500_000,
            tx_frequency: 145_500_000,
            rx_tone: SelectiveCall::dcs(23, true),
            tx_tone: SelectiveCall::ctcss(1035),
            scan_list: Some(0),
            ..Default::default()
        }));
        config.zones.push(Zone {
            name: "Home".into(),
            channels: vec![0, 1],
        });
        config.scan_lists.push(ScanList {
            name: "Main".into(),
            priority_mode: PriorityMode::Both,
            primary: Some(ChannelRef::Channel(0)),
            secondary: Some(ChannelRef::Selected),
            channels: vec![0, 1],
            ..Default::default()
        });
        config.settings = GeneralSettings {
            mic_gain: 3,
            vox_level: 0,
            vox_delay_ms: 500,
            key_tone: true,
            boot_display: BootDisplay::CustomText,
            gps_enable: true,
            default_zone: Some(0),
        };

        let plug = encode(&config);
        let decoded = decode(&plug);
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_dtmf_contact_bank_layout() {
        let mut config = Config::new();
        config.contacts.push(Contact::Dtmf(DtmfContact {
            name: "Echolink".into(),
            number: "9983#".into(),
        }));

        // 24-byte entries, two to a 48-byte block.
        assert_eq!(dtmf_contact_address(0), 0x0294_0000);
        assert_eq!(dtmf_contact_address(2), 0x0294_0030);

        let plug = encode(&config);
        // Byte-per-entry presence map: 0x00 valid, 0xff empty.
        let map = plug.image().element(DTMF_BYTEMAP, DTMF_BYTEMAP_SIZE).unwrap();
        assert_eq!(map.get_u8(0), 0x00);
        assert_eq!(map.get_u8(1), 0xff);
        // The index list mirrors it.
        let idx = plug.image().element(DTMF_INDEX, DTMF_INDEX_SIZE).unwrap();
        assert_eq!(idx.get_u8(0), 0x00);
        assert_eq!(idx.get_u8(1), 0xff);

        assert_eq!(decode(&plug), config);
    }

    #[test]
    fn test_dtmf_digit_packing() {
        let mut el = DtmfContactElement::new(Element::new(vec![0u8; DTMF_CONTACT_SIZE]));
        el.encode(&DtmfContact {
            name: "Node".into(),
            number: "12A*#".into(),
        });
        // Two digits per byte, high nibble first; count at 0x07, name at 0x08.
        assert_eq!(el.el.bytes()[0..3], [0x12, 0xAE, 0xF0]);
        assert_eq!(el.el.get_u8(0x07), 5);
        let decoded = el.decode();
        assert_eq!(decoded.number, "12A*#");
        assert_eq!(decoded.name, "Node");

        // Invalid digits are skipped, not encoded.
        el.clear();
        el.encode(&DtmfContact {
            name: "Bad".into(),
            number: "1E2".into(),
        });
        assert_eq!(el.decode().number, "12");
    }

    #[test]
    fn test_capacity_limit() {
        let mut config = Config::new();
        for i in 0..NUM_ZONES + 1 {
            config.zones.push(Zone {
                name: format!("Zone {}", i),
                channels: Vec::new(),
            });
        }
        let mut plug = D868uvCodeplug::new();
        let mut err = ErrorStack::new();
        let result = plug.encode(&config, Flags::default(), &mut err);
        assert!(matches!(
            result,
            Err(CodeplugError::CapacityExceeded { kind: "zones", .. })
        ));
        assert!(!err.is_empty());
    }

    #[test]
    fn test_update_preserves_unmodeled_bytes() {
        let mut config = Config::new();
        config.radio_ids.push(RadioId {
            name: "Own".into(),
            number: 1,
        });

        let mut plug = D868uvCodeplug::new();
        let mut err = ErrorStack::new();
        plug.encode(&config, Flags::default(), &mut err).unwrap();

        // A vendor byte in the unmodeled part of the radio-id element.
        plug.image_mut()
            .element_mut(radio_id_address(0), RADIO_ID_SIZE)
            .unwrap()
            .set_u8(0x1f, 0x5a);

        // Update run keeps it; a from-defaults run clears it.
        plug.encode(&config, Flags::default(), &mut err).unwrap();
        let el = plug.image().element(radio_id_address(0), RADIO_ID_SIZE).unwrap();
        assert_eq!(el.get_u8(0x1f), 0x5a);

        let flags = Flags {
            update_codeplug: false,
        };
        plug.encode(&config, flags, &mut err).unwrap();
        let el = plug.image().element(radio_id_address(0), RADIO_ID_SIZE).unwrap();
        assert_eq!(el.get_u8(0x1f), 0x00);
    }
}
