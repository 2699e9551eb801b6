// Device-independent codeplug configuration.
//
// This is the abstract side of the translation: a plain object graph with no
// device offsets in it. Cross-references between objects are list positions
// (`Slot`) within the owning `Config`, filled in by a codec's link phase.
// Device codecs translate between this graph and their binary layout.

use crate::signaling::SelectiveCall;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an object within its `Config` list.
pub type Slot = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    Low,
    #[default]
    Mid,
    High,
    Turbo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bandwidth {
    #[default]
    Narrow,
    Wide,
}

/// Transmit admit criterion for analog channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalogAdmit {
    #[default]
    Always,
    Free,
    Tone,
}

/// Transmit admit criterion for digital channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitalAdmit {
    #[default]
    Always,
    Free,
    ColorCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeSlot {
    #[default]
    Ts1,
    Ts2,
}

/// Direction of the repeater offset, derived from the rx/tx pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeaterMode {
    Simplex,
    Positive,
    Negative,
}

impl RepeaterMode {
    pub fn from_frequencies(rx_hz: u64, tx_hz: u64) -> Self {
        match tx_hz.cmp(&rx_hz) {
            std::cmp::Ordering::Equal => RepeaterMode::Simplex,
            std::cmp::Ordering::Greater => RepeaterMode::Positive,
            std::cmp::Ordering::Less => RepeaterMode::Negative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalogChannel {
    pub name: String,
    /// Receive frequency in Hz.
    pub rx_frequency: u64,
    /// Transmit frequency in Hz.
    pub tx_frequency: u64,
    pub power: Power,
    pub bandwidth: Bandwidth,
    pub admit: AnalogAdmit,
    pub squelch: u8,
    pub rx_tone: SelectiveCall,
    pub tx_tone: SelectiveCall,
    pub rx_only: bool,
    pub scan_list: Option<Slot>,
}

impl Default for AnalogChannel {
    fn default() -> Self {
        Self {
            name: String::new(),
            rx_frequency: 0,
            tx_frequency: 0,
            power: Power::default(),
            bandwidth: Bandwidth::default(),
            admit: AnalogAdmit::default(),
            squelch: 1,
            rx_tone: SelectiveCall::None,
            tx_tone: SelectiveCall::None,
            rx_only: false,
            scan_list: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalChannel {
    pub name: String,
    pub rx_frequency: u64,
    pub tx_frequency: u64,
    pub power: Power,
    pub admit: DigitalAdmit,
    pub color_code: u8,
    pub time_slot: TimeSlot,
    pub rx_only: bool,
    /// Default transmit contact.
    pub tx_contact: Option<Slot>,
    pub group_list: Option<Slot>,
    pub radio_id: Option<Slot>,
    pub scan_list: Option<Slot>,
}

impl Default for DigitalChannel {
    fn default() -> Self {
        Self {
            name: String::new(),
            rx_frequency: 0,
            tx_frequency: 0,
            power: Power::default(),
            admit: DigitalAdmit::default(),
            color_code: 1,
            time_slot: TimeSlot::default(),
            rx_only: false,
            tx_contact: None,
            group_list: None,
            radio_id: None,
            scan_list: None,
        }
    }
}

/// A channel is either analog (FM) or digital (DMR). The set is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Channel {
    Analog(AnalogChannel),
    Digital(DigitalChannel),
}

impl Channel {
    pub fn name(&self) -> &str {
        match self {
            Channel::Analog(c) => &c.name,
            Channel::Digital(c) => &c.name,
        }
    }

    pub fn rx_frequency(&self) -> u64 {
        match self {
            Channel::Analog(c) => c.rx_frequency,
            Channel::Digital(c) => c.rx_frequency,
        }
    }

    pub fn tx_frequency(&self) -> u64 {
        match self {
            Channel::Analog(c) => c.tx_frequency,
            Channel::Digital(c) => c.tx_frequency,
        }
    }

    pub fn power(&self) -> Power {
        match self {
            Channel::Analog(c) => c.power,
            Channel::Digital(c) => c.power,
        }
    }

    pub fn repeater_mode(&self) -> RepeaterMode {
        RepeaterMode::from_frequencies(self.rx_frequency(), self.tx_frequency())
    }

    pub fn scan_list(&self) -> Option<Slot> {
        match self {
            Channel::Analog(c) => c.scan_list,
            Channel::Digital(c) => c.scan_list,
        }
    }

    pub fn set_scan_list(&mut self, slot: Option<Slot>) {
        match self {
            Channel::Analog(c) => c.scan_list = slot,
            Channel::Digital(c) => c.scan_list = slot,
        }
    }

    pub fn is_analog(&self) -> bool {
        matches!(self, Channel::Analog(_))
    }

    pub fn is_digital(&self) -> bool {
        matches!(self, Channel::Digital(_))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.is_analog() { "FM" } else { "DMR" };
        write!(
            f,
            "{} [{}] rx {} Hz tx {} Hz",
            self.name(),
            mode,
            self.rx_frequency(),
            self.tx_frequency()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    Private,
    #[default]
    Group,
    All,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DmrContact {
    pub name: String,
    /// DMR ID, up to 8 decimal digits.
    pub number: u32,
    pub call_type: CallType,
    pub ring: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DtmfContact {
    pub name: String,
    /// Digit string over 0-9, A-D, *, #.
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Contact {
    Dmr(DmrContact),
    Dtmf(DtmfContact),
}

impl Contact {
    pub fn name(&self) -> &str {
        match self {
            Contact::Dmr(c) => &c.name,
            Contact::Dtmf(c) => &c.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupList {
    pub name: String,
    /// Member contact slots, in order.
    pub contacts: Vec<Slot>,
}

/// Reference to a channel from a scan list. Radios distinguish a fixed
/// channel from "whatever channel is currently selected".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelRef {
    Selected,
    Channel(Slot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityMode {
    #[default]
    Off,
    Primary,
    Secondary,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanList {
    pub name: String,
    pub priority_mode: PriorityMode,
    pub primary: Option<ChannelRef>,
    pub secondary: Option<ChannelRef>,
    pub revert: Option<ChannelRef>,
    /// Priority sample intervals in milliseconds.
    pub look_back_a: u16,
    pub look_back_b: u16,
    pub dropout_delay: u16,
    pub dwell: u16,
    pub channels: Vec<Slot>,
}

impl Default for ScanList {
    fn default() -> Self {
        Self {
            name: String::new(),
            priority_mode: PriorityMode::Off,
            primary: None,
            secondary: None,
            revert: None,
            look_back_a: 2000,
            look_back_b: 3000,
            dropout_delay: 3100,
            dwell: 3200,
            channels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub channels: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RadioId {
    pub name: String,
    pub number: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootDisplay {
    #[default]
    Default,
    CustomText,
    Picture,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    pub mic_gain: u8,
    pub vox_level: u8,
    pub vox_delay_ms: u16,
    pub key_tone: bool,
    pub boot_display: BootDisplay,
    pub gps_enable: bool,
    pub default_zone: Option<Slot>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            mic_gain: 2,
            vox_level: 3,
            vox_delay_ms: 500,
            key_tone: false,
            boot_display: BootDisplay::default(),
            gps_enable: false,
            default_zone: None,
        }
    }
}

/// The complete abstract configuration of a radio.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    pub radio_ids: Vec<RadioId>,
    pub channels: Vec<Channel>,
    pub contacts: Vec<Contact>,
    pub group_lists: Vec<GroupList>,
    pub scan_lists: Vec<ScanList>,
    pub zones: Vec<Zone>,
    pub settings: GeneralSettings,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.radio_ids.is_empty()
            && self.channels.is_empty()
            && self.contacts.is_empty()
            && self.group_lists.is_empty()
            && self.scan_lists.is_empty()
            && self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeater_mode_from_frequencies() {
        assert_eq!(
            RepeaterMode::from_frequencies(146_520_000, 146_520_000),
            RepeaterMode::Simplex
        );
        assert_eq!(
            RepeaterMode::from_frequencies(439_087_000, 431_487_000),
            RepeaterMode::Negative
        );
        assert_eq!(
            RepeaterMode::from_frequencies(145_000_000, 145_600_000),
            RepeaterMode::Positive
        );
    }

    #[test]
    fn test_channel_accessors() {
        let mut ch = Channel::Analog(AnalogChannel {
            name: "Simplex".into(),
            rx_frequency: 146_520_000,
            tx_frequency: 146_520_000,
            ..Default::default()
        });
        assert_eq!(ch.name(), "Simplex");
        assert_eq!(ch.repeater_mode(), RepeaterMode::Simplex);
        assert!(ch.is_analog());
        assert_eq!(ch.scan_list(), None);
        ch.set_scan_list(Some(3));
        assert_eq!(ch.scan_list(), Some(3));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut config = Config::new();
        config.channels.push(Channel::Digital(DigitalChannel {
            name: "TG91".into(),
            rx_frequency: 439_087_000,
            tx_frequency: 431_487_000,
            color_code: 1,
            time_slot: TimeSlot::Ts2,
            tx_contact: Some(0),
            ..Default::default()
        }));
        config.contacts.push(Contact::Dmr(DmrContact {
            name: "World".into(),
            number: 91,
            call_type: CallType::Group,
            ring: false,
        }));

        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_defaults() {
        let settings = GeneralSettings::default();
        assert_eq!(settings.mic_gain, 2);
        assert!(!settings.gps_enable);
        let scan = ScanList::default();
        assert_eq!(scan.priority_mode, PriorityMode::Off);
        assert!(scan.primary.is_none());
        assert!(Config::new().is_empty());
    }
}
