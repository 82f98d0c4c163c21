//! Genos keyboards store up to ten MIDI settings in a single container file
//! with a proprietary binary format. Each setting routes the parts of the
//! keyboard to MIDI channels and back.
//!
//! # Reading a Container
//!
//! ```no_run
//! use genos_midi_settings::{format_record, PresetContainer};
//!
//! let container = PresetContainer::read_file("settings.mis").unwrap();
//! for (index, result) in container.decode_all() {
//!     match result {
//!         Ok(record) => print!("{}", format_record(&record)),
//!         Err(error) => eprintln!("Slot {}: {error}", index + 1),
//!     }
//! }
//! ```
//!
//! Containers are only read, writing is not supported.

use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use strum_macros::{EnumIter, FromRepr};

pub use error::*;
pub use io::*;
pub use report::*;
pub use text::file_stem_for;

use crate::labels::*;

mod error;
mod io;
pub mod labels;
mod report;
mod text;

/// Number of parts in the transmit map.
pub const TRANSMIT_PART_COUNT: usize = 34;

/// Number of physical channels over both ports.
pub const CHANNEL_COUNT: usize = 32;

/// The outcome of decoding a present slot.
pub type SlotResult = Result<SettingRecord, FormatError>;

#[derive(Clone, Copy, Debug, Eq, EnumIter, FromRepr, PartialEq, Serialize)]
#[repr(u8)]
pub enum ClockSource {
    // The discriminants correspond to the file format.
    Internal,
    MidiA,
    MidiB,
    Usb1,
    Usb2,
    WirelessLan,
}

impl ClockSource {
    pub fn label(&self) -> &'static str {
        CLOCK_SOURCE_LABELS[*self as usize]
    }
}

impl Display for ClockSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What the start and stop buttons control.
#[derive(Clone, Copy, Debug, Eq, EnumIter, FromRepr, PartialEq, Serialize)]
#[repr(u8)]
pub enum StartStopTarget {
    // The discriminants correspond to the file format.
    Song,
    Style,
}

impl StartStopTarget {
    pub fn label(&self) -> &'static str {
        START_STOP_LABELS[*self as usize]
    }
}

impl Display for StartStopTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The two physical MIDI ports, each with 16 channels.
#[derive(Clone, Copy, Debug, Eq, EnumIter, PartialEq)]
pub enum Port {
    Port1,
    Port2,
}

impl Port {
    pub const CHANNEL_COUNT: usize = 16;

    /// The port of a physical channel from 0 to 31.
    pub fn of_channel(channel: usize) -> Port {
        if channel < Self::CHANNEL_COUNT {
            Port::Port1
        } else {
            Port::Port2
        }
    }

    /// One based, as shown on the instrument.
    pub fn number(&self) -> usize {
        match self {
            Port::Port1 => 1,
            Port::Port2 => 2,
        }
    }

    /// First physical channel of the port.
    pub fn first_channel(&self) -> usize {
        (self.number() - 1) * Self::CHANNEL_COUNT
    }

    /// The parts a channel of this port can be received into, indexed by the
    /// receive map code. Port 2 does not offer "Song".
    pub fn receive_part_labels(&self) -> &'static [&'static str] {
        match self {
            Port::Port1 => &RECEIVE_PART_LABELS,
            Port::Port2 => &RECEIVE_PART_LABELS_PORT2,
        }
    }
}

/// Local control switches for the keyboard parts and the accompaniment
/// sources. Both families are packed into one byte.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LocalControl(u8);

impl LocalControl {
    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_enabled(&self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    /// Keyboard parts with their state, in display order.
    pub fn keyboard_parts(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        Self::states(self, &LOCAL_CONTROL_KEYBOARD_LABELS)
    }

    /// Accompaniment sources with their state, in display order.
    pub fn ensemble_sources(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        Self::states(self, &LOCAL_CONTROL_ENSEMBLE_LABELS)
    }

    fn states<'a>(
        &'a self,
        labels: &'static [(&'static str, u8)],
    ) -> impl Iterator<Item = (&'static str, bool)> + 'a {
        labels
            .iter()
            .map(move |(name, bit)| (*name, self.is_enabled(*bit)))
    }

    /// Bits that belong to neither family.
    pub(crate) fn unused_bits(&self) -> u8 {
        LOCAL_CONTROL_KEYBOARD_LABELS
            .iter()
            .chain(LOCAL_CONTROL_ENSEMBLE_LABELS.iter())
            .fold(self.0, |bits, (_, bit)| bits & !bit)
    }
}

impl From<u8> for LocalControl {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

/// Transmit and receive switches for normal and chord system exclusive
/// messages. The transmit switches are in the high byte, the receive
/// switches in the low byte.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SysexFlags(u16);

impl SysexFlags {
    pub const TRANSMIT_NORMAL: u16 = 0x8000;
    pub const RECEIVE_NORMAL: u16 = 0x0080;
    pub const TRANSMIT_CHORD: u16 = 0x0800;
    pub const RECEIVE_CHORD: u16 = 0x0008;

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn transmit_normal(&self) -> bool {
        self.0 & Self::TRANSMIT_NORMAL != 0
    }

    pub fn receive_normal(&self) -> bool {
        self.0 & Self::RECEIVE_NORMAL != 0
    }

    pub fn transmit_chord(&self) -> bool {
        self.0 & Self::TRANSMIT_CHORD != 0
    }

    pub fn receive_chord(&self) -> bool {
        self.0 & Self::RECEIVE_CHORD != 0
    }

    pub(crate) fn unused_bits(&self) -> u16 {
        self.0
            & !(Self::TRANSMIT_NORMAL
                | Self::RECEIVE_NORMAL
                | Self::TRANSMIT_CHORD
                | Self::RECEIVE_CHORD)
    }
}

impl From<u16> for SysexFlags {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

/// One flag per physical channel. Bit `n` is channel `n`, so the least
/// significant bit is channel 1 of Port 1 and bit 16 is channel 1 of Port 2.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ChannelMask(u32);

impl ChannelMask {
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Channels past the last one are never set.
    pub fn is_set(&self, channel: usize) -> bool {
        channel < CHANNEL_COUNT && self.0 & (1 << channel) != 0
    }

    /// The flags of one port, from channel 1 to 16.
    pub fn port(&self, port: Port) -> [bool; Port::CHANNEL_COUNT] {
        let mut flags = [false; Port::CHANNEL_COUNT];
        for (index, flag) in flags.iter_mut().enumerate() {
            *flag = self.is_set(port.first_channel() + index);
        }
        flags
    }
}

impl From<u32> for ChannelMask {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

/// A decoded MIDI setting. All codes have been checked against their label
/// tables, so a setting can only be created by decoding a slot.
///
/// ```compile_fail
/// use genos_midi_settings::*;
///
/// let mut record = SettingRecord::decode(&[0; SLOT_LENGTH]).unwrap();
/// record.transmit_map[0] = 200;
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SettingRecord {
    /// At most 40 ASCII characters.
    name: String,

    local_control: LocalControl,
    clock_source: ClockSource,
    transmit_clock: bool,
    transpose_midi_input: bool,
    start_stop: StartStopTarget,
    sysex: SysexFlags,

    /// The channel code for each part, starting with the part at index 1 of
    /// [`TRANSMIT_PART_LABELS`]. Zero is "Off".
    #[serde(serialize_with = "serialize_array")]
    transmit_map: [u8; TRANSMIT_PART_COUNT],

    /// The part code for each physical channel. The codes of Port 2 channels
    /// index a different table, see [`Port::receive_part_labels`].
    #[serde(serialize_with = "serialize_array")]
    receive_map: [u8; CHANNEL_COUNT],

    on_bass_note: ChannelMask,
    chord_detect: ChannelMask,
}

impl SettingRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_control(&self) -> LocalControl {
        self.local_control
    }

    pub fn clock_source(&self) -> ClockSource {
        self.clock_source
    }

    pub fn transmit_clock(&self) -> bool {
        self.transmit_clock
    }

    pub fn transpose_midi_input(&self) -> bool {
        self.transpose_midi_input
    }

    pub fn start_stop(&self) -> StartStopTarget {
        self.start_stop
    }

    pub fn sysex(&self) -> SysexFlags {
        self.sysex
    }

    /// The channel code of each part, see [`SettingRecord::transmit_channel`]
    /// for its name.
    pub fn transmit_map(&self) -> &[u8; TRANSMIT_PART_COUNT] {
        &self.transmit_map
    }

    /// The part code of each physical channel, see
    /// [`SettingRecord::receive_part`] for its name.
    pub fn receive_map(&self) -> &[u8; CHANNEL_COUNT] {
        &self.receive_map
    }

    pub fn on_bass_note(&self) -> ChannelMask {
        self.on_bass_note
    }

    pub fn chord_detect(&self) -> ChannelMask {
        self.chord_detect
    }

    /// Name of the channel the part at the index transmits on.
    ///
    /// # Panics
    ///
    /// Panics if the index is not below [`TRANSMIT_PART_COUNT`].
    pub fn transmit_channel(&self, part_index: usize) -> &'static str {
        CHANNEL_LABELS[usize::from(self.transmit_map[part_index])]
    }

    /// Name of the part the physical channel is received into.
    ///
    /// # Panics
    ///
    /// Panics if the channel is not below [`CHANNEL_COUNT`].
    pub fn receive_part(&self, channel: usize) -> &'static str {
        Port::of_channel(channel).receive_part_labels()[usize::from(self.receive_map[channel])]
    }

    /// Part and channel names of the transmit map, in order.
    pub fn transmit_routes(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        TRANSMIT_PART_LABELS[1..]
            .iter()
            .enumerate()
            .map(move |(index, part)| (*part, self.transmit_channel(index)))
    }

    /// Channel and part names of the receive map, in order.
    pub fn receive_routes(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        CHANNEL_LABELS[1..]
            .iter()
            .enumerate()
            .map(move |(channel, label)| (*label, self.receive_part(channel)))
    }
}

impl Display for SettingRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_record(self))
    }
}

/// Serde only implements `Serialize` for arrays of up to 32 elements.
fn serialize_array<S: Serializer, const N: usize>(
    values: &[u8; N],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    values.as_slice().serialize(serializer)
}

/// A whole container. Every slot is kept, present or not.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PresetContainer {
    pub header: ContainerHeader,
    pub slots: [SlotBlock; SLOT_COUNT],
}

impl PresetContainer {
    pub fn is_slot_present(&self, index: usize) -> bool {
        self.header.is_slot_present(index)
    }

    pub fn present_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.header.present_slots()
    }

    /// Decode the slot at the index. Returns `None` without decoding if the
    /// slot is not present.
    pub fn decode_slot(&self, index: usize) -> Option<SlotResult> {
        if self.is_slot_present(index) {
            Some(SettingRecord::decode(&self.slots[index]))
        } else {
            None
        }
    }

    /// Decode all present slots, in file order.
    pub fn decode_all(&self) -> Vec<(usize, SlotResult)> {
        self.present_slots()
            .map(|index| (index, SettingRecord::decode(&self.slots[index])))
            .collect()
    }

    /// Where the slot at the index came from, for the report header. The
    /// file name is left for the caller to fill in.
    pub fn context(&self, index: usize) -> ContainerContext {
        ContainerContext {
            file_name: None,
            identifier: self.header.identifier_text(),
            slot_index: index,
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use strum::IntoEnumIterator;

    use crate::*;

    /// Builds the bytes of a slot. Everything not set is zero, which is a
    /// valid setting.
    pub(crate) struct SlotBuilder {
        block: SlotBlock,
    }

    impl SlotBuilder {
        pub(crate) fn new(name: &str) -> Self {
            let mut block = [0; SLOT_LENGTH];
            block[..name.len()].copy_from_slice(name.as_bytes());
            Self { block }
        }

        pub(crate) fn byte(mut self, pos: usize, value: u8) -> Self {
            self.block[pos] = value;
            self
        }

        pub(crate) fn u16_at(mut self, pos: usize, value: u16) -> Self {
            self.block[pos..pos + 2].copy_from_slice(&value.to_be_bytes());
            self
        }

        pub(crate) fn u32_at(mut self, pos: usize, value: u32) -> Self {
            self.block[pos..pos + 4].copy_from_slice(&value.to_be_bytes());
            self
        }

        pub(crate) fn transmit(self, part_index: usize, code: u16) -> Self {
            self.u16_at(TRANSMIT_MAP_POS + 2 * part_index, code)
        }

        pub(crate) fn receive(self, channel: usize, code: u16) -> Self {
            self.u16_at(RECEIVE_MAP_POS + 2 * channel, code)
        }

        pub(crate) fn build(self) -> SlotBlock {
            self.block
        }

        pub(crate) fn record(self) -> SettingRecord {
            SettingRecord::decode(&self.block).expect("valid setting")
        }
    }

    /// A whole container. Slots that are not given are all zero.
    pub(crate) fn container_bytes(
        identifier: &str,
        slot_presence_mask: u16,
        slots: &[(usize, SlotBlock)],
    ) -> Vec<u8> {
        let mut bytes = vec![0; CONTAINER_LENGTH];
        bytes[..identifier.len()].copy_from_slice(identifier.as_bytes());
        bytes[IDENTIFIER_LENGTH..IDENTIFIER_LENGTH + 2]
            .copy_from_slice(&slot_presence_mask.to_be_bytes());
        for (index, block) in slots {
            let start = HEADER_LENGTH + index * SLOT_LENGTH;
            bytes[start..start + SLOT_LENGTH].copy_from_slice(block);
        }
        bytes
    }

    #[test]
    fn clock_source_labels() {
        let labels: Vec<String> = ClockSource::iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, CLOCK_SOURCE_LABELS);
        assert_eq!(ClockSource::from_repr(5), Some(ClockSource::WirelessLan));
        assert_eq!(ClockSource::from_repr(6), None);
    }

    #[test]
    fn start_stop_labels() {
        assert_eq!(StartStopTarget::Song.to_string(), "Song");
        assert_eq!(StartStopTarget::Style.to_string(), "Style");
        assert_eq!(StartStopTarget::iter().count(), START_STOP_LABELS.len());
    }

    #[test]
    fn ports() {
        assert_eq!(Port::of_channel(0), Port::Port1);
        assert_eq!(Port::of_channel(15), Port::Port1);
        assert_eq!(Port::of_channel(16), Port::Port2);
        assert_eq!(Port::of_channel(31), Port::Port2);
        assert_eq!(Port::Port2.first_channel(), 16);
        assert_eq!(Port::Port1.receive_part_labels()[1], "Song");
        assert_eq!(Port::Port2.receive_part_labels()[1], "Right1");
    }

    #[test]
    fn local_control() {
        let local_control = LocalControl::from(0x90);
        assert_eq!(
            local_control.keyboard_parts().collect::<Vec<_>>(),
            vec![
                ("Left", true),
                ("Right1", false),
                ("Right2", false),
                ("Right3", false)
            ]
        );
        assert_eq!(
            local_control.ensemble_sources().collect::<Vec<_>>(),
            vec![("Style", false), ("Song", true), ("M.Pad", false)]
        );
        assert_eq!(local_control.unused_bits(), 0);
        assert_eq!(LocalControl::from(0xff).unused_bits(), 0x01);
    }

    #[test]
    fn sysex_flags() {
        let sysex = SysexFlags::from(0x0880);
        assert!(!sysex.transmit_normal());
        assert!(sysex.receive_normal());
        assert!(sysex.transmit_chord());
        assert!(!sysex.receive_chord());
        assert_eq!(sysex.unused_bits(), 0);
        assert_eq!(SysexFlags::from(0xffff).unused_bits(), 0x7777);
    }

    #[test]
    fn channel_mask() {
        let mask = ChannelMask::from(0x0001_0001);
        assert!(mask.is_set(0));
        assert!(mask.is_set(16));
        assert!(!mask.is_set(1));
        assert!(!mask.is_set(32));
        let port1 = mask.port(Port::Port1);
        assert!(port1[0]);
        assert_eq!(port1.iter().filter(|flag| **flag).count(), 1);
        assert!(mask.port(Port::Port2)[0]);

        let mask = ChannelMask::from(0x8000_0000);
        assert!(mask.port(Port::Port2)[15]);
    }

    #[test]
    fn routes() {
        let record = SlotBuilder::new("Routes")
            .transmit(0, 32)
            .receive(15, 1)
            .receive(16, 1)
            .record();
        let transmit: Vec<_> = record.transmit_routes().collect();
        assert_eq!(transmit.len(), TRANSMIT_PART_COUNT);
        assert_eq!(transmit[0], ("Right1", "Port2 Ch16"));
        assert_eq!(transmit[33], ("Song Ch16", "Off"));

        let receive: Vec<_> = record.receive_routes().collect();
        assert_eq!(receive.len(), CHANNEL_COUNT);
        assert_eq!(receive[15], ("Port1 Ch16", "Song"));
        assert_eq!(receive[16], ("Port2 Ch1", "Right1"));
    }

    #[test]
    fn largest_codes_have_labels() {
        let mut builder = SlotBuilder::new("Largest");
        for part in 0..TRANSMIT_PART_COUNT {
            builder = builder.transmit(part, 32);
        }
        for channel in 0..CHANNEL_COUNT {
            let max = Port::of_channel(channel).receive_part_labels().len() - 1;
            builder = builder.receive(channel, max as u16);
        }
        let record = builder.record();
        assert_eq!(record.transmit_map(), &[32; TRANSMIT_PART_COUNT]);
        assert!(record.transmit_routes().all(|(_, channel)| channel == "Port2 Ch16"));
        assert_eq!(
            record.receive_routes().nth(15),
            Some(("Port1 Ch16", RECEIVE_PART_LABELS[19]))
        );
        assert_eq!(
            record.receive_routes().last(),
            Some(("Port2 Ch16", RECEIVE_PART_LABELS_PORT2[18]))
        );
        assert_eq!(format_record(&record).lines().count(), 84);
    }

    #[test]
    fn serialize() {
        let record = SlotBuilder::new("Json")
            .byte(CLOCK_SOURCE_POS, 1)
            .transmit(33, 2)
            .record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Json");
        assert_eq!(json["clock_source"], "MidiA");
        assert_eq!(json["transmit_map"].as_array().unwrap().len(), 34);
        assert_eq!(json["transmit_map"][33], 2);
        assert_eq!(json["receive_map"].as_array().unwrap().len(), 32);
        assert_eq!(json["on_bass_note"], 0);
    }
}
