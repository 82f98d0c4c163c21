//! Names shown for the codes stored in a MIDI settings preset.
//!
//! The tables are indexed directly by the code stored in the file, so the
//! position of every entry is significant.

/// Indexed by [`ClockSource`](crate::ClockSource).
pub const CLOCK_SOURCE_LABELS: [&str; 6] =
    ["Internal", "MIDI A", "MIDI B", "USB1", "USB2", "Wireless LAN"];

pub const OFF_ON_LABELS: [&str; 2] = ["Off", "On"];

/// Indexed by [`StartStopTarget`](crate::StartStopTarget).
pub const START_STOP_LABELS: [&str; 2] = ["Song", "Style"];

pub const TRANSMIT_RECEIVE_LABELS: [&str; 2] = ["Transmit", "Receive"];

/// Local control bits for the keyboard parts, in display order.
pub const LOCAL_CONTROL_KEYBOARD_LABELS: [(&str, u8); 4] = [
    ("Left", 0x10),
    ("Right1", 0x08),
    ("Right2", 0x04),
    ("Right3", 0x02),
];

/// Local control bits for the accompaniment sources, in display order. They
/// share the byte with [`LOCAL_CONTROL_KEYBOARD_LABELS`].
pub const LOCAL_CONTROL_ENSEMBLE_LABELS: [(&str, u8); 3] =
    [("Style", 0x40), ("Song", 0x80), ("M.Pad", 0x20)];

/// Parts that can be transmitted. The leading "Off" is a placeholder, the
/// transmit map starts at index 1.
pub const TRANSMIT_PART_LABELS: [&str; 35] = [
    "Off",
    "Right1",
    "Right2",
    "Right3",
    "Left",
    "Upper",
    "Lower",
    "Multi Pad1",
    "Multi Pad2",
    "Multi Pad3",
    "Multi Pad4",
    "Style Rhythm1",
    "Style Rhythm2",
    "Style Bass",
    "Style Chord1",
    "Style Chord2",
    "Style Pad",
    "Style Phrase1",
    "Style Phrase2",
    "Song Ch1",
    "Song Ch2",
    "Song Ch3",
    "Song Ch4",
    "Song Ch5",
    "Song Ch6",
    "Song Ch7",
    "Song Ch8",
    "Song Ch9",
    "Song Ch10",
    "Song Ch11",
    "Song Ch12",
    "Song Ch13",
    "Song Ch14",
    "Song Ch15",
    "Song Ch16",
];

/// Parts a Port 1 channel can be received into.
pub const RECEIVE_PART_LABELS: [&str; 20] = [
    "Off",
    "Song",
    "Right1",
    "Right2",
    "Right3",
    "Left",
    "Keyboard",
    "Style Rhythm1",
    "Style Rhythm2",
    "Style Bass",
    "Style Chord1",
    "Style Chord2",
    "Style Pad",
    "Style Phrase1",
    "Style Phrase2",
    "Extra Part1",
    "Extra Part2",
    "Extra Part3",
    "Extra Part4",
    "Extra Part5",
];

/// Parts a Port 2 channel can be received into. This is
/// [`RECEIVE_PART_LABELS`] without "Song", so every code from 1 on names the
/// part one position later than it does for Port 1.
///
/// Taken from observed behaviour and still to be confirmed against captures
/// with Port 2 channels routed to a part.
pub const RECEIVE_PART_LABELS_PORT2: [&str; 19] = [
    "Off",
    "Right1",
    "Right2",
    "Right3",
    "Left",
    "Keyboard",
    "Style Rhythm1",
    "Style Rhythm2",
    "Style Bass",
    "Style Chord1",
    "Style Chord2",
    "Style Pad",
    "Style Phrase1",
    "Style Phrase2",
    "Extra Part1",
    "Extra Part2",
    "Extra Part3",
    "Extra Part4",
    "Extra Part5",
];

/// Physical MIDI channels. Index 0 is "Off", then the 16 channels of each
/// port.
pub const CHANNEL_LABELS: [&str; 33] = [
    "Off",
    "Port1 Ch1",
    "Port1 Ch2",
    "Port1 Ch3",
    "Port1 Ch4",
    "Port1 Ch5",
    "Port1 Ch6",
    "Port1 Ch7",
    "Port1 Ch8",
    "Port1 Ch9",
    "Port1 Ch10",
    "Port1 Ch11",
    "Port1 Ch12",
    "Port1 Ch13",
    "Port1 Ch14",
    "Port1 Ch15",
    "Port1 Ch16",
    "Port2 Ch1",
    "Port2 Ch2",
    "Port2 Ch3",
    "Port2 Ch4",
    "Port2 Ch5",
    "Port2 Ch6",
    "Port2 Ch7",
    "Port2 Ch8",
    "Port2 Ch9",
    "Port2 Ch10",
    "Port2 Ch11",
    "Port2 Ch12",
    "Port2 Ch13",
    "Port2 Ch14",
    "Port2 Ch15",
    "Port2 Ch16",
];

pub fn off_on(enabled: bool) -> &'static str {
    OFF_ON_LABELS[usize::from(enabled)]
}
