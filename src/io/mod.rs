//! MIDI settings container reading.
//!
//! Functionality for reading containers should be confined to this module where possible.
//!
//! # File Format
//!
//! All numbers are unsigned and big-endian.
//!
//! | Position | Length   | Contents                                   |
//! |----------|----------|--------------------------------------------|
//! | 0        | 32       | identifier, free ASCII text                |
//! | 32       | 2        | slot presence mask, bit `n` for slot `n`   |
//! | 34       | 2        | reserved                                   |
//! | 36       | 10 × 340 | slots, present or not                      |
//!
//! Every slot has the same layout. The positions below are relative to the
//! start of the slot.
//!
//! | Position | Length | Contents                                     |
//! |----------|--------|----------------------------------------------|
//! | 0        | 41     | name, NUL padded                             |
//! | 41       | 111    | reserved                                     |
//! | 152      | 1      | local control bits                           |
//! | 153      | 1      | clock source                                 |
//! | 154      | 1      | transmit clock                               |
//! | 155      | 1      | transpose MIDI input                         |
//! | 156      | 1      | start/stop target                            |
//! | 157      | 2      | system exclusive flags                       |
//! | 159      | 34 × 2 | transmit channel for each part               |
//! | 227      | 32 × 2 | receive part for each channel                |
//! | 291      | 4      | on bass note channels                        |
//! | 295      | 4      | chord detect channels                        |
//! | 299      | 41     | reserved                                     |

use std::mem::size_of;

pub use self::read::*;

mod read;

pub const IDENTIFIER_LENGTH: usize = 32;

const HEADER_RESERVED_LENGTH: usize = 2;

pub const HEADER_LENGTH: usize = IDENTIFIER_LENGTH + size_of::<u16>() + HEADER_RESERVED_LENGTH;

/// Number of slots in a container, whether or not they hold a setting.
pub const SLOT_COUNT: usize = 10;

pub const SLOT_LENGTH: usize = 340;

/// Exact number of bytes read from a container.
pub const CONTAINER_LENGTH: usize = HEADER_LENGTH + SLOT_COUNT * SLOT_LENGTH;

/// The raw bytes of one slot.
pub type SlotBlock = [u8; SLOT_LENGTH];

/// Includes the terminator, so names have at most 40 characters.
pub const NAME_LENGTH: usize = 41;

const NAME_RESERVED_LENGTH: usize = 111;

pub const LOCAL_CONTROL_POS: usize = NAME_LENGTH + NAME_RESERVED_LENGTH;
pub const CLOCK_SOURCE_POS: usize = LOCAL_CONTROL_POS + 1;
pub const TRANSMIT_CLOCK_POS: usize = CLOCK_SOURCE_POS + 1;
pub const TRANSPOSE_MIDI_POS: usize = TRANSMIT_CLOCK_POS + 1;
pub const START_STOP_POS: usize = TRANSPOSE_MIDI_POS + 1;
pub const SYSEX_POS: usize = START_STOP_POS + 1;
pub const TRANSMIT_MAP_POS: usize = SYSEX_POS + size_of::<u16>();
pub const RECEIVE_MAP_POS: usize =
    TRANSMIT_MAP_POS + crate::TRANSMIT_PART_COUNT * size_of::<u16>();
pub const ON_BASS_NOTE_POS: usize = RECEIVE_MAP_POS + crate::CHANNEL_COUNT * size_of::<u16>();
pub const CHORD_DETECT_POS: usize = ON_BASS_NOTE_POS + size_of::<u32>();
const SLOT_PADDING_POS: usize = CHORD_DETECT_POS + size_of::<u32>();

/// Reserved bytes at the end of each slot.
const SLOT_PADDING_LENGTH: usize = SLOT_LENGTH - SLOT_PADDING_POS;

/// The fixed header at the start of every container.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContainerHeader {
    /// Free text, not validated and not trimmed.
    pub identifier: [u8; IDENTIFIER_LENGTH],

    /// Bit `n` is set if slot `n` holds a setting. Bits 10 to 15 are
    /// reserved.
    pub slot_presence_mask: u16,
}

impl ContainerHeader {
    const SLOT_BITS: u16 = (1 << SLOT_COUNT) - 1;

    /// If the slot at the index, in file order, holds a setting to decode.
    pub fn is_slot_present(&self, index: usize) -> bool {
        index < SLOT_COUNT && self.slot_presence_mask & (1 << index) != 0
    }

    /// Indices of the slots that hold a setting, in file order.
    pub fn present_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..SLOT_COUNT).filter(move |index| self.is_slot_present(*index))
    }

    /// Bits set in the reserved part of the slot presence mask.
    pub(crate) fn reserved_bits(&self) -> u16 {
        self.slot_presence_mask & !Self::SLOT_BITS
    }

    /// The identifier as it is displayed. Control characters are shown as
    /// spaces.
    pub fn identifier_text(&self) -> String {
        crate::text::printable(&self.identifier)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout() {
        assert_eq!(HEADER_LENGTH, 36);
        assert_eq!(CONTAINER_LENGTH, 3436);
        assert_eq!(LOCAL_CONTROL_POS, 152);
        assert_eq!(SYSEX_POS, 157);
        assert_eq!(TRANSMIT_MAP_POS, 159);
        assert_eq!(RECEIVE_MAP_POS, 227);
        assert_eq!(ON_BASS_NOTE_POS, 291);
        assert_eq!(CHORD_DETECT_POS, 295);
        assert_eq!(SLOT_PADDING_LENGTH, 41);
    }

    #[test]
    fn present_slots_ignore_reserved_bits() {
        for mask in [0x0000, 0x0001, 0x0155, 0x03ff, 0xfc00, 0xffff, 0x8201] {
            let header = ContainerHeader {
                identifier: [0; IDENTIFIER_LENGTH],
                slot_presence_mask: mask,
            };
            let expected: Vec<usize> = (0..SLOT_COUNT).filter(|i| mask & (1 << i) != 0).collect();
            assert_eq!(header.present_slots().collect::<Vec<_>>(), expected);
            assert_eq!(header.reserved_bits(), mask & 0xfc00);
            assert!(!header.is_slot_present(10));
            assert!(!header.is_slot_present(15));
        }
    }

    #[test]
    fn identifier_text() {
        let mut identifier = [0; IDENTIFIER_LENGTH];
        identifier[..4].copy_from_slice(b"DEMO");
        let header = ContainerHeader {
            identifier,
            slot_presence_mask: 0,
        };
        let text = header.identifier_text();
        assert_eq!(text.len(), IDENTIFIER_LENGTH);
        assert!(text.starts_with("DEMO "));
        assert_eq!(text.trim_end(), "DEMO");
    }
}
