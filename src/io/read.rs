use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::{Cursor, ErrorKind, Seek};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, trace};

use super::{NAME_RESERVED_LENGTH, SLOT_PADDING_LENGTH};
use crate::labels::CHANNEL_LABELS;
use crate::text;
use crate::*;

/// Make reading the fields of a setting less verbose. Every read that can
/// fail validation reports the field name and its position in the slot.
///
/// ```compile_fail
/// use std::io::Cursor;
///
/// let _ = genos_midi_settings::SettingsReader::new(Cursor::new(vec![0_u8; 4]));
/// ```
pub(crate) struct SettingsReader<T: Read + Seek> {
    inner: T,
}

impl<T: Read + Seek> SettingsReader<T> {
    pub(crate) fn new(inner: T) -> Self {
        Self { inner }
    }

    pub(crate) fn stream_position(&mut self) -> Result<u64, FormatError> {
        Ok(self.inner.stream_position()?)
    }

    /// The stream position as infallible text. Will return `"<unknown>" `if
    /// the position cannot be determined.
    pub(crate) fn pos(&mut self) -> String {
        self.inner
            .stream_position()
            .map(|pos| pos.to_string())
            .unwrap_or_else(|_| "<unknown>".to_owned())
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.inner.read_u8()?)
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, FormatError> {
        Ok(self.inner.read_u16::<BigEndian>()?)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, FormatError> {
        Ok(self.inner.read_u32::<BigEndian>()?)
    }

    pub(crate) fn read_bool8(&mut self, field: &'static str) -> Result<bool, FormatError> {
        let offset = self.stream_position()?;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(FormatError::InvalidBoolean {
                field,
                offset,
                value,
            }),
        }
    }

    /// Read a one byte enumeration, failing if the value has no variant.
    pub(crate) fn read_enum<E>(
        &mut self,
        field: &'static str,
        from_repr: fn(u8) -> Option<E>,
    ) -> Result<E, FormatError> {
        let offset = self.stream_position()?;
        let value = self.read_u8()?;
        from_repr(value).ok_or(FormatError::InvalidEnum {
            field,
            offset,
            value,
        })
    }

    /// Read a 16-bit code of a map entry that must index into a label table
    /// with `max + 1` entries.
    pub(crate) fn read_code(
        &mut self,
        field: &'static str,
        index: usize,
        max: u16,
    ) -> Result<u8, FormatError> {
        let offset = self.stream_position()?;
        match self.read_u16()? {
            value if value <= max => Ok(value as u8),
            value => Err(FormatError::InvalidCode {
                field,
                index,
                offset,
                value,
                max,
            }),
        }
    }

    /// Read the fixed size name field. Every byte must be ASCII, even those
    /// after the terminator.
    pub(crate) fn read_name(&mut self) -> Result<String, FormatError> {
        let start = self.stream_position()?;
        let mut buffer = [0_u8; NAME_LENGTH];
        self.inner.read_exact(&mut buffer)?;
        if let Some((index, value)) = buffer.iter().enumerate().find(|(_, b)| !b.is_ascii()) {
            return Err(FormatError::InvalidName {
                offset: start + index as u64,
                value: *value,
            });
        }

        // The last byte is always a terminator.
        Ok(text::nul_terminated(&buffer[..NAME_LENGTH - 1]))
    }

    /// Reserved parts of a slot are not validated.
    pub(crate) fn skip(&mut self, bytes: usize) -> Result<u64, FormatError> {
        Ok(self.inner.seek(io::SeekFrom::Current(bytes as i64))?)
    }
}

/// Read until the buffer is full or the reader is exhausted, returning how
/// many bytes were read.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, FormatError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(count) => filled += count,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(filled)
}

impl ContainerHeader {
    /// Parse the header from the start of the bytes.
    pub fn read(bytes: &[u8]) -> Result<ContainerHeader, FormatError> {
        if bytes.len() < HEADER_LENGTH {
            return Err(FormatError::TruncatedHeader {
                available: bytes.len(),
                expected: HEADER_LENGTH,
            });
        }

        let mut identifier = [0_u8; IDENTIFIER_LENGTH];
        identifier.copy_from_slice(&bytes[..IDENTIFIER_LENGTH]);
        let slot_presence_mask = (&bytes[IDENTIFIER_LENGTH..]).read_u16::<BigEndian>()?;

        // The remaining two bytes are reserved.
        Ok(ContainerHeader {
            identifier,
            slot_presence_mask,
        })
    }

    /// Read exactly [`HEADER_LENGTH`] bytes from the stream.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<ContainerHeader, FormatError> {
        let mut buffer = [0_u8; HEADER_LENGTH];
        let available = read_fully(reader, &mut buffer)?;
        Self::read(&buffer[..available])
    }
}

/// Read all the slots that follow the header, in file order. Slots are read
/// whether or not they are present.
pub fn read_slots<R: Read>(reader: &mut R) -> Result<[SlotBlock; SLOT_COUNT], FormatError> {
    let mut slots = [[0_u8; SLOT_LENGTH]; SLOT_COUNT];
    let mut available = 0;
    for slot in slots.iter_mut() {
        let count = read_fully(reader, slot)?;
        available += count;
        if count < SLOT_LENGTH {
            return Err(FormatError::TruncatedContainer {
                available,
                expected: SLOT_COUNT * SLOT_LENGTH,
            });
        }
    }
    Ok(slots)
}

/// Decode every present slot of the container in the bytes. Only a
/// truncated container fails as a whole, a slot that cannot be decoded does
/// not prevent the others from being decoded.
pub fn decode_container(bytes: &[u8]) -> Result<Vec<(usize, SlotResult)>, FormatError> {
    Ok(PresetContainer::from_bytes(bytes)?.decode_all())
}

impl PresetContainer {
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<PresetContainer, FormatError> {
        let mut file = File::open(path.as_ref())?;
        Self::read(&mut file)
    }

    /// Read exactly [`CONTAINER_LENGTH`] bytes. Anything after that is left
    /// in the stream.
    pub fn read<R: Read>(reader: &mut R) -> Result<PresetContainer, FormatError> {
        let header = ContainerHeader::read_from(reader)?;
        debug!(
            "Container {:?}, slot presence mask {:#06x}",
            header.identifier_text().trim_end(),
            header.slot_presence_mask
        );
        if header.reserved_bits() != 0 {
            debug!(
                "Ignoring reserved slot presence bits {:#06x}",
                header.reserved_bits()
            );
        }

        let slots = read_slots(reader)?;
        debug!(
            "Present slots {:?}",
            header.present_slots().collect::<Vec<_>>()
        );
        Ok(PresetContainer { header, slots })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<PresetContainer, FormatError> {
        if bytes.len() > CONTAINER_LENGTH {
            debug!(
                "Ignoring {} bytes after the container",
                bytes.len() - CONTAINER_LENGTH
            );
        }
        let mut reader = bytes;
        Self::read(&mut reader)
    }
}

impl SettingRecord {
    pub fn decode(block: &SlotBlock) -> Result<SettingRecord, FormatError> {
        let mut reader = SettingsReader::new(Cursor::new(&block[..]));

        let name = reader.read_name()?;
        trace!("name: {name:?}, reserved pos {}", reader.pos());
        reader.skip(NAME_RESERVED_LENGTH)?;

        trace!("local control: pos {}", reader.pos());
        let local_control = LocalControl::from(reader.read_u8()?);
        if local_control.unused_bits() != 0 {
            trace!(
                "local control: ignoring unused bits {:#04x}",
                local_control.unused_bits()
            );
        }
        let clock_source = reader.read_enum("clock source", ClockSource::from_repr)?;
        let transmit_clock = reader.read_bool8("transmit clock")?;
        let transpose_midi_input = reader.read_bool8("transpose MIDI input")?;
        let start_stop = reader.read_enum("start/stop target", StartStopTarget::from_repr)?;
        trace!("clock {clock_source:?}, transmit clock {transmit_clock}, transpose {transpose_midi_input}, start/stop {start_stop:?}");

        let sysex = SysexFlags::from(reader.read_u16()?);
        if sysex.unused_bits() != 0 {
            trace!("sysex: ignoring unused bits {:#06x}", sysex.unused_bits());
        }

        trace!("transmit map: pos {}", reader.pos());
        let channel_max = (CHANNEL_LABELS.len() - 1) as u16;
        let mut transmit_map = [0_u8; TRANSMIT_PART_COUNT];
        for (index, code) in transmit_map.iter_mut().enumerate() {
            *code = reader.read_code("transmit map", index, channel_max)?;
        }

        trace!("receive map: pos {}", reader.pos());
        let mut receive_map = [0_u8; CHANNEL_COUNT];
        for (channel, code) in receive_map.iter_mut().enumerate() {
            let part_max = (Port::of_channel(channel).receive_part_labels().len() - 1) as u16;
            *code = reader.read_code("receive map", channel, part_max)?;
        }

        trace!("channel masks: pos {}", reader.pos());
        let on_bass_note = ChannelMask::from(reader.read_u32()?);
        let chord_detect = ChannelMask::from(reader.read_u32()?);
        reader.skip(SLOT_PADDING_LENGTH)?;

        Ok(SettingRecord {
            name,
            local_control,
            clock_source,
            transmit_clock,
            transpose_midi_input,
            start_stop,
            sysex,
            transmit_map,
            receive_map,
            on_bass_note,
            chord_detect,
        })
    }

    /// Read one setting, leaving the reader at the end of its slot.
    pub fn read<R: Read>(reader: &mut R) -> Result<SettingRecord, FormatError> {
        let mut block = [0_u8; SLOT_LENGTH];
        let available = read_fully(reader, &mut block)?;
        if available < SLOT_LENGTH {
            return Err(FormatError::TruncatedContainer {
                available,
                expected: SLOT_LENGTH,
            });
        }
        Self::decode(&block)
    }
}
