//! Text rendering of a decoded setting.
//!
//! Each field is a label padded to [`LABEL_WIDTH`] followed by its value.
//! Fields with several values continue on the following lines, indented to
//! the same column.

use strum::IntoEnumIterator;

use crate::labels::*;
use crate::{ChannelMask, Port, SettingRecord};

/// Width of the field labels, including the colon.
pub const LABEL_WIDTH: usize = 33;

/// Width of the part or channel name in the transmit and receive tables.
const ROUTE_COLUMN_WIDTH: usize = 15;

const LOCAL_CONTROL_COLUMN_WIDTH: usize = 11;

/// Channel flags shown on each line of the on bass note and chord detect
/// grids.
const FLAGS_PER_LINE: usize = 8;

/// Width of the `Port1:` prefix of the channel grids.
const PORT_PREFIX_WIDTH: usize = 6;

/// First line of a report that has a context.
pub const APPLICATION_HEADER: &str = concat!(
    "Print Genos MIDI Settings (version ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

const SEPARATOR: &str =
    "----------------------------------------------------------------------------";

/// Where a setting came from. Shown above the setting when available.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContainerContext {
    /// Name of the file the container was read from, if it came from one.
    pub file_name: Option<String>,

    /// The container identifier, untrimmed.
    pub identifier: String,

    /// Zero based, in file order.
    pub slot_index: usize,
}

#[derive(Default)]
struct ReportBuilder {
    lines: Vec<String>,
}

impl ReportBuilder {
    fn field(&mut self, label: &str, value: &str) {
        let line = format!("{:width$}{value}", format!("{label}:"), width = LABEL_WIDTH);
        self.lines.push(line.trim_end().to_owned());
    }

    /// The first value is on the line with the label, the rest are indented
    /// below it.
    fn field_lines<I: IntoIterator<Item = String>>(&mut self, label: &str, values: I) {
        let mut values = values.into_iter();
        self.field(label, &values.next().unwrap_or_default());
        for value in values {
            self.lines
                .push(format!("{:width$}{value}", "", width = LABEL_WIDTH));
        }
    }

    fn line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}

fn local_control_line<I: Iterator<Item = (&'static str, bool)>>(states: I) -> String {
    let columns: String = states
        .map(|(name, enabled)| {
            format!(
                "{:width$}",
                format!("{name}:{}", off_on(enabled)),
                width = LOCAL_CONTROL_COLUMN_WIDTH
            )
        })
        .collect();
    columns.trim_end().to_owned()
}

fn sysex_line(transmit: bool, receive: bool) -> String {
    format!(
        "{}:{:3} {}:{}",
        TRANSMIT_RECEIVE_LABELS[0],
        off_on(transmit),
        TRANSMIT_RECEIVE_LABELS[1],
        off_on(receive)
    )
}

/// Two blocks, one per port, of the channels numbered 1 to 16.
fn channel_grid(mask: &ChannelMask) -> Vec<String> {
    let mut lines = Vec::with_capacity(4);
    for port in Port::iter() {
        let flags = mask.port(port);
        for (line_index, chunk) in flags.chunks(FLAGS_PER_LINE).enumerate() {
            let prefix = if line_index == 0 {
                format!("Port{}:", port.number())
            } else {
                String::new()
            };
            let entries: Vec<String> = chunk
                .iter()
                .enumerate()
                .map(|(index, flag)| {
                    let number = line_index * FLAGS_PER_LINE + index + 1;
                    format!("{number:2}:{:3}", off_on(*flag))
                })
                .collect();
            let line = format!(
                "{prefix:width$}{}",
                entries.join(" "),
                width = PORT_PREFIX_WIDTH
            );
            lines.push(line.trim_end().to_owned());
        }
    }
    lines
}

/// The lines of the report for a setting, without line terminators.
pub fn format_lines(record: &SettingRecord, context: Option<&ContainerContext>) -> Vec<String> {
    let mut report = ReportBuilder::default();

    if let Some(context) = context {
        report.line(APPLICATION_HEADER);
        if let Some(file_name) = &context.file_name {
            report.field("Genos File", file_name);
        }
        report.field("Container", context.identifier.trim_end());
        report.field("Slot", &(context.slot_index + 1).to_string());
    }

    report.field("MIDI Setting", &record.name);
    report.line(SEPARATOR);
    report.field("Clock", record.clock_source.label());
    report.field("Transmit Clock", off_on(record.transmit_clock));
    report.field("Transpose MIDI Input", off_on(record.transpose_midi_input));
    report.field("Start/Stop", record.start_stop.label());

    let local_control = &record.local_control;
    report.field_lines(
        "Local Control",
        [
            local_control_line(local_control.keyboard_parts()),
            local_control_line(local_control.ensemble_sources()),
        ],
    );

    let sysex = &record.sysex;
    report.field(
        "System Exclusive Message",
        &sysex_line(sysex.transmit_normal(), sysex.receive_normal()),
    );
    report.field(
        "Chord System Exclusive Message",
        &sysex_line(sysex.transmit_chord(), sysex.receive_chord()),
    );

    report.field_lines(
        "Transmit",
        record.transmit_routes().map(|(part, channel)| {
            format!("{part:width$}{channel}", width = ROUTE_COLUMN_WIDTH)
        }),
    );

    // Port 2 channels name their parts from a table without "Song", so the
    // part names change meaning from channel 17 on.
    report.field_lines(
        "Receive",
        record.receive_routes().map(|(channel, part)| {
            format!("{channel:width$}{part}", width = ROUTE_COLUMN_WIDTH)
        }),
    );

    report.field_lines("On Bass Note", channel_grid(&record.on_bass_note));
    report.field_lines("Chord Detect", channel_grid(&record.chord_detect));

    report.lines
}

/// The report for a setting as text, each line terminated by a newline.
pub fn format_record(record: &SettingRecord) -> String {
    let mut text = format_lines(record, None).join("\n");
    text.push('\n');
    text
}
