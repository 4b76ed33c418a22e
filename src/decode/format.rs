//! Per-command display formatting for the electric meter family.
//!
//! Every command row renders its de-obfuscated payload into a display
//! string. The mapping from row id to formatting is a closed enum matched
//! exhaustively, so an unmapped command can only ever render as the
//! placeholder, never as garbage from an uninitialized dispatch slot.

use crate::table::electric;

/// How a command row's payload is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFormat {
    /// Weekday index, day, month, two-digit year.
    Date,
    /// Hour, minute, second.
    Time,
    /// Total active energy plus four tariff registers, BCD.
    TariffEnergy,
    /// Single mode byte shown as bits.
    ModeBits,
    /// Firmware version and status triple.
    VersionTriple,
    /// Big-endian pulse constant.
    Constant,
    /// Known command without a decoder yet.
    Unimplemented,
}

const WEEKDAYS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Formatting selected by command row id.
pub fn format_for(id: u16) -> CommandFormat {
    match id {
        electric::DATE => CommandFormat::Date,
        electric::TIME => CommandFormat::Time,
        electric::ENERGY_ACTIVE => CommandFormat::TariffEnergy,
        electric::RUN_MODE => CommandFormat::ModeBits,
        electric::VERSION => CommandFormat::VersionTriple,
        electric::METER_CONSTANT => CommandFormat::Constant,
        _ => CommandFormat::Unimplemented,
    }
}

/// Renders a de-obfuscated payload slice.
pub fn format_value(format: CommandFormat, data: &[u8]) -> String {
    match format {
        CommandFormat::Date => format_date(data),
        CommandFormat::Time => format_time(data),
        CommandFormat::TariffEnergy => format_tariff_energy(data),
        CommandFormat::ModeBits => format_mode_bits(data),
        CommandFormat::VersionTriple => format_version(data),
        CommandFormat::Constant => format_constant(data),
        CommandFormat::Unimplemented => "unimplemented".to_string(),
    }
}

/// `[5, 20, 6, 23]` renders as `fri, 06/20/2023`.
fn format_date(data: &[u8]) -> String {
    if data.len() < 4 {
        return short_payload(data);
    }
    let weekday = WEEKDAYS.get(data[0] as usize).copied().unwrap_or("???");
    format!("{weekday}, {:02}/{:02}/20{:02}", data[2], data[1], data[3])
}

fn format_time(data: &[u8]) -> String {
    if data.len() < 3 {
        return short_payload(data);
    }
    format!("{:02}:{:02}:{:02}", data[0], data[1], data[2])
}

/// Five 4-byte BCD registers: total first, then tariffs 1-4.
fn format_tariff_energy(data: &[u8]) -> String {
    if data.len() < 20 {
        return short_payload(data);
    }
    let total = bcd_amount(&data[0..4]);
    let tariffs: Vec<String> = (1..5)
        .map(|i| format!("t{i} {}", bcd_amount(&data[4 * i..4 * i + 4])))
        .collect();
    format!("total {total} ({})", tariffs.join(", "))
}

fn format_mode_bits(data: &[u8]) -> String {
    match data.first() {
        Some(mode) => format!("{mode:#010b}"),
        None => short_payload(data),
    }
}

fn format_version(data: &[u8]) -> String {
    if data.len() < 3 {
        return short_payload(data);
    }
    format!("{}.{}.{}", data[0], data[1], data[2])
}

fn format_constant(data: &[u8]) -> String {
    if data.len() < 2 {
        return short_payload(data);
    }
    u16::from_be_bytes([data[0], data[1]]).to_string()
}

/// A 4-byte little-endian BCD register with two decimal places.
fn bcd_amount(data: &[u8]) -> String {
    let digits = format!("{:02x}{:02x}{:02x}{:02x}", data[3], data[2], data[1], data[0]);
    let (whole, frac) = digits.split_at(6);
    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    format!("{whole}.{frac}")
}

fn short_payload(data: &[u8]) -> String {
    format!("short payload: {}", hex::encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_example() {
        assert_eq!(format_date(&[5, 20, 6, 23]), "fri, 06/20/2023");
    }

    #[test]
    fn bcd_amount_little_endian() {
        assert_eq!(bcd_amount(&[0x56, 0x34, 0x12, 0x00]), "1234.56");
        assert_eq!(bcd_amount(&[0x00, 0x00, 0x00, 0x00]), "0.00");
    }

    #[test]
    fn unmapped_row_renders_placeholder() {
        assert_eq!(format_for(electric::RESERVED), CommandFormat::Unimplemented);
        assert_eq!(
            format_value(CommandFormat::Unimplemented, &[0x00, 0x01]),
            "unimplemented"
        );
    }
}
