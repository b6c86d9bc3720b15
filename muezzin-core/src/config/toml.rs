//! Simple TOML parser for device configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `device.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Arrays and inline tables
//! - Dotted keys

use super::types::DeviceConfig;
use crate::schedule::ShortMonthPolicy;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value of the wrong type or out of range
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Link,
    Ingest,
    Scheduler,
    Clock,
}

/// Parse TOML configuration into DeviceConfig
///
/// Keys missing from the input keep their defaults. Unknown keys are
/// ignored so older firmware accepts newer files.
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "link" => Ok(Section::Link),
        "ingest" => Ok(Section::Ingest),
        "scheduler" => Ok(Section::Scheduler),
        "clock" => Ok(Section::Clock),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Link, "baud_rate") => config.link.baud_rate = parse_int(value)?,
        (Section::Ingest, "push_timeout_ms") => config.ingest.push_timeout_ms = parse_int(value)?,
        (Section::Ingest, "short_month_policy") => {
            config.ingest.short_month_policy = parse_policy(parse_string(value)?)?
        }
        (Section::Scheduler, "pop_timeout_ms") => {
            config.scheduler.pop_timeout_ms = parse_int(value)?
        }
        (Section::Scheduler, "idle_poll_ms") => config.scheduler.idle_poll_ms = parse_int(value)?,
        (Section::Clock, "boot_unix_time") => config.clock.boot_unix_time = parse_int(value)?,
        _ => {
            debug!("Ignoring config key {}", key);
        }
    }
    Ok(())
}

/// Split `key = value`, dropping any trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        // Only a comment if the # is outside a string
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Strip quotes; bare words are accepted too
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Ok(value)
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_policy(value: &str) -> Result<ShortMonthPolicy, ParseError> {
    match value {
        "legacy" => Ok(ShortMonthPolicy::Legacy),
        "clear-trailing" => Ok(ShortMonthPolicy::ClearTrailing),
        _ => Err(ParseError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Muezzin display
[link]
baud_rate = 115200

[ingest]
push_timeout_ms = 10   # ms
short_month_policy = "clear-trailing"

[scheduler]
pop_timeout_ms = 7
idle_poll_ms = 250

[clock]
boot_unix_time = 1735689600
"#;

    #[test]
    fn test_parse_full_file() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.link.baud_rate, 115_200);
        assert_eq!(config.ingest.push_timeout_ms, 10);
        assert_eq!(config.ingest.short_month_policy, ShortMonthPolicy::ClearTrailing);
        assert_eq!(config.scheduler.pop_timeout_ms, 7);
        assert_eq!(config.scheduler.idle_poll_ms, 250);
        assert_eq!(config.clock.boot_unix_time, 1_735_689_600);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_config(""), Ok(DeviceConfig::default()));
        assert_eq!(parse_config("# nothing\n\n"), Ok(DeviceConfig::default()));
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let config = parse_config("[scheduler]\nidle_poll_ms = 500\nbrightness = 3\n").unwrap();
        assert_eq!(config.scheduler.idle_poll_ms, 500);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert_eq!(parse_config("[wifi]\nssid = \"x\"\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert_eq!(
            parse_config("[ingest]\npush_timeout_ms = fast\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[ingest]\nshort_month_policy = \"fix\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[link]\nbaud_rate = -1\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_key_value_splitting() {
        assert_eq!(parse_key_value("a = 1 # one"), Some(("a", "1")));
        assert_eq!(parse_key_value("s = \"#1\""), Some(("s", "\"#1\"")));
        assert_eq!(parse_key_value("a ="), None);
    }
}
