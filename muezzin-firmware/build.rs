//! Build script for muezzin-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted per section, with the allowed integer range
const INTEGER_KEYS: &[(&str, &str, i64, i64)] = &[
    ("link", "baud_rate", 1_200, 921_600),
    ("ingest", "push_timeout_ms", 1, 60_000),
    ("scheduler", "pop_timeout_ms", 1, 60_000),
    ("scheduler", "idle_poll_ms", 1, 3_600_000),
    ("clock", "boot_unix_time", 0, 4_102_444_800),
];

const SECTIONS: &[&str] = &["link", "ingest", "scheduler", "clock"];

const SHORT_MONTH_POLICIES: &[&str] = &["legacy", "clear-trailing"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validate device.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a device.toml configuration file.           ║\n\
            ║  Please create one in the muezzin-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_integers(&config, &mut errors);
    validate_policy(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only known sections, and only tables
///
/// The on-device parser rejects unknown sections, so catch them here first.
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("device.toml must be a table".to_string());
        return;
    };

    for (name, value) in root {
        if !SECTIONS.contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

fn validate_integers(config: &toml::Value, errors: &mut Vec<String>) {
    for &(section, key, min, max) in INTEGER_KEYS {
        let Some(value) = config.get(section).and_then(|s| s.get(key)) else {
            continue;
        };
        match value {
            toml::Value::Integer(n) if (min..=max).contains(n) => {}
            toml::Value::Integer(_) => {
                errors.push(format!("[{}] {} must be {}-{}", section, key, min, max))
            }
            _ => errors.push(format!("[{}] {} must be an integer", section, key)),
        }
    }
}

fn validate_policy(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(value) = config.get("ingest").and_then(|s| s.get("short_month_policy")) else {
        return;
    };
    match value {
        toml::Value::String(policy) if SHORT_MONTH_POLICIES.contains(&policy.as_str()) => {}
        _ => errors.push(
            "[ingest] short_month_policy must be 'legacy' or 'clear-trailing'".to_string(),
        ),
    }
}
