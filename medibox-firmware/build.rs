//! Build script for medibox-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time
//! - Generates the `DISPLAY_CONFIG` constant included by main.rs

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest value the XPT2046 12-bit ADC can report
const RAW_MAX: i64 = 4095;

const SUPPORTED_BAUDRATES: &[i64] = &[9_600, 19_200, 38_400, 57_600, 115_200, 230_400, 460_800, 921_600];

fn main() {
    setup_linker();
    let config = load_config();
    let generated = generate_config(&config);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("display_config.rs"), generated).unwrap();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read, parse and validate display.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the medibox-firmware directory.            ║\n\
            ║  An empty file is valid and selects every default.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
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
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
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
    validate_screen(&config, &mut errors);
    validate_touch(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_link(&config, &mut errors);
    validate_confirmation(&config, &mut errors);
    report_errors(&errors);

    println!("cargo:warning=display.toml validated successfully");
    config
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

fn report_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid values in display.toml                           ║\n\
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

/// Integer key in `[section]`, if present
///
/// A present key of the wrong type is recorded as an error.
fn int_key(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    let value = config.get(section)?.get(key)?;
    match value.as_integer() {
        Some(v) => Some(v),
        None => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

fn check_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    let value = int_key(config, section, key, errors)?;
    if value < min || value > max {
        errors.push(format!("[{}] {} = {} (must be {}-{})", section, key, value, min, max));
        return None;
    }
    Some(value)
}

fn validate_screen(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "screen", "width", 1, 480, errors);
    check_range(config, "screen", "height", 1, 480, errors);
}

fn validate_touch(config: &toml::Value, errors: &mut Vec<String>) {
    let left = check_range(config, "touch", "raw_left", 0, RAW_MAX, errors);
    let right = check_range(config, "touch", "raw_right", 0, RAW_MAX, errors);
    let top = check_range(config, "touch", "raw_top", 0, RAW_MAX, errors);
    let bottom = check_range(config, "touch", "raw_bottom", 0, RAW_MAX, errors);

    if let (Some(left), Some(right)) = (left, right) {
        if left == right {
            errors.push("[touch] raw_left and raw_right must differ".to_string());
        }
    }
    if let (Some(top), Some(bottom)) = (top, bottom) {
        if top == bottom {
            errors.push("[touch] raw_top and raw_bottom must differ".to_string());
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "timing", "loop_interval_ms", 1, 1_000, errors);
    check_range(config, "timing", "debounce_ms", 0, 2_000, errors);
}

fn validate_link(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(mode) = config.get("link").and_then(|link| link.get("mode")) {
        match mode.as_str() {
            Some("framed") | Some("lines") => {}
            _ => errors.push("[link] mode must be \"framed\" or \"lines\"".to_string()),
        }
    }
    if let Some(baudrate) = int_key(config, "link", "baudrate", errors) {
        if !SUPPORTED_BAUDRATES.contains(&baudrate) {
            errors.push(format!("[link] baudrate {} is not a standard rate", baudrate));
        }
    }
}

fn validate_confirmation(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "confirmation", "default_timeout_s", 1, 3_600, errors);
}

/// Emit `field: value,` for every key present in `[section]`
fn present_fields(config: &toml::Value, section: &str, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| {
            let value = config.get(section)?.get(*key)?.as_integer()?;
            Some(format!("{}: {}, ", key, value))
        })
        .collect()
}

/// Generate the config constant
///
/// Keys missing from display.toml take their value from the matching
/// `DEFAULT` constant via struct update syntax.
fn generate_config(config: &toml::Value) -> String {
    let screen = present_fields(config, "screen", &["width", "height"]);
    let touch = present_fields(
        config,
        "touch",
        &["raw_left", "raw_right", "raw_top", "raw_bottom"],
    );
    let timing = present_fields(config, "timing", &["loop_interval_ms", "debounce_ms"]);

    let mut link = present_fields(config, "link", &["baudrate"]);
    if let Some(mode) = config
        .get("link")
        .and_then(|l| l.get("mode"))
        .and_then(|m| m.as_str())
    {
        let variant = if mode == "lines" { "Lines" } else { "Framed" };
        link.push_str(&format!("mode: LinkMode::{}, ", variant));
    }

    let timeout = config
        .get("confirmation")
        .and_then(|c| c.get("default_timeout_s"))
        .and_then(|v| v.as_integer())
        .map(|v| format!("    default_confirmation_timeout_s: {},\n", v))
        .unwrap_or_default();

    format!(
        "// Generated by build.rs from display.toml\n\
        pub const DISPLAY_CONFIG: DisplayConfig = DisplayConfig {{\n    \
            screen: ScreenGeometry {{ {screen}..ScreenGeometry::DEFAULT }},\n    \
            touch: TouchCalibration {{ {touch}..TouchCalibration::DEFAULT }},\n    \
            timing: Timing {{ {timing}..Timing::DEFAULT }},\n    \
            link: LinkConfig {{ {link}..LinkConfig::DEFAULT }},\n\
        {timeout}    \
            ..DisplayConfig::DEFAULT\n\
        }};\n"
    )
}
