//! Build script for codex-controller
//!
//! Validates rig.toml at compile time. The file is embedded into the binary
//! as the default configuration, so a broken file should fail the build
//! rather than the first run on the rig.

use std::fs;
use std::path::Path;

fn main() {
    validate_config();
}

/// Validate rig.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=rig.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("rig.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: rig.toml not found!                                      ║\n\
            ║                                                                  ║\n\
            ║  The controller embeds rig.toml as its default configuration.    ║\n\
            ║  Please create one in the codex-controller directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read rig.toml                                  ║\n\
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
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in rig.toml                          ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_positive(&config, "descent", "step_mm", &mut errors);
    validate_positive(&config, "descent", "max_travel_mm", &mut errors);
    validate_positive(&config, "routing", "tile_step_mm", &mut errors);
    validate_labels(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in rig.toml                        ║\n\
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

    println!("cargo:warning=rig.toml validated successfully");
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

/// Numeric key, if present, must be a positive number
fn validate_positive(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) {
    let value = match config.get(section).and_then(|s| s.get(key)) {
        Some(v) => v,
        None => return,
    };

    let number = match value {
        toml::Value::Float(f) => *f,
        toml::Value::Integer(i) => *i as f64,
        _ => {
            errors.push(format!("[{}] {} must be a number", section, key));
            return;
        }
    };

    if number.is_nan() || number <= 0.0 {
        errors.push(format!("[{}] {} must be positive", section, key));
    }
}

/// Special labels must be a list of strings
fn validate_labels(config: &toml::Value, errors: &mut Vec<String>) {
    let labels = match config.get("routing").and_then(|r| r.get("special_labels")) {
        Some(toml::Value::Array(a)) => a,
        Some(_) => {
            errors.push("[routing] special_labels must be a list".to_string());
            return;
        }
        None => return,
    };

    for label in labels {
        if label.as_str().is_none() {
            errors.push("[routing] special_labels entries must be strings".to_string());
        }
    }
}
