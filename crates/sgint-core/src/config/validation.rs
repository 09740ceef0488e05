//! Settings validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Settings;

/// Validate settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    debug!("validating settings");
    validate_build(settings)?;
    validate_export(settings)?;
    Ok(())
}

fn validate_build(settings: &Settings) -> Result<()> {
    let valid_modes = ["debug", "release"];
    if !valid_modes.contains(&settings.build.mode.as_str()) {
        return Err(ConfigError::InvalidValue {
            field: "build.mode".to_string(),
            message: format!("must be one of: {}", valid_modes.join(", ")),
        }
        .into());
    }

    if settings.build.desktop_targets.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "build.desktop_targets".to_string(),
            message: "at least one target triple is required".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_export(settings: &Settings) -> Result<()> {
    let presets = [
        ("export.macos_preset", &settings.export.macos_preset),
        ("export.ios_preset", &settings.export.ios_preset),
        ("export.ios_simulator_preset", &settings.export.ios_simulator_preset),
        (
            "export.simulator_rendering_method",
            &settings.export.simulator_rendering_method,
        ),
    ];

    for (field, value) in presets {
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: "cannot be empty".to_string(),
            }
            .into());
        }
    }

    Ok(())
}
