//! System configuration parameters
//!
//! All tunable parameters for the thermostat.  The firmware runs on the
//! defaults; the host simulator can load an override document in JSON.
//! The set-point default is only the power-on value: it is never persisted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatConfig {
    // --- Control ---
    /// Set-point at power-on (degrees Fahrenheit)
    pub default_set_point_f: i32,

    // --- Timing ---
    /// Schedule loop tick period (milliseconds)
    pub tick_interval_ms: u32,
    /// How often queued button input is serviced between ticks (milliseconds)
    pub input_poll_interval_ms: u32,
    /// Ticks at the start of each minor cycle that show the temperature line
    pub temperature_line_ticks: u32,
    /// Length of the display minor cycle; indicators refresh once per cycle
    pub minor_cycle_ticks: u32,
    /// Ticks between serial status reports
    pub report_interval_ticks: u32,

    // --- Indicators ---
    /// Full fade-in/fade-out period of a pulsing indicator (milliseconds)
    pub pulse_period_ms: u32,

    // --- Display ---
    /// Visible characters per LCD line
    pub display_columns: u8,

    // --- Serial ---
    /// Bounded wait for a status line to drain (milliseconds)
    pub report_timeout_ms: u32,

    // --- Input ---
    /// Presses closer together than this are treated as contact bounce
    pub button_debounce_ms: u32,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            // Control
            default_set_point_f: 72,

            // Timing
            tick_interval_ms: 1000, // 1 Hz
            input_poll_interval_ms: 50,
            temperature_line_ticks: 5,
            minor_cycle_ticks: 10,
            report_interval_ticks: 30,

            // Indicators
            pulse_period_ms: 2000,

            // Display
            display_columns: 16,

            // Serial
            report_timeout_ms: 1000,

            // Input
            button_debounce_ms: 50,
        }
    }
}

impl ThermostatConfig {
    /// Parse a JSON document (missing fields take their defaults) and validate it.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(doc).map_err(|e| {
            log::warn!("Config parse error: {}", e);
            ConfigError::Parse
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.input_poll_interval_ms == 0 || self.input_poll_interval_ms > self.tick_interval_ms
        {
            return Err(ConfigError::ValidationFailed(
                "input_poll_interval_ms must be in 1..=tick_interval_ms",
            ));
        }
        if self.minor_cycle_ticks == 0 {
            return Err(ConfigError::ValidationFailed("minor_cycle_ticks must be > 0"));
        }
        if self.temperature_line_ticks >= self.minor_cycle_ticks {
            return Err(ConfigError::ValidationFailed(
                "temperature_line_ticks must be < minor_cycle_ticks",
            ));
        }
        if self.report_interval_ticks == 0 {
            return Err(ConfigError::ValidationFailed("report_interval_ticks must be > 0"));
        }
        if self.pulse_period_ms < 2 {
            return Err(ConfigError::ValidationFailed("pulse_period_ms must be >= 2"));
        }
        if self.display_columns == 0 {
            return Err(ConfigError::ValidationFailed("display_columns must be > 0"));
        }
        if self.report_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("report_timeout_ms must be > 0"));
        }
        Ok(())
    }
}
