//! GPIO / peripheral pin assignments for the thermostat board (ESP32).
//!
//! Single source of truth: the firmware entry point takes peripherals by
//! these numbers rather than hard-coding them.

// ---------------------------------------------------------------------------
// Indicators (LEDC PWM)
// ---------------------------------------------------------------------------

/// Red LED: heat indicator.
pub const HEAT_LED_GPIO: i32 = 18;
/// Blue LED: cool indicator.
pub const COOL_LED_GPIO: i32 = 23;

/// LEDC base frequency for both indicators.
pub const INDICATOR_PWM_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// Buttons (active-low, internal pull-up, falling-edge interrupt)
// ---------------------------------------------------------------------------

/// Green: cycle mode.
pub const CYCLE_BUTTON_GPIO: i32 = 25;
/// Red: raise set-point.
pub const RAISE_BUTTON_GPIO: i32 = 26;
/// Blue: lower set-point.
pub const LOWER_BUTTON_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Character LCD (HD44780, 4-bit)
// ---------------------------------------------------------------------------

pub const LCD_RS_GPIO: i32 = 17;
pub const LCD_EN_GPIO: i32 = 16;
pub const LCD_D4_GPIO: i32 = 5;
pub const LCD_D5_GPIO: i32 = 4;
pub const LCD_D6_GPIO: i32 = 13;
pub const LCD_D7_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// AHT20 (I²C0)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Serial monitor (UART1, 8N1)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 32;
pub const UART_RX_GPIO: i32 = 33;
pub const UART_BAUD: u32 = 115_200;
