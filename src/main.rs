//! Thermostat Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Aht20 · CharLcd · IndicatorLed×2 · SerialReporter(UartLink)   │
//! │        └──────────── HardwareAdapter ────────────┘             │
//! │  SystemClock · StdDelay · LogEventSink · ButtonPanel           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  ScheduleLoop ── ThermostatController (pure logic)     │    │
//! │  │                  ModeMachine · SetPoint · decide()     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result, anyhow};
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, InterruptType, Output, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, config::TimerConfig};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use thermostat::adapters::hardware::HardwareAdapter;
use thermostat::adapters::log_sink::LogEventSink;
use thermostat::adapters::time::{StdDelay, SystemClock, uptime_ms};
use thermostat::adapters::uart::UartLink;
use thermostat::config::ThermostatConfig;
use thermostat::drivers::aht20::Aht20;
use thermostat::drivers::button::{ButtonDriver, ButtonId, ButtonPanel, PressLatch};
use thermostat::drivers::char_lcd::{CharLcd, LcdPins};
use thermostat::drivers::indicator_led::IndicatorLed;
use thermostat::drivers::serial_reporter::SerialReporter;
use thermostat::events::ControllerHandle;
use thermostat::pins;
use thermostat::scheduler::ScheduleLoop;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Thermostat v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = ThermostatConfig::default();
    config.validate().map_err(|e| anyhow!("config: {e}"))?;
    let p = Peripherals::take().context("peripherals already taken")?;

    // ── 2. Temperature sensor (I²C0) ──────────────────────────
    // SAFETY: pin numbers come from `pins` and are used exactly once.
    let (sda, scl) = unsafe {
        (
            AnyIOPin::new(pins::I2C_SDA_GPIO),
            AnyIOPin::new(pins::I2C_SCL_GPIO),
        )
    };
    let i2c = I2cDriver::new(
        p.i2c0,
        sda,
        scl,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let sensor = Aht20::new(i2c, Ets).map_err(|e| anyhow!("AHT20 init: {e}"))?;

    // ── 3. Indicators (LEDC) ──────────────────────────────────
    let timer = LedcTimerDriver::new(
        p.ledc.timer0,
        &TimerConfig::default().frequency(Hertz(pins::INDICATOR_PWM_HZ)),
    )?;
    // SAFETY: see above.
    let (heat_pin, cool_pin) = unsafe {
        (
            AnyOutputPin::new(pins::HEAT_LED_GPIO),
            AnyOutputPin::new(pins::COOL_LED_GPIO),
        )
    };
    let heat = IndicatorLed::new(
        LedcDriver::new(p.ledc.channel0, &timer, heat_pin)?,
        "heat",
        config.pulse_period_ms,
    );
    let cool = IndicatorLed::new(
        LedcDriver::new(p.ledc.channel1, &timer, cool_pin)?,
        "cool",
        config.pulse_period_ms,
    );

    // ── 4. Character LCD ──────────────────────────────────────
    let out = |gpio: i32| -> Result<PinDriver<'static, AnyOutputPin, Output>> {
        // SAFETY: see above.
        Ok(PinDriver::output(unsafe { AnyOutputPin::new(gpio) })?)
    };
    let lcd_pins = LcdPins {
        rs: out(pins::LCD_RS_GPIO)?,
        en: out(pins::LCD_EN_GPIO)?,
        d4: out(pins::LCD_D4_GPIO)?,
        d5: out(pins::LCD_D5_GPIO)?,
        d6: out(pins::LCD_D6_GPIO)?,
        d7: out(pins::LCD_D7_GPIO)?,
    };
    let lcd = CharLcd::new(lcd_pins, Ets, config.display_columns as usize)
        .map_err(|e| anyhow!("LCD init: {e}"))?;

    // ── 5. Serial monitor (UART1) ─────────────────────────────
    // SAFETY: see above.
    let (tx, rx) = unsafe {
        (
            AnyIOPin::new(pins::UART_TX_GPIO),
            AnyIOPin::new(pins::UART_RX_GPIO),
        )
    };
    let uart = UartDriver::new(
        p.uart1,
        tx,
        rx,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(pins::UART_BAUD)),
    )?;
    let reporter = SerialReporter::new(UartLink::new(uart, config.report_timeout_ms));

    // ── 6. Schedule loop ──────────────────────────────────────
    let hw = HardwareAdapter::new(sensor, heat, cool, lcd, reporter);
    let (handle, worker) =
        ScheduleLoop::new(&config, hw, SystemClock, StdDelay, LogEventSink::new())
            .and_then(ScheduleLoop::spawn)
            .map_err(|e| anyhow!("schedule loop: {e}"))?;

    // ── 7. Buttons ────────────────────────────────────────────
    let mut panel = ButtonPanel::new(config.input_poll_interval_ms);
    for (id, gpio) in [
        (ButtonId::Cycle, pins::CYCLE_BUTTON_GPIO),
        (ButtonId::Raise, pins::RAISE_BUTTON_GPIO),
        (ButtonId::Lower, pins::LOWER_BUTTON_GPIO),
    ] {
        register_button(&mut panel, id, gpio, &handle, config.button_debounce_ms)?;
    }
    let (_panel_stop, _panel_thread) = panel
        .spawn()
        .map_err(|e| anyhow!("button panel: {e}"))?;

    info!("Thermostat running");

    // ── 8. Block until the loop halts ─────────────────────────
    match worker.join() {
        Ok(Ok(())) => info!("Schedule loop stopped"),
        Ok(Err(e)) => error!("Schedule loop failed: {}", e),
        Err(_) => error!("Schedule loop panicked"),
    }
    warn!("Restarting");
    esp_idf_hal::reset::restart();
}

/// Wire one button: ISR stores the press time, the panel turns it into an
/// input event.
fn register_button(
    panel: &mut ButtonPanel,
    id: ButtonId,
    gpio: i32,
    handle: &ControllerHandle,
    debounce_ms: u32,
) -> Result<()> {
    // SAFETY: pin numbers come from `pins` and are used exactly once.
    let mut pin = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
    pin.set_pull(Pull::Up)?;
    pin.set_interrupt_type(InterruptType::NegEdge)?;

    let latch = PressLatch::new();
    let isr_latch = latch.clone();
    // SAFETY: the callback only performs an atomic store and reads the
    // ISR-safe high-resolution timer.
    unsafe {
        pin.subscribe(move || isr_latch.record(uptime_ms()))?;
    }
    pin.enable_interrupt()?;

    let handle = handle.clone();
    panel.register(ButtonDriver::new(id, latch, debounce_ms), move || {
        // A full queue is logged by the handle; the press is dropped.
        let _ = match id {
            ButtonId::Cycle => handle.cycle_mode(),
            ButtonId::Raise => handle.raise_set_point(),
            ButtonId::Lower => handle.lower_set_point(),
        };
    });
    panel.after_poll(move || {
        if let Err(e) = pin.enable_interrupt() {
            warn!("{:?}: re-arm failed: {}", id, e);
        }
    });
    Ok(())
}
