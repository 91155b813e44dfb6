//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                     | Connects to              |
//! |------------|--------------------------------|--------------------------|
//! | `hardware` | Sensor/Indicator/Display/Report| drivers bundle           |
//! | `log_sink` | EventSink                      | `log` output             |
//! | `sim`      | SensorPort, DisplayPort, PWM   | host console             |
//! | `time`     | ClockPort, DelayNs             | system clock / timer     |
//! | `uart`     | `io::Write`                    | ESP-IDF UART driver      |

pub mod hardware;
pub mod log_sink;
pub mod sim;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
