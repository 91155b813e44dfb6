//! Peripheral drivers, generic over `embedded-hal` where the bus allows.

pub mod aht20;
pub mod button;
pub mod char_lcd;
pub mod indicator_led;
pub mod serial_reporter;
pub mod task_pin;
