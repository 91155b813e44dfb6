//! HD44780-compatible character LCD in 4-bit mode.
//!
//! Six GPIO lines: RS, EN and D4–D7.  R/W is strapped low, so the busy
//! flag cannot be read and every command is followed by a fixed wait.
//!
//! ```text
//!   DDRAM  0x00 ──────────────── 0x0F   line 1
//!          0x40 ──────────────── 0x4F   line 2
//! ```
//!
//! Lines longer than the panel are truncated; shorter ones are padded with
//! spaces so stale characters from the previous frame disappear.  Non-ASCII
//! characters are shown as `?`.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::info;

use crate::app::ports::DisplayPort;
use crate::error::DisplayError;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const LINE_OFFSETS: [u8; 2] = [0x00, 0x40];

const POWER_ON_MS: u32 = 50;
const CLEAR_US: u32 = 2_000;
const COMMAND_US: u32 = 50;

/// The six control and data lines.
pub struct LcdPins<P> {
    pub rs: P,
    pub en: P,
    pub d4: P,
    pub d5: P,
    pub d6: P,
    pub d7: P,
}

pub struct CharLcd<P, D> {
    pins: LcdPins<P>,
    delay: D,
    columns: usize,
    released: bool,
}

impl<P: OutputPin, D: DelayNs> CharLcd<P, D> {
    /// Run the 4-bit initialisation sequence and blank the panel.
    pub fn new(pins: LcdPins<P>, delay: D, columns: usize) -> Result<Self, DisplayError> {
        let mut lcd = Self {
            pins,
            delay,
            columns,
            released: false,
        };
        lcd.init()?;
        info!("LCD ready ({} columns)", columns);
        Ok(lcd)
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(POWER_ON_MS);
        self.pins.rs.set_low().map_err(|_| DisplayError::Pin)?;
        self.pins.en.set_low().map_err(|_| DisplayError::Pin)?;

        // Force 8-bit mode three times, then drop to 4-bit.
        self.write_nibble(0x03)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x03)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x03)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_ENTRY_MODE_INC)?;
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_US);
        Ok(())
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn write_line(&mut self, row: usize, text: &str) -> Result<(), DisplayError> {
        self.command(CMD_SET_DDRAM | LINE_OFFSETS[row])?;
        let mut chars = text.chars();
        for _ in 0..self.columns {
            let byte = match chars.next() {
                Some(c) if c.is_ascii() && !c.is_ascii_control() => c as u8,
                Some(_) => b'?',
                None => b' ',
            };
            self.data(byte)?;
        }
        Ok(())
    }

    fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.pins.rs.set_low().map_err(|_| DisplayError::Pin)?;
        self.write_byte(byte)
    }

    fn data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.pins.rs.set_high().map_err(|_| DisplayError::Pin)?;
        self.write_byte(byte)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)?;
        self.delay.delay_us(COMMAND_US);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        let LcdPins { d4, d5, d6, d7, en, .. } = &mut self.pins;
        for (bit, pin) in [d4, d5, d6, d7].into_iter().enumerate() {
            pin.set_state(((nibble >> bit) & 1 == 1).into())
                .map_err(|_| DisplayError::Pin)?;
        }
        en.set_high().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_us(1);
        en.set_low().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_us(1);
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), DisplayError> {
        if self.released {
            Err(DisplayError::Released)
        } else {
            Ok(())
        }
    }
}

impl<P: OutputPin, D: DelayNs> DisplayPort for CharLcd<P, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_active()?;
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_US);
        Ok(())
    }

    fn write_lines(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        self.ensure_active()?;
        self.write_line(0, line1)?;
        self.write_line(1, line2)
    }

    /// Drive every line low.  Idempotent.
    fn release(&mut self) -> Result<(), DisplayError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        let LcdPins { rs, en, d4, d5, d6, d7 } = &mut self.pins;
        for pin in [rs, en, d4, d5, d6, d7] {
            pin.set_low().map_err(|_| DisplayError::Pin)?;
        }
        info!("LCD released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Shared view of all six line levels plus the nibbles latched on each
    /// falling edge of EN.
    #[derive(Default)]
    struct Bus {
        levels: [bool; 6],
        latched: Vec<(bool, u8)>,
    }

    const RS: usize = 0;
    const EN: usize = 1;

    struct Pin {
        index: usize,
        bus: Rc<RefCell<Bus>>,
    }

    impl ErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            let mut bus = self.bus.borrow_mut();
            if self.index == EN && bus.levels[EN] {
                let nibble = (0..4).fold(0u8, |acc, b| acc | (u8::from(bus.levels[2 + b]) << b));
                let rs = bus.levels[RS];
                bus.latched.push((rs, nibble));
            }
            bus.levels[self.index] = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.bus.borrow_mut().levels[self.index] = true;
            Ok(())
        }
    }

    fn lcd() -> (CharLcd<Pin, NoDelay>, Rc<RefCell<Bus>>) {
        let bus = Rc::new(RefCell::new(Bus::default()));
        let pin = |index| Pin { index, bus: bus.clone() };
        let pins = LcdPins {
            rs: pin(0),
            en: pin(1),
            d4: pin(2),
            d5: pin(3),
            d6: pin(4),
            d7: pin(5),
        };
        let lcd = CharLcd::new(pins, NoDelay, 16).unwrap();
        bus.borrow_mut().latched.clear();
        (lcd, bus)
    }

    /// Pair up latched nibbles into (is_data, byte).
    fn bytes(bus: &Bus) -> Vec<(bool, u8)> {
        bus.latched
            .chunks(2)
            .map(|pair| (pair[0].0, (pair[0].1 << 4) | pair[1].1))
            .collect()
    }

    fn text(bytes: &[(bool, u8)]) -> String {
        bytes.iter().filter(|(d, _)| *d).map(|(_, b)| *b as char).collect()
    }

    #[test]
    fn init_sequence_ends_in_four_bit_mode() {
        let bus = Rc::new(RefCell::new(Bus::default()));
        let pin = |index| Pin { index, bus: bus.clone() };
        let pins = LcdPins { rs: pin(0), en: pin(1), d4: pin(2), d5: pin(3), d6: pin(4), d7: pin(5) };
        let _lcd = CharLcd::new(pins, NoDelay, 16).unwrap();
        let latched = bus.borrow().latched.clone();
        let nibbles: Vec<u8> = latched.iter().take(4).map(|(_, n)| *n).collect();
        assert_eq!(nibbles, vec![0x03, 0x03, 0x03, 0x02]);
        let rest = Bus { levels: [false; 6], latched: latched[4..].to_vec() };
        assert_eq!(
            bytes(&rest),
            vec![
                (false, CMD_FUNCTION_4BIT_2LINE),
                (false, CMD_DISPLAY_ON),
                (false, CMD_ENTRY_MODE_INC),
                (false, CMD_CLEAR),
            ]
        );
    }

    #[test]
    fn writes_both_lines_padded() {
        let (mut lcd, bus) = lcd();
        lcd.write_lines("10/18/2026 09:05", "Temp: 70F").unwrap();
        let b = bytes(&bus.borrow());
        assert_eq!(b[0], (false, CMD_SET_DDRAM));
        assert_eq!(b[17], (false, CMD_SET_DDRAM | 0x40));
        assert_eq!(text(&b), "10/18/2026 09:05Temp: 70F       ");
    }

    #[test]
    fn truncates_to_columns() {
        let (mut lcd, bus) = lcd();
        lcd.write_lines("HEAT SP:72F and then some", "").unwrap();
        let b = bytes(&bus.borrow());
        assert_eq!(&text(&b)[..16], "HEAT SP:72F and ");
    }

    #[test]
    fn non_ascii_is_replaced() {
        let (mut lcd, bus) = lcd();
        lcd.write_lines("21°C", "").unwrap();
        assert!(text(&bytes(&bus.borrow())).starts_with("21?C"));
    }

    #[test]
    fn release_blocks_further_writes() {
        let (mut lcd, bus) = lcd();
        lcd.clear().unwrap();
        lcd.release().unwrap();
        assert!(lcd.is_released());
        assert_eq!(bus.borrow().levels, [false; 6]);
        assert_eq!(lcd.write_lines("a", "b"), Err(DisplayError::Released));
        assert_eq!(lcd.clear(), Err(DisplayError::Released));
        assert_eq!(lcd.release(), Ok(()));
    }
}
