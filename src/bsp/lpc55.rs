// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GPIO backend for the NXP LPC55.
//!
//! Pin electrical setup lives in IOCON, one word per pin; direction and level
//! live in the GPIO block's per-port SET/CLR/DIRSET registers.

use core::convert::Infallible;

use crate::gpio::{Gpio, Level, OutputConfig, OutputMode, PinMask, Pull, Speed};

/// Pins per port.
pub const PORT_WIDTH: u8 = 32;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Port {
    Pio0 = 0,
    Pio1 = 1,
}

// IOCON PIOn_m word layout (UM11126 chapter 15). FUNC = 0 selects GPIO.
const IOCON_MODE_SHIFT: u32 = 4;
const IOCON_SLEW_FAST: u32 = 1 << 6;
const IOCON_DIGIMODE: u32 = 1 << 8;
const IOCON_OD: u32 = 1 << 9;

/// IOCON word for a digital GPIO with `config`. The LPC55 only has two slew
/// rates, so anything from `High` up gets the fast one.
fn iocon_word(config: OutputConfig) -> u32 {
    let mode = match config.pull {
        Pull::None => 0b00,
        Pull::Down => 0b01,
        Pull::Up => 0b10,
    };
    let slew = if config.speed >= Speed::High {
        IOCON_SLEW_FAST
    } else {
        0
    };
    let od = match config.mode {
        OutputMode::PushPull => 0,
        OutputMode::OpenDrain => IOCON_OD,
    };
    mode << IOCON_MODE_SHIFT | slew | IOCON_DIGIMODE | od
}

/// Word index of PIO`port`_`pin` within IOCON.
fn iocon_index(port: Port, pin: u8) -> usize {
    usize::from(port as u8) * usize::from(PORT_WIDTH) + usize::from(pin)
}

pub struct Lpc55Gpio {
    gpio: lpc55_pac::GPIO,
    iocon: lpc55_pac::IOCON,
}

impl Lpc55Gpio {
    /// The IOCON and GPIO clocks must already be on; see
    /// `lpc55xpresso::Board::gpio`.
    pub fn new(gpio: lpc55_pac::GPIO, iocon: lpc55_pac::IOCON) -> Self {
        Self { gpio, iocon }
    }

    pub fn free(self) -> (lpc55_pac::GPIO, lpc55_pac::IOCON) {
        (self.gpio, self.iocon)
    }
}

impl Gpio for Lpc55Gpio {
    type Port = Port;
    type Error = Infallible;

    fn configure(&mut self, port: Port, mask: PinMask, config: OutputConfig) -> Result<(), Infallible> {
        // The PAC gives every PIO register its own type, so there's no way to
        // index them; treat the block as the array of words it is.
        let base = lpc55_pac::IOCON::ptr() as *mut u32;
        let word = iocon_word(config);
        for pin in mask.pins() {
            // Safety: we own IOCON (`self.iocon`), and `iocon_index` stays
            // within the 64 PIO words at the start of the block.
            unsafe {
                core::ptr::write_volatile(base.add(iocon_index(port, pin)), word);
            }
        }

        let port = usize::from(port as u8);
        self.gpio.dirset[port].write(|w| unsafe { w.bits(mask.0) });
        Ok(())
    }

    fn write(&mut self, port: Port, pin: u8, level: Level) -> Result<(), Infallible> {
        let port = usize::from(port as u8);
        match level {
            Level::High => self.gpio.set[port].write(|w| unsafe { w.bits(1 << pin) }),
            Level::Low => self.gpio.clr[port].write(|w| unsafe { w.bits(1 << pin) }),
        }
        Ok(())
    }

    fn output_level(&mut self, port: Port, pin: u8) -> Result<Level, Infallible> {
        // Reading SET returns the output latch.
        let latch = self.gpio.set[usize::from(port as u8)].read().bits();
        Ok(Level::from(latch & 1 << pin != 0))
    }
}
