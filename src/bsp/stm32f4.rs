// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GPIO backend for STM32F4 parts, straight at the registers.
//!
//! Every port on the F4 has the same layout, one 0x400-byte block apiece
//! starting at 0x4002_0000, so a port is just an index.

use core::convert::Infallible;
use core::ptr::{read_volatile, write_volatile};

use crate::gpio::{Gpio, Level, OutputConfig, OutputMode, PinMask, Pull, Speed};

/// Pins per port.
pub const PORT_WIDTH: u8 = 16;

const GPIO_BASE: usize = 0x4002_0000;
const PORT_STRIDE: usize = 0x400;

// Register offsets within a port block (RM0090 section 8.4).
const MODER: usize = 0x00;
const OTYPER: usize = 0x04;
const OSPEEDR: usize = 0x08;
const PUPDR: usize = 0x0C;
const ODR: usize = 0x14;
const BSRR: usize = 0x18;

/// RCC AHB1 peripheral clock enable register; bit N gates port N.
const RCC_AHB1ENR: usize = 0x4002_3800 + 0x30;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Port {
    A = 0,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
}

impl Port {
    fn register(self, offset: usize) -> *mut u32 {
        (GPIO_BASE + PORT_STRIDE * self as usize + offset) as *mut u32
    }
}

/// MODER value for a general-purpose output.
const MODE_OUTPUT: u32 = 0b01;

fn otype_bit(mode: OutputMode) -> u32 {
    match mode {
        OutputMode::PushPull => 0,
        OutputMode::OpenDrain => 1,
    }
}

fn ospeed_bits(speed: Speed) -> u32 {
    match speed {
        Speed::Low => 0b00,
        Speed::Medium => 0b01,
        Speed::High => 0b10,
        Speed::VeryHigh => 0b11,
    }
}

fn pupd_bits(pull: Pull) -> u32 {
    match pull {
        Pull::None => 0b00,
        Pull::Up => 0b01,
        Pull::Down => 0b10,
    }
}

/// Replaces the `width`-bit field of every pin in `mask` with `value`.
fn set_fields(reg: u32, mask: PinMask, width: u32, value: u32) -> u32 {
    let field = (1 << width) - 1;
    mask.pins().filter(|&pin| pin < PORT_WIDTH).fold(reg, |reg, pin| {
        let shift = u32::from(pin) * width;
        reg & !(field << shift) | (value & field) << shift
    })
}

/// BSRR word that drives `pin` to `level` without touching its neighbours.
/// The low half sets, the high half resets.
fn bsrr_word(pin: u8, level: Level) -> u32 {
    match level {
        Level::High => 1 << pin,
        Level::Low => 1 << (pin + PORT_WIDTH),
    }
}

/// Register-level GPIO for all ports of an STM32F4.
pub struct Stm32f4Gpio {
    _private: (),
}

impl Stm32f4Gpio {
    /// # Safety
    ///
    /// The caller must be the only code driving the GPIO ports it passes to
    /// this backend, and those ports must be clocked (see `enable_clock`).
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }

    /// Ungates the AHB1 clock for `port`. Register writes to a gated port are
    /// silently dropped.
    pub fn enable_clock(&mut self, port: Port) {
        // Safety: RCC_AHB1ENR is a valid, always-clocked register on every
        // F4, and a read-modify-write of one enable bit can't disturb the
        // others as long as nobody else is racing us on it.
        unsafe {
            modify(RCC_AHB1ENR as *mut u32, |r| r | 1 << port as u32);
        }
        // The RM asks for a dummy read before touching the newly clocked
        // peripheral.
        let _ = unsafe { read_volatile(RCC_AHB1ENR as *const u32) };
    }
}

unsafe fn modify(reg: *mut u32, f: impl FnOnce(u32) -> u32) {
    write_volatile(reg, f(read_volatile(reg)));
}

impl Gpio for Stm32f4Gpio {
    type Port = Port;
    type Error = Infallible;

    fn configure(&mut self, port: Port, mask: PinMask, config: OutputConfig) -> Result<(), Infallible> {
        // Safety: `port.register` only produces addresses inside the port's
        // register block, and `steal` made us the only writer.
        //
        // Same order as ST's HAL: speed and type first so the pin comes up
        // with its final electrical setup when the mode flips to output.
        unsafe {
            modify(port.register(OSPEEDR), |r| set_fields(r, mask, 2, ospeed_bits(config.speed)));
            modify(port.register(OTYPER), |r| set_fields(r, mask, 1, otype_bit(config.mode)));
            modify(port.register(PUPDR), |r| set_fields(r, mask, 2, pupd_bits(config.pull)));
            modify(port.register(MODER), |r| set_fields(r, mask, 2, MODE_OUTPUT));
        }
        Ok(())
    }

    fn write(&mut self, port: Port, pin: u8, level: Level) -> Result<(), Infallible> {
        // Safety: BSRR is write-only and atomic per bit, so no read is needed
        // and other pins on the port are unaffected.
        unsafe {
            write_volatile(port.register(BSRR), bsrr_word(pin, level));
        }
        Ok(())
    }

    fn output_level(&mut self, port: Port, pin: u8) -> Result<Level, Infallible> {
        let odr = unsafe { read_volatile(port.register(ODR)) };
        Ok(Level::from(odr & 1 << pin != 0))
    }
}
