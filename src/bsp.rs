// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Types and hooks for implementing Board Support Packages (BSPs).
//!
//! A BSP says three things: which GPIO block the board's MCU has, where the
//! SBU lines are wired, and what it takes to bring that GPIO block out of
//! reset. The exact properties are in the `Bsp` trait below.
//!
//! To implement a BSP:
//!
//! 1. Create a module within `bsp` named after your board.
//! 2. Define a type in the module called `Board`. This type will never be
//!    instantiated, so it can be arbitrary; an empty enum is easy.
//! 3. Implement `bsp::Bsp` for your `Board` type, and check the wiring with
//!    `const_assert!(Board::SBU.is_valid(..))`.
//! 4. Add a `target-board-*` feature to `Cargo.toml` and a memory map for it
//!    to `build.rs`.
//! 5. Add a branch to the `cfg_if` in `src/bin/sbu_tests.rs` to detect your
//!    board and select the right `Board` type.

// Boards whose GPIO backend needs no extra crates are always compiled, which
// keeps them building on the host too. The LPC55 ones need the PAC, which
// only comes along with its board feature.
pub mod stm32f4;
pub mod trezor_t;

#[cfg(feature = "target-board-lpc55xpresso")]
pub mod lpc55;
#[cfg(feature = "target-board-lpc55xpresso")]
pub mod lpc55xpresso;

use crate::gpio::Gpio;
use crate::sbu::SbuPins;

/// Requirements placed upon a BSP type.
pub trait Bsp {
    /// GPIO backend for the board's MCU.
    type Gpio: Gpio;

    /// Where SBU1 and SBU2 are wired.
    const SBU: SbuPins<<Self::Gpio as Gpio>::Port>;

    /// Turns on whatever clocks the SBU port needs and hands out the GPIO
    /// backend.
    ///
    /// # Safety
    ///
    /// This conjures ownership of the GPIO peripheral. Call it once, and don't
    /// touch the same port through any other path afterwards.
    unsafe fn gpio() -> Self::Gpio;

    /// Indicate a fault. Most boards with SBU lines have nothing to blink, so
    /// by default this does nothing.
    fn indicate_fault() {}
}
