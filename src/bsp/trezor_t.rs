// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BSP for the Trezor Model T (STM32F427).
//!
//! USB-C connector SBU lines:
//! - SBU1 => PA2
//! - SBU2 => PA3
//!
//! There are no spare LEDs, so faults are not indicated.

use static_assertions::const_assert;

use super::stm32f4::{Port, Stm32f4Gpio, PORT_WIDTH};
use super::Bsp;
use crate::sbu::SbuPins;

pub struct Board;

impl Bsp for Board {
    type Gpio = Stm32f4Gpio;

    const SBU: SbuPins<Port> = SbuPins::new(Port::A, 2, 3);

    unsafe fn gpio() -> Stm32f4Gpio {
        let mut gpio = Stm32f4Gpio::steal();
        gpio.enable_clock(Self::SBU.port);
        gpio
    }
}

const_assert!(<Board as Bsp>::SBU.is_valid(PORT_WIDTH));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::PinMask;

    #[test]
    fn wiring() {
        assert_eq!(Board::SBU.port, Port::A);
        assert_eq!(Board::SBU.mask(), PinMask(0b1100));
    }
}
