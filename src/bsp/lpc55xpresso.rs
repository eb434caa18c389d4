// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// LPCXpresso55S69 eval board.
//
// The board has no Type-C connector of its own, so the SBU lines are two
// otherwise unused port 1 pins, meant to be jumpered to the device under test:
//
// - SBU1 => PIO1_8
// - SBU2 => PIO1_10
//
// Stay clear of PIO1_4/6/7 (RGB LED) and PIO1_9 (USER button).

use static_assertions::const_assert;

use super::lpc55::{Lpc55Gpio, Port, PORT_WIDTH};
use super::Bsp;
use crate::sbu::SbuPins;

pub struct Board;

impl Bsp for Board {
    type Gpio = Lpc55Gpio;

    const SBU: SbuPins<Port> = SbuPins::new(Port::Pio1, 8, 10);

    unsafe fn gpio() -> Lpc55Gpio {
        let p = lpc55_pac::Peripherals::steal();

        // IOCON and GPIO come out of reset gated.
        p.SYSCON.ahbclkctrl0.modify(|_, w| {
            w.iocon().enable();
            w.gpio0().enable();
            w.gpio1().enable();
            w
        });

        Lpc55Gpio::new(p.GPIO, p.IOCON)
    }

    fn indicate_fault() {
        // Safety: the GPIO peripheral is static, and by the time anyone is
        // indicating a fault we're done caring who else owns it.
        let gpio = unsafe { &*lpc55_pac::GPIO::ptr() };

        // The red LED is active low and connected to PIO1_6. We can activate it
        // by flipping the pin direction, exploiting the fact that pins will
        // default to low if not overridden.
        gpio.dirset[1].write(|w| unsafe { w.bits(1 << 6) });
    }
}

const_assert!(<Board as Bsp>::SBU.is_valid(PORT_WIDTH));
