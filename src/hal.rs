// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runs the SBU driver on top of an `embedded-hal` implementation.
//!
//! Type-state HALs hand out pins that are already outputs, so there is nothing
//! left for `configure` to do beyond checking the mask; electrical settings
//! (speed, pull) have to be chosen when the HAL pins are built.

use embedded_hal::digital::{ErrorKind, StatefulOutputPin};

use crate::gpio::{Gpio, Level, OutputConfig, PinMask};
use crate::sbu::{Sbu, SbuPins};

#[derive(Debug, thiserror::Error)]
pub enum PinError<E: core::fmt::Debug> {
    #[error("pin driver failed: {0:?}")]
    Pin(E),
    #[error("pin {0} is not an SBU line")]
    Unmapped(u8),
}

impl<E: embedded_hal::digital::Error> embedded_hal::digital::Error for PinError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            PinError::Pin(e) => e.kind(),
            PinError::Unmapped(_) => ErrorKind::Other,
        }
    }
}

/// Two HAL output pins presented as a one-port `Gpio`. Pin 0 is SBU1, pin 1
/// is SBU2.
pub struct HalPins<P1, P2> {
    sbu1: P1,
    sbu2: P2,
}

impl<P1, P2, E> HalPins<P1, P2>
where
    P1: StatefulOutputPin<Error = E>,
    P2: StatefulOutputPin<Error = E>,
    E: core::fmt::Debug,
{
    pub const SBU: SbuPins<()> = SbuPins::new((), 0, 1);

    pub fn new(sbu1: P1, sbu2: P2) -> Self {
        Self { sbu1, sbu2 }
    }

    /// Shorthand for `Sbu::init(HalPins::new(sbu1, sbu2), HalPins::SBU)`.
    pub fn into_sbu(self) -> Result<Sbu<Self>, PinError<E>> {
        Sbu::init(self, Self::SBU)
    }

    pub fn into_inner(self) -> (P1, P2) {
        (self.sbu1, self.sbu2)
    }
}

impl<P1, P2, E> Gpio for HalPins<P1, P2>
where
    P1: StatefulOutputPin<Error = E>,
    P2: StatefulOutputPin<Error = E>,
    E: core::fmt::Debug,
{
    type Port = ();
    type Error = PinError<E>;

    fn configure(&mut self, _port: (), mask: PinMask, _config: OutputConfig) -> Result<(), Self::Error> {
        match mask.pins().find(|&pin| pin > 1) {
            Some(pin) => Err(PinError::Unmapped(pin)),
            None => Ok(()),
        }
    }

    fn write(&mut self, _port: (), pin: u8, level: Level) -> Result<(), Self::Error> {
        let state = bool::from(level).into();
        let result = match pin {
            0 => self.sbu1.set_state(state),
            1 => self.sbu2.set_state(state),
            _ => return Err(PinError::Unmapped(pin)),
        };
        result.map_err(PinError::Pin)
    }

    fn output_level(&mut self, _port: (), pin: u8) -> Result<Level, Self::Error> {
        let high = match pin {
            0 => self.sbu1.is_set_high(),
            1 => self.sbu2.is_set_high(),
            _ => return Err(PinError::Unmapped(pin)),
        };
        high.map(Level::from).map_err(PinError::Pin)
    }
}
