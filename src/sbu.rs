// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Driver for the two USB Type-C sideband-use (SBU) lines.
//!
//! The driver keeps no copy of the pin levels; the output latch in the GPIO
//! peripheral is the only state. All it holds is the GPIO handle and where the
//! lines are wired.

use crate::gpio::{Gpio, Level, OutputConfig, PinMask};

/// Board wiring of the SBU lines: both on one port.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SbuPins<P> {
    pub port: P,
    pub sbu1: u8,
    pub sbu2: u8,
}

impl<P> SbuPins<P> {
    pub const fn new(port: P, sbu1: u8, sbu2: u8) -> Self {
        Self { port, sbu1, sbu2 }
    }

    pub const fn mask(&self) -> PinMask {
        PinMask::pin(self.sbu1).with(self.sbu2)
    }

    /// Wiring sanity check, usable in `const` context: two distinct pins that
    /// fit in a port of `width` pins.
    pub const fn is_valid(&self, width: u8) -> bool {
        self.sbu1 != self.sbu2 && self.sbu1 < width && self.sbu2 < width
    }
}

/// An initialized pair of SBU outputs.
///
/// The only way to get one is `Sbu::init`, so the lines are always configured
/// by the time `set` can be called.
pub struct Sbu<G: Gpio> {
    gpio: G,
    pins: SbuPins<G::Port>,
}

impl<G: Gpio> Sbu<G> {
    /// Configures both lines as push-pull outputs with no pull and the
    /// fastest edges the part offers, then drives both low.
    ///
    /// This should happen once per boot. It takes the GPIO handle by value;
    /// use `release` to get it back.
    pub fn init(mut gpio: G, pins: SbuPins<G::Port>) -> Result<Self, G::Error> {
        gpio.configure(pins.port, pins.mask(), OutputConfig::SBU)?;
        gpio.write(pins.port, pins.sbu1, Level::Low)?;
        gpio.write(pins.port, pins.sbu2, Level::Low)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("sbu: init, pins {} and {} low", pins.sbu1, pins.sbu2);

        Ok(Self { gpio, pins })
    }

    /// Drives SBU1 high if `sbu1` is set and low otherwise, then does the same
    /// for SBU2. Both lines are written on every call, whatever they were
    /// before.
    ///
    /// If writing SBU1 fails, SBU2 is left alone.
    pub fn set(&mut self, sbu1: bool, sbu2: bool) -> Result<(), G::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("sbu: set {} {}", sbu1, sbu2);

        let SbuPins { port, sbu1: pin1, sbu2: pin2 } = self.pins;
        self.gpio.write(port, pin1, Level::from(sbu1))?;
        self.gpio.write(port, pin2, Level::from(sbu2))
    }

    /// Levels currently commanded on (SBU1, SBU2).
    pub fn levels(&mut self) -> Result<(Level, Level), G::Error> {
        let SbuPins { port, sbu1, sbu2 } = self.pins;
        Ok((
            self.gpio.output_level(port, sbu1)?,
            self.gpio.output_level(port, sbu2)?,
        ))
    }

    pub fn pins(&self) -> SbuPins<G::Port> {
        self.pins
    }

    /// Gives back the GPIO handle. The lines stay configured and keep
    /// driving whatever they were last set to.
    pub fn release(self) -> G {
        self.gpio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::mock::{MockGpio, Op};
    use rstest::rstest;

    const PINS: SbuPins<u8> = SbuPins::new(0, 2, 3);

    fn ok<T>(r: Result<T, core::convert::Infallible>) -> T {
        match r {
            Ok(v) => v,
            Err(e) => match e {},
        }
    }

    fn levels(sbu: &mut Sbu<MockGpio>) -> (bool, bool) {
        let (a, b) = ok(sbu.levels());
        (a.into(), b.into())
    }

    #[test]
    fn init_drives_both_low() {
        let mut sbu = ok(Sbu::init(MockGpio::new(), PINS));
        assert_eq!(levels(&mut sbu), (false, false));
    }

    #[test]
    fn init_configures_once_before_writing() {
        let gpio = ok(Sbu::init(MockGpio::new(), PINS)).release();

        assert_eq!(gpio.op_count, 3);
        assert_eq!(
            gpio.ops[0],
            Some(Op::Configure(0, PinMask(0b1100), OutputConfig::SBU))
        );
        assert_eq!(gpio.ops[1], Some(Op::Write(0, 2, Level::Low)));
        assert_eq!(gpio.ops[2], Some(Op::Write(0, 3, Level::Low)));
        assert_eq!(gpio.config[0][2], Some(OutputConfig::SBU));
        assert_eq!(gpio.config[0][3], Some(OutputConfig::SBU));
        assert_eq!(gpio.config[0][4], None);
    }

    #[test]
    fn init_leaves_other_pins_alone() {
        let gpio = ok(Sbu::init(MockGpio::new(), PINS)).release();
        assert_eq!(gpio.latch[0][1], Level::High);
        assert_eq!(gpio.latch[0][4], Level::High);
        assert_eq!(gpio.latch[1][2], Level::High);
    }

    #[rstest]
    fn set_overwrites_any_prior_state(
        #[values(false, true)] prior1: bool,
        #[values(false, true)] prior2: bool,
        #[values(false, true)] sbu1: bool,
        #[values(false, true)] sbu2: bool,
    ) {
        let mut sbu = ok(Sbu::init(MockGpio::new(), PINS));
        ok(sbu.set(prior1, prior2));

        ok(sbu.set(sbu1, sbu2));
        assert_eq!(levels(&mut sbu), (sbu1, sbu2));
    }

    #[rstest]
    #[case(false, false)]
    #[case(false, true)]
    #[case(true, false)]
    #[case(true, true)]
    fn set_is_idempotent(#[case] sbu1: bool, #[case] sbu2: bool) {
        let mut sbu = ok(Sbu::init(MockGpio::new(), PINS));
        ok(sbu.set(sbu1, sbu2));
        let first = levels(&mut sbu);
        ok(sbu.set(sbu1, sbu2));
        assert_eq!(levels(&mut sbu), first);
    }

    #[test]
    fn sequential_sets_do_not_remember() {
        let mut sbu = ok(Sbu::init(MockGpio::new(), PINS));
        ok(sbu.set(true, false));
        ok(sbu.set(false, true));
        assert_eq!(levels(&mut sbu), (false, true));
    }

    #[test]
    fn all_high_then_all_low() {
        let mut sbu = ok(Sbu::init(MockGpio::new(), PINS));
        ok(sbu.set(true, true));
        assert_eq!(levels(&mut sbu), (true, true));
        ok(sbu.set(false, false));
        assert_eq!(levels(&mut sbu), (false, false));
    }

    #[test]
    fn set_writes_sbu1_first() {
        let mut sbu = ok(Sbu::init(MockGpio::new(), PINS));
        ok(sbu.set(true, false));
        let gpio = sbu.release();
        assert_eq!(gpio.ops[3], Some(Op::Write(0, 2, Level::High)));
        assert_eq!(gpio.ops[4], Some(Op::Write(0, 3, Level::Low)));
    }

    #[test]
    fn wiring_validation() {
        assert!(PINS.is_valid(16));
        assert!(!SbuPins::new(0u8, 2, 2).is_valid(16));
        assert!(!SbuPins::new(0u8, 2, 16).is_valid(16));
        assert_eq!(PINS.mask(), PinMask(0b1100));
    }

    /// Fails the Nth write.
    struct FlakyGpio {
        fail_on: usize,
        writes: usize,
    }

    impl Gpio for FlakyGpio {
        type Port = ();
        type Error = usize;

        fn configure(&mut self, _: (), _: PinMask, _: OutputConfig) -> Result<(), usize> {
            Ok(())
        }

        fn write(&mut self, _: (), _: u8, _: Level) -> Result<(), usize> {
            self.writes += 1;
            if self.writes == self.fail_on {
                Err(self.writes)
            } else {
                Ok(())
            }
        }

        fn output_level(&mut self, _: (), _: u8) -> Result<Level, usize> {
            Ok(Level::Low)
        }
    }

    #[test]
    fn write_failure_propagates_from_init() {
        let gpio = FlakyGpio { fail_on: 1, writes: 0 };
        assert_eq!(Sbu::init(gpio, SbuPins::new((), 0, 1)).err(), Some(1));
    }

    #[test]
    fn failed_sbu1_write_skips_sbu2() {
        let gpio = FlakyGpio { fail_on: 3, writes: 0 };
        let mut sbu = match Sbu::init(gpio, SbuPins::new((), 0, 1)) {
            Ok(sbu) => sbu,
            Err(n) => panic!("init failed on write {n}"),
        };
        assert_eq!(sbu.set(true, true), Err(3));
        assert_eq!(sbu.release().writes, 3);
    }
}
