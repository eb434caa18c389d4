// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The GPIO capability the SBU driver is written against.
//!
//! Anything that can put pins of a port into output mode and drive them can
//! implement `Gpio`: the register-level backends in `bsp`, the `embedded-hal`
//! adapter in `hal`, or a mock on the host.

/// Logic level of a pin.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level == Level::High
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Output driver type.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputMode {
    /// Actively drives both levels.
    PushPull,
    /// Only sinks current; high is left to a pull resistor.
    OpenDrain,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Output slew rate, slowest first. Parts with fewer settings map these onto
/// what they have; `VeryHigh` always means the fastest available.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Speed {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OutputConfig {
    pub mode: OutputMode,
    pub pull: Pull,
    pub speed: Speed,
}

impl OutputConfig {
    /// What the SBU lines want: push-pull, floating, fastest edges.
    pub const SBU: Self = Self {
        mode: OutputMode::PushPull,
        pull: Pull::None,
        speed: Speed::VeryHigh,
    };
}

/// A set of pins within one port, one bit per pin.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PinMask(pub u32);

impl PinMask {
    pub const fn pin(pin: u8) -> Self {
        Self(1 << pin)
    }

    pub const fn with(self, pin: u8) -> Self {
        Self(self.0 | 1 << pin)
    }

    pub const fn contains(self, pin: u8) -> bool {
        pin < 32 && self.0 & 1 << pin != 0
    }

    /// Pin numbers in the mask, lowest first.
    pub fn pins(self) -> impl Iterator<Item = u8> {
        (0..32u8).filter(move |&pin| self.contains(pin))
    }
}

/// Pin configuration and output control for one family of GPIO ports.
///
/// Implementations are expected to be synchronous and non-blocking. Whether
/// they can fail is up to the backend: register-level implementations use
/// `core::convert::Infallible`.
pub trait Gpio {
    /// Identifies a port, e.g. GPIOA.
    type Port: Copy;
    type Error;

    /// Puts every pin in `mask` on `port` into output mode with `config`.
    fn configure(
        &mut self,
        port: Self::Port,
        mask: PinMask,
        config: OutputConfig,
    ) -> Result<(), Self::Error>;

    /// Drives `pin` on `port` to `level`.
    fn write(&mut self, port: Self::Port, pin: u8, level: Level) -> Result<(), Self::Error>;

    /// Reads back the level the output latch is driving on `pin`. This is the
    /// commanded level, not a sample of the pad.
    fn output_level(&mut self, port: Self::Port, pin: u8) -> Result<Level, Self::Error>;
}

/// Recording GPIO for host tests.
#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub enum Op {
        Configure(u8, PinMask, OutputConfig),
        Write(u8, u8, Level),
    }

    /// Two ports of 32 pins. Records the first 16 operations.
    #[derive(Debug)]
    pub struct MockGpio {
        pub latch: [[Level; 32]; 2],
        pub config: [[Option<OutputConfig>; 32]; 2],
        pub ops: [Option<Op>; 16],
        pub op_count: usize,
    }

    impl MockGpio {
        /// Latches start out high so that tests can tell `init` drove them.
        pub fn new() -> Self {
            Self {
                latch: [[Level::High; 32]; 2],
                config: [[None; 32]; 2],
                ops: [None; 16],
                op_count: 0,
            }
        }

        fn record(&mut self, op: Op) {
            if let Some(slot) = self.ops.get_mut(self.op_count) {
                *slot = Some(op);
            }
            self.op_count += 1;
        }
    }

    impl Gpio for MockGpio {
        type Port = u8;
        type Error = core::convert::Infallible;

        fn configure(
            &mut self,
            port: u8,
            mask: PinMask,
            config: OutputConfig,
        ) -> Result<(), Self::Error> {
            self.record(Op::Configure(port, mask, config));
            for pin in mask.pins() {
                self.config[usize::from(port)][usize::from(pin)] = Some(config);
            }
            Ok(())
        }

        fn write(&mut self, port: u8, pin: u8, level: Level) -> Result<(), Self::Error> {
            self.record(Op::Write(port, pin, level));
            self.latch[usize::from(port)][usize::from(pin)] = level;
            Ok(())
        }

        fn output_level(&mut self, port: u8, pin: u8) -> Result<Level, Self::Error> {
            Ok(self.latch[usize::from(port)][usize::from(pin)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert!(bool::from(Level::High));
        assert_eq!(!Level::Low, Level::High);
    }

    #[test]
    fn mask_iterates_in_order() {
        let mask = PinMask::pin(3).with(2).with(31);
        assert_eq!(mask.0, 0x8000_000C);
        let mut pins = mask.pins();
        assert_eq!(pins.next(), Some(2));
        assert_eq!(pins.next(), Some(3));
        assert_eq!(pins.next(), Some(31));
        assert_eq!(pins.next(), None);
        assert!(!mask.contains(4));
        assert!(!mask.contains(40));
    }

    #[test]
    fn speeds_are_ordered() {
        assert!(Speed::Low < Speed::Medium);
        assert!(Speed::High < Speed::VeryHigh);
        assert_eq!(OutputConfig::SBU.speed, Speed::VeryHigh);
    }
}
