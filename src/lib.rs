#![cfg_attr(not(test), no_std)]

//! Driver for the USB Type-C sideband-use (SBU) lines of a hardware wallet,
//! written against a small GPIO capability so it runs on register-level
//! backends, on `embedded-hal` pins, or on a mock on the host.

pub mod bsp;
pub mod gpio;
pub mod hal;
pub mod sbu;

pub use gpio::{Gpio, Level};
pub use sbu::{Sbu, SbuPins};
