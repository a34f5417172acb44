//! Emulation core for DMG-class 8-bit handheld hardware.
//!
//! Four engines reproduce the console's execution semantics: the
//! instruction engine with its two-page dispatch table, the 64 KiB
//! address space, the four-mode display controller, and the interval
//! timer with its delayed overflow. The host owns pacing and
//! presentation; [`System::step`] is the only clock.

/// Cartridge boundary: ROM-only and minimal bank switching.
pub mod cartridge;
/// The instruction engine.
pub mod cpu;
/// Fault taxonomy for execution and cartridge loading.
pub mod fault;
/// Interrupt sources, bits, vectors and priority.
pub mod interrupts;
/// The flat address space and its access rules.
pub mod memory;
/// The display controller.
pub mod ppu;
/// Serial logging stub.
pub mod serial;
/// Host-facing machine integration.
pub mod system;
/// The free-running interval timer.
pub mod timer;

pub use cartridge::{Cartridge, MapperKind};
pub use cpu::registers::Registers;
pub use cpu::Cpu;
pub use fault::{CartridgeError, Fault};
pub use interrupts::InterruptKind;
pub use memory::{AddressSpace, MemoryRegion};
pub use ppu::{LcdMode, Ppu, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use serial::SerialPort;
pub use system::{EmulatorConfig, System, TraceEvent, TraceSink};
pub use timer::Timer;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
