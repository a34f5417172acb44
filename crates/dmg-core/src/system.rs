//! Host-facing integration: one step of the whole machine.
//!
//! Each step runs the instruction engine once and forwards the cycle
//! count to the display controller and then the interval timer, in that
//! order, before the next step. Reordering or batching desynchronizes
//! interrupt timing against the instruction stream.

use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use crate::fault::Fault;
use crate::memory::{io, AddressSpace};
use crate::ppu::Ppu;
use crate::timer::Timer;

/// Register file and I/O seed applied when no boot overlay is used.
const POST_BOOT_AF: u16 = 0x01B0;
const POST_BOOT_BC: u16 = 0x0013;
const POST_BOOT_DE: u16 = 0x00D8;
const POST_BOOT_HL: u16 = 0x014D;
const POST_BOOT_SP: u16 = 0xFFFE;
const POST_BOOT_PC: u16 = 0x0100;

/// Host configuration for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EmulatorConfig {
    /// Start from the post-boot register state instead of a boot overlay.
    pub skip_boot: bool,
    /// Emit trace events from `step_traced`.
    pub trace_enabled: bool,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            skip_boot: true,
            trace_enabled: false,
        }
    }
}

/// Step-boundary events for host-side tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    /// An opcode is about to be fetched.
    InstructionStart {
        /// Program counter of the fetch.
        pc: u16,
        /// First opcode byte at that address.
        opcode: u8,
    },
    /// A step finished.
    InstructionRetired {
        /// Program counter the step started from.
        pc: u16,
        /// Cycles the step consumed.
        cycles: u32,
    },
}

/// Sink for deterministic trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// The assembled machine: bus, instruction engine, display, timer.
pub struct System {
    bus: AddressSpace,
    cpu: Cpu,
    ppu: Ppu,
    timer: Timer,
    config: EmulatorConfig,
}

impl System {
    /// Builds a machine around a cartridge.
    #[must_use]
    pub fn new(cartridge: Cartridge, config: EmulatorConfig) -> Self {
        let mut system = Self {
            bus: AddressSpace::new(cartridge),
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            timer: Timer::new(),
            config,
        };
        if config.skip_boot {
            system.seed_post_boot_state();
        }
        system
    }

    fn seed_post_boot_state(&mut self) {
        self.cpu.regs.set_af(POST_BOOT_AF);
        self.cpu.regs.set_bc(POST_BOOT_BC);
        self.cpu.regs.set_de(POST_BOOT_DE);
        self.cpu.regs.set_hl(POST_BOOT_HL);
        self.cpu.regs.sp = POST_BOOT_SP;
        self.cpu.regs.pc = POST_BOOT_PC;
        self.bus.write_raw(io::REG_LCD_CONTROL, 0x91);
        self.bus.write_raw(io::REG_BG_PALETTE, 0xFC);
        self.bus.write_raw(io::REG_OBJ_PALETTE_0, 0xFF);
        self.bus.write_raw(io::REG_OBJ_PALETTE_1, 0xFF);
    }

    /// Installs a boot overlay; execution then starts at address zero.
    pub fn load_boot_overlay(&mut self, image: &[u8; crate::memory::BOOT_OVERLAY_BYTES]) {
        self.bus.load_boot_overlay(image);
        self.cpu.regs.pc = 0x0000;
    }

    /// Runs one machine step and returns the cycles it consumed.
    ///
    /// # Errors
    ///
    /// Propagates the instruction engine's fatal [`Fault`]; the machine
    /// must not be stepped further after one.
    pub fn step(&mut self) -> Result<u32, Fault> {
        let cycles = self.cpu.step(&mut self.bus)?;
        self.ppu.advance(&mut self.bus, cycles);
        self.timer.advance(&mut self.bus, cycles);
        Ok(cycles)
    }

    /// Runs one machine step, reporting boundaries to the sink when
    /// tracing is enabled.
    ///
    /// # Errors
    ///
    /// Propagates the instruction engine's fatal [`Fault`].
    pub fn step_traced(&mut self, sink: &mut dyn TraceSink) -> Result<u32, Fault> {
        if !self.config.trace_enabled {
            return self.step();
        }

        let pc = self.cpu.regs.pc;
        let opcode = self.bus.read(pc);
        sink.on_event(TraceEvent::InstructionStart { pc, opcode });
        let cycles = self.step()?;
        sink.on_event(TraceEvent::InstructionRetired { pc, cycles });
        Ok(cycles)
    }

    /// Steps until the display controller publishes the next frame.
    ///
    /// # Errors
    ///
    /// Propagates the instruction engine's fatal [`Fault`].
    pub fn step_frame(&mut self) -> Result<(), Fault> {
        while !self.ppu.frame_updated() {
            self.step()?;
        }
        Ok(())
    }

    /// Reads and clears the frame-updated flag.
    pub const fn take_frame_updated(&mut self) -> bool {
        self.ppu.take_frame_updated()
    }

    /// The published 160x144 frame as RGB triples, row-major.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        self.ppu.framebuffer()
    }

    /// Drains the serial logging stub.
    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.bus.serial_mut().take_output()
    }

    /// The instruction engine.
    #[must_use]
    pub const fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Mutable access to the instruction engine.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// The address space.
    #[must_use]
    pub const fn bus(&self) -> &AddressSpace {
        &self.bus
    }

    /// Mutable access to the address space.
    pub fn bus_mut(&mut self) -> &mut AddressSpace {
        &mut self.bus
    }

    /// The display controller.
    #[must_use]
    pub const fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    /// The interval timer.
    #[must_use]
    pub const fn timer(&self) -> &Timer {
        &self.timer
    }
}
