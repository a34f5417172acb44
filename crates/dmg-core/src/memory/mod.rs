//! Memory model: the flat 64 KiB address space and its access rules.
//!
//! One backing store holds every RAM-like region; the echo mirror is an
//! address translation into work RAM, never a second array. The cartridge
//! window and the boot overlay are routed on read, and writes below
//! 0x8000 only ever reach the cartridge's bank-select protocol.

/// Memory-mapped I/O register addresses and flag bit indices.
pub mod io;
/// Fixed memory-region map and address decoder.
pub mod map;

pub use map::{decode_memory_region, MemoryRegion, MEMORY_REGIONS};

use crate::cartridge::Cartridge;
use crate::serial::SerialPort;
use map::{
    BOOT_OVERLAY_END, ECHO_END, ECHO_START, ECHO_TRANSLATION, OAM_START, ROM_END, UNUSABLE_END,
    UNUSABLE_START,
};

/// Size in bytes of the flat architectural address space (64 KiB).
pub const ADDRESS_SPACE_BYTES: usize = u16::MAX as usize + 1;

/// Size in bytes of the boot overlay image.
pub const BOOT_OVERLAY_BYTES: usize = 0x100;

/// Number of bytes copied into OAM by one DMA transfer.
pub const DMA_TRANSFER_BYTES: u16 = 0xA0;

/// The 64 KiB address space with its routing rules.
///
/// Every access is total: no address is ever invalid, reads in the
/// unusable hole return 0xFF, and illegal writes are discarded rather
/// than rejected.
pub struct AddressSpace {
    memory: Box<[u8]>,
    cartridge: Cartridge,
    boot_overlay: [u8; BOOT_OVERLAY_BYTES],
    boot_active: bool,
    serial: SerialPort,
}

impl AddressSpace {
    /// Creates an address space backed by the given cartridge.
    #[must_use]
    pub fn new(cartridge: Cartridge) -> Self {
        Self {
            memory: vec![0; ADDRESS_SPACE_BYTES].into_boxed_slice(),
            cartridge,
            boot_overlay: [0; BOOT_OVERLAY_BYTES],
            boot_active: false,
            serial: SerialPort::default(),
        }
    }

    /// Installs the 256-byte boot overlay over the bottom of the ROM
    /// window and arms it for the session.
    pub fn load_boot_overlay(&mut self, image: &[u8; BOOT_OVERLAY_BYTES]) {
        self.boot_overlay.copy_from_slice(image);
        self.boot_active = true;
    }

    /// Whether the boot overlay still shadows `0x0000..=0x00FF`.
    #[must_use]
    pub const fn boot_overlay_active(&self) -> bool {
        self.boot_active
    }

    /// Reads one byte through the address map.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0..=ROM_END => {
                if self.boot_active && addr <= BOOT_OVERLAY_END {
                    self.boot_overlay[usize::from(addr)]
                } else {
                    self.cartridge.read(addr)
                }
            }
            ECHO_START..=ECHO_END => self.memory[usize::from(addr - ECHO_TRANSLATION)],
            UNUSABLE_START..=UNUSABLE_END => 0xFF,
            _ => self.memory[usize::from(addr)],
        }
    }

    /// Writes one byte through the address map.
    ///
    /// Writes into the ROM window reach only the cartridge's bank-select
    /// protocol; writes into the unusable hole are discarded.
    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0..=ROM_END => self.cartridge.write(addr, value),
            ECHO_START..=ECHO_END => self.memory[usize::from(addr - ECHO_TRANSLATION)] = value,
            UNUSABLE_START..=UNUSABLE_END => {}
            io::REG_DMA => {
                self.memory[usize::from(addr)] = value;
                self.trigger_dma(value);
            }
            io::REG_LY => self.memory[usize::from(addr)] = 0,
            io::REG_DIV => {
                // Any write resets the whole free-running counter.
                self.memory[usize::from(io::REG_DIV)] = 0;
                self.memory[usize::from(io::REG_DIV_LOW)] = 0;
            }
            io::REG_SERIAL_DATA => {
                self.memory[usize::from(addr)] = value;
                self.serial.push(value);
            }
            io::REG_BOOT_OFF => {
                self.memory[usize::from(addr)] = value;
                if value != 0 {
                    self.boot_active = false;
                }
            }
            _ => self.memory[usize::from(addr)] = value,
        }
    }

    /// Reads one byte from the backing store, bypassing the map.
    #[must_use]
    pub fn read_raw(&self, addr: u16) -> u8 {
        self.memory[usize::from(addr)]
    }

    /// Writes one byte to the backing store, bypassing the map.
    ///
    /// Engine-internal register updates (scanline counter, timer counter,
    /// status bits) use this path so their special guest-write rules do
    /// not apply to the hardware itself.
    pub fn write_raw(&mut self, addr: u16, value: u8) {
        self.memory[usize::from(addr)] = value;
    }

    /// Reads a single bit of an I/O flag register.
    #[must_use]
    pub fn read_io_bit(&self, addr: u16, bit: u8) -> bool {
        (self.read_raw(addr) >> bit) & 1 != 0
    }

    /// Sets or clears a single bit of an I/O flag register.
    pub fn write_io_bit(&mut self, addr: u16, bit: u8, value: bool) {
        let current = self.read_raw(addr);
        let updated = if value {
            current | (1 << bit)
        } else {
            current & !(1 << bit)
        };
        self.write_raw(addr, updated);
    }

    /// Copies 160 bytes from `page << 8` into the sprite attribute table.
    ///
    /// The transfer is modeled as instantaneous; the triggering write's
    /// instruction already charged its own cycles.
    pub fn trigger_dma(&mut self, page: u8) {
        let source = u16::from(page) << 8;
        for offset in 0..DMA_TRANSFER_BYTES {
            let byte = self.read(source.wrapping_add(offset));
            self.memory[usize::from(OAM_START + offset)] = byte;
        }
    }

    /// The serial logging stub.
    #[must_use]
    pub const fn serial(&self) -> &SerialPort {
        &self.serial
    }

    /// Mutable access to the serial logging stub.
    pub fn serial_mut(&mut self) -> &mut SerialPort {
        &mut self.serial
    }

    /// The cartridge behind the ROM window.
    #[must_use]
    pub const fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }
}

#[cfg(test)]
mod tests {
    use super::io;
    use super::{AddressSpace, BOOT_OVERLAY_BYTES};
    use crate::cartridge::Cartridge;

    fn space() -> AddressSpace {
        let mut rom = vec![0; 0x8000];
        rom[0x0147] = 0x00;
        rom[0x0010] = 0x5A;
        AddressSpace::new(Cartridge::from_bytes(rom).expect("test rom loads"))
    }

    #[test]
    fn rom_window_reads_come_from_the_cartridge() {
        let space = space();
        assert_eq!(space.read(0x0010), 0x5A);
    }

    #[test]
    fn rom_window_writes_are_discarded() {
        let mut space = space();
        space.write(0x0010, 0xEE);
        assert_eq!(space.read(0x0010), 0x5A);
    }

    #[test]
    fn boot_overlay_shadows_low_rom_until_disabled() {
        let mut space = space();
        let mut overlay = [0; BOOT_OVERLAY_BYTES];
        overlay[0x10] = 0xA7;
        space.load_boot_overlay(&overlay);

        assert!(space.boot_overlay_active());
        assert_eq!(space.read(0x0010), 0xA7);
        // Reads past the overlay still reach the cartridge.
        assert_eq!(space.read(0x0100), 0x00);

        space.write(io::REG_BOOT_OFF, 1);
        assert!(!space.boot_overlay_active());
        assert_eq!(space.read(0x0010), 0x5A);
    }

    #[test]
    fn zero_write_keeps_boot_overlay_mapped() {
        let mut space = space();
        space.load_boot_overlay(&[0x11; BOOT_OVERLAY_BYTES]);
        space.write(io::REG_BOOT_OFF, 0);
        assert!(space.boot_overlay_active());
    }

    #[test]
    fn echo_range_aliases_work_ram_both_ways() {
        let mut space = space();
        space.write(0xC123, 0x42);
        assert_eq!(space.read(0xE123), 0x42);

        space.write(0xE200, 0x99);
        assert_eq!(space.read(0xC200), 0x99);
        assert_eq!(space.read(0xE200), 0x99);
    }

    #[test]
    fn unusable_hole_reads_fixed_value_and_drops_writes() {
        let mut space = space();
        space.write(0xFEA5, 0x12);
        assert_eq!(space.read(0xFEA5), 0xFF);
    }

    #[test]
    fn scanline_register_writes_reset_it() {
        let mut space = space();
        space.write_raw(io::REG_LY, 0x90);
        space.write(io::REG_LY, 0x33);
        assert_eq!(space.read(io::REG_LY), 0);
    }

    #[test]
    fn divider_write_resets_the_whole_counter_pair() {
        let mut space = space();
        space.write_raw(io::REG_DIV, 0xAB);
        space.write_raw(io::REG_DIV_LOW, 0xCD);
        space.write(io::REG_DIV, 0x77);
        assert_eq!(space.read_raw(io::REG_DIV), 0);
        assert_eq!(space.read_raw(io::REG_DIV_LOW), 0);
    }

    #[test]
    fn dma_copies_one_page_slice_into_oam() {
        let mut space = space();
        for offset in 0..0xA0_u16 {
            space.write(0xC000 + offset, u8::try_from(offset).expect("fits"));
        }
        space.write(io::REG_DMA, 0xC0);

        assert_eq!(space.read(0xFE00), 0x00);
        assert_eq!(space.read(0xFE42), 0x42);
        assert_eq!(space.read(0xFE9F), 0x9F);
    }

    #[test]
    fn serial_data_writes_are_captured_by_the_stub() {
        let mut space = space();
        for byte in *b"ok" {
            space.write(io::REG_SERIAL_DATA, byte);
            space.write(io::REG_SERIAL_CTRL, 0x81);
        }
        assert_eq!(space.serial().output(), b"ok");
    }

    #[test]
    fn io_bit_accessors_roundtrip() {
        let mut space = space();
        space.write_io_bit(io::REG_IF, 2, true);
        assert!(space.read_io_bit(io::REG_IF, 2));
        assert_eq!(space.read_raw(io::REG_IF), 0b100);

        space.write_io_bit(io::REG_IF, 2, false);
        assert!(!space.read_io_bit(io::REG_IF, 2));
    }
}
