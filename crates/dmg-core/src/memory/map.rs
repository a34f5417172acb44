//! Fixed memory-region map and decoding helpers for the 64 KiB space.

/// Inclusive start of the cartridge ROM window.
pub const ROM_START: u16 = 0x0000;
/// Inclusive end of the cartridge ROM window.
pub const ROM_END: u16 = 0x7FFF;
/// Inclusive start of video RAM.
pub const VRAM_START: u16 = 0x8000;
/// Inclusive end of video RAM.
pub const VRAM_END: u16 = 0x9FFF;
/// Inclusive start of external cartridge RAM.
pub const EXT_RAM_START: u16 = 0xA000;
/// Inclusive end of external cartridge RAM.
pub const EXT_RAM_END: u16 = 0xBFFF;
/// Inclusive start of work RAM.
pub const WRAM_START: u16 = 0xC000;
/// Inclusive end of work RAM.
pub const WRAM_END: u16 = 0xDFFF;
/// Inclusive start of the echo mirror of work RAM.
pub const ECHO_START: u16 = 0xE000;
/// Inclusive end of the echo mirror of work RAM.
pub const ECHO_END: u16 = 0xFDFF;
/// Inclusive start of the sprite attribute table.
pub const OAM_START: u16 = 0xFE00;
/// Inclusive end of the sprite attribute table.
pub const OAM_END: u16 = 0xFE9F;
/// Inclusive start of the unusable hole.
pub const UNUSABLE_START: u16 = 0xFEA0;
/// Inclusive end of the unusable hole.
pub const UNUSABLE_END: u16 = 0xFEFF;
/// Inclusive start of the I/O register page.
pub const IO_START: u16 = 0xFF00;
/// Inclusive end of the I/O register page.
pub const IO_END: u16 = 0xFF7F;
/// Inclusive start of high RAM.
pub const HRAM_START: u16 = 0xFF80;
/// Inclusive end of high RAM.
pub const HRAM_END: u16 = 0xFFFE;
/// The interrupt-enable byte at the top of the space.
pub const IE_ADDR: u16 = 0xFFFF;

/// Offset subtracted to translate an echo address into work RAM.
pub const ECHO_TRANSLATION: u16 = 0x2000;

/// Inclusive end of the boot overlay shadow over the ROM window.
pub const BOOT_OVERLAY_END: u16 = 0x00FF;

/// Region classification for architectural addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryRegion {
    /// Cartridge ROM window (`0x0000..=0x7FFF`), boot overlay on top.
    Rom,
    /// Video RAM (`0x8000..=0x9FFF`).
    Vram,
    /// External cartridge RAM (`0xA000..=0xBFFF`).
    ExtRam,
    /// Work RAM (`0xC000..=0xDFFF`).
    Wram,
    /// Echo mirror of work RAM (`0xE000..=0xFDFF`).
    Echo,
    /// Sprite attribute table (`0xFE00..=0xFE9F`).
    Oam,
    /// Unusable hole (`0xFEA0..=0xFEFF`): reads 0xFF, writes discarded.
    Unusable,
    /// Memory-mapped I/O registers (`0xFF00..=0xFF7F`).
    Io,
    /// High RAM (`0xFF80..=0xFFFE`).
    Hram,
    /// The interrupt-enable byte (`0xFFFF`).
    InterruptEnable,
}

impl MemoryRegion {
    /// Returns the inclusive bounds for this region.
    #[must_use]
    pub const fn bounds(self) -> (u16, u16) {
        match self {
            Self::Rom => (ROM_START, ROM_END),
            Self::Vram => (VRAM_START, VRAM_END),
            Self::ExtRam => (EXT_RAM_START, EXT_RAM_END),
            Self::Wram => (WRAM_START, WRAM_END),
            Self::Echo => (ECHO_START, ECHO_END),
            Self::Oam => (OAM_START, OAM_END),
            Self::Unusable => (UNUSABLE_START, UNUSABLE_END),
            Self::Io => (IO_START, IO_END),
            Self::Hram => (HRAM_START, HRAM_END),
            Self::InterruptEnable => (IE_ADDR, IE_ADDR),
        }
    }

    /// Returns `true` when `addr` belongs to this region.
    #[must_use]
    pub const fn contains(self, addr: u16) -> bool {
        let (start, end) = self.bounds();
        addr >= start && addr <= end
    }
}

/// Canonical region layout in ascending address order.
pub const MEMORY_REGIONS: [MemoryRegion; 10] = [
    MemoryRegion::Rom,
    MemoryRegion::Vram,
    MemoryRegion::ExtRam,
    MemoryRegion::Wram,
    MemoryRegion::Echo,
    MemoryRegion::Oam,
    MemoryRegion::Unusable,
    MemoryRegion::Io,
    MemoryRegion::Hram,
    MemoryRegion::InterruptEnable,
];

const _: () = assert_region_layout();

const fn assert_region_layout() {
    let mut index = 1;
    while index < MEMORY_REGIONS.len() {
        let (_, previous_end) = MEMORY_REGIONS[index - 1].bounds();
        let (start, end) = MEMORY_REGIONS[index].bounds();
        assert!(start <= end, "region start cannot be greater than end");
        assert!(
            previous_end.wrapping_add(1) == start,
            "regions must be contiguous"
        );
        index += 1;
    }

    let (first, _) = MEMORY_REGIONS[0].bounds();
    let (_, last) = MEMORY_REGIONS[MEMORY_REGIONS.len() - 1].bounds();
    assert!(
        first == 0x0000 && last == u16::MAX,
        "regions must cover the full address space"
    );
}

/// Decodes an architectural 16-bit address into its region.
#[must_use]
pub const fn decode_memory_region(addr: u16) -> MemoryRegion {
    match addr {
        ROM_START..=ROM_END => MemoryRegion::Rom,
        VRAM_START..=VRAM_END => MemoryRegion::Vram,
        EXT_RAM_START..=EXT_RAM_END => MemoryRegion::ExtRam,
        WRAM_START..=WRAM_END => MemoryRegion::Wram,
        ECHO_START..=ECHO_END => MemoryRegion::Echo,
        OAM_START..=OAM_END => MemoryRegion::Oam,
        UNUSABLE_START..=UNUSABLE_END => MemoryRegion::Unusable,
        IO_START..=IO_END => MemoryRegion::Io,
        HRAM_START..=HRAM_END => MemoryRegion::Hram,
        IE_ADDR => MemoryRegion::InterruptEnable,
    }
}
