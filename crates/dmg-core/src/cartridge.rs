//! Cartridge boundary consumed by the address space.
//!
//! The core only depends on the read contract: reads in the switchable
//! window (`0x4000..=0x7FFF`) go through the selected 16 KiB bank, and
//! writes to `0x2000..=0x3FFF` drive the bank-select protocol. Loading
//! the image bytes from disk is the host's concern.

use crate::fault::CartridgeError;

/// Header offset of the cartridge type byte.
pub const HEADER_TYPE_OFFSET: usize = 0x0147;

/// Size of one switchable ROM bank.
pub const BANK_SIZE: usize = 0x4000;

/// Inclusive start of the bank-select write window.
pub const BANK_SELECT_START: u16 = 0x2000;
/// Inclusive end of the bank-select write window.
pub const BANK_SELECT_END: u16 = 0x3FFF;
/// Inclusive start of the switchable ROM window.
pub const SWITCHABLE_START: u16 = 0x4000;
/// Inclusive end of the switchable ROM window.
pub const SWITCHABLE_END: u16 = 0x7FFF;

/// Mapper variants this core implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MapperKind {
    /// Plain 32 KiB ROM, no banking hardware.
    RomOnly,
    /// Minimal MBC1 variant: 5-bit ROM bank select, bank 0 aliases to 1.
    Mbc1,
}

impl MapperKind {
    /// Decodes the header type byte into a supported mapper.
    #[must_use]
    pub const fn from_header_byte(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::RomOnly),
            0x01..=0x03 => Some(Self::Mbc1),
            _ => None,
        }
    }
}

/// A loaded cartridge image with its bank-select state.
#[derive(Debug, Clone)]
pub struct Cartridge {
    rom: Vec<u8>,
    mapper: MapperKind,
    selected_bank: u8,
}

impl Cartridge {
    /// Builds a cartridge from a raw image, validating the header type.
    ///
    /// # Errors
    ///
    /// Returns [`CartridgeError::RomTooSmall`] when the image cannot hold
    /// a header, and [`CartridgeError::UnsupportedCartridgeType`] when the
    /// type byte names a mapper outside the supported set.
    pub fn from_bytes(rom: Vec<u8>) -> Result<Self, CartridgeError> {
        if rom.len() <= HEADER_TYPE_OFFSET {
            return Err(CartridgeError::RomTooSmall { len: rom.len() });
        }

        let code = rom[HEADER_TYPE_OFFSET];
        let Some(mapper) = MapperKind::from_header_byte(code) else {
            return Err(CartridgeError::UnsupportedCartridgeType { code });
        };

        Ok(Self {
            rom,
            mapper,
            selected_bank: 1,
        })
    }

    /// The mapper selected by the header type byte.
    #[must_use]
    pub const fn mapper(&self) -> MapperKind {
        self.mapper
    }

    /// Currently selected switchable bank.
    #[must_use]
    pub const fn selected_bank(&self) -> u8 {
        self.selected_bank
    }

    /// Reads one byte from the cartridge address window.
    ///
    /// Reads beyond the image return 0xFF, matching open-bus behavior;
    /// guest code that banks past the image simply sees that value.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        let index = if (SWITCHABLE_START..=SWITCHABLE_END).contains(&addr) {
            usize::from(addr) + (usize::from(self.selected_bank) - 1) * BANK_SIZE
        } else {
            usize::from(addr)
        };
        self.rom.get(index).copied().unwrap_or(0xFF)
    }

    /// Handles a guest write below 0x8000.
    ///
    /// Only the bank-select window has an effect, and only on a banked
    /// mapper; everything else is discarded.
    pub fn write(&mut self, addr: u16, value: u8) {
        if self.mapper == MapperKind::Mbc1
            && (BANK_SELECT_START..=BANK_SELECT_END).contains(&addr)
        {
            self.select_rom_bank(value & 0x1F);
        }
    }

    fn select_rom_bank(&mut self, bank: u8) {
        let bank = if bank == 0 { 1 } else { bank };
        let bank_count = (self.rom.len() / BANK_SIZE).max(1);
        // Mirror down selects past the end of the image.
        let bank = usize::from(bank) % bank_count.max(2);
        self.selected_bank = u8::try_from(bank.max(1)).unwrap_or(1);
    }
}
