use thiserror::Error;

/// Fatal execution faults raised by the instruction engine.
///
/// A fault stops execution at the faulting step; the engine never falls
/// back to a no-op for bytes it cannot decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// Primary-page opcode with no table entry.
    #[error("unimplemented opcode 0x{opcode:02X} at 0x{pc:04X}")]
    UnimplementedOpcode {
        /// Program counter of the faulting fetch.
        pc: u16,
        /// The undecodable opcode byte.
        opcode: u8,
    },
    /// Extended-page (0xCB-prefixed) opcode with no table entry.
    #[error("unimplemented extended opcode 0xCB 0x{opcode:02X} at 0x{pc:04X}")]
    UnimplementedExtendedOpcode {
        /// Program counter of the faulting fetch (address of the prefix).
        pc: u16,
        /// The undecodable second opcode byte.
        opcode: u8,
    },
}

impl Fault {
    /// Program counter captured when the fault was raised.
    #[must_use]
    pub const fn pc(self) -> u16 {
        match self {
            Self::UnimplementedOpcode { pc, .. }
            | Self::UnimplementedExtendedOpcode { pc, .. } => pc,
        }
    }

    /// The opcode byte that had no table entry.
    #[must_use]
    pub const fn opcode(self) -> u8 {
        match self {
            Self::UnimplementedOpcode { opcode, .. }
            | Self::UnimplementedExtendedOpcode { opcode, .. } => opcode,
        }
    }
}

/// Cartridge rejection reasons surfaced at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CartridgeError {
    /// The header type byte names a mapper this core does not implement.
    #[error("unsupported cartridge type 0x{code:02X}")]
    UnsupportedCartridgeType {
        /// Raw value of the header type byte.
        code: u8,
    },
    /// The image is too short to contain a cartridge header.
    #[error("cartridge image of {len} bytes is smaller than a header")]
    RomTooSmall {
        /// Length of the rejected image.
        len: usize,
    },
}
