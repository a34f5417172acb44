//! Interrupt sources, their flag bits, vectors, and service priority.

/// The five interrupt sources, named by what raises them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum InterruptKind {
    /// Display controller entered the vertical blanking period.
    VBlank,
    /// LCD status condition (mode entry or scanline compare).
    Lcd,
    /// Visible timer counter overflowed.
    Timer,
    /// Serial transfer completed.
    Serial,
    /// Input line changed.
    Input,
}

impl InterruptKind {
    /// All sources in fixed service-priority order, highest first.
    pub const PRIORITY: [Self; 5] = [
        Self::VBlank,
        Self::Lcd,
        Self::Timer,
        Self::Serial,
        Self::Input,
    ];

    /// Bit index of this source in the pending and enable registers.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::VBlank => 0,
            Self::Lcd => 1,
            Self::Timer => 2,
            Self::Serial => 3,
            Self::Input => 4,
        }
    }

    /// Fixed address jumped to when this source is serviced.
    #[must_use]
    pub const fn vector(self) -> u16 {
        match self {
            Self::VBlank => 0x0040,
            Self::Lcd => 0x0048,
            Self::Timer => 0x0050,
            Self::Serial => 0x0058,
            Self::Input => 0x0060,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InterruptKind;

    #[test]
    fn priority_order_is_vblank_first() {
        assert_eq!(InterruptKind::PRIORITY[0], InterruptKind::VBlank);
        assert_eq!(InterruptKind::PRIORITY[4], InterruptKind::Input);
    }

    #[test]
    fn bits_are_contiguous_from_zero_in_priority_order() {
        for (index, kind) in InterruptKind::PRIORITY.into_iter().enumerate() {
            assert_eq!(usize::from(kind.bit()), index);
        }
    }

    #[test]
    fn vectors_are_spaced_eight_bytes_from_0x40() {
        for kind in InterruptKind::PRIORITY {
            assert_eq!(kind.vector(), 0x0040 + u16::from(kind.bit()) * 8);
        }
    }
}
