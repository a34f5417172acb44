//! The display controller: a four-state mode machine driven by the
//! cycle counts the instruction engine produces.
//!
//! Scanlines 0..=143 cycle through OAM scan, pixel transfer and HBlank;
//! line 144 enters the vertical blank, and the line counter wraps to
//! zero only after line 153. The published frame is refreshed exactly
//! once per 154-line cycle, together with an updated flag the consumer
//! reads and clears.

mod render;

use crate::interrupts::InterruptKind;
use crate::memory::{io, AddressSpace};

/// Horizontal resolution of the published frame.
pub const SCREEN_WIDTH: usize = 160;
/// Vertical resolution of the published frame.
pub const SCREEN_HEIGHT: usize = 144;
/// Total scanlines in one display cycle, blanking lines included.
pub const LINES_PER_FRAME: u8 = 154;
/// First scanline of the vertical blanking period.
pub const VBLANK_START_LINE: u8 = 144;

/// Cycles spent scanning the sprite attribute table each line.
pub const CYCLES_OAM_SCAN: u32 = 80;
/// Cycles spent transferring pixels each line.
pub const CYCLES_PIXEL_TRANSFER: u32 = 172;
/// Cycles spent in the horizontal blank each line.
pub const CYCLES_HBLANK: u32 = 204;
/// Cycles per scanline during the vertical blank.
pub const CYCLES_VBLANK_LINE: u32 = 456;

/// RGB values for the four fixed shades, darkest last.
pub const SHADE_COLORS: [[u8; 3]; 4] = [
    [0x9B, 0xBC, 0x0F],
    [0x8B, 0xAC, 0x0F],
    [0x30, 0x62, 0x30],
    [0x0F, 0x38, 0x0F],
];

/// The four controller modes, in hardware status-bit encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum LcdMode {
    /// Horizontal blank after a rendered line.
    HBlank,
    /// Vertical blank, lines 144..=153.
    VBlank,
    /// Sprite attribute scan at the start of a visible line.
    OamScan,
    /// Pixel transfer to the line buffer.
    PixelTransfer,
}

impl LcdMode {
    /// The mode's two-bit encoding in the status register.
    #[must_use]
    pub const fn status_bits(self) -> u8 {
        match self {
            Self::HBlank => 0,
            Self::VBlank => 1,
            Self::OamScan => 2,
            Self::PixelTransfer => 3,
        }
    }
}

/// The display controller state machine and its two pixel buffers.
pub struct Ppu {
    mode: LcdMode,
    mode_cycles: u32,
    line: u8,
    back: Box<[u8]>,
    frame: Box<[u8]>,
    frame_updated: bool,
    lines_rendered: u64,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// Creates a controller in the vertical blank at line zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: LcdMode::VBlank,
            mode_cycles: 0,
            line: 0,
            back: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT].into_boxed_slice(),
            frame: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT * 3].into_boxed_slice(),
            frame_updated: false,
            lines_rendered: 0,
        }
    }

    /// Current controller mode.
    #[must_use]
    pub const fn mode(&self) -> LcdMode {
        self.mode
    }

    /// Current scanline (0..=153).
    #[must_use]
    pub const fn line(&self) -> u8 {
        self.line
    }

    /// Total scanlines rendered into the back buffer since construction.
    #[must_use]
    pub const fn lines_rendered(&self) -> u64 {
        self.lines_rendered
    }

    /// Whether a frame has been published since the flag was last read.
    #[must_use]
    pub const fn frame_updated(&self) -> bool {
        self.frame_updated
    }

    /// Reads and clears the frame-updated flag.
    pub const fn take_frame_updated(&mut self) -> bool {
        let updated = self.frame_updated;
        self.frame_updated = false;
        updated
    }

    /// The published 160x144 frame as RGB triples, row-major.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        &self.frame
    }

    /// Advances the mode machine by the given cycle count.
    ///
    /// Callers pass per-instruction counts, so at most one transition
    /// happens per call; remainder cycles carry into the next mode so
    /// timing never drifts.
    pub fn advance(&mut self, bus: &mut AddressSpace, cycles: u32) {
        self.mode_cycles += cycles;

        match self.mode {
            LcdMode::OamScan => {
                if self.mode_cycles >= CYCLES_OAM_SCAN {
                    self.mode_cycles %= CYCLES_OAM_SCAN;
                    self.set_mode(bus, LcdMode::PixelTransfer);
                }
            }
            LcdMode::PixelTransfer => {
                if self.mode_cycles >= CYCLES_PIXEL_TRANSFER {
                    self.mode_cycles %= CYCLES_PIXEL_TRANSFER;
                    render::render_scanline(bus, self.line, &mut self.back);
                    self.lines_rendered += 1;
                    self.set_mode(bus, LcdMode::HBlank);
                    if bus.read_io_bit(io::REG_LCD_STAT, io::STAT_HBLANK_INT) {
                        request_interrupt(bus, InterruptKind::Lcd);
                    }
                }
            }
            LcdMode::HBlank => {
                if self.mode_cycles >= CYCLES_HBLANK {
                    self.mode_cycles %= CYCLES_HBLANK;
                    self.advance_line(bus);
                    if self.line == VBLANK_START_LINE {
                        self.set_mode(bus, LcdMode::VBlank);
                        request_interrupt(bus, InterruptKind::VBlank);
                        self.publish_frame();
                    } else {
                        self.enter_oam_scan(bus);
                    }
                }
            }
            LcdMode::VBlank => {
                if self.mode_cycles >= CYCLES_VBLANK_LINE {
                    self.mode_cycles %= CYCLES_VBLANK_LINE;
                    if self.line == 0 {
                        // Reset state: leave the blank without touching
                        // the line counter.
                        self.enter_oam_scan(bus);
                    } else {
                        self.advance_line(bus);
                        if self.line == 0 {
                            self.enter_oam_scan(bus);
                        }
                    }
                }
            }
        }
    }

    fn enter_oam_scan(&mut self, bus: &mut AddressSpace) {
        self.set_mode(bus, LcdMode::OamScan);
        if bus.read_io_bit(io::REG_LCD_STAT, io::STAT_OAM_INT) {
            request_interrupt(bus, InterruptKind::Lcd);
        }
    }

    fn set_mode(&mut self, bus: &mut AddressSpace, mode: LcdMode) {
        self.mode = mode;
        let bits = mode.status_bits();
        bus.write_io_bit(io::REG_LCD_STAT, io::STAT_MODE_LOW, bits & 1 != 0);
        bus.write_io_bit(io::REG_LCD_STAT, io::STAT_MODE_HIGH, bits & 2 != 0);
    }

    fn advance_line(&mut self, bus: &mut AddressSpace) {
        self.line = if self.line >= LINES_PER_FRAME - 1 {
            0
        } else {
            self.line + 1
        };
        bus.write_raw(io::REG_LY, self.line);

        let coincidence = self.line == bus.read_raw(io::REG_LYC);
        bus.write_io_bit(io::REG_LCD_STAT, io::STAT_COINCIDENCE, coincidence);
        if coincidence && bus.read_io_bit(io::REG_LCD_STAT, io::STAT_LYC_INT) {
            request_interrupt(bus, InterruptKind::Lcd);
        }
    }

    fn publish_frame(&mut self) {
        for (pixel, shade) in self.back.iter().enumerate() {
            let color = SHADE_COLORS[usize::from(*shade & 0x03)];
            self.frame[pixel * 3..pixel * 3 + 3].copy_from_slice(&color);
        }
        self.back.fill(0);
        self.frame_updated = true;
    }
}

fn request_interrupt(bus: &mut AddressSpace, kind: InterruptKind) {
    bus.write_io_bit(io::REG_IF, kind.bit(), true);
}
