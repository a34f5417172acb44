//! Display-controller timing and frame publication coverage, driven
//! through the assembled machine.

#![allow(clippy::pedantic, clippy::nursery)]

use dmg_core::memory::io;
use dmg_core::{Cartridge, EmulatorConfig, LcdMode, System, SCREEN_HEIGHT, SCREEN_WIDTH};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

/// Cycles in one full 154-scanline display cycle.
const FRAME_CYCLES: u64 = 70_224;

fn nop_system() -> System {
    let mut rom = vec![0; 0x8000];
    rom[0x0147] = 0x00;
    // Zero bytes execute as NOP: a uniform four-cycle stream.
    let cartridge = Cartridge::from_bytes(rom).expect("test rom loads");
    System::new(cartridge, EmulatorConfig::default())
}

/// Steps until the controller sits at line 0 in OAM scan.
fn align_to_frame_start(system: &mut System) {
    loop {
        let aligned =
            system.ppu().mode() == LcdMode::OamScan && system.ppu().line() == 0;
        if aligned {
            break;
        }
        system.step().expect("NOP stream executes");
    }
    system.take_frame_updated();
}

#[test]
fn one_frame_of_cycles_publishes_exactly_once() {
    let mut system = nop_system();
    align_to_frame_start(&mut system);
    let rendered_before = system.ppu().lines_rendered();

    let mut driven = 0_u64;
    let mut frames = 0;
    while driven < FRAME_CYCLES {
        driven += u64::from(system.step().expect("NOP stream executes"));
        if system.take_frame_updated() {
            frames += 1;
        }
    }

    assert_eq!(frames, 1);
    assert_eq!(system.ppu().lines_rendered() - rendered_before, 144);
    assert_eq!(system.ppu().line(), 0);
}

#[test]
fn vblank_interrupt_pends_once_per_frame() {
    let mut system = nop_system();
    align_to_frame_start(&mut system);

    let mut driven = 0_u64;
    let mut pend_transitions = 0;
    let mut was_pending = false;
    while driven < FRAME_CYCLES {
        driven += u64::from(system.step().expect("NOP stream executes"));
        let pending = system.bus().read_io_bit(io::REG_IF, 0);
        if pending && !was_pending {
            pend_transitions += 1;
        }
        was_pending = pending;
    }

    assert_eq!(pend_transitions, 1);
}

#[test]
fn scanline_register_tracks_the_controller() {
    let mut system = nop_system();
    align_to_frame_start(&mut system);

    while system.ppu().mode() != LcdMode::VBlank {
        system.step().expect("NOP stream executes");
    }

    assert_eq!(system.ppu().line(), 144);
    assert_eq!(system.bus().read_raw(io::REG_LY), 144);
}

#[test]
fn framebuffer_has_rgb_triples_for_every_pixel() {
    let mut system = nop_system();
    system.step_frame().expect("a frame completes");
    assert!(system.take_frame_updated());

    let frame = system.framebuffer();
    assert_eq!(frame.len(), SCREEN_WIDTH * SCREEN_HEIGHT * 3);
    // A blank background publishes the lightest shade everywhere.
    assert_eq!(&frame[..3], &[0x9B, 0xBC, 0x0F]);
}

#[test]
fn published_frame_reflects_rendered_tiles() {
    let mut system = nop_system();

    // Solid color-3 tile 1 under the first map entry.
    for row in 0..8 {
        system.bus_mut().write(io::TILE_DATA_UNSIGNED + 16 + row * 2, 0xFF);
        system
            .bus_mut()
            .write(io::TILE_DATA_UNSIGNED + 16 + row * 2 + 1, 0xFF);
    }
    system.bus_mut().write(io::TILE_MAP_0, 1);

    align_to_frame_start(&mut system);
    system.step_frame().expect("a frame completes");
    assert!(system.take_frame_updated());

    let frame = system.framebuffer();
    // Top-left pixel carries the darkest shade; the ninth is blank.
    assert_eq!(&frame[..3], &[0x0F, 0x38, 0x0F]);
    assert_eq!(&frame[8 * 3..8 * 3 + 3], &[0x9B, 0xBC, 0x0F]);
}

#[test]
fn dma_sourced_sprites_reach_the_frame() {
    let mut system = nop_system();
    // LCD on, sprites on.
    system.bus_mut().write_raw(io::REG_LCD_CONTROL, 0b1001_0011);

    // Sprite tile 2: all pixels color 1.
    for row in 0..8 {
        system.bus_mut().write(io::TILE_DATA_UNSIGNED + 32 + row * 2, 0xFF);
    }
    // Stage an OAM image in work RAM: one sprite at screen (0, 0).
    system.bus_mut().write(0xC000, 16);
    system.bus_mut().write(0xC001, 8);
    system.bus_mut().write(0xC002, 2);
    system.bus_mut().write(0xC003, 0);
    for addr in 0xC004..0xC0A0_u16 {
        system.bus_mut().write(addr, 0);
    }
    // Trigger the transfer through the mapped register.
    system.bus_mut().write(io::REG_DMA, 0xC0);
    assert_eq!(system.bus().read(0xFE00), 16);

    align_to_frame_start(&mut system);
    system.step_frame().expect("a frame completes");

    let frame = system.framebuffer();
    // Object palette 0 is 0xFF post-boot: color 1 maps to shade 3.
    assert_eq!(&frame[..3], &[0x0F, 0x38, 0x0F]);
}

#[test]
fn lcd_disabled_frames_publish_blank_shades() {
    let mut system = nop_system();
    system.bus_mut().write_raw(io::REG_LCD_CONTROL, 0);

    align_to_frame_start(&mut system);
    system.step_frame().expect("a frame completes");

    let frame = system.framebuffer();
    assert!(frame
        .chunks_exact(3)
        .all(|pixel| pixel == [0x9B, 0xBC, 0x0F]));
}
