use std::time::Duration;
use std::{env, fs, process};

use minifb::{Key, Scale, Window, WindowOptions};

use chipvm::display::{HEIGHT, WIDTH};
use chipvm::keymap::keymap;
use chipvm::sound::Sound;
use chipvm::Emulator;

const ON_COLOR: u32 = 0x00_7F_FF;
const OFF_COLOR: u32 = 0x00_00_00;

fn main() {
    let rom_path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: chipvm <rom>");
        process::exit(2);
    });
    let image = fs::read(&rom_path).unwrap_or_else(|err| {
        eprintln!("{rom_path}: {err}");
        process::exit(1);
    });

    let mut emu = Emulator::new();
    if let Err(fault) = emu.load(&image) {
        eprintln!("{rom_path}: {fault}");
        process::exit(1);
    }

    let mut window = Window::new(
        "chipvm - ESC to exit",
        WIDTH,
        HEIGHT,
        WindowOptions {
            scale: Scale::X16,
            ..WindowOptions::default()
        },
    )
    .unwrap_or_else(|err| {
        eprintln!("could not open window: {err}");
        process::exit(1);
    });
    // ~60 steps per second, so the per-step timers decay at the original rate
    window.limit_update_rate(Some(Duration::from_micros(16600)));

    let sound = Sound::try_new();
    let mut pixels = vec![OFF_COLOR; WIDTH * HEIGHT];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let pressed: Vec<u8> = window.get_keys().iter().filter_map(|&k| keymap(k)).collect();
        for id in 0..16u8 {
            if pressed.contains(&id) {
                emu.key_down(id);
            } else {
                emu.key_up(id);
            }
        }

        if let Err(fault) = emu.step() {
            eprintln!("machine fault: {fault}");
            break;
        }

        if emu.display_dirty() {
            for (pixel, cell) in pixels.iter_mut().zip(emu.read_display()) {
                *pixel = if cell == 1 { ON_COLOR } else { OFF_COLOR };
            }
        }
        window
            .update_with_buffer(&pixels, WIDTH, HEIGHT)
            .unwrap_or_else(|err| eprintln!("window update failed: {err}"));

        if emu.take_tone() {
            if let Some(sound) = &sound {
                sound.beep();
            }
        }
    }
}
