#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use wallshell_ui::ShellApp;
use wallshell_ui::state::AppState;

mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

fn main() -> eframe::Result {
    // Log to stderr (run with `RUST_LOG=debug` for the full picture).
    env_logger::Builder::from_env(env_logger::Env::default()).init();

    let native_options = eframe::NativeOptions {
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        viewport: egui::ViewportBuilder::default()
            .with_title("wallshell")
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 480.0])
            // Drag-and-drop must be explicitly enabled on Windows.
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "wallshell",
        native_options,
        Box::new(|_cc| Ok(Box::new(ShellApp::new(AppState::default())))),
    )
}
