// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod engine;
mod gui;
mod settings;
mod source;
mod types;
mod waveform;
use eframe::egui;

// 入口函数
fn main() -> eframe::Result<()> {
    env_logger::init();
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1463.0, 915.0])
        .with_min_inner_size([1200.0, 760.0])
        .with_title("PowerDAQ v0.1");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "PowerDAQ",
        options,
        Box::new(|cc| Box::new(gui::PowerDaqApp::new(cc))),
    )
}
