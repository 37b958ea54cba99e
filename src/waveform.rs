// Adapter module to surface the waveform engine that lives under `waveform-rs/`.
// We reuse the subcrate source files directly so the logic stays in sync.
#[path = "waveform-rs/src/lib.rs"]
mod waveform_rs;

pub use waveform_rs::*;
