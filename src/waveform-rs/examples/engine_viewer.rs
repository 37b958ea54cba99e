use eframe::{egui, CreationContext};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints, VLine};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;
use waveform_engine::{
    MeasureMode, PixelRect, SamplePoint, SurfaceId, WaveformEngine, CHANNEL_COUNT,
};

const CHANNELS: usize = 3;
const SAMPLE_RATE_HZ: f64 = 200.0;

struct DemoApp {
    engine: WaveformEngine,
    started_at: Instant,
    last_ts: f64,
    rng: StdRng,
}

impl DemoApp {
    fn new(_cc: &CreationContext<'_>) -> Self {
        Self {
            engine: WaveformEngine::new(),
            started_at: Instant::now(),
            last_ts: 0.0,
            rng: StdRng::from_entropy(),
        }
    }

    fn drive_engine(&mut self) {
        let dt = 1.0 / SAMPLE_RATE_HZ;
        let target = self.started_at.elapsed().as_secs_f64();

        while self.last_ts + dt <= target {
            let t = self.last_ts;
            let mut batch = Vec::with_capacity(CHANNELS);
            for ch in 0..CHANNELS {
                let f = 0.8 + ch as f64 * 0.3;
                let voltage = (2.0 + ch as f64 * 0.5) * (t * f * 2.0).sin()
                    + self.rng.gen_range(-0.1..0.1);
                let current = (0.5 + ch as f64 * 0.2) * (t * f * 2.2).cos()
                    + self.rng.gen_range(-0.05..0.05);
                // Power left unset; the store derives it.
                batch.push((ch, SamplePoint::new(t, voltage, current)));
            }
            self.engine.append_batch(&batch);
            self.last_ts += dt;
        }
    }

    fn show_surface(&mut self, ui: &mut egui::Ui, surface: SurfaceId) {
        let engine = &mut self.engine;
        let (x, y) = (engine.x_range(), engine.y_range(surface));
        let response = Plot::new(format!("surface-{}", surface.index()))
            .height(240.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [x.lower, y.lower],
                    [x.upper, y.upper],
                ));
                let graphs = match surface {
                    SurfaceId::Voltage => 0..CHANNEL_COUNT,
                    SurfaceId::Current => 0..CHANNEL_COUNT * 2,
                };
                for graph in graphs {
                    let points = engine.rendered_series(surface, graph);
                    if points.is_empty() {
                        continue;
                    }
                    plot_ui.line(Line::new(PlotPoints::from_iter(points.iter().copied())));
                }
                if engine.measure().calipers_visible() {
                    if let Some(cal) = engine.measure().calipers() {
                        plot_ui.vline(VLine::new(cal.x1));
                        plot_ui.vline(VLine::new(cal.x2));
                    }
                }
            });
        let rect = response.response.rect;
        engine.set_surface_rect(
            surface,
            PixelRect::new(rect.left(), rect.top(), rect.width(), rect.height()),
        );
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drive_engine();
        self.engine.refresh_surface(SurfaceId::Voltage);
        self.engine.refresh_surface(SurfaceId::Current);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Measure mode").clicked() {
                    self.engine.cycle_measure_mode();
                }
                ui.label(format!("{:?}", self.engine.measure_mode()));
                let mut follow = self.engine.auto_follow();
                if ui.checkbox(&mut follow, "Auto follow").changed() {
                    self.engine.set_auto_follow(follow);
                }
            });
            ui.heading("Waveform engine (egui demo)");
            ui.label("Voltage");
            self.show_surface(ui, SurfaceId::Voltage);
            ui.label("Current / Power");
            self.show_surface(ui, SurfaceId::Current);
            if self.engine.measure_mode() == MeasureMode::Calipers {
                ui.monospace(self.engine.measure().caliper_text(SurfaceId::Voltage));
            }
        });

        ctx.request_repaint(); // continuous streaming
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Waveform engine demo",
        options,
        Box::new(|cc| Box::new(DemoApp::new(cc))),
    )
}
