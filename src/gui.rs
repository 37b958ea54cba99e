// src/gui.rs
use eframe::{egui, CreationContext};
use egui::{Color32, FontId, Pos2, Rect, Stroke};
use egui_plot::{HLine, Line, LineStyle, Plot, PlotBounds, PlotPoints, VLine};
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::engine;
use crate::settings::{AppSettings, SETTINGS_FILE};
use crate::types::*;
use crate::waveform::{
    MeasureMode, PixelPos, PixelRect, PointerButton, Quantity, RegionReport, SurfaceId,
    WaveformEngine, CHANNEL_COUNT,
};

// 曲线配色，通道序号取模
static VOLTAGE_COLORS: Lazy<Vec<Color32>> = Lazy::new(|| {
    vec![
        Color32::from_rgb(0, 0, 255),
        Color32::from_rgb(0, 0, 128),
        Color32::from_rgb(255, 0, 0),
        Color32::from_rgb(128, 0, 0),
        Color32::from_rgb(0, 255, 0),
        Color32::from_rgb(0, 128, 0),
        Color32::from_rgb(255, 0, 255),
        Color32::from_rgb(128, 0, 128),
        Color32::from_rgb(0, 255, 255),
        Color32::from_rgb(0, 128, 128),
    ]
});
static CURRENT_COLORS: Lazy<Vec<Color32>> = Lazy::new(|| {
    vec![
        Color32::from_rgb(255, 0, 0),
        Color32::from_rgb(128, 0, 0),
        Color32::from_rgb(0, 255, 0),
        Color32::from_rgb(0, 128, 0),
        Color32::from_rgb(0, 0, 255),
        Color32::from_rgb(0, 0, 128),
        Color32::from_rgb(255, 0, 255),
        Color32::from_rgb(128, 0, 128),
        Color32::from_rgb(0, 255, 255),
        Color32::from_rgb(0, 128, 128),
    ]
});
static POWER_COLORS: Lazy<Vec<Color32>> = Lazy::new(|| {
    vec![
        Color32::from_rgb(128, 128, 0),
        Color32::from_rgb(160, 120, 0),
        Color32::from_rgb(200, 80, 0),
        Color32::from_rgb(120, 80, 40),
        Color32::from_rgb(180, 160, 0),
        Color32::from_rgb(100, 100, 0),
        Color32::from_rgb(160, 160, 40),
        Color32::from_rgb(200, 200, 0),
        Color32::from_rgb(150, 120, 60),
        Color32::from_rgb(190, 140, 40),
    ]
});

const CALIPER_COLOR: Color32 = Color32::from_rgb(0, 120, 215);
const CROSSHAIR_COLOR: Color32 = Color32::from_rgb(160, 160, 160);

pub struct PowerDaqApp {
    // 波形引擎（渲染线程独占）
    wave: WaveformEngine,
    settings: AppSettings,

    // 系统状态
    is_streaming: bool,
    test_channel_count: usize,

    // 界面状态
    log_messages: Vec<String>,
    region_report: Option<RegionReport>,
    last_cursor: Option<Pos2>,
    surface_rects: [Option<Rect>; 2],

    // 通讯管道
    rx: Receiver<AcqMessage>,
    tx_cmd: Sender<GuiCommand>,
}

impl PowerDaqApp {
    pub fn new(_cc: &CreationContext<'_>) -> Self {
        let (tx, rx) = channel();
        let (tx_cmd, rx_cmd) = channel();

        // 启动采集线程
        engine::spawn_thread(tx, rx_cmd);

        let settings = AppSettings::load(Path::new(SETTINGS_FILE));
        let mut wave = WaveformEngine::new();
        wave.set_view_width(settings.view_width);

        let mut app = Self {
            wave,
            settings,
            is_streaming: false,
            test_channel_count: 3,
            log_messages: vec!["PowerDAQ ready.".to_owned()],
            region_report: None,
            last_cursor: None,
            surface_rects: [None; 2],
            rx,
            tx_cmd,
        };
        app.apply_channel_visibility();
        app
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > 8 {
            self.log_messages.remove(0);
        }
    }

    // 通道表聚合：全局显示 = 任一通道勾选；逐通道状态照搬复选框
    fn apply_channel_visibility(&mut self) {
        let any_v = self.settings.channels.iter().any(|c| c.voltage);
        let any_i = self.settings.channels.iter().any(|c| c.current);
        let any_p = self.settings.channels.iter().any(|c| c.power);
        self.wave.set_quantity_visible(Quantity::Voltage, any_v);
        self.wave.set_quantity_visible(Quantity::Current, any_i);
        self.wave.set_quantity_visible(Quantity::Power, any_p);
        for (idx, row) in self.settings.channels.iter().enumerate() {
            self.wave
                .set_channel_visible(idx, row.voltage, row.current, row.power);
        }
    }

    fn show_surface(&mut self, ui: &mut egui::Ui, surface: SurfaceId, height: f32) {
        let idx = surface.index();
        self.wave.refresh_surface(surface);

        let x = self.wave.x_range();
        let y = self.wave.y_range(surface);
        let power = self.wave.power_range();
        let measure_mode = self.wave.measure_mode();
        let wave = &self.wave;

        let plot_id = match surface {
            SurfaceId::Voltage => "plot_voltage",
            SurfaceId::Current => "plot_current",
        };
        let response = Plot::new(plot_id)
            .height(height)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                // 坐标范围由引擎统一下发，两个图表的时间轴因此始终一致
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [x.lower, y.lower],
                    [x.upper, y.upper],
                ));

                for ch in 0..CHANNEL_COUNT {
                    let pts = wave.rendered_series(surface, ch);
                    if !pts.is_empty() {
                        let color = match surface {
                            SurfaceId::Voltage => VOLTAGE_COLORS[ch % VOLTAGE_COLORS.len()],
                            SurfaceId::Current => CURRENT_COLORS[ch % CURRENT_COLORS.len()],
                        };
                        plot_ui.line(Line::new(PlotPoints::new(pts.to_vec())).color(color));
                    }
                    if surface == SurfaceId::Current {
                        // 功率曲线画在电流坐标系里，按功率轴比例映射
                        let pts = wave.rendered_series(surface, CHANNEL_COUNT + ch);
                        if !pts.is_empty() {
                            let mapped: Vec<[f64; 2]> = pts
                                .iter()
                                .map(|p| {
                                    let frac = (p[1] - power.lower) / power.size();
                                    [p[0], y.lower + frac * y.size()]
                                })
                                .collect();
                            plot_ui.line(
                                Line::new(PlotPoints::new(mapped))
                                    .color(POWER_COLORS[ch % POWER_COLORS.len()])
                                    .style(LineStyle::dashed_dense()),
                            );
                        }
                    }
                }

                // 测量元素：可见性完全由当前模式决定
                let measure = wave.measure();
                if measure.calipers_visible() {
                    if let Some(cal) = measure.calipers() {
                        plot_ui.vline(VLine::new(cal.x1).color(CALIPER_COLOR).style(LineStyle::dashed_loose()));
                        plot_ui.vline(VLine::new(cal.x2).color(CALIPER_COLOR).style(LineStyle::dashed_loose()));
                        let (h1, h2) = match surface {
                            SurfaceId::Voltage => (cal.y1_v, cal.y2_v),
                            SurfaceId::Current => (cal.y1_i, cal.y2_i),
                        };
                        plot_ui.hline(HLine::new(h1).color(CALIPER_COLOR).style(LineStyle::dashed_loose()));
                        plot_ui.hline(HLine::new(h2).color(CALIPER_COLOR).style(LineStyle::dashed_loose()));
                    }
                }
                if measure.crosshair_visible() {
                    if let Some(cross) = measure.crosshair(surface) {
                        plot_ui.vline(VLine::new(cross.x).color(CROSSHAIR_COLOR).style(LineStyle::dashed_loose()));
                        plot_ui.hline(HLine::new(cross.y).color(CROSSHAIR_COLOR).style(LineStyle::dashed_loose()));
                    }
                }
            });

        // 几何信息回写引擎，供降采样宽度与像素命中检测使用
        let frame = *response.transform.frame();
        self.wave.set_surface_rect(
            surface,
            PixelRect::new(frame.left(), frame.top(), frame.width(), frame.height()),
        );
        self.surface_rects[idx] = Some(response.response.rect);

        // 左上角读数文本（十字光标 / 卡尺）
        let label = if self.wave.measure().calipers_visible() {
            let text = self.wave.measure().caliper_text(surface);
            (!text.is_empty()).then(|| text.to_owned())
        } else if self.wave.measure().crosshair_visible() {
            self.wave
                .measure()
                .crosshair(surface)
                .map(|c| c.label.clone())
        } else {
            None
        };
        if let Some(text) = label {
            let painter = ui.painter();
            let pos = frame.left_top() + egui::vec2(6.0, 6.0);
            let galley = painter.layout_no_wrap(text, FontId::monospace(11.0), Color32::WHITE);
            let bg = Rect::from_min_size(pos, galley.size()).expand(4.0);
            painter.rect_filled(bg, 3.0, Color32::from_rgba_unmultiplied(20, 20, 25, 220));
            painter.rect_stroke(bg, 3.0, Stroke::new(1.0, Color32::GRAY));
            painter.galley(pos, galley);
        }

        // 框选矩形
        if let Some(sel) = self.wave.selection() {
            if sel.surface == surface {
                let rect = Rect::from_two_pos(
                    Pos2::new(sel.anchor.x, sel.anchor.y),
                    Pos2::new(sel.current.x, sel.current.y),
                );
                let painter = ui.painter();
                painter.rect_filled(rect, 0.0, Color32::from_rgba_unmultiplied(0, 120, 215, 40));
                painter.rect_stroke(rect, 0.0, Stroke::new(1.0, CALIPER_COLOR));
            }
        }

        // 点击拾取：测量关闭时显示最近原始采样点的数值
        if response.response.clicked() && measure_mode == MeasureMode::Off {
            if let Some(pos) = response.response.interact_pointer_pos() {
                if let Some(picked) = self.wave.pick_sample(surface, PixelPos::new(pos.x, pos.y)) {
                    self.log(&format!(
                        "{} Ch{}: T={:.4} s, value={:.4}",
                        picked.quantity.label(),
                        picked.channel + 1,
                        picked.time,
                        picked.value
                    ));
                }
            }
        }
    }

    fn surface_at(&self, pos: Pos2) -> Option<SurfaceId> {
        for surface in SurfaceId::ALL {
            if let Some(rect) = self.surface_rects[surface.index()] {
                if rect.contains(pos) {
                    return Some(surface);
                }
            }
        }
        None
    }

    // 指针/滚轮事件统一送入引擎的输入路由（测量优先，未消费则平移/框选/缩放）
    fn route_input(&mut self, ctx: &egui::Context) {
        let (pointer_pos, pressed, released, scroll_y, ctrl, zoom_delta) = ctx.input(|i| {
            (
                i.pointer.latest_pos(),
                [
                    i.pointer.button_pressed(egui::PointerButton::Primary),
                    i.pointer.button_pressed(egui::PointerButton::Middle),
                    i.pointer.button_pressed(egui::PointerButton::Secondary),
                ],
                [
                    i.pointer.button_released(egui::PointerButton::Primary),
                    i.pointer.button_released(egui::PointerButton::Middle),
                    i.pointer.button_released(egui::PointerButton::Secondary),
                ],
                i.scroll_delta.y,
                i.modifiers.ctrl,
                i.zoom_delta(),
            )
        });
        let Some(pos) = pointer_pos else { return };
        let px = PixelPos::new(pos.x, pos.y);
        let hovered = self.surface_at(pos);
        const BUTTONS: [PointerButton; 3] = [
            PointerButton::Primary,
            PointerButton::Middle,
            PointerButton::Secondary,
        ];

        for (i, button) in BUTTONS.iter().enumerate() {
            if pressed[i] {
                if let Some(surface) = hovered {
                    self.wave.on_pointer_press(surface, px, *button);
                }
            }
        }
        // 拖拽中即使指针离开原表面，事件仍送回该表面
        if self.last_cursor != Some(pos) {
            self.last_cursor = Some(pos);
            if let Some(surface) = self.wave.capture_surface().or(hovered) {
                self.wave.on_pointer_move(surface, px);
            }
        }
        for (i, button) in BUTTONS.iter().enumerate() {
            if released[i] {
                if let Some(surface) = self.wave.capture_surface().or(hovered) {
                    self.wave.on_pointer_release(surface, px, *button);
                }
            }
        }
        // 滚轮缩放；egui 在按住 Ctrl 时会把滚轮折算成 zoom_delta
        let mut delta = scroll_y;
        if delta == 0.0 && zoom_delta != 1.0 {
            delta = if zoom_delta > 1.0 { 1.0 } else { -1.0 };
        }
        if delta != 0.0 {
            if let Some(surface) = hovered {
                let ctrl_like = ctrl || (scroll_y == 0.0 && zoom_delta != 1.0);
                self.wave.on_wheel(surface, px, delta, ctrl_like);
            }
        }
    }
}

impl eframe::App for PowerDaqApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. 先把采集批次全部接走，再进入本帧的降采样
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                AcqMessage::Log(s) => self.log(&s),
                AcqMessage::StreamStatus(b) => self.is_streaming = b,
                AcqMessage::Batch(batch) => self.wave.append_batch(&batch),
            }
        }

        // 2. UI 外观
        let mut visuals = egui::Visuals::dark();
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(10, 10, 15);
        ctx.set_visuals(visuals);

        // 3. 左侧控制面板
        egui::SidePanel::left("L").min_width(300.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("PowerDAQ v0.1");
            ui.label("Waveform Monitor");
            ui.separator();

            let stream_btn = if self.is_streaming { "STOP STREAM" } else { "START STREAM" };
            if ui.button(stream_btn).clicked() {
                if self.is_streaming {
                    self.tx_cmd.send(GuiCommand::StopStream).ok();
                    self.is_streaming = false; // 立即更新防卡顿
                } else {
                    self.tx_cmd.send(GuiCommand::StartStream).ok();
                    self.is_streaming = true;
                }
            }
            if ui.button("🔄 RESET DATA").clicked() {
                for ch in 0..CHANNEL_COUNT {
                    self.wave.clear_channel(ch);
                }
            }

            ui.add_space(6.0);
            let measure_btn = match self.wave.measure_mode() {
                MeasureMode::Off => "Measure: OFF",
                MeasureMode::Crosshair => "Measure: CROSSHAIR",
                MeasureMode::Calipers => "Measure: CALIPERS",
            };
            if ui.button(measure_btn).clicked() {
                self.wave.cycle_measure_mode();
            }
            let mut follow = self.wave.auto_follow();
            if ui.checkbox(&mut follow, "Auto follow").changed() {
                self.wave.set_auto_follow(follow);
            }

            ui.horizontal(|ui| {
                ui.label("Channels");
                let mut count = self.test_channel_count;
                if ui.add(egui::Slider::new(&mut count, 1..=10)).changed() {
                    self.test_channel_count = count;
                    self.tx_cmd.send(GuiCommand::SetChannelCount(count)).ok();
                }
            });

            ui.add_space(10.0);
            ui.separator();
            ui.label("CHANNEL DISPLAY");
            let mut changed = false;
            egui::Grid::new("channel_table")
                .num_columns(4)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("通道信息");
                    ui.label("I");
                    ui.label("V");
                    ui.label("P");
                    ui.end_row();
                    for row in &mut self.settings.channels {
                        ui.label(format!("{}\n{}", row.name, row.description));
                        changed |= ui.checkbox(&mut row.current, "").changed();
                        changed |= ui.checkbox(&mut row.voltage, "").changed();
                        changed |= ui.checkbox(&mut row.power, "").changed();
                        ui.end_row();
                    }
                });
            if changed {
                self.apply_channel_visibility();
            }

            ui.add_space(10.0);
            egui::ScrollArea::vertical().max_height(120.0).show(ui, |ui| {
                for m in &self.log_messages {
                    ui.monospace(m);
                }
            });
        });

        // 4. 中央：两个时间轴联动的图表
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if !self.is_streaming {
                    ui.label("Press START STREAM to feed data.");
                }
                ui.label(format!("View width: {:.2} s", self.wave.view_width()));
            });
            let height = ((ui.available_height() - 60.0) / 2.0).max(160.0);
            ui.label("Voltage (V)");
            self.show_surface(ui, SurfaceId::Voltage, height);
            ui.label("Current (A) / Power (W)");
            self.show_surface(ui, SurfaceId::Current, height);
        });

        // 5. 输入路由（两个图表的矩形都已就位）
        self.route_input(ctx);

        // 6. 框选统计结果弹窗
        if let Some(report) = self.wave.take_region_report() {
            self.region_report = Some(report);
        }
        let mut close_report = false;
        if let Some(report) = &self.region_report {
            egui::Window::new("区域统计")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.monospace(report.format());
                    if ui.button("Close").clicked() {
                        close_report = true;
                    }
                });
        }
        if close_report {
            self.region_report = None;
        }

        if self.is_streaming {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.view_width = self.wave.view_width();
        self.settings.save(Path::new(SETTINGS_FILE));
    }
}
