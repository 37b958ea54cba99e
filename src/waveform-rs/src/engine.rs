use log::debug;

use super::decimate::decimate;
use super::measure::{MeasureMode, MeasurementEngine};
use super::router::{
    wheel_zoom_factor, zoom_about, zoom_about_zero, PanState, PointerButton, SelectionState,
    MIN_SELECT_DRAG_PX, MIN_X_SPAN, MIN_Y_SPAN, PAN_FOLLOW_EPSILON,
};
use super::stats::{region_report, RegionReport};
use super::store::{ChannelStore, Quantity, SamplePoint, CHANNEL_COUNT};
use super::surface::{AxisRange, PixelPos, PixelRect, RenderedSeries, SurfaceGeometry, SurfaceId};
use super::viewport::ViewportController;

/// One ingestion tick across multiple channels.
pub type SampleBatch = Vec<(usize, SamplePoint)>;
/// A click within this many pixels of a curve picks its nearest raw sample.
const PICK_THRESHOLD_PX: f32 = 8.0;
/// Nearest raw sample under a click.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickedSample {
    pub channel: usize,
    pub quantity: Quantity,
    pub time: f64,
    pub value: f64,
}
/// The waveform engine facade: raw retention, decimated rendering, viewport
/// synchronization, measurement tools and region statistics behind the
/// operations the GUI collaborators call.
///
/// Single-threaded and cooperative; producers hand batches over to the
/// render thread (e.g. an mpsc channel drained each frame) and the render
/// thread calls `append_batch` before any decimation pass, so a sample's
/// four aligned values become visible atomically.
///
/// Redraws are requested, never performed: ingestion and interaction mark
/// surfaces dirty, and `refresh_surface` coalesces all pending work into
/// one decimation pass per surface per frame.
pub struct WaveformEngine {
    store: ChannelStore,
    viewport: ViewportController,
    measure: MeasurementEngine,
    rects: [Option<PixelRect>; 2],
    rendered: [Vec<RenderedSeries>; 2],
    needs_redraw: [bool; 2],
    pan: Option<PanState>,
    selection: Option<SelectionState>,
    drag_surface: Option<SurfaceId>,
    pending_report: Option<RegionReport>,
}
impl Default for WaveformEngine {
    fn default() -> Self {
        Self::new()
    }
}
impl WaveformEngine {
    pub fn new() -> Self {
        Self {
            store: ChannelStore::new(),
            viewport: ViewportController::new(),
            measure: MeasurementEngine::new(),
            rects: [None; 2],
            rendered: [
                vec![RenderedSeries::new(); CHANNEL_COUNT],
                vec![RenderedSeries::new(); CHANNEL_COUNT * 2],
            ],
            needs_redraw: [false; 2],
            pan: None,
            selection: None,
            drag_surface: None,
            pending_report: None,
        }
    }
    // --- ingestion ---------------------------------------------------------
    /// Single-channel append (legacy path; channel 0 is the legacy channel).
    pub fn append(&mut self, channel: usize, point: SamplePoint) {
        if self.store.append(channel, point) {
            self.viewport.on_ingest(point.time);
            self.request_redraw_all();
        }
    }
    /// One ingestion tick across multiple channels. Invalid channel ids are
    /// skipped; auto-follow tracks the newest timestamp actually stored.
    pub fn append_batch(&mut self, batch: &[(usize, SamplePoint)]) {
        let mut newest: Option<f64> = None;
        for &(channel, point) in batch {
            if self.store.append(channel, point) {
                newest = Some(newest.map_or(point.time, |m: f64| m.max(point.time)));
            }
        }
        if let Some(t) = newest {
            self.viewport.on_ingest(t);
            self.request_redraw_all();
        }
    }
    /// Clears the legacy channel 0 and its rendered series.
    pub fn clear(&mut self) {
        self.store.clear();
        self.rendered[SurfaceId::Voltage.index()][0].clear();
        self.rendered[SurfaceId::Current.index()][0].clear();
        self.rendered[SurfaceId::Current.index()][CHANNEL_COUNT].clear();
        self.request_redraw_all();
    }
    pub fn clear_channel(&mut self, channel: usize) {
        self.store.clear_channel(channel);
        if channel < CHANNEL_COUNT {
            self.rendered[SurfaceId::Voltage.index()][channel].clear();
            self.rendered[SurfaceId::Current.index()][channel].clear();
            self.rendered[SurfaceId::Current.index()][CHANNEL_COUNT + channel].clear();
        }
        self.request_redraw_all();
    }
    // --- visibility --------------------------------------------------------
    pub fn set_quantity_visible(&mut self, quantity: Quantity, visible: bool) {
        self.store.set_quantity_visible(quantity, visible);
        self.request_redraw_all();
    }
    pub fn set_channel_visible(&mut self, channel: usize, voltage: bool, current: bool, power: bool) {
        self.store.set_channel_visible(channel, voltage, current, power);
        self.request_redraw_all();
    }
    pub fn store(&self) -> &ChannelStore {
        &self.store
    }
    // --- viewport ----------------------------------------------------------
    pub fn set_auto_follow(&mut self, enable: bool) {
        self.viewport.set_auto_follow(enable);
    }
    pub fn auto_follow(&self) -> bool {
        self.viewport.auto_follow()
    }
    pub fn x_range(&self) -> AxisRange {
        self.viewport.x_range()
    }
    pub fn y_range(&self, surface: SurfaceId) -> AxisRange {
        self.viewport.y_range(surface)
    }
    pub fn power_range(&self) -> AxisRange {
        self.viewport.power_range()
    }
    pub fn view_width(&self) -> f64 {
        self.viewport.view_width()
    }
    pub fn set_view_width(&mut self, width: f64) {
        self.viewport.set_view_width(width);
    }
    /// A surface reports its horizontal range changed; the controller copies
    /// it to the twin surface under the suppress-echo flag.
    pub fn observe_surface_range(&mut self, surface: SurfaceId, range: AxisRange) {
        self.viewport.observe_range(surface, range);
        self.request_redraw_all();
    }
    /// Whether the surface's bounds must be rewritten after a sync.
    pub fn take_surface_sync(&mut self, surface: SurfaceId) -> bool {
        self.viewport.take_dirty(surface)
    }
    // --- measurement -------------------------------------------------------
    pub fn set_measure_mode(&mut self, mode: MeasureMode) {
        self.measure.set_mode(
            mode,
            self.viewport.x_range(),
            self.viewport.y_range(SurfaceId::Voltage),
            self.viewport.y_range(SurfaceId::Current),
        );
        self.request_redraw_all();
    }
    pub fn measure_mode(&self) -> MeasureMode {
        self.measure.mode()
    }
    pub fn cycle_measure_mode(&mut self) {
        self.set_measure_mode(self.measure.mode().next());
    }
    pub fn measure(&self) -> &MeasurementEngine {
        &self.measure
    }
    // --- per-frame geometry and rendering ----------------------------------
    /// The collaborator reports where the surface's plot area sits on
    /// screen. The engine derives pixel/coordinate mappings from this rect
    /// plus its own axis ranges.
    pub fn set_surface_rect(&mut self, surface: SurfaceId, rect: PixelRect) {
        let idx = surface.index();
        if self.rects[idx] != Some(rect) {
            self.needs_redraw[idx] = true;
        }
        self.rects[idx] = Some(rect);
    }
    pub fn surface_geometry(&self, surface: SurfaceId) -> Option<SurfaceGeometry> {
        let rect = self.rects[surface.index()]?;
        Some(SurfaceGeometry {
            rect,
            x: self.viewport.x_range(),
            y: self.viewport.y_range(surface),
            y2: match surface {
                SurfaceId::Voltage => None,
                SurfaceId::Current => Some(self.viewport.power_range()),
            },
        })
    }
    pub fn request_redraw(&mut self, surface: SurfaceId) {
        self.needs_redraw[surface.index()] = true;
    }
    pub fn request_redraw_all(&mut self) {
        self.needs_redraw = [true; 2];
    }
    pub fn needs_redraw(&self, surface: SurfaceId) -> bool {
        self.needs_redraw[surface.index()]
    }
    /// Runs the coalesced decimation pass for one surface, if anything
    /// requested it since the last pass. No-op until the surface has
    /// reported its rect.
    pub fn refresh_surface(&mut self, surface: SurfaceId) {
        let idx = surface.index();
        if !self.needs_redraw[idx] {
            return;
        }
        let Some(rect) = self.rects[idx] else {
            return;
        };
        let width = rect.width.max(1.0) as usize;
        let view = self.viewport.x_range();
        let store = &self.store;
        let rendered = &mut self.rendered[idx];
        for channel in 0..CHANNEL_COUNT {
            let series = store.channel(channel);
            let voltage_graphs = [(channel, Quantity::Voltage)];
            let current_graphs = [
                (channel, Quantity::Current),
                (CHANNEL_COUNT + channel, Quantity::Power),
            ];
            let graphs: &[(usize, Quantity)] = match surface {
                SurfaceId::Voltage => &voltage_graphs,
                SurfaceId::Current => &current_graphs,
            };
            for &(graph, quantity) in graphs {
                if !store.effective_visible(channel, quantity) {
                    rendered[graph].clear();
                    continue;
                }
                let Some(series) = series else { continue };
                if let Some(out) = decimate(&series.time, series.values(quantity), view, width) {
                    rendered[graph] = out;
                }
            }
        }
        self.needs_redraw[idx] = false;
        debug!("surface {:?} refreshed ({} px)", surface, width);
    }
    /// Decimated point sequence for one graph. Voltage surface: graph index
    /// is the channel id. Current surface: `0..CHANNEL_COUNT` are current
    /// curves, `CHANNEL_COUNT..2*CHANNEL_COUNT` are power curves.
    pub fn rendered_series(&self, surface: SurfaceId, graph: usize) -> &[[f64; 2]] {
        self.rendered[surface.index()]
            .get(graph)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
    // --- input routing ------------------------------------------------------
    /// Priority chain: measurement first, then pan, then box selection.
    /// Returns whether the press was consumed.
    pub fn on_pointer_press(&mut self, surface: SurfaceId, pos: PixelPos, button: PointerButton) -> bool {
        let Some(geom) = self.surface_geometry(surface) else {
            return false;
        };
        if button == PointerButton::Primary && self.measure.on_press(surface, pos, &geom) {
            self.drag_surface = Some(surface);
            self.request_redraw_all();
            return true;
        }
        match button {
            PointerButton::Middle | PointerButton::Secondary => {
                self.pan = Some(PanState {
                    surface,
                    button,
                    last: pos,
                });
                true
            }
            PointerButton::Primary => {
                self.selection = Some(SelectionState {
                    surface,
                    anchor: pos,
                    current: pos,
                });
                false
            }
        }
    }
    pub fn on_pointer_move(&mut self, surface: SurfaceId, pos: PixelPos) -> bool {
        let Some(geom) = self.surface_geometry(surface) else {
            return false;
        };
        // Crosshair follows every move and never consumes, so pan keeps
        // working underneath it.
        if self.measure.mode() == MeasureMode::Crosshair {
            self.measure.on_crosshair_move(surface, pos, &geom);
            self.request_redraw(surface);
        }
        if self.measure.drag_target().is_some() {
            // Convert through the axes of the surface the drag started on;
            // both surfaces must redraw because the time calipers are shared.
            let drag_surface = self.drag_surface.unwrap_or(surface);
            if let Some(drag_geom) = self.surface_geometry(drag_surface) {
                if self.measure.on_drag_move(pos, &drag_geom) {
                    self.request_redraw_all();
                    return true;
                }
            }
        }
        if let Some(pan) = self.pan {
            let Some(g) = self.surface_geometry(pan.surface) else {
                return false;
            };
            let dx = g.pixel_to_x(pos.x) - g.pixel_to_x(pan.last.x);
            let dy = g.pixel_to_y(pos.y) - g.pixel_to_y(pan.last.y);
            self.viewport.pan_x(-dx);
            self.viewport.pan_y(pan.surface, -dy);
            if let (Some(p_new), Some(p_old)) = (g.pixel_to_y2(pos.y), g.pixel_to_y2(pan.last.y)) {
                self.viewport.pan_power(-(p_new - p_old));
            }
            // A horizontal pan turns auto-follow off; dragging only the
            // value axis leaves it on.
            if dx.abs() > PAN_FOLLOW_EPSILON {
                self.viewport.clear_auto_follow_from_user();
            }
            self.pan = Some(PanState { last: pos, ..pan });
            self.request_redraw_all();
            return true;
        }
        if let Some(sel) = self.selection.as_mut() {
            sel.current = pos;
        }
        false
    }
    pub fn on_pointer_release(&mut self, _surface: SurfaceId, pos: PixelPos, button: PointerButton) -> bool {
        if button == PointerButton::Primary && self.measure.on_release() {
            self.drag_surface = None;
            return true;
        }
        if let Some(pan) = self.pan {
            if pan.button == button {
                self.pan = None;
                return true;
            }
        }
        if button == PointerButton::Primary {
            if let Some(sel) = self.selection.take() {
                let Some(geom) = self.surface_geometry(sel.surface) else {
                    return false;
                };
                if (pos.x - sel.anchor.x).abs() >= MIN_SELECT_DRAG_PX {
                    // Region statistics run against raw data, bypassing the
                    // decimator; completing a selection also stops following.
                    self.viewport.clear_auto_follow_from_user();
                    let t1 = geom.pixel_to_x(sel.anchor.x.min(pos.x));
                    let t2 = geom.pixel_to_x(sel.anchor.x.max(pos.x));
                    self.pending_report = Some(region_report(&self.store, sel.surface, t1, t2));
                    return true;
                }
            }
        }
        false
    }
    /// Wheel routing: left of the plot rect zooms the left value axis,
    /// right of the rect zooms the power axis (current surface only),
    /// inside the rect Ctrl zooms time only, plain wheel zooms both axes.
    pub fn on_wheel(&mut self, surface: SurfaceId, pos: PixelPos, delta_y: f32, ctrl: bool) -> bool {
        let Some(geom) = self.surface_geometry(surface) else {
            return false;
        };
        let factor = wheel_zoom_factor(delta_y);
        if pos.x < geom.rect.left {
            let r = zoom_about_zero(self.viewport.y_range(surface), factor, MIN_Y_SPAN);
            self.viewport.set_y_range(surface, r);
            self.request_redraw(surface);
            return true;
        }
        if pos.x > geom.rect.right() {
            if geom.y2.is_some() {
                let r = zoom_about_zero(self.viewport.power_range(), factor, MIN_Y_SPAN);
                self.viewport.set_power_range(r);
                self.request_redraw(surface);
                return true;
            }
            return false;
        }
        if ctrl {
            let anchor = geom.pixel_to_x(pos.x);
            let r = zoom_about(self.viewport.x_range(), anchor, factor);
            if r.size() >= MIN_X_SPAN {
                self.viewport.set_x_range_user(r);
            }
            self.request_redraw_all();
            return true;
        }
        let yr = zoom_about_zero(self.viewport.y_range(surface), factor, MIN_Y_SPAN);
        self.viewport.set_y_range(surface, yr);
        let xr = self.viewport.x_range();
        let zoomed = if xr.contains(0.0) {
            zoom_about_zero(xr, factor, MIN_X_SPAN)
        } else {
            zoom_about(xr, geom.pixel_to_x(pos.x), factor)
        };
        if zoomed.size() >= MIN_X_SPAN {
            self.viewport.set_x_range_user(zoomed);
        }
        self.request_redraw_all();
        true
    }
    /// Active box selection, for the collaborator to draw.
    pub fn selection(&self) -> Option<SelectionState> {
        self.selection
    }
    /// Surface owning the interaction in progress, if any; the collaborator
    /// keeps routing moves/releases there even when the pointer leaves it.
    pub fn capture_surface(&self) -> Option<SurfaceId> {
        self.drag_surface
            .or(self.pan.map(|p| p.surface))
            .or(self.selection.map(|s| s.surface))
    }
    /// Takes the report produced by the last completed box selection.
    pub fn take_region_report(&mut self) -> Option<RegionReport> {
        self.pending_report.take()
    }
    /// Nearest raw sample to a click among the surface's visible curves,
    /// within a small pixel tolerance. Always reads raw data, never the
    /// decimated series.
    pub fn pick_sample(&self, surface: SurfaceId, pos: PixelPos) -> Option<PickedSample> {
        let geom = self.surface_geometry(surface)?;
        let t = geom.pixel_to_x(pos.x);
        let quantities: &[Quantity] = match surface {
            SurfaceId::Voltage => &[Quantity::Voltage],
            SurfaceId::Current => &[Quantity::Current, Quantity::Power],
        };
        let mut best: Option<(f32, PickedSample)> = None;
        for channel in self.store.channel_ids() {
            let Some(series) = self.store.channel(channel) else {
                continue;
            };
            if series.is_empty() {
                continue;
            }
            let mut idx = series.time.partition_point(|&x| x < t);
            if idx >= series.len() {
                idx = series.len() - 1;
            }
            if idx > 0 && (series.time[idx - 1] - t).abs() < (series.time[idx] - t).abs() {
                idx -= 1;
            }
            for &quantity in quantities {
                if !self.store.effective_visible(channel, quantity) {
                    continue;
                }
                let time = series.time[idx];
                let value = series.values(quantity)[idx];
                let px = geom.x_to_pixel(time);
                let py = match quantity {
                    Quantity::Power => match geom.y2_to_pixel(value) {
                        Some(p) => p,
                        None => continue,
                    },
                    _ => geom.y_to_pixel(value),
                };
                let dist = ((px - pos.x).powi(2) + (py - pos.y).powi(2)).sqrt();
                if dist <= PICK_THRESHOLD_PX && best.map_or(true, |(d, _)| dist < d) {
                    best = Some((
                        dist,
                        PickedSample {
                            channel,
                            quantity,
                            time,
                            value,
                        },
                    ));
                }
            }
        }
        best.map(|(_, picked)| picked)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn engine_with_geometry() -> WaveformEngine {
        let mut engine = WaveformEngine::new();
        // Both surfaces 100x100 px; time axis defaults to [0, 10].
        engine.set_surface_rect(SurfaceId::Voltage, PixelRect::new(0.0, 0.0, 100.0, 100.0));
        engine.set_surface_rect(SurfaceId::Current, PixelRect::new(0.0, 120.0, 100.0, 100.0));
        engine
    }
    fn fill(engine: &mut WaveformEngine, n: usize) {
        for i in 0..n {
            let t = i as f64 * 0.001;
            engine.append_batch(&[
                (0, SamplePoint::new(t, (t * 40.0).sin(), 0.5)),
                (1, SamplePoint::new(t, (t * 25.0).cos(), 0.2)),
            ]);
        }
    }
    #[test]
    fn caliper_press_consumption_matches_the_contract() {
        let mut engine = engine_with_geometry();
        engine.set_measure_mode(MeasureMode::Calipers);
        // x1 = 3.3 -> 33 px; 3 px away is within the 6 px threshold.
        assert!(engine.on_pointer_press(
            SurfaceId::Voltage,
            PixelPos::new(30.0, 50.0),
            PointerButton::Primary
        ));
        assert!(engine.measure().drag_target().is_some());
        assert!(engine.on_pointer_release(
            SurfaceId::Voltage,
            PixelPos::new(30.0, 50.0),
            PointerButton::Primary
        ));
        // 10 px away from every handle: unconsumed.
        assert!(!engine.on_pointer_press(
            SurfaceId::Voltage,
            PixelPos::new(50.0, 50.0),
            PointerButton::Primary
        ));
    }
    #[test]
    fn box_selection_produces_a_report_and_stops_following() {
        let mut engine = engine_with_geometry();
        // Fill with follow off so the time axis stays at [0, 10] for the
        // pixel assertions below.
        engine.set_auto_follow(false);
        fill(&mut engine, 5000);
        engine.set_auto_follow(true);
        assert!(!engine.on_pointer_press(
            SurfaceId::Voltage,
            PixelPos::new(10.0, 10.0),
            PointerButton::Primary
        ));
        engine.on_pointer_move(SurfaceId::Voltage, PixelPos::new(40.0, 60.0));
        assert!(engine.selection().is_some());
        assert!(engine.on_pointer_release(
            SurfaceId::Voltage,
            PixelPos::new(40.0, 60.0),
            PointerButton::Primary
        ));
        assert!(!engine.auto_follow());
        let report = engine.take_region_report().unwrap();
        // 10 px -> 1.0 s, 40 px -> 4.0 s on a 100 px / 10 s axis.
        assert!((report.t_start - 1.0).abs() < 1e-9);
        assert!((report.t_end - 4.0).abs() < 1e-9);
        assert_eq!(report.stats[0].label, "Voltage (V)");
        assert!(report.stats[0].count > 0);
        assert!(engine.take_region_report().is_none());
    }
    #[test]
    fn tiny_selection_is_discarded() {
        let mut engine = engine_with_geometry();
        fill(&mut engine, 100);
        engine.on_pointer_press(SurfaceId::Voltage, PixelPos::new(10.0, 10.0), PointerButton::Primary);
        assert!(!engine.on_pointer_release(
            SurfaceId::Voltage,
            PixelPos::new(11.0, 10.0),
            PointerButton::Primary
        ));
        assert!(engine.take_region_report().is_none());
    }
    #[test]
    fn middle_drag_pans_and_clears_auto_follow() {
        let mut engine = engine_with_geometry();
        let before = engine.x_range();
        assert!(engine.on_pointer_press(
            SurfaceId::Voltage,
            PixelPos::new(50.0, 50.0),
            PointerButton::Middle
        ));
        assert!(engine.on_pointer_move(SurfaceId::Voltage, PixelPos::new(40.0, 50.0)));
        // Dragged 10 px left = 1 s: the view moves right.
        let after = engine.x_range();
        assert!((after.lower - (before.lower + 1.0)).abs() < 1e-9);
        assert!(!engine.auto_follow());
        assert!(engine.on_pointer_release(
            SurfaceId::Voltage,
            PixelPos::new(40.0, 50.0),
            PointerButton::Middle
        ));
    }
    #[test]
    fn vertical_pan_keeps_auto_follow_on() {
        let mut engine = engine_with_geometry();
        engine.on_pointer_press(SurfaceId::Voltage, PixelPos::new(50.0, 50.0), PointerButton::Secondary);
        engine.on_pointer_move(SurfaceId::Voltage, PixelPos::new(50.0, 40.0));
        assert!(engine.auto_follow());
        assert_ne!(engine.y_range(SurfaceId::Voltage), AxisRange::new(-6.0, 6.0));
    }
    #[test]
    fn ctrl_wheel_zooms_time_only() {
        let mut engine = engine_with_geometry();
        let y_before = engine.y_range(SurfaceId::Voltage);
        assert!(engine.on_wheel(SurfaceId::Voltage, PixelPos::new(50.0, 50.0), 1.0, true));
        assert_eq!(engine.y_range(SurfaceId::Voltage), y_before);
        assert!(engine.x_range().size() < 10.0);
        assert!(!engine.auto_follow());
    }
    #[test]
    fn wheel_left_of_the_rect_zooms_the_value_axis_only() {
        let mut engine = engine_with_geometry();
        engine.set_surface_rect(SurfaceId::Voltage, PixelRect::new(40.0, 0.0, 100.0, 100.0));
        let x_before = engine.x_range();
        assert!(engine.on_wheel(SurfaceId::Voltage, PixelPos::new(10.0, 50.0), 1.0, false));
        assert_eq!(engine.x_range(), x_before);
        assert!(engine.y_range(SurfaceId::Voltage).size() < 12.0);
        assert!(engine.auto_follow());
    }
    #[test]
    fn wheel_right_of_the_rect_zooms_the_power_axis() {
        let mut engine = engine_with_geometry();
        let p_before = engine.power_range();
        assert!(engine.on_wheel(SurfaceId::Current, PixelPos::new(110.0, 150.0), 1.0, false));
        assert!(engine.power_range().size() < p_before.size());
        // The voltage surface has no right axis there.
        assert!(!engine.on_wheel(SurfaceId::Voltage, PixelPos::new(110.0, 50.0), 1.0, false));
    }
    #[test]
    fn redraw_requests_coalesce_into_one_refresh() {
        let mut engine = engine_with_geometry();
        fill(&mut engine, 2000);
        assert!(engine.needs_redraw(SurfaceId::Voltage));
        engine.refresh_surface(SurfaceId::Voltage);
        assert!(!engine.needs_redraw(SurfaceId::Voltage));
        engine.refresh_surface(SurfaceId::Voltage);
        let series = engine.rendered_series(SurfaceId::Voltage, 0);
        assert!(!series.is_empty());
        assert!(series.len() <= 2 * 100);
    }
    #[test]
    fn graph_indexing_separates_current_and_power() {
        let mut engine = engine_with_geometry();
        fill(&mut engine, 500);
        engine.refresh_surface(SurfaceId::Current);
        assert!(!engine.rendered_series(SurfaceId::Current, 0).is_empty());
        assert!(!engine.rendered_series(SurfaceId::Current, CHANNEL_COUNT).is_empty());
        assert!(engine.rendered_series(SurfaceId::Current, 5).is_empty());
        assert!(engine.rendered_series(SurfaceId::Current, 999).is_empty());
    }
    #[test]
    fn hidden_graphs_render_nothing() {
        let mut engine = engine_with_geometry();
        fill(&mut engine, 500);
        engine.set_channel_visible(0, false, true, true);
        engine.refresh_surface(SurfaceId::Voltage);
        engine.refresh_surface(SurfaceId::Current);
        assert!(engine.rendered_series(SurfaceId::Voltage, 0).is_empty());
        assert!(!engine.rendered_series(SurfaceId::Voltage, 1).is_empty());
        assert!(!engine.rendered_series(SurfaceId::Current, 0).is_empty());
    }
    #[test]
    fn clear_empties_the_legacy_rendered_series() {
        let mut engine = engine_with_geometry();
        fill(&mut engine, 500);
        engine.refresh_surface(SurfaceId::Voltage);
        assert!(!engine.rendered_series(SurfaceId::Voltage, 0).is_empty());
        engine.clear();
        assert!(engine.rendered_series(SurfaceId::Voltage, 0).is_empty());
        assert!(engine.store().legacy().unwrap().is_empty());
        // Channel 1 survives a legacy clear.
        assert!(!engine.store().channel(1).unwrap().is_empty());
    }
    #[test]
    fn auto_follow_tracks_the_batch_maximum() {
        let mut engine = engine_with_geometry();
        engine.set_view_width(10.0);
        engine.append_batch(&[
            (0, SamplePoint::new(23.4, 1.0, 1.0)),
            (1, SamplePoint::new(22.9, 1.0, 1.0)),
            (CHANNEL_COUNT, SamplePoint::new(99.0, 1.0, 1.0)),
        ]);
        let r = engine.x_range();
        assert!((r.lower - 13.4).abs() < 1e-9);
        assert!((r.upper - 23.4).abs() < 1e-9);
    }
    #[test]
    fn pick_finds_the_nearest_raw_sample() {
        let mut engine = engine_with_geometry();
        for i in 0..11 {
            engine.append(0, SamplePoint::new(i as f64, 0.0, 0.0));
        }
        // t = 5 sits at x = 50 px; voltage 0 sits at y = 50 px.
        let picked = engine
            .pick_sample(SurfaceId::Voltage, PixelPos::new(52.0, 53.0))
            .unwrap();
        assert_eq!(picked.channel, 0);
        assert_eq!(picked.quantity, Quantity::Voltage);
        assert_eq!(picked.time, 5.0);
        assert_eq!(picked.value, 0.0);
        // Far from any curve: nothing.
        assert!(engine
            .pick_sample(SurfaceId::Voltage, PixelPos::new(52.0, 10.0))
            .is_none());
    }
}
