use log::debug;

use super::surface::{AxisRange, PixelPos, SurfaceGeometry, SurfaceId};

/// A pointer press within this many pixels of a caliper line grabs it.
const HIT_THRESHOLD_PX: f32 = 6.0;
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasureMode {
    Off,
    Crosshair,
    Calipers,
}
impl MeasureMode {
    pub fn next(self) -> Self {
        match self {
            MeasureMode::Off => MeasureMode::Crosshair,
            MeasureMode::Crosshair => MeasureMode::Calipers,
            MeasureMode::Calipers => MeasureMode::Off,
        }
    }
}
/// Which caliper line is currently being dragged. Time lines are shared
/// across both surfaces; value lines belong to one surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragHandle {
    X1,
    X2,
    Y1V,
    Y2V,
    Y1I,
    Y2I,
}
/// Caliper line positions in data coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaliperGeometry {
    pub x1: f64,
    pub x2: f64,
    pub y1_v: f64,
    pub y2_v: f64,
    pub y1_i: f64,
    pub y2_i: f64,
}
/// Pointer-following readout; no geometry survives a mode change.
#[derive(Clone, Debug, PartialEq)]
pub struct Crosshair {
    pub x: f64,
    pub y: f64,
    pub label: String,
}
/// State machine for the interactive measurement tools.
///
/// Geometry is owned, optional state: entering `Off` drops everything,
/// entering a non-Off mode lazily materializes what that mode needs.
/// Re-entering a mode that already has geometry is a no-op.
pub struct MeasurementEngine {
    mode: MeasureMode,
    calipers: Option<CaliperGeometry>,
    crosshair: [Option<Crosshair>; 2],
    drag: Option<DragHandle>,
    caliper_text: [String; 2],
}
impl Default for MeasurementEngine {
    fn default() -> Self {
        Self::new()
    }
}
impl MeasurementEngine {
    pub fn new() -> Self {
        Self {
            mode: MeasureMode::Off,
            calipers: None,
            crosshair: [None, None],
            drag: None,
            caliper_text: [String::new(), String::new()],
        }
    }
    pub fn mode(&self) -> MeasureMode {
        self.mode
    }
    /// Switches mode. The visible ranges seed caliper defaults at 33% and
    /// 66% of each axis when the geometry is first created.
    pub fn set_mode(&mut self, mode: MeasureMode, x: AxisRange, y_v: AxisRange, y_i: AxisRange) {
        self.mode = mode;
        if mode == MeasureMode::Off {
            self.calipers = None;
            self.crosshair = [None, None];
            self.drag = None;
            self.caliper_text = [String::new(), String::new()];
            return;
        }
        if self.calipers.is_none() {
            self.calipers = Some(CaliperGeometry {
                x1: x.lower + x.size() * 0.33,
                x2: x.lower + x.size() * 0.66,
                y1_v: y_v.lower + y_v.size() * 0.33,
                y2_v: y_v.lower + y_v.size() * 0.66,
                y1_i: y_i.lower + y_i.size() * 0.33,
                y2_i: y_i.lower + y_i.size() * 0.66,
            });
        }
        self.update_readouts();
        debug!("measure mode -> {:?}", mode);
    }
    pub fn cycle(&mut self, x: AxisRange, y_v: AxisRange, y_i: AxisRange) {
        self.set_mode(self.mode.next(), x, y_v, y_i);
    }
    pub fn calipers(&self) -> Option<&CaliperGeometry> {
        self.calipers.as_ref()
    }
    pub fn crosshair(&self, surface: SurfaceId) -> Option<&Crosshair> {
        self.crosshair[surface.index()].as_ref()
    }
    pub fn drag_target(&self) -> Option<DragHandle> {
        self.drag
    }
    /// ΔT/ΔV readout on the voltage surface, ΔT/ΔA on the current surface.
    pub fn caliper_text(&self, surface: SurfaceId) -> &str {
        &self.caliper_text[surface.index()]
    }
    /// Visibility of every geometry element is gated solely by the mode.
    pub fn crosshair_visible(&self) -> bool {
        self.mode == MeasureMode::Crosshair
    }
    pub fn calipers_visible(&self) -> bool {
        self.mode == MeasureMode::Calipers
    }
    /// Caliper hit-test on pointer press. Vertical (time) lines are checked
    /// first and win over horizontal ones; horizontal candidates are the
    /// pressed surface's own. Returns whether the press was consumed.
    pub fn on_press(&mut self, surface: SurfaceId, pos: PixelPos, geom: &SurfaceGeometry) -> bool {
        if self.mode != MeasureMode::Calipers {
            return false;
        }
        let Some(cal) = self.calipers else {
            return false;
        };
        self.drag = None;
        let dx1 = (geom.x_to_pixel(cal.x1) - pos.x).abs();
        let dx2 = (geom.x_to_pixel(cal.x2) - pos.x).abs();
        if dx1.min(dx2) <= HIT_THRESHOLD_PX {
            self.drag = Some(if dx1 <= dx2 {
                DragHandle::X1
            } else {
                DragHandle::X2
            });
            return true;
        }
        let (c1, c2, h1, h2) = match surface {
            SurfaceId::Voltage => (cal.y1_v, cal.y2_v, DragHandle::Y1V, DragHandle::Y2V),
            SurfaceId::Current => (cal.y1_i, cal.y2_i, DragHandle::Y1I, DragHandle::Y2I),
        };
        let dy1 = (geom.y_to_pixel(c1) - pos.y).abs();
        let dy2 = (geom.y_to_pixel(c2) - pos.y).abs();
        if dy1.min(dy2) <= HIT_THRESHOLD_PX {
            self.drag = Some(if dy1 <= dy2 { h1 } else { h2 });
            return true;
        }
        false
    }
    /// Drag step: overwrites the single scalar the grabbed handle owns.
    /// Returns true (consumed) while a drag is active; the caller must
    /// redraw both surfaces because the time calipers are shared.
    pub fn on_drag_move(&mut self, pos: PixelPos, geom: &SurfaceGeometry) -> bool {
        if self.mode != MeasureMode::Calipers {
            return false;
        }
        let Some(handle) = self.drag else {
            return false;
        };
        let Some(cal) = self.calipers.as_mut() else {
            return false;
        };
        let x = geom.pixel_to_x(pos.x);
        let y = geom.pixel_to_y(pos.y);
        match handle {
            DragHandle::X1 => cal.x1 = x,
            DragHandle::X2 => cal.x2 = x,
            DragHandle::Y1V => cal.y1_v = y,
            DragHandle::Y2V => cal.y2_v = y,
            DragHandle::Y1I => cal.y1_i = y,
            DragHandle::Y2I => cal.y2_i = y,
        }
        self.update_readouts();
        true
    }
    /// Release consumes the event only if a drag was in progress.
    pub fn on_release(&mut self) -> bool {
        if self.mode != MeasureMode::Calipers {
            return false;
        }
        if self.drag.is_none() {
            return false;
        }
        self.drag = None;
        true
    }
    /// Crosshair tracking: recomputes the pointer's data-space coordinates
    /// and that surface's readout label. Never consumes the event.
    pub fn on_crosshair_move(&mut self, surface: SurfaceId, pos: PixelPos, geom: &SurfaceGeometry) {
        if self.mode != MeasureMode::Crosshair {
            return;
        }
        let x = geom.pixel_to_x(pos.x);
        let y = geom.pixel_to_y(pos.y);
        let label = match surface {
            SurfaceId::Voltage => format!("T: {x:.6} s\nV: {y:.6}"),
            SurfaceId::Current => format!("T: {x:.6} s\nI: {y:.6}"),
        };
        self.crosshair[surface.index()] = Some(Crosshair { x, y, label });
    }
    fn update_readouts(&mut self) {
        let Some(cal) = self.calipers else {
            return;
        };
        let dt = (cal.x2 - cal.x1).abs();
        let dv = (cal.y2_v - cal.y1_v).abs();
        let di = (cal.y2_i - cal.y1_i).abs();
        self.caliper_text[SurfaceId::Voltage.index()] = format!("ΔT: {dt:.6} s\nΔV: {dv:.6}");
        self.caliper_text[SurfaceId::Current.index()] = format!("ΔT: {dt:.6} s\nΔA: {di:.6}");
    }
}
