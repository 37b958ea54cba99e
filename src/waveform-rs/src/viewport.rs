use log::debug;

use super::surface::{AxisRange, SurfaceId};

pub const DEFAULT_VIEW_WIDTH: f64 = 10.0;
/// Owns the shared horizontal range of both surfaces plus each surface's
/// vertical ranges, and implements auto-follow.
///
/// Both surfaces always report the same time axis at rest: a range change
/// observed on one surface is copied to the other under a suppress-echo flag
/// so the propagated write cannot recurse back into the originator. An
/// auto-follow placement raises `following` for its duration so the
/// resulting range-change is not mistaken for a user pan.
pub struct ViewportController {
    x: AxisRange,
    y: [AxisRange; 2],
    power: AxisRange,
    view_width: f64,
    auto_follow: bool,
    syncing: bool,
    following: bool,
    dirty: [bool; 2],
}
impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}
impl ViewportController {
    pub fn new() -> Self {
        Self {
            x: AxisRange::new(0.0, DEFAULT_VIEW_WIDTH),
            y: [AxisRange::new(-6.0, 6.0), AxisRange::new(-3.0, 3.0)],
            power: AxisRange::new(-12.0, 12.0),
            view_width: DEFAULT_VIEW_WIDTH,
            auto_follow: true,
            syncing: false,
            following: false,
            dirty: [false; 2],
        }
    }
    pub fn x_range(&self) -> AxisRange {
        self.x
    }
    pub fn y_range(&self, surface: SurfaceId) -> AxisRange {
        self.y[surface.index()]
    }
    pub fn power_range(&self) -> AxisRange {
        self.power
    }
    pub fn view_width(&self) -> f64 {
        self.view_width
    }
    pub fn set_view_width(&mut self, width: f64) {
        if width > 0.0 {
            self.view_width = width;
        }
    }
    pub fn auto_follow(&self) -> bool {
        self.auto_follow
    }
    pub fn set_auto_follow(&mut self, enable: bool) {
        self.auto_follow = enable;
    }
    /// A horizontal range change originating from a surface (user pan/zoom
    /// or the collaborator reporting back). Updates the remembered view
    /// width, copies the range to the other surface, and suppresses the
    /// echo that copy would otherwise produce.
    pub fn observe_range(&mut self, surface: SurfaceId, range: AxisRange) {
        if self.syncing {
            return;
        }
        self.view_width = range.size();
        self.syncing = true;
        self.x = range;
        self.dirty[surface.other().index()] = true;
        self.syncing = false;
    }
    /// Horizontal range set by an interaction (pan/zoom). Clears auto-follow
    /// unless this is the engine's own following update.
    pub fn set_x_range_user(&mut self, range: AxisRange) {
        self.view_width = range.size();
        self.x = range;
        if !self.following {
            self.auto_follow = false;
        }
        self.dirty = [true; 2];
    }
    /// Pans the shared time axis without touching auto-follow; the caller
    /// decides whether the displacement is large enough to count as a
    /// horizontal pan.
    pub fn pan_x(&mut self, delta: f64) {
        self.x = self.x.shifted(delta);
        self.dirty = [true; 2];
    }
    pub fn clear_auto_follow_from_user(&mut self) {
        if !self.following {
            self.auto_follow = false;
        }
    }
    pub fn pan_y(&mut self, surface: SurfaceId, delta: f64) {
        self.y[surface.index()] = self.y[surface.index()].shifted(delta);
        self.dirty[surface.index()] = true;
    }
    pub fn pan_power(&mut self, delta: f64) {
        self.power = self.power.shifted(delta);
        self.dirty[SurfaceId::Current.index()] = true;
    }
    pub fn set_y_range(&mut self, surface: SurfaceId, range: AxisRange) {
        self.y[surface.index()] = range;
        self.dirty[surface.index()] = true;
    }
    pub fn set_power_range(&mut self, range: AxisRange) {
        self.power = range;
        self.dirty[SurfaceId::Current.index()] = true;
    }
    /// Called after ingestion with the newest timestamp seen across the
    /// batch. When auto-follow is on, the visible range becomes
    /// `[newest - view_width, newest]`, right-aligned; the `following` flag
    /// keeps this placement from being treated as a user pan.
    pub fn on_ingest(&mut self, newest_time: f64) {
        if !self.auto_follow {
            return;
        }
        let width = if self.view_width > 0.0 {
            self.view_width
        } else {
            DEFAULT_VIEW_WIDTH
        };
        self.following = true;
        self.x = AxisRange::new(newest_time - width, newest_time);
        self.dirty = [true; 2];
        self.following = false;
        debug!("auto-follow -> [{:.3}, {:.3}]", self.x.lower, self.x.upper);
    }
    /// True once per sync: whether the surface's bounds must be rewritten.
    pub fn take_dirty(&mut self, surface: SurfaceId) -> bool {
        std::mem::take(&mut self.dirty[surface.index()])
    }
}
