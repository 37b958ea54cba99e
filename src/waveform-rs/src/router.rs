use super::surface::{AxisRange, PixelPos, SurfaceId};

/// 15% per wheel notch, matching the chart's zoom feel.
pub const WHEEL_ZOOM_STEP: f64 = 1.15;
/// Vertical axes never shrink below this span.
pub const MIN_Y_SPAN: f64 = 0.01;
/// The time axis never shrinks below this span.
pub const MIN_X_SPAN: f64 = 1e-9;
/// Horizontal displacement below this (in data units) counts as a
/// vertical-only pan and leaves auto-follow alone.
pub const PAN_FOLLOW_EPSILON: f64 = 0.001;
/// Drags shorter than this (pixels) do not complete a box selection.
pub const MIN_SELECT_DRAG_PX: f32 = 4.0;
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}
/// Middle/right-button pan in progress.
#[derive(Clone, Copy, Debug)]
pub struct PanState {
    pub surface: SurfaceId,
    pub button: PointerButton,
    pub last: PixelPos,
}
/// Left-button box selection in progress.
#[derive(Clone, Copy, Debug)]
pub struct SelectionState {
    pub surface: SurfaceId,
    pub anchor: PixelPos,
    pub current: PixelPos,
}
pub fn wheel_zoom_factor(delta_y: f32) -> f64 {
    if delta_y >= 0.0 {
        WHEEL_ZOOM_STEP
    } else {
        1.0 / WHEEL_ZOOM_STEP
    }
}
/// Zooms keeping zero fixed when zero is inside the range; otherwise zooms
/// about the range center. Used for value axes so a symmetric signal stays
/// symmetric while zooming.
pub fn zoom_about_zero(range: AxisRange, factor: f64, min_span: f64) -> AxisRange {
    let new_size = (range.size() / factor).max(min_span);
    if range.lower <= 0.0 && range.upper >= 0.0 {
        let lower_ratio = -range.lower / range.size();
        let upper_ratio = range.upper / range.size();
        AxisRange::new(-new_size * lower_ratio, new_size * upper_ratio)
    } else {
        let center = range.center();
        AxisRange::new(center - new_size * 0.5, center + new_size * 0.5)
    }
}
/// Zooms about an arbitrary anchor coordinate (the pointer position).
pub fn zoom_about(range: AxisRange, anchor: f64, factor: f64) -> AxisRange {
    AxisRange::new(
        anchor - (anchor - range.lower) / factor,
        anchor + (range.upper - anchor) / factor,
    )
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn zoom_in_keeps_zero_pinned() {
        let r = zoom_about_zero(AxisRange::new(-2.0, 8.0), WHEEL_ZOOM_STEP, MIN_Y_SPAN);
        // Zero sat at 20% from the lower edge; it still does.
        assert!((-r.lower / r.size() - 0.2).abs() < 1e-12);
        assert!((r.size() - 10.0 / WHEEL_ZOOM_STEP).abs() < 1e-12);
    }
    #[test]
    fn zoom_without_zero_in_range_uses_the_center() {
        let r = zoom_about_zero(AxisRange::new(10.0, 20.0), 2.0, MIN_Y_SPAN);
        assert!((r.center() - 15.0).abs() < 1e-12);
        assert!((r.size() - 5.0).abs() < 1e-12);
    }
    #[test]
    fn zoom_respects_the_minimum_span() {
        let r = zoom_about_zero(AxisRange::new(-0.004, 0.004), 10.0, MIN_Y_SPAN);
        assert!((r.size() - MIN_Y_SPAN).abs() < 1e-12);
    }
    #[test]
    fn anchored_zoom_keeps_the_anchor_fixed() {
        let before = AxisRange::new(0.0, 10.0);
        let after = zoom_about(before, 2.0, 2.0);
        // The anchor's relative position is preserved.
        let rel_before = (2.0 - before.lower) / before.size();
        let rel_after = (2.0 - after.lower) / after.size();
        assert!((rel_before - rel_after).abs() < 1e-12);
        assert!((after.size() - 5.0).abs() < 1e-12);
    }
    #[test]
    fn wheel_direction_picks_the_factor() {
        assert_eq!(wheel_zoom_factor(1.0), WHEEL_ZOOM_STEP);
        assert_eq!(wheel_zoom_factor(-1.0), 1.0 / WHEEL_ZOOM_STEP);
    }
}
