use super::surface::{AxisRange, RenderedSeries};

/// Columns narrower than this are widened; keeps `bin` sane on tiny plots.
const MIN_PIXEL_WIDTH: usize = 50;
/// Min-Max visual decimation.
///
/// Reduces a raw series to at most two points per pixel column (the column's
/// minimum and maximum, emitted in timestamp order so the polyline never
/// doubles back within a column). The raw arrays are never modified; output
/// length is bounded by `2 * width` regardless of retained sample count.
///
/// Returns `None` when there is nothing to do — empty input or a degenerate
/// (zero/negative width) visible range — so the caller keeps its previous
/// rendered series.
pub fn decimate(time: &[f64], values: &[f64], view: AxisRange, pixel_width: usize) -> Option<RenderedSeries> {
    debug_assert_eq!(time.len(), values.len());
    if time.is_empty() || time.len() != values.len() {
        return None;
    }
    let w = pixel_width.max(MIN_PIXEL_WIDTH);
    let bin = view.size() / w as f64;
    if !(bin > 0.0) {
        return None;
    }
    let i0 = time.partition_point(|&t| t < view.lower);
    let i1 = time.partition_point(|&t| t <= view.upper);
    // Hardly anything visible: plot the raw arrays as-is.
    if i1.saturating_sub(i0) <= 2 {
        return Some(time.iter().zip(values).map(|(&t, &v)| [t, v]).collect());
    }
    let mut out: RenderedSeries = Vec::with_capacity(w * 2);
    let mut bin_start = view.lower;
    let mut idx = i0;
    for px in 0..w {
        let last_bin = px == w - 1;
        // The last column is closed on the right so the trailing sample at
        // exactly `view.upper` is not lost.
        let bin_end = if last_bin { view.upper } else { bin_start + bin };
        let mut seen = false;
        let (mut min_v, mut max_v) = (0.0, 0.0);
        let (mut min_t, mut max_t) = (0.0, 0.0);
        while idx < i1 {
            let t = time[idx];
            let past_end = if last_bin { t > bin_end } else { t >= bin_end };
            if past_end {
                break;
            }
            let v = values[idx];
            if !seen {
                seen = true;
                min_v = v;
                max_v = v;
                min_t = t;
                max_t = t;
            } else {
                if v < min_v {
                    min_v = v;
                    min_t = t;
                }
                if v > max_v {
                    max_v = v;
                    max_t = t;
                }
            }
            idx += 1;
        }
        if seen {
            if min_t <= max_t {
                out.push([min_t, min_v]);
                out.push([max_t, max_v]);
            } else {
                out.push([max_t, max_v]);
                out.push([min_t, min_v]);
            }
        }
        bin_start = bin_end;
    }
    Some(out)
}
#[cfg(test)]
mod tests {
    use super::*;
    fn ramp(n: usize) -> (Vec<f64>, Vec<f64>) {
        let time: Vec<f64> = (0..n).map(|i| i as f64 / 100.0).collect();
        let values: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin() * 3.0).collect();
        (time, values)
    }
    #[test]
    fn output_is_bounded_by_pixel_budget() {
        let (time, values) = ramp(50_000);
        let view = AxisRange::new(0.0, 500.0);
        let out = decimate(&time, &values, view, 300).unwrap();
        assert!(out.len() <= 2 * 300);
        let (lo, hi) = (
            time.partition_point(|&t| t < view.lower),
            time.partition_point(|&t| t <= view.upper),
        );
        assert!(out.len() <= hi - lo);
    }
    #[test]
    fn is_idempotent_for_unchanged_input() {
        let (time, values) = ramp(10_000);
        let view = AxisRange::new(10.0, 60.0);
        let a = decimate(&time, &values, view, 400).unwrap();
        let b = decimate(&time, &values, view, 400).unwrap();
        assert_eq!(a, b);
    }
    #[test]
    fn preserves_global_envelope() {
        let (time, values) = ramp(20_000);
        let view = AxisRange::new(0.0, 200.0);
        let out = decimate(&time, &values, view, 200).unwrap();
        let raw_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let raw_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let out_min = out.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
        let out_max = out.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(out_min, raw_min);
        assert_eq!(out_max, raw_max);
    }
    #[test]
    fn sparse_window_returns_full_arrays() {
        let time = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let values = vec![5.0, 6.0, 7.0, 8.0, 9.0];
        // Only two samples inside the view: passthrough of everything.
        let out = decimate(&time, &values, AxisRange::new(0.5, 2.5), 100).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], [0.0, 5.0]);
        assert_eq!(out[4], [4.0, 9.0]);
    }
    #[test]
    fn last_column_keeps_trailing_sample() {
        let n = 1000;
        let time: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let values: Vec<f64> = (0..n).map(|i| i as f64 * 2.0).collect();
        let view = AxisRange::new(0.0, (n - 1) as f64);
        let out = decimate(&time, &values, view, 60).unwrap();
        let last_t = out.last().unwrap()[0];
        assert_eq!(last_t, (n - 1) as f64);
    }
    #[test]
    fn degenerate_range_is_a_no_op() {
        let (time, values) = ramp(100);
        assert!(decimate(&time, &values, AxisRange::new(5.0, 5.0), 100).is_none());
        assert!(decimate(&time, &values, AxisRange::new(5.0, 1.0), 100).is_none());
        assert!(decimate(&[], &[], AxisRange::new(0.0, 1.0), 100).is_none());
    }
    #[test]
    fn points_are_time_ordered_within_each_column() {
        let (time, values) = ramp(5_000);
        let out = decimate(&time, &values, AxisRange::new(0.0, 50.0), 100).unwrap();
        for pair in out.chunks(2) {
            if pair.len() == 2 {
                assert!(pair[0][0] <= pair[1][0]);
            }
        }
    }
    #[test]
    fn narrow_width_is_clamped() {
        let (time, values) = ramp(10_000);
        let out = decimate(&time, &values, AxisRange::new(0.0, 100.0), 1).unwrap();
        // Clamp to 50 columns, two points each.
        assert!(out.len() <= 100);
        assert!(out.len() > 2);
    }
}
