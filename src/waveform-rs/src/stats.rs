use super::store::{ChannelStore, Quantity};
use super::surface::SurfaceId;

/// Single-pass aggregate of one quantity over the selected interval.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantityStats {
    pub label: &'static str,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}
/// Result of a completed box selection: interval bounds plus per-quantity
/// aggregates. Producing the report has no other side effect.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionReport {
    pub t_start: f64,
    pub t_end: f64,
    pub stats: Vec<QuantityStats>,
}
impl RegionReport {
    pub fn duration(&self) -> f64 {
        self.t_end - self.t_start
    }
    pub fn format(&self) -> String {
        let mut out = format!(
            "=== Region Statistics ===\nTime range: {:.2} s - {:.2} s\nDuration: {:.3} s\n",
            self.t_start,
            self.t_end,
            self.duration()
        );
        for s in &self.stats {
            out.push_str(&format!("\n{}:\n", s.label));
            if s.count > 0 {
                out.push_str(&format!(
                    "  Avg: {:.3}\n  Max: {:.3}\n  Min: {:.3}\n",
                    s.mean, s.max, s.min
                ));
            } else {
                out.push_str("  No Data\n");
            }
        }
        out
    }
}
// Neumaier-compensated accumulator; keeps the mean honest over long runs.
#[derive(Default)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}
impl CompensatedSum {
    fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }
    fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}
/// Computes count/min/max/mean over the raw legacy (channel 0) arrays for
/// every quantity visible on the given surface. Bounds may arrive in either
/// order; they are normalized so `t_start <= t_end`.
///
/// Always reads the raw retained samples, never the decimated rendering.
pub fn region_report(store: &ChannelStore, surface: SurfaceId, t_a: f64, t_b: f64) -> RegionReport {
    let t_start = t_a.min(t_b);
    let t_end = t_a.max(t_b);
    let quantities: &[Quantity] = match surface {
        SurfaceId::Voltage => &[Quantity::Voltage],
        SurfaceId::Current => &[Quantity::Current, Quantity::Power],
    };
    let mut stats = Vec::new();
    for &quantity in quantities {
        if !store.quantity_visible(quantity) {
            continue;
        }
        stats.push(quantity_stats(store, quantity, t_start, t_end));
    }
    RegionReport {
        t_start,
        t_end,
        stats,
    }
}
fn quantity_stats(store: &ChannelStore, quantity: Quantity, t_start: f64, t_end: f64) -> QuantityStats {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = CompensatedSum::default();
    let mut count = 0usize;
    if let Some(series) = store.legacy() {
        let (lo, hi) = series.range_indices(t_start, t_end);
        for &v in &series.values(quantity)[lo..hi] {
            min = min.min(v);
            max = max.max(v);
            sum.add(v);
            count += 1;
        }
    }
    let mean = if count > 0 {
        sum.value() / count as f64
    } else {
        0.0
    };
    QuantityStats {
        label: quantity.label(),
        count,
        min,
        max,
        mean,
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use super::super::store::SamplePoint;
    fn filled_store(n: usize) -> ChannelStore {
        let mut store = ChannelStore::new();
        for i in 0..n {
            let t = i as f64 * 0.01;
            store.append(
                0,
                SamplePoint::new(t, (t * 3.0).sin() * 2.0 + 1.0, (t * 5.0).cos() * 0.5),
            );
        }
        store
    }
    #[test]
    fn full_range_matches_a_naive_reference() {
        let store = filled_store(5000);
        let report = region_report(&store, SurfaceId::Voltage, -1.0, 1000.0);
        let series = store.legacy().unwrap();
        let naive_min = series.voltage.iter().cloned().fold(f64::INFINITY, f64::min);
        let naive_max = series
            .voltage
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let naive_mean = series.voltage.iter().sum::<f64>() / series.voltage.len() as f64;
        let v = &report.stats[0];
        assert_eq!(v.count, 5000);
        assert_eq!(v.min, naive_min);
        assert_eq!(v.max, naive_max);
        assert!((v.mean - naive_mean).abs() < 1e-9);
    }
    #[test]
    fn inverted_bounds_are_normalized() {
        let store = filled_store(100);
        let report = region_report(&store, SurfaceId::Voltage, 0.5, 0.1);
        assert_eq!(report.t_start, 0.1);
        assert_eq!(report.t_end, 0.5);
        assert!((report.duration() - 0.4).abs() < 1e-12);
        assert_eq!(report.stats[0].count, 41);
    }
    #[test]
    fn current_surface_reports_current_and_power() {
        let store = filled_store(100);
        let report = region_report(&store, SurfaceId::Current, 0.0, 1.0);
        let labels: Vec<_> = report.stats.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Current (A)", "Power (W)"]);
    }
    #[test]
    fn hidden_quantities_are_skipped() {
        let mut store = filled_store(100);
        store.set_quantity_visible(Quantity::Power, false);
        let report = region_report(&store, SurfaceId::Current, 0.0, 1.0);
        let labels: Vec<_> = report.stats.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Current (A)"]);
    }
    #[test]
    fn empty_interval_formats_as_no_data() {
        let store = filled_store(100);
        let report = region_report(&store, SurfaceId::Voltage, 500.0, 600.0);
        assert_eq!(report.stats[0].count, 0);
        assert!(report.format().contains("No Data"));
    }
    #[test]
    fn mean_survives_a_large_offset() {
        let mut store = ChannelStore::new();
        for i in 0..10_000 {
            store.append(
                0,
                SamplePoint::new(i as f64, 1.0e9 + (i % 2) as f64, 0.0),
            );
        }
        let report = region_report(&store, SurfaceId::Voltage, 0.0, 1.0e6);
        assert!((report.stats[0].mean - (1.0e9 + 0.5)).abs() < 1e-3);
    }
}
