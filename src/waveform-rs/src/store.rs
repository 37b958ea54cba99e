use std::collections::BTreeMap;

use log::debug;

/// Fixed upper bound on acquisition channels; ids outside `0..CHANNEL_COUNT`
/// are ignored on every ingestion path.
pub const CHANNEL_COUNT: usize = 20;
/// One acquired sample. A non-finite or exactly-zero `power` is treated as
/// "not supplied" and recomputed as `voltage * current` on ingestion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SamplePoint {
    pub time: f64,
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
}
impl SamplePoint {
    /// Sample without a measured power; the store derives it.
    pub fn new(time: f64, voltage: f64, current: f64) -> Self {
        Self {
            time,
            voltage,
            current,
            power: f64::NAN,
        }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    Voltage,
    Current,
    Power,
}
impl Quantity {
    pub fn label(self) -> &'static str {
        match self {
            Quantity::Voltage => "Voltage (V)",
            Quantity::Current => "Current (A)",
            Quantity::Power => "Power (W)",
        }
    }
}
/// Raw retained samples for one channel: four index-aligned arrays.
///
/// Caller contract: `time` is non-decreasing. The store neither sorts nor
/// validates; range queries binary-search and silently misbehave on
/// misordered input.
#[derive(Clone, Debug, Default)]
pub struct ChannelSeries {
    pub time: Vec<f64>,
    pub voltage: Vec<f64>,
    pub current: Vec<f64>,
    pub power: Vec<f64>,
}
impl ChannelSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
    pub fn values(&self, quantity: Quantity) -> &[f64] {
        match quantity {
            Quantity::Voltage => &self.voltage,
            Quantity::Current => &self.current,
            Quantity::Power => &self.power,
        }
    }
    /// Half-open index interval of samples with `t0 <= time <= t1`.
    pub fn range_indices(&self, t0: f64, t1: f64) -> (usize, usize) {
        let lo = self.time.partition_point(|&t| t < t0);
        let hi = self.time.partition_point(|&t| t <= t1);
        (lo, hi)
    }
    fn push(&mut self, point: SamplePoint) {
        self.time.push(point.time);
        self.voltage.push(point.voltage);
        self.current.push(point.current);
        self.power.push(derive_power(point));
    }
    fn truncate(&mut self) {
        self.time.clear();
        self.voltage.clear();
        self.current.clear();
        self.power.clear();
    }
}
fn derive_power(point: SamplePoint) -> f64 {
    if point.power.is_nan() || point.power.is_infinite() || point.power == 0.0 {
        point.voltage * point.current
    } else {
        point.power
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelVisibility {
    pub voltage: bool,
    pub current: bool,
    pub power: bool,
}
impl Default for ChannelVisibility {
    fn default() -> Self {
        Self {
            voltage: true,
            current: true,
            power: true,
        }
    }
}
impl ChannelVisibility {
    fn get(&self, quantity: Quantity) -> bool {
        match quantity {
            Quantity::Voltage => self.voltage,
            Quantity::Current => self.current,
            Quantity::Power => self.power,
        }
    }
}
/// Append-only raw sample retention, the source of truth for statistics.
///
/// Channels are created lazily on first sample; nothing is ever removed
/// except through an explicit clear. "Legacy" single-channel accessors are a
/// view over channel 0 — there is no second copy.
pub struct ChannelStore {
    channels: BTreeMap<usize, ChannelSeries>,
    visibility: BTreeMap<usize, ChannelVisibility>,
    global: ChannelVisibility,
}
impl Default for ChannelStore {
    fn default() -> Self {
        Self::new()
    }
}
impl ChannelStore {
    pub fn new() -> Self {
        Self {
            channels: BTreeMap::new(),
            visibility: BTreeMap::new(),
            global: ChannelVisibility::default(),
        }
    }
    /// Appends one sample. Out-of-range ids are a silent no-op.
    /// Returns whether the sample was stored.
    pub fn append(&mut self, channel: usize, point: SamplePoint) -> bool {
        if channel >= CHANNEL_COUNT {
            debug!("append ignored: channel {channel} out of range");
            return false;
        }
        self.channels.entry(channel).or_default().push(point);
        true
    }
    /// Clears the legacy channel (channel 0) only.
    pub fn clear(&mut self) {
        if let Some(series) = self.channels.get_mut(&0) {
            series.truncate();
        }
    }
    pub fn clear_channel(&mut self, channel: usize) {
        if let Some(series) = self.channels.get_mut(&channel) {
            series.truncate();
        }
    }
    pub fn channel(&self, channel: usize) -> Option<&ChannelSeries> {
        self.channels.get(&channel)
    }
    /// Legacy single-channel view (channel 0).
    pub fn legacy(&self) -> Option<&ChannelSeries> {
        self.channel(0)
    }
    pub fn channel_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.channels.keys().copied()
    }
    pub fn set_quantity_visible(&mut self, quantity: Quantity, visible: bool) {
        match quantity {
            Quantity::Voltage => self.global.voltage = visible,
            Quantity::Current => self.global.current = visible,
            Quantity::Power => self.global.power = visible,
        }
    }
    pub fn quantity_visible(&self, quantity: Quantity) -> bool {
        self.global.get(quantity)
    }
    pub fn set_channel_visible(&mut self, channel: usize, voltage: bool, current: bool, power: bool) {
        if channel >= CHANNEL_COUNT {
            return;
        }
        self.visibility.insert(
            channel,
            ChannelVisibility {
                voltage,
                current,
                power,
            },
        );
    }
    /// Effective visibility: per-channel flag AND global quantity flag.
    pub fn effective_visible(&self, channel: usize, quantity: Quantity) -> bool {
        let per_channel = self
            .visibility
            .get(&channel)
            .copied()
            .unwrap_or_default()
            .get(quantity);
        per_channel && self.global.get(quantity)
    }
}
