pub mod decimate;
pub mod engine;
pub mod measure;
pub mod router;
pub mod stats;
pub mod store;
pub mod surface;
pub mod viewport;
pub use decimate::decimate;
pub use engine::{PickedSample, SampleBatch, WaveformEngine};
pub use measure::{CaliperGeometry, Crosshair, DragHandle, MeasureMode, MeasurementEngine};
pub use router::{PointerButton, SelectionState};
pub use stats::{region_report, QuantityStats, RegionReport};
pub use store::{ChannelSeries, ChannelStore, Quantity, SamplePoint, CHANNEL_COUNT};
pub use surface::{AxisRange, PixelPos, PixelRect, RenderedSeries, SurfaceGeometry, SurfaceId};
pub use viewport::{ViewportController, DEFAULT_VIEW_WIDTH};
