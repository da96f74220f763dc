//! Event source: OpenLineage-style event records read once per render.

pub mod parse;
pub mod record;

pub use parse::{load_events, origin_label};
pub use record::{RawDataset, RawEvent};
