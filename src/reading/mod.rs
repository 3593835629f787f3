pub mod derived;
pub mod file_properties;
pub mod record;
pub mod station;
pub mod utc_offsets;

use anyhow::Result;

pub use derived::Derived;
pub use file_properties::{FileProperties, Resolution, SiteId};
pub use record::{FluxRecord, Header};
pub use station::{load_station, Ingested, SkipReason, StationSeries};
pub use utc_offsets::UtcOffsets;

// Define a trait for deserializing a line into a reading
pub trait Reading: Sized {
    fn from_line(line: &str, header: &Header) -> Result<Self>;
    fn is_valid(&self) -> bool;
}
