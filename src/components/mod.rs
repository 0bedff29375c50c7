pub mod byte_order;
pub mod data_type;
pub mod geo;
pub mod metadata;
pub mod read;
pub mod vrt;
pub mod write;

pub use byte_order::{
    flip_rows_in_place, swap_bytes_in_place, swap_bytes_with_mode, ByteOrder, SwapMode,
};
pub use data_type::{PixelBuffer, SampleType};
pub use geo::{resolve_epsg, GeoTransform, Hemisphere};
pub use metadata::{
    read_dataset_metadata, timestamp, write_dataset_metadata, MetadataDictionary, MetadataEntry,
};
pub use read::{read_raster_band, BandData};
pub use vrt::{append_suffix, band_label, build_from_files, check_for_vrt, VrtBand, VrtDescriptor};
pub use write::{materialize, write_raster, TiffLayout};
