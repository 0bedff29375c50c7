//! Assemble virtual raster descriptors and materialize geocoded rasters
//! through GDAL, carrying ordered per-dataset metadata.

mod components;
mod errors;

pub use components::{
    append_suffix, band_label, build_from_files, check_for_vrt, flip_rows_in_place, materialize,
    read_dataset_metadata, read_raster_band, resolve_epsg, swap_bytes_in_place,
    swap_bytes_with_mode, timestamp, write_dataset_metadata, write_raster, BandData, ByteOrder,
    GeoTransform, Hemisphere, MetadataDictionary, MetadataEntry, PixelBuffer, SampleType,
    SwapMode, TiffLayout, VrtBand, VrtDescriptor,
};
pub use errors::{Result, VrtioError};
