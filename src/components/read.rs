use std::path::Path;

use gdal::{
    raster::{GdalType, RasterBand},
    Dataset,
};
use log::info;

use crate::{
    components::{
        metadata::{read_dataset_metadata, MetadataDictionary},
        PixelBuffer, SampleType,
    },
    errors::{Result, VrtioError},
};

/// One band's samples together with the dataset metadata carried with it.
#[derive(Debug, Clone)]
pub struct BandData {
    pub buffer: PixelBuffer,
    pub width: usize,
    pub height: usize,
    pub metadata: MetadataDictionary,
}

impl BandData {
    pub fn data_type(&self) -> SampleType {
        self.buffer.data_type()
    }
}

/// Read one full band of a virtual or physical raster.
///
/// `band_index` is 1-based. The returned buffer is in whatever byte order
/// the engine decodes to; callers wanting on-disk bytes normalize
/// themselves.
pub fn read_raster_band(path: impl AsRef<Path>, band_index: usize) -> Result<BandData> {
    let path = path.as_ref();
    info!("reading band {band_index} of {}", path.display());
    let dataset = Dataset::open(path)?;
    let count = dataset.raster_count();
    if band_index < 1 || band_index > count {
        return Err(VrtioError::BandOutOfRange {
            path: path.to_path_buf(),
            band: band_index,
            count,
        });
    }
    let band = dataset.rasterband(band_index)?;
    let (width, height) = (band.x_size(), band.y_size());
    let data_type = SampleType::from_gdal(band.band_type())?;
    let buffer = read_samples(&band, width, height, data_type)?;
    let metadata = read_dataset_metadata(&dataset);
    Ok(BandData {
        buffer,
        width,
        height,
        metadata,
    })
}

fn read_samples(
    band: &RasterBand,
    width: usize,
    height: usize,
    data_type: SampleType,
) -> Result<PixelBuffer> {
    Ok(match data_type {
        SampleType::Byte => PixelBuffer::Byte(typed_read(band, width, height)?),
        SampleType::UInt16 => PixelBuffer::UInt16(typed_read(band, width, height)?),
        SampleType::Int16 => PixelBuffer::Int16(typed_read(band, width, height)?),
        SampleType::UInt32 => PixelBuffer::UInt32(typed_read(band, width, height)?),
        SampleType::Int32 => PixelBuffer::Int32(typed_read(band, width, height)?),
        SampleType::Float32 => PixelBuffer::Float32(typed_read(band, width, height)?),
        SampleType::Float64 => PixelBuffer::Float64(typed_read(band, width, height)?),
        complex => return Err(VrtioError::unsupported("band read", complex)),
    })
}

fn typed_read<T: GdalType + Copy>(
    band: &RasterBand,
    width: usize,
    height: usize,
) -> Result<Vec<T>> {
    let buffer = band.read_as::<T>((0, 0), (width, height), (width, height), None)?;
    Ok(buffer.data().to_vec())
}
