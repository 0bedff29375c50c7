use std::path::Path;

use gdal::{
    raster::{Buffer as GdalBuffer, GdalType, RasterCreationOptions},
    spatial_ref::SpatialRef,
    Dataset, Driver, DriverManager,
};
use log::{info, warn};

use crate::{
    components::{
        byte_order::{flip_rows_in_place, swap_bytes_in_place},
        metadata::{write_dataset_metadata, MetadataDictionary},
        vrt::{append_suffix, VrtBand, VrtDescriptor},
        ByteOrder, GeoTransform, PixelBuffer, SampleType,
    },
    errors::{Result, VrtioError},
};

const GTIFF_OPTIONS: &[&str] = &["COMPRESS=DEFLATE", "BIGTIFF=IF_NEEDED"];
const COG_OPTIONS: &[&str] = &[
    "COMPRESS=DEFLATE",
    "BIGTIFF=IF_NEEDED",
    "BLOCKSIZE=512",
    "OVERVIEWS=AUTO",
];

/// Output flavor for [materialize].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffLayout {
    /// Compressed GeoTIFF written directly to disk.
    GeoTiff,
    /// Cloud-optimized GeoTIFF, staged in memory and copied into its tiled
    /// form with overviews.
    CloudOptimized,
}

/// Write `buffer` as a single-band uncompressed raster plus a companion
/// virtual descriptor carrying the geo-transform, byte order tag, and
/// metadata.
///
/// When `byte_order` differs from the machine's, the buffer is swapped in
/// place before writing and left in on-disk order; the caller must hold
/// exclusive access to it for the duration of the call.
pub fn write_raster(
    path: impl AsRef<Path>,
    buffer: &mut PixelBuffer,
    width: usize,
    height: usize,
    geo_transform: GeoTransform,
    byte_order: ByteOrder,
    metadata: &MetadataDictionary,
) -> Result<()> {
    let path = path.as_ref();
    expect_sample_count(buffer, width, height)?;
    let data_type = buffer.data_type();
    info!("writing {}", path.display());
    let driver = DriverManager::get_driver_by_name("ENVI")?;
    let mut dataset = create_dataset(&driver, path, width, height, data_type, None)?;
    if !byte_order.is_native() {
        swap_bytes_in_place(buffer.as_bytes_mut(), data_type)?;
    }
    write_samples(&mut dataset, width, height, buffer)?;
    dataset.close()?;
    let mut descriptor = VrtDescriptor::new(width, height, geo_transform, byte_order)
        .with_metadata(metadata.clone());
    descriptor.push_band(VrtBand::new(path, data_type));
    descriptor.write_to(append_suffix(path, ".vrt"))
}

/// Write `buffer` as a projected, compressed raster.
///
/// The caller's rows are bottom-up while the file's run top-down, so a
/// staging copy is row-flipped before writing; the caller's buffer is never
/// touched. A CRS identifier that fails to import is logged and the raster
/// is written without a projection.
#[allow(clippy::too_many_arguments)]
pub fn materialize(
    path: impl AsRef<Path>,
    buffer: &PixelBuffer,
    width: usize,
    height: usize,
    geo_transform: GeoTransform,
    epsg_code: &str,
    metadata: &MetadataDictionary,
    no_data_value: Option<f64>,
    layout: TiffLayout,
) -> Result<()> {
    let path = path.as_ref();
    expect_sample_count(buffer, width, height)?;
    info!("materializing {}", path.display());
    let mut dataset = match layout {
        TiffLayout::GeoTiff => {
            let driver = DriverManager::get_driver_by_name("GTiff")?;
            let options = RasterCreationOptions::from_iter(GTIFF_OPTIONS.iter().copied());
            create_dataset(&driver, path, width, height, buffer.data_type(), Some(&options))?
        }
        TiffLayout::CloudOptimized => {
            let driver = DriverManager::get_driver_by_name("MEM")?;
            create_dataset(&driver, Path::new(""), width, height, buffer.data_type(), None)?
        }
    };
    dataset.set_geo_transform(&geo_transform.as_array())?;
    match epsg_code
        .parse::<u32>()
        .ok()
        .and_then(|code| SpatialRef::from_epsg(code).ok())
    {
        Some(srs) => dataset.set_spatial_ref(&srs)?,
        None => warn!(
            "cannot import EPSG code {epsg_code:?}, writing {} without a projection",
            path.display()
        ),
    }
    if let Some(no_data) = no_data_value {
        let mut band = dataset.rasterband(1)?;
        band.set_no_data_value(Some(no_data))?;
    }
    let mut staged = buffer.clone();
    flip_rows_in_place(
        staged.as_bytes_mut(),
        width * staged.data_type().sample_bytes(),
    );
    write_samples(&mut dataset, width, height, &staged)?;
    if !metadata.is_empty() {
        write_dataset_metadata(&mut dataset, metadata)?;
    }
    if layout == TiffLayout::CloudOptimized {
        let driver = DriverManager::get_driver_by_name("COG")?;
        let options = RasterCreationOptions::from_iter(COG_OPTIONS.iter().copied());
        let copy = driver.create_copy(path, &dataset, &options)?;
        copy.close()?;
    }
    dataset.close()?;
    Ok(())
}

fn expect_sample_count(buffer: &PixelBuffer, width: usize, height: usize) -> Result<()> {
    let expected = width * height;
    if buffer.sample_count() != expected {
        return Err(VrtioError::BufferSize {
            expected,
            actual: buffer.sample_count(),
        });
    }
    Ok(())
}

fn create_dataset(
    driver: &Driver,
    path: &Path,
    width: usize,
    height: usize,
    data_type: SampleType,
    options: Option<&RasterCreationOptions>,
) -> Result<Dataset> {
    match data_type {
        SampleType::Byte => typed_create::<u8>(driver, path, width, height, options),
        SampleType::UInt16 => typed_create::<u16>(driver, path, width, height, options),
        SampleType::Int16 => typed_create::<i16>(driver, path, width, height, options),
        SampleType::UInt32 => typed_create::<u32>(driver, path, width, height, options),
        SampleType::Int32 => typed_create::<i32>(driver, path, width, height, options),
        SampleType::Float32 => typed_create::<f32>(driver, path, width, height, options),
        SampleType::Float64 => typed_create::<f64>(driver, path, width, height, options),
        complex => Err(VrtioError::unsupported("physical raster write", complex)),
    }
}

fn typed_create<T: GdalType>(
    driver: &Driver,
    path: &Path,
    width: usize,
    height: usize,
    options: Option<&RasterCreationOptions>,
) -> Result<Dataset> {
    let dataset = match options {
        Some(options) => {
            driver.create_with_band_type_with_options::<T, _>(path, width, height, 1, options)?
        }
        None => driver.create_with_band_type::<T, _>(path, width, height, 1)?,
    };
    Ok(dataset)
}

fn write_samples(
    dataset: &mut Dataset,
    width: usize,
    height: usize,
    buffer: &PixelBuffer,
) -> Result<()> {
    match buffer {
        PixelBuffer::Byte(data) => typed_write(dataset, width, height, data),
        PixelBuffer::UInt16(data) => typed_write(dataset, width, height, data),
        PixelBuffer::Int16(data) => typed_write(dataset, width, height, data),
        PixelBuffer::UInt32(data) => typed_write(dataset, width, height, data),
        PixelBuffer::Int32(data) => typed_write(dataset, width, height, data),
        PixelBuffer::Float32(data) => typed_write(dataset, width, height, data),
        PixelBuffer::Float64(data) => typed_write(dataset, width, height, data),
        complex => Err(VrtioError::unsupported(
            "physical raster write",
            complex.data_type(),
        )),
    }
}

fn typed_write<T: GdalType + Copy>(
    dataset: &Dataset,
    width: usize,
    height: usize,
    data: &[T],
) -> Result<()> {
    let mut band = dataset.rasterband(1)?;
    let mut buffer = GdalBuffer::new((width, height), data.to_vec());
    band.write((0, 0), (width, height), &mut buffer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::read::read_raster_band;

    fn pattern() -> Vec<f32> {
        (0..16).map(|value| value as f32 * 0.5 - 2.0).collect()
    }

    fn transform() -> GeoTransform {
        GeoTransform::from_origin(-200_000.0, -2_000_000.0, 4, 4, 100.0, 100.0)
    }

    #[test]
    fn size_mismatch_is_rejected_before_any_io() {
        let mut buffer = PixelBuffer::Float32(pattern());
        let result = write_raster(
            "/nonexistent/out.bin",
            &mut buffer,
            5,
            5,
            transform(),
            ByteOrder::native(),
            &MetadataDictionary::new(),
        );
        assert!(matches!(result, Err(VrtioError::BufferSize { .. })));
    }

    #[test]
    fn complex_buffers_cannot_materialize() {
        let buffer = PixelBuffer::zeroed(SampleType::CFloat32, 4, 4);
        let result = materialize(
            "/nonexistent/out.tif",
            &buffer,
            4,
            4,
            transform(),
            "3413",
            &MetadataDictionary::new(),
            None,
            TiffLayout::GeoTiff,
        );
        assert!(matches!(
            result,
            Err(VrtioError::UnsupportedDataType { .. })
        ));
    }

    #[test_log::test]
    fn swapped_raster_round_trips_through_its_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pattern.bin");
        let mut metadata = MetadataDictionary::new();
        metadata.insert("Producer", "vrtio");
        let original = pattern();
        let mut buffer = PixelBuffer::Float32(original.clone());
        write_raster(&path, &mut buffer, 4, 4, transform(), ByteOrder::Msb, &metadata).unwrap();
        if cfg!(target_endian = "little") {
            // caller's buffer is left in on-disk order
            assert_ne!(buffer, PixelBuffer::Float32(original.clone()));
        }
        let read = read_raster_band(append_suffix(&path, ".vrt"), 1).unwrap();
        assert_eq!(read.buffer, PixelBuffer::Float32(original));
        assert_eq!((read.width, read.height), (4, 4));
        assert_eq!(read.metadata.get("Producer"), Some("vrtio"));
    }

    #[test]
    fn materialized_rows_are_flipped_but_the_source_is_not() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flipped.tif");
        let original = pattern();
        let buffer = PixelBuffer::Float32(original.clone());
        let mut metadata = MetadataDictionary::new();
        metadata.insert("GrandMosaic", "winter");
        materialize(
            &path,
            &buffer,
            4,
            4,
            transform(),
            "3413",
            &metadata,
            Some(-2.0e9),
            TiffLayout::GeoTiff,
        )
        .unwrap();
        assert_eq!(buffer, PixelBuffer::Float32(original.clone()));
        let read = read_raster_band(&path, 1).unwrap();
        let flipped: Vec<f32> = original.chunks(4).rev().flatten().copied().collect();
        assert_eq!(read.buffer, PixelBuffer::Float32(flipped));
        assert_eq!(read.metadata.get("GrandMosaic"), Some("winter"));
    }

    #[test]
    fn unknown_crs_identifier_degrades_to_no_projection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.tif");
        let buffer = PixelBuffer::Float32(pattern());
        materialize(
            &path,
            &buffer,
            4,
            4,
            transform(),
            "not-a-code",
            &MetadataDictionary::new(),
            None,
            TiffLayout::GeoTiff,
        )
        .unwrap();
        assert!(path.exists());
    }
}
