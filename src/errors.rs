use std::path::PathBuf;

use crate::components::{geo::Hemisphere, SampleType};

pub type Result<T> = std::result::Result<T, VrtioError>;

#[derive(thiserror::Error, Debug)]
pub enum VrtioError {
    #[error(transparent)]
    GdalError(#[from] gdal::errors::GdalError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    XmlError(#[from] quick_xml::Error),
    #[error("no EPSG code known for rotation {rotation}, standard latitude {standard_latitude}, hemisphere {hemisphere:?}")]
    UnsupportedProjection {
        rotation: f64,
        standard_latitude: f64,
        hemisphere: Hemisphere,
    },
    #[error("{operation}: data type {data_type} is not supported")]
    UnsupportedDataType {
        operation: &'static str,
        data_type: String,
    },
    #[error("{}: band {band} out of range, dataset has {count} bands", .path.display())]
    BandOutOfRange {
        path: PathBuf,
        band: usize,
        count: usize,
    },
    #[error("buffer holds {actual} samples but the raster needs {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("buffer of {len} bytes is not a whole number of {width} byte samples")]
    UnalignedBuffer { len: usize, width: usize },
}

impl VrtioError {
    pub(crate) fn unsupported(operation: &'static str, data_type: SampleType) -> Self {
        VrtioError::UnsupportedDataType {
            operation,
            data_type: data_type.gdal_name().to_string(),
        }
    }
}
