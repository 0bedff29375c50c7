use gdal::raster::GdalDataType;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, VrtioError};

/// Sample types carried by raster descriptors and pixel buffers.
///
/// Complex types hold two primitive components per sample, interleaved
/// real/imaginary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleType {
    Byte,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    Float64,
    CInt16,
    CInt32,
    CFloat32,
    CFloat64,
}

impl SampleType {
    /// Type name as spelled in VRT `dataType` attributes.
    pub fn gdal_name(&self) -> &'static str {
        match self {
            SampleType::Byte => "Byte",
            SampleType::UInt16 => "UInt16",
            SampleType::Int16 => "Int16",
            SampleType::UInt32 => "UInt32",
            SampleType::Int32 => "Int32",
            SampleType::Float32 => "Float32",
            SampleType::Float64 => "Float64",
            SampleType::CInt16 => "CInt16",
            SampleType::CInt32 => "CInt32",
            SampleType::CFloat32 => "CFloat32",
            SampleType::CFloat64 => "CFloat64",
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            SampleType::CInt16 | SampleType::CInt32 | SampleType::CFloat32 | SampleType::CFloat64
        )
    }

    /// Primitive components per sample.
    pub fn components(&self) -> usize {
        if self.is_complex() {
            2
        } else {
            1
        }
    }

    /// Width of one primitive component in bytes.
    pub fn component_bytes(&self) -> usize {
        match self {
            SampleType::Byte => 1,
            SampleType::UInt16 | SampleType::Int16 | SampleType::CInt16 => 2,
            SampleType::UInt32
            | SampleType::Int32
            | SampleType::Float32
            | SampleType::CInt32
            | SampleType::CFloat32 => 4,
            SampleType::Float64 | SampleType::CFloat64 => 8,
        }
    }

    /// Width of one full sample in bytes.
    pub fn sample_bytes(&self) -> usize {
        self.component_bytes() * self.components()
    }

    pub fn from_gdal(value: GdalDataType) -> Result<Self> {
        match value {
            GdalDataType::UInt8 => Ok(SampleType::Byte),
            GdalDataType::UInt16 => Ok(SampleType::UInt16),
            GdalDataType::Int16 => Ok(SampleType::Int16),
            GdalDataType::UInt32 => Ok(SampleType::UInt32),
            GdalDataType::Int32 => Ok(SampleType::Int32),
            GdalDataType::Float32 => Ok(SampleType::Float32),
            GdalDataType::Float64 => Ok(SampleType::Float64),
            other => Err(VrtioError::UnsupportedDataType {
                operation: "band type mapping",
                data_type: format!("{other:?}"),
            }),
        }
    }
}

/// Raw contiguous samples for one band.
///
/// The buffer is caller owned; no operation retains a reference to it after
/// returning. Complex variants hold interleaved component pairs, so their
/// vectors are twice the sample count.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    Byte(Vec<u8>),
    UInt16(Vec<u16>),
    Int16(Vec<i16>),
    UInt32(Vec<u32>),
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    CInt16(Vec<i16>),
    CInt32(Vec<i32>),
    CFloat32(Vec<f32>),
    CFloat64(Vec<f64>),
}

impl PixelBuffer {
    /// Zeroed buffer sized for a `width` x `height` band.
    pub fn zeroed(data_type: SampleType, width: usize, height: usize) -> Self {
        let len = width * height * data_type.components();
        match data_type {
            SampleType::Byte => PixelBuffer::Byte(vec![0; len]),
            SampleType::UInt16 => PixelBuffer::UInt16(vec![0; len]),
            SampleType::Int16 => PixelBuffer::Int16(vec![0; len]),
            SampleType::UInt32 => PixelBuffer::UInt32(vec![0; len]),
            SampleType::Int32 => PixelBuffer::Int32(vec![0; len]),
            SampleType::Float32 => PixelBuffer::Float32(vec![0.; len]),
            SampleType::Float64 => PixelBuffer::Float64(vec![0.; len]),
            SampleType::CInt16 => PixelBuffer::CInt16(vec![0; len]),
            SampleType::CInt32 => PixelBuffer::CInt32(vec![0; len]),
            SampleType::CFloat32 => PixelBuffer::CFloat32(vec![0.; len]),
            SampleType::CFloat64 => PixelBuffer::CFloat64(vec![0.; len]),
        }
    }

    pub fn data_type(&self) -> SampleType {
        match self {
            PixelBuffer::Byte(_) => SampleType::Byte,
            PixelBuffer::UInt16(_) => SampleType::UInt16,
            PixelBuffer::Int16(_) => SampleType::Int16,
            PixelBuffer::UInt32(_) => SampleType::UInt32,
            PixelBuffer::Int32(_) => SampleType::Int32,
            PixelBuffer::Float32(_) => SampleType::Float32,
            PixelBuffer::Float64(_) => SampleType::Float64,
            PixelBuffer::CInt16(_) => SampleType::CInt16,
            PixelBuffer::CInt32(_) => SampleType::CInt32,
            PixelBuffer::CFloat32(_) => SampleType::CFloat32,
            PixelBuffer::CFloat64(_) => SampleType::CFloat64,
        }
    }

    fn component_count(&self) -> usize {
        match self {
            PixelBuffer::Byte(v) => v.len(),
            PixelBuffer::UInt16(v) => v.len(),
            PixelBuffer::Int16(v) => v.len(),
            PixelBuffer::UInt32(v) => v.len(),
            PixelBuffer::Int32(v) => v.len(),
            PixelBuffer::Float32(v) => v.len(),
            PixelBuffer::Float64(v) => v.len(),
            PixelBuffer::CInt16(v) => v.len(),
            PixelBuffer::CInt32(v) => v.len(),
            PixelBuffer::CFloat32(v) => v.len(),
            PixelBuffer::CFloat64(v) => v.len(),
        }
    }

    /// Number of samples; a complex pair counts once.
    pub fn sample_count(&self) -> usize {
        self.component_count() / self.data_type().components()
    }

    pub fn byte_len(&self) -> usize {
        self.component_count() * self.data_type().component_bytes()
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PixelBuffer::Byte(v) => v,
            PixelBuffer::UInt16(v) => bytemuck::cast_slice(v),
            PixelBuffer::Int16(v) => bytemuck::cast_slice(v),
            PixelBuffer::UInt32(v) => bytemuck::cast_slice(v),
            PixelBuffer::Int32(v) => bytemuck::cast_slice(v),
            PixelBuffer::Float32(v) => bytemuck::cast_slice(v),
            PixelBuffer::Float64(v) => bytemuck::cast_slice(v),
            PixelBuffer::CInt16(v) => bytemuck::cast_slice(v),
            PixelBuffer::CInt32(v) => bytemuck::cast_slice(v),
            PixelBuffer::CFloat32(v) => bytemuck::cast_slice(v),
            PixelBuffer::CFloat64(v) => bytemuck::cast_slice(v),
        }
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        match self {
            PixelBuffer::Byte(v) => v,
            PixelBuffer::UInt16(v) => bytemuck::cast_slice_mut(v),
            PixelBuffer::Int16(v) => bytemuck::cast_slice_mut(v),
            PixelBuffer::UInt32(v) => bytemuck::cast_slice_mut(v),
            PixelBuffer::Int32(v) => bytemuck::cast_slice_mut(v),
            PixelBuffer::Float32(v) => bytemuck::cast_slice_mut(v),
            PixelBuffer::Float64(v) => bytemuck::cast_slice_mut(v),
            PixelBuffer::CInt16(v) => bytemuck::cast_slice_mut(v),
            PixelBuffer::CInt32(v) => bytemuck::cast_slice_mut(v),
            PixelBuffer::CFloat32(v) => bytemuck::cast_slice_mut(v),
            PixelBuffer::CFloat64(v) => bytemuck::cast_slice_mut(v),
        }
    }
}
