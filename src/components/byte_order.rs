use serde::{Deserialize, Serialize};

use crate::{
    components::SampleType,
    errors::{Result, VrtioError},
};

/// On-disk byte order tag, shared by every band of one descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    Lsb,
    Msb,
}

impl ByteOrder {
    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::Lsb
        } else {
            ByteOrder::Msb
        }
    }

    pub fn is_native(&self) -> bool {
        *self == Self::native()
    }

    /// Tag value used by raw VRT bands.
    pub fn vrt_tag(&self) -> &'static str {
        match self {
            ByteOrder::Lsb => "LSB",
            ByteOrder::Msb => "MSB",
        }
    }
}

/// How 16-bit samples are grouped when swapped.
///
/// Legacy producers grouped pairs of 16-bit samples into one 32-bit swap
/// unit; that output can only be matched by doing the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapMode {
    /// Every sample swaps at its own width.
    #[default]
    Exact,
    /// 16-bit samples swap as 4-byte groups; a trailing lone sample is left
    /// untouched, as the legacy output was.
    Legacy16As32,
}

/// Swap `buffer` between the two on-disk byte orders in place.
///
/// Complex samples swap per component. Applying the same call twice
/// restores the original buffer.
pub fn swap_bytes_in_place(buffer: &mut [u8], data_type: SampleType) -> Result<()> {
    swap_bytes_with_mode(buffer, data_type, SwapMode::Exact)
}

pub fn swap_bytes_with_mode(
    buffer: &mut [u8],
    data_type: SampleType,
    mode: SwapMode,
) -> Result<()> {
    let width = match (data_type.component_bytes(), mode) {
        (1, _) => return Ok(()),
        (2, SwapMode::Legacy16As32) => 4,
        (width, _) => width,
    };
    if mode == SwapMode::Exact && buffer.len() % width != 0 {
        return Err(VrtioError::UnalignedBuffer {
            len: buffer.len(),
            width,
        });
    }
    for group in buffer.chunks_exact_mut(width) {
        group.reverse();
    }
    Ok(())
}

/// Reverse the row order of `buffer` in place.
///
/// `row_bytes` is the raster width times the sample width. The middle row of
/// an odd-height raster stays put.
pub fn flip_rows_in_place(buffer: &mut [u8], row_bytes: usize) {
    if row_bytes == 0 {
        return;
    }
    let rows = buffer.len() / row_bytes;
    for row in 0..rows / 2 {
        let (head, tail) = buffer.split_at_mut((rows - 1 - row) * row_bytes);
        head[row * row_bytes..(row + 1) * row_bytes].swap_with_slice(&mut tail[..row_bytes]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn native_order_matches_target() {
        if cfg!(target_endian = "little") {
            assert_eq!(ByteOrder::native(), ByteOrder::Lsb);
            assert!(!ByteOrder::Msb.is_native());
        }
    }

    #[rstest]
    #[case(SampleType::Byte)]
    #[case(SampleType::UInt16)]
    #[case(SampleType::Int16)]
    #[case(SampleType::UInt32)]
    #[case(SampleType::Int32)]
    #[case(SampleType::Float32)]
    #[case(SampleType::Float64)]
    #[case(SampleType::CInt16)]
    #[case(SampleType::CInt32)]
    #[case(SampleType::CFloat32)]
    #[case(SampleType::CFloat64)]
    fn double_swap_restores_buffer(#[case] data_type: SampleType) {
        let mut buffer: Vec<u8> = (0..64u8).collect();
        let original = buffer.clone();
        swap_bytes_in_place(&mut buffer, data_type).unwrap();
        swap_bytes_in_place(&mut buffer, data_type).unwrap();
        assert_eq!(buffer, original);
    }

    #[test]
    fn float32_swaps_four_byte_groups() {
        let mut buffer = vec![0, 1, 2, 3, 4, 5, 6, 7];
        swap_bytes_in_place(&mut buffer, SampleType::Float32).unwrap();
        assert_eq!(buffer, vec![3, 2, 1, 0, 7, 6, 5, 4]);
    }

    #[test]
    fn complex_float32_swaps_each_component() {
        let mut buffer = vec![0, 1, 2, 3, 4, 5, 6, 7];
        swap_bytes_in_place(&mut buffer, SampleType::CFloat32).unwrap();
        assert_eq!(buffer, vec![3, 2, 1, 0, 7, 6, 5, 4]);
    }

    #[test]
    fn sixteen_bit_swaps_at_own_width_by_default() {
        let mut buffer = vec![0, 1, 2, 3];
        swap_bytes_in_place(&mut buffer, SampleType::UInt16).unwrap();
        assert_eq!(buffer, vec![1, 0, 3, 2]);
    }

    #[test]
    fn legacy_mode_groups_sixteen_bit_pairs() {
        let mut buffer = vec![0, 1, 2, 3];
        swap_bytes_with_mode(&mut buffer, SampleType::Int16, SwapMode::Legacy16As32).unwrap();
        assert_eq!(buffer, vec![3, 2, 1, 0]);
    }

    #[test]
    fn legacy_mode_leaves_trailing_sample_alone() {
        let mut buffer = vec![0, 1, 2, 3, 4, 5];
        swap_bytes_with_mode(&mut buffer, SampleType::Int16, SwapMode::Legacy16As32).unwrap();
        assert_eq!(buffer, vec![3, 2, 1, 0, 4, 5]);
    }

    #[test]
    fn byte_samples_are_a_no_op() {
        let mut buffer = vec![9, 8, 7];
        swap_bytes_in_place(&mut buffer, SampleType::Byte).unwrap();
        assert_eq!(buffer, vec![9, 8, 7]);
    }

    #[test]
    fn partial_sample_is_rejected() {
        let mut buffer = vec![0, 1, 2];
        assert!(swap_bytes_in_place(&mut buffer, SampleType::Float32).is_err());
    }

    #[test]
    fn row_flip_reverses_and_restores() {
        let mut buffer = vec![1, 1, 2, 2, 3, 3];
        flip_rows_in_place(&mut buffer, 2);
        assert_eq!(buffer, vec![3, 3, 2, 2, 1, 1]);
        flip_rows_in_place(&mut buffer, 2);
        assert_eq!(buffer, vec![1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn row_flip_keeps_middle_row_of_odd_height() {
        let mut buffer = vec![1, 2, 3];
        flip_rows_in_place(&mut buffer, 1);
        assert_eq!(buffer, vec![3, 2, 1]);
    }
}
