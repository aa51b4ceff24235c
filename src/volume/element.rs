//! This module defines the data element API, which enables the decoder to
//! read the voxel values of every supported scalar type and normalize them
//! into single precision floating point samples.
use crate::error::{NiftiError, Result};
use crate::typedef::NiftiType;
use byteordered::Endian;
use num_traits::AsPrimitive;
use std::io::Read;
use std::mem::size_of;

/// Trait type for characterizing a NIfTI data element, implemented for
/// primitive numeric types which voxel values can be stored as.
pub trait DataElement: 'static + Sized + Copy + AsPrimitive<f32> {
    /// The `datatype` mapped to the type T
    const DATA_TYPE: NiftiType;

    /// Read a single element from the given byte source.
    fn from_raw<R, E>(src: R, endianness: E) -> std::io::Result<Self>
    where
        R: Read,
        E: Endian;
}

macro_rules! impl_data_element {
    ($t:ty, $dt:ident, $read:ident) => {
        impl DataElement for $t {
            const DATA_TYPE: NiftiType = NiftiType::$dt;
            fn from_raw<R, E>(src: R, e: E) -> std::io::Result<Self>
            where
                R: Read,
                E: Endian,
            {
                e.$read(src)
            }
        }
    };
}

impl DataElement for u8 {
    const DATA_TYPE: NiftiType = NiftiType::Uint8;
    fn from_raw<R, E>(mut src: R, _: E) -> std::io::Result<Self>
    where
        R: Read,
        E: Endian,
    {
        let mut b = [0u8; 1];
        src.read_exact(&mut b)?;
        Ok(b[0])
    }
}

impl DataElement for i8 {
    const DATA_TYPE: NiftiType = NiftiType::Int8;
    fn from_raw<R, E>(src: R, e: E) -> std::io::Result<Self>
    where
        R: Read,
        E: Endian,
    {
        u8::from_raw(src, e).map(|b| b as i8)
    }
}

impl_data_element!(u16, Uint16, read_u16);
impl_data_element!(i16, Int16, read_i16);
impl_data_element!(u32, Uint32, read_u32);
impl_data_element!(i32, Int32, read_i32);
impl_data_element!(u64, Uint64, read_u64);
impl_data_element!(i64, Int64, read_i64);
impl_data_element!(f32, Float32, read_f32);
impl_data_element!(f64, Float64, read_f64);

/// Convert `count` consecutive elements of type `T` into `f32` samples.
/// The byte buffer must hold at least `count * size_of::<T>()` bytes.
pub fn convert_bytes_to_f32<T, E>(bytes: &[u8], count: usize, endianness: E) -> Result<Vec<f32>>
where
    T: DataElement,
    E: Endian + Copy,
{
    let expected = count * size_of::<T>();
    if bytes.len() < expected {
        return Err(NiftiError::IncompatibleLength(expected, bytes.len()));
    }
    bytes[..expected]
        .chunks_exact(size_of::<T>())
        .map(|chunk| {
            T::from_raw(chunk, endianness)
                .map(|v| v.as_())
                .map_err(NiftiError::from)
        })
        .collect()
}

/// Decode `count` voxels of the given data type, in header byte order,
/// into `f32` samples. No scaling is applied here.
///
/// # Errors
///
/// - `NiftiError::UnsupportedDataType` for complex, RGB and 128-bit types.
/// - `NiftiError::IncompatibleLength` if the buffer is too short.
pub fn decode_samples<E>(
    datatype: NiftiType,
    bytes: &[u8],
    count: usize,
    endianness: E,
) -> Result<Vec<f32>>
where
    E: Endian + Copy,
{
    match datatype {
        NiftiType::Uint8 => convert_bytes_to_f32::<u8, E>(bytes, count, endianness),
        NiftiType::Int8 => convert_bytes_to_f32::<i8, E>(bytes, count, endianness),
        NiftiType::Uint16 => convert_bytes_to_f32::<u16, E>(bytes, count, endianness),
        NiftiType::Int16 => convert_bytes_to_f32::<i16, E>(bytes, count, endianness),
        NiftiType::Uint32 => convert_bytes_to_f32::<u32, E>(bytes, count, endianness),
        NiftiType::Int32 => convert_bytes_to_f32::<i32, E>(bytes, count, endianness),
        NiftiType::Uint64 => convert_bytes_to_f32::<u64, E>(bytes, count, endianness),
        NiftiType::Int64 => convert_bytes_to_f32::<i64, E>(bytes, count, endianness),
        NiftiType::Float32 => convert_bytes_to_f32::<f32, E>(bytes, count, endianness),
        NiftiType::Float64 => convert_bytes_to_f32::<f64, E>(bytes, count, endianness),
        other => Err(NiftiError::UnsupportedDataType(other)),
    }
}
