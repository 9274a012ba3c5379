use dicom::object::DefaultDicomObject;
use dicom::pixeldata::{ConvertOptions, DecodedPixelData, ModalityLutOption, PixelDecoder};
use ndarray::{Array4, s};

use crate::error::Result;

/// Element types a volume can be assembled from.
///
/// Decoding keeps the stored sample values: no modality LUT or rescale is
/// applied.
pub trait PixelSample: Copy + Default + Send + Sync + 'static {
    /// Decode all frames as (frames, rows, columns, samples)
    fn decode_frames(pixel_data: &DecodedPixelData<'_>) -> Result<Array4<Self>>;
}

fn stored_values() -> ConvertOptions {
    ConvertOptions::new().with_modality_lut(ModalityLutOption::None)
}

macro_rules! impl_pixel_sample {
    ($($t:ty),*) => {
        $(
            impl PixelSample for $t {
                fn decode_frames(pixel_data: &DecodedPixelData<'_>) -> Result<Array4<Self>> {
                    Ok(pixel_data.to_ndarray_with_options::<$t>(&stored_values())?)
                }
            }
        )*
    };
}

impl_pixel_sample!(u8, i8, u16, i16, u32, i32, f64);

/// Decode the first sample of every frame as (frames, rows, columns).
pub(crate) fn decode_volume<T: PixelSample>(
    dicom_object: &DefaultDicomObject,
) -> Result<ndarray::Array3<T>> {
    let pixel_data = dicom_object.decode_pixel_data()?;
    let frames = T::decode_frames(&pixel_data)?;
    Ok(frames.slice_move(s![.., .., .., 0]))
}
