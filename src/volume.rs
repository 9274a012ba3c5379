use ndarray::{Array1, Array3, ArrayBase};

use crate::enums::SampleType;
use crate::metadata::DicomMetadata;
use crate::statistics::PatientStatistics;

/// Physical distance between samples along each axis of a volume, in the
/// units of the source files (usually millimeters).
pub type Spacing = (f64, f64, f64);

pub type Dimensions = (usize, usize, usize);

/// Tensor types a [`Volume`] can hold.
pub trait VolumeData {
    fn dim(&self) -> Dimensions;
}

impl<T> VolumeData for Array3<T> {
    fn dim(&self) -> Dimensions {
        ArrayBase::dim(self)
    }
}

/// Slice stack kept in the sample type of its source files.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelVolume {
    U8(Array3<u8>),
    I8(Array3<i8>),
    U16(Array3<u16>),
    I16(Array3<i16>),
    U32(Array3<u32>),
    I32(Array3<i32>),
}

macro_rules! dispatch {
    ($volume:expr, $array:ident => $body:expr) => {
        match $volume {
            PixelVolume::U8($array) => $body,
            PixelVolume::I8($array) => $body,
            PixelVolume::U16($array) => $body,
            PixelVolume::I16($array) => $body,
            PixelVolume::U32($array) => $body,
            PixelVolume::I32($array) => $body,
        }
    };
}

macro_rules! typed_accessor {
    ($name:ident, $variant:ident, $t:ty) => {
        pub fn $name(&self) -> Option<&Array3<$t>> {
            match self {
                PixelVolume::$variant(array) => Some(array),
                _ => None,
            }
        }
    };
}

impl PixelVolume {
    pub fn sample_type(&self) -> SampleType {
        match self {
            PixelVolume::U8(_) => SampleType::U8,
            PixelVolume::I8(_) => SampleType::I8,
            PixelVolume::U16(_) => SampleType::U16,
            PixelVolume::I16(_) => SampleType::I16,
            PixelVolume::U32(_) => SampleType::U32,
            PixelVolume::I32(_) => SampleType::I32,
        }
    }

    /// Copy of the volume with every sample widened to `f64`.
    pub fn to_f64(&self) -> Array3<f64> {
        dispatch!(self, array => array.mapv(f64::from))
    }

    typed_accessor!(as_u8, U8, u8);
    typed_accessor!(as_i8, I8, i8);
    typed_accessor!(as_u16, U16, u16);
    typed_accessor!(as_i16, I16, i16);
    typed_accessor!(as_u32, U32, u32);
    typed_accessor!(as_i32, I32, i32);
}

impl VolumeData for PixelVolume {
    fn dim(&self) -> Dimensions {
        dispatch!(self, array => array.dim())
    }
}

/// Result of a load: the assembled tensor, its spacing and the metadata of
/// the file geometry was read from.
#[derive(Debug, Clone)]
pub struct Volume<V> {
    data: V,
    spacing: Spacing,
    metadata: DicomMetadata,
}

/// Folder load, indexed (row, column, slice)
pub type SliceVolume = Volume<PixelVolume>;

/// Single-file load, indexed (slice or frame, row, column)
pub type FrameVolume = Volume<Array3<f64>>;

impl<V: VolumeData> Volume<V> {
    pub fn new(data: V, spacing: Spacing, metadata: DicomMetadata) -> Self {
        Self {
            data,
            spacing,
            metadata,
        }
    }

    /// Shape of the underlying tensor
    pub fn dim(&self) -> Dimensions {
        self.data.dim()
    }

    pub fn data(&self) -> &V {
        &self.data
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn metadata(&self) -> &DicomMetadata {
        &self.metadata
    }

    pub fn into_parts(self) -> (V, Spacing, DicomMetadata) {
        (self.data, self.spacing, self.metadata)
    }

    /// Physical positions of the `n + 1` grid lines bounding the samples of
    /// each axis, starting at zero.
    pub fn axis_coordinates(&self) -> (Array1<f64>, Array1<f64>, Array1<f64>) {
        let (d0, d1, d2) = self.dim();
        let (s0, s1, s2) = self.spacing;
        (grid_lines(d0, s0), grid_lines(d1, s1), grid_lines(d2, s2))
    }

    pub fn patient_statistics(&self) -> PatientStatistics {
        self.metadata.patient_statistics()
    }
}

fn grid_lines(len: usize, spacing: f64) -> Array1<f64> {
    (0..=len).map(|i| i as f64 * spacing).collect()
}
