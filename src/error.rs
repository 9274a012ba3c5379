use std::path::PathBuf;

use thiserror::Error;

use crate::enums::SampleType;

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No DICOM files found under {}", .0.display())]
    NoInputFiles(PathBuf),

    #[error("No DICOM files given")]
    EmptyFileList,

    #[error("Inconsistent image dimensions in {}: expected {expected:?}, found {found:?}", .path.display())]
    InconsistentDimensions {
        path: PathBuf,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Slice file {} holds {frames} frames", .path.display())]
    MultiFrameSlice { path: PathBuf, frames: usize },

    #[error("Sample type of {} is {found:?}, expected {expected:?}", .path.display())]
    MixedSampleTypes {
        path: PathBuf,
        expected: SampleType,
        found: SampleType,
    },

    #[error("Pixel data holds {found} frames but the header declares {expected}")]
    FrameCountMismatch { expected: usize, found: usize },

    #[error("Missing required attribute {0}")]
    MissingAttribute(&'static str),

    #[error("Invalid value for attribute {name}: {value:?}")]
    InvalidAttribute { name: &'static str, value: String },

    #[error("Negative spacing in attribute {name}: {value}")]
    NegativeSpacing { name: &'static str, value: f64 },

    #[error("Unsupported sample type: BitsAllocated={bits_allocated}, signed={signed}")]
    UnsupportedSampleType { bits_allocated: u16, signed: bool },

    #[error("Unsupported samples per pixel: {0}")]
    UnsupportedSamplesPerPixel(u16),

    #[error("Missing {key} needed for slice ordering in {}", .path.display())]
    MissingSortKey { path: PathBuf, key: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error("Pixel data error: {0}")]
    PixelData(#[from] dicom::pixeldata::Error),
}

pub type Result<T, E = VolumeLoaderError> = std::result::Result<T, E>;
