use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VolumeLoaderError};

/// Order in which the slices of a folder are stacked.
///
/// `None` keeps discovery order (depth-first, file names ascending).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    ImagePositionPatient,
    TablePosition,
    InstanceNumber,
    #[default]
    None,
}

impl SortBy {
    pub(crate) fn key_name(&self) -> &'static str {
        match self {
            SortBy::ImagePositionPatient => "ImagePositionPatient",
            SortBy::TablePosition => "TablePosition",
            SortBy::InstanceNumber => "InstanceNumber",
            SortBy::None => "None",
        }
    }
}

/// Stored sample type of a slice, derived from Bits Allocated and
/// Pixel Representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
}

impl SampleType {
    pub fn from_bits(bits_allocated: u16, signed: bool) -> Result<Self> {
        match (bits_allocated, signed) {
            (8, false) => Ok(SampleType::U8),
            (8, true) => Ok(SampleType::I8),
            (16, false) => Ok(SampleType::U16),
            (16, true) => Ok(SampleType::I16),
            (32, false) => Ok(SampleType::U32),
            (32, true) => Ok(SampleType::I32),
            _ => Err(VolumeLoaderError::UnsupportedSampleType {
                bits_allocated,
                signed,
            }),
        }
    }
}

/// Patient's Sex (0010,0040)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PatientSex {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

impl PatientSex {
    pub fn code(&self) -> &'static str {
        match self {
            PatientSex::Male => "M",
            PatientSex::Female => "F",
            PatientSex::Other => "O",
            PatientSex::Unknown => "U",
        }
    }
}

impl FromStr for PatientSex {
    type Err = VolumeLoaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "M" => Ok(PatientSex::Male),
            "F" => Ok(PatientSex::Female),
            "O" => Ok(PatientSex::Other),
            "U" => Ok(PatientSex::Unknown),
            _ => Err(VolumeLoaderError::InvalidAttribute {
                name: "PatientSex",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for PatientSex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
