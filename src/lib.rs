//! # DICOM volume loader
//!
//! Assembles DICOM images into dense numeric volumes with their physical
//! spacing, and reads basic patient demographics from the same files.
//!
//! This library builds on the dicom-rs ecosystem. Two sources are supported:
//!  - a folder of single-slice files, found recursively by file name and
//!    stacked as (rows, columns, slices) in their stored sample type
//!  - one multi-slice or multi-frame file, loaded as (slices, rows,
//!    columns) of `f64`
//!
//! Every load returns an immutable [`Volume`] holding the tensor, the
//! spacing and the metadata of the file the geometry was read from. Pixel
//! values are the stored samples: no rescale or LUT is applied.
//!
//! Slices are stacked in discovery order (depth-first, file names
//! ascending) unless a [`SortBy`] key is configured.
//!
//! # Examples
//!
//! ## Reading a folder of slices
//!
//! ```no_run
//! # use dicom_volume_loader::{SortBy, VolumeLoader};
//! let volume = VolumeLoader::new()
//!     .with_sort_by(SortBy::InstanceNumber)
//!     .load_folder("dicom")
//!     .expect("should have loaded files from directory");
//! let (rows, columns, slices) = volume.dim();
//! println!("{rows}x{columns}x{slices}, spacing {:?}", volume.spacing());
//! ```
//!
//! ## Reading a multi-frame file and its patient statistics
//!
//! ```no_run
//! # use dicom_volume_loader::VolumeLoader;
//! let volume = VolumeLoader::new()
//!     .load_single_file("study/nm.dcm")
//!     .expect("should have loaded the file");
//! let stats = volume.patient_statistics();
//! println!("age {} sex {} weight {} height {}", stats.age, stats.sex, stats.weight, stats.height);
//! ```

pub mod discovery;
pub mod enums;
pub mod error;
pub mod metadata;
pub mod sample;
pub mod statistics;
pub mod volume;
pub mod volume_loader;

#[cfg(test)]
mod test_utils;

pub use enums::{PatientSex, SampleType, SortBy};
pub use error::{Result, VolumeLoaderError};
pub use metadata::DicomMetadata;
pub use statistics::PatientStatistics;
pub use volume::{Dimensions, FrameVolume, PixelVolume, SliceVolume, Spacing, Volume, VolumeData};
pub use volume_loader::{LoaderConfig, VolumeLoader};
