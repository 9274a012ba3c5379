use crate::{
    discovery::find_slice_files,
    enums::{SampleType, SortBy},
    error::{Result, VolumeLoaderError},
    metadata::DicomMetadata,
    sample::{PixelSample, decode_volume},
    volume::{FrameVolume, PixelVolume, SliceVolume, Volume},
};

use dicom::object::open_file;
use ndarray::{Array2, Array3, Axis, s};
use std::path::Path;

/// Settings shared by every load of a [`VolumeLoader`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Case-insensitive substring a file name must contain to be loaded
    pub extension: String,
    pub sort_by: SortBy,
    pub follow_links: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            extension: ".dcm".to_string(),
            sort_by: SortBy::None,
            follow_links: false,
        }
    }
}

/// Assembles DICOM files into volumes.
///
/// Every load builds a new [`Volume`]; a failed load returns an error and
/// nothing else.
#[derive(Debug, Clone, Default)]
pub struct VolumeLoader {
    config: LoaderConfig,
}

impl VolumeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.extension = extension.into();
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.config.sort_by = sort_by;
        self
    }

    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.config.follow_links = follow_links;
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load every matching file below `root` into a (rows, columns, slices)
    /// volume.
    ///
    /// Geometry and sample type come from the first file found.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeLoaderError::NoInputFiles`] if nothing matches, and
    /// fails as a whole if any single file cannot be decoded.
    pub fn load_folder(&self, root: impl AsRef<Path>) -> Result<SliceVolume> {
        let root = root.as_ref();
        let paths = find_slice_files(root, &self.config.extension, self.config.follow_links)?;
        if paths.is_empty() {
            return Err(VolumeLoaderError::NoInputFiles(root.to_path_buf()));
        }
        tracing::info!("Found {} slices under {}", paths.len(), root.display());

        self.load_file_paths(&paths)
    }

    /// Load the given files, in the given order, into a (rows, columns,
    /// slices) volume.
    pub fn load_file_paths(&self, paths: &[impl AsRef<Path>]) -> Result<SliceVolume> {
        let Some(first) = paths.first() else {
            return Err(VolumeLoaderError::EmptyFileList);
        };

        let reference = DicomMetadata::new(open_file(first.as_ref())?);
        let shape = (reference.rows()? as usize, reference.columns()? as usize);
        let (row_spacing, column_spacing) = reference.pixel_spacing()?;
        let spacing = (row_spacing, column_spacing, reference.slice_thickness()?);

        let data = match reference.sample_type()? {
            SampleType::U8 => PixelVolume::U8(self.assemble_slices(&reference, paths, shape)?),
            SampleType::I8 => PixelVolume::I8(self.assemble_slices(&reference, paths, shape)?),
            SampleType::U16 => PixelVolume::U16(self.assemble_slices(&reference, paths, shape)?),
            SampleType::I16 => PixelVolume::I16(self.assemble_slices(&reference, paths, shape)?),
            SampleType::U32 => PixelVolume::U32(self.assemble_slices(&reference, paths, shape)?),
            SampleType::I32 => PixelVolume::I32(self.assemble_slices(&reference, paths, shape)?),
        };

        let volume = Volume::new(data, spacing, reference);
        tracing::info!(
            "Loaded {:?} volume {:?} with spacing {:?}",
            volume.data().sample_type(),
            volume.dim(),
            volume.spacing()
        );
        Ok(volume)
    }

    /// Load a multi-slice or multi-frame file into a (slices, rows, columns)
    /// volume of `f64`.
    ///
    /// With Number of Slices present the third spacing component is the
    /// Slice Thickness; frame sequences without it get a spacing of `1.0`.
    pub fn load_single_file(&self, path: impl AsRef<Path>) -> Result<FrameVolume> {
        let path = path.as_ref();
        tracing::debug!("Reading {}", path.display());
        let metadata = DicomMetadata::new(open_file(path)?);

        let (rows, columns) = (metadata.rows()? as usize, metadata.columns()? as usize);
        let (row_spacing, column_spacing) = metadata.pixel_spacing()?;
        let (count, slice_spacing) = match metadata.number_of_slices()? {
            Some(slices) => (slices as usize, metadata.slice_thickness()?),
            None => {
                let frames = metadata
                    .number_of_frames()?
                    .ok_or(VolumeLoaderError::MissingAttribute("NumberOfFrames"))?;
                (frames as usize, 1.0)
            }
        };
        check_single_sample(&metadata)?;

        let frames = decode_volume::<f64>(metadata.object())?;
        let (found_count, found_rows, found_columns) = frames.dim();
        if (found_rows, found_columns) != (rows, columns) {
            return Err(VolumeLoaderError::InconsistentDimensions {
                path: path.to_path_buf(),
                expected: (rows, columns),
                found: (found_rows, found_columns),
            });
        }
        if found_count != count {
            return Err(VolumeLoaderError::FrameCountMismatch {
                expected: count,
                found: found_count,
            });
        }

        let mut data = Array3::<f64>::zeros((count, rows, columns));
        data.assign(&frames);

        let volume = Volume::new(data, (row_spacing, column_spacing, slice_spacing), metadata);
        tracing::info!(
            "Loaded volume {:?} with spacing {:?} from {}",
            volume.dim(),
            volume.spacing(),
            path.display()
        );
        Ok(volume)
    }

    /// `reference` must be the already opened first entry of `paths`.
    fn assemble_slices<T: PixelSample>(
        &self,
        reference: &DicomMetadata,
        paths: &[impl AsRef<Path>],
        shape: (usize, usize),
    ) -> Result<Array3<T>> {
        let sample_type = reference.sample_type()?;
        let mut images_with_order = Vec::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            let path = path.as_ref();
            let opened;
            let metadata = if index == 0 {
                reference
            } else {
                tracing::debug!("Reading slice {} from {}", index, path.display());
                opened = DicomMetadata::new(open_file(path)?);
                &opened
            };
            let order = self.get_sort_order(metadata, path)?;
            let image = Self::decode_image::<T>(metadata, path, shape, sample_type)?;
            images_with_order.push((order, image));
        }

        Self::sort_images(&mut images_with_order, self.config.sort_by);

        let (rows, columns) = shape;
        let mut volume = Array3::from_elem((rows, columns, images_with_order.len()), T::default());
        for (index, (_, image)) in images_with_order.iter().enumerate() {
            volume.slice_mut(s![.., .., index]).assign(image);
        }
        Ok(volume)
    }

    fn get_sort_order(&self, metadata: &DicomMetadata, path: &Path) -> Result<Option<f64>> {
        let order = match self.config.sort_by {
            SortBy::ImagePositionPatient => metadata.image_position_z(),
            SortBy::TablePosition => metadata.table_position(),
            SortBy::InstanceNumber => metadata.instance_number(),
            SortBy::None => return Ok(None),
        };
        order
            .map(Some)
            .ok_or_else(|| VolumeLoaderError::MissingSortKey {
                path: path.to_path_buf(),
                key: self.config.sort_by.key_name(),
            })
    }

    fn decode_image<T: PixelSample>(
        metadata: &DicomMetadata,
        path: &Path,
        shape: (usize, usize),
        sample_type: SampleType,
    ) -> Result<Array2<T>> {
        check_single_sample(metadata)?;
        let found = metadata.sample_type()?;
        if found != sample_type {
            return Err(VolumeLoaderError::MixedSampleTypes {
                path: path.to_path_buf(),
                expected: sample_type,
                found,
            });
        }

        let frames = decode_volume::<T>(metadata.object())?;
        if frames.len_of(Axis(0)) != 1 {
            return Err(VolumeLoaderError::MultiFrameSlice {
                path: path.to_path_buf(),
                frames: frames.len_of(Axis(0)),
            });
        }
        let image = frames.index_axis_move(Axis(0), 0);
        if image.dim() != shape {
            return Err(VolumeLoaderError::InconsistentDimensions {
                path: path.to_path_buf(),
                expected: shape,
                found: image.dim(),
            });
        }
        Ok(image)
    }

    fn sort_images<T>(images_with_order: &mut [(Option<f64>, Array2<T>)], sort_by: SortBy) {
        if !matches!(sort_by, SortBy::None) {
            images_with_order
                .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        }

        if matches!(sort_by, SortBy::ImagePositionPatient) {
            images_with_order.reverse();
        }
    }
}

fn check_single_sample(metadata: &DicomMetadata) -> Result<()> {
    match metadata.samples_per_pixel()? {
        1 => Ok(()),
        samples => Err(VolumeLoaderError::UnsupportedSamplesPerPixel(samples)),
    }
}
