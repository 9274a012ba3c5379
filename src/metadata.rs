use chrono::NaiveDate;
use dicom::core::Tag;
use dicom::object::DefaultDicomObject;
use dicom::object::mem::InMemElement;
use dicom_dictionary_std::tags;

use crate::enums::{PatientSex, SampleType};
use crate::error::{Result, VolumeLoaderError};
use crate::statistics::{self, PatientStatistics};

/// Decoded tag set of one DICOM file.
///
/// Each recognized attribute has its own accessor. Absent or empty elements
/// read as `None`; geometry attributes the loader cannot do without are
/// reported as [`VolumeLoaderError::MissingAttribute`].
#[derive(Debug, Clone)]
pub struct DicomMetadata {
    object: DefaultDicomObject,
}

impl DicomMetadata {
    pub fn new(object: DefaultDicomObject) -> Self {
        Self { object }
    }

    pub fn object(&self) -> &DefaultDicomObject {
        &self.object
    }

    pub fn rows(&self) -> Result<u32> {
        self.required(tags::ROWS, "Rows", |elem| elem.to_int::<u32>())
    }

    pub fn columns(&self) -> Result<u32> {
        self.required(tags::COLUMNS, "Columns", |elem| elem.to_int::<u32>())
    }

    /// Pixel Spacing as (row spacing, column spacing)
    pub fn pixel_spacing(&self) -> Result<(f64, f64)> {
        const NAME: &str = "PixelSpacing";
        let values = self.required(tags::PIXEL_SPACING, NAME, |elem| elem.to_multi_float64())?;
        let [row, column] = match values.as_slice() {
            [row, column, ..] => [*row, *column],
            _ => {
                return Err(VolumeLoaderError::InvalidAttribute {
                    name: NAME,
                    value: format!("{values:?}"),
                });
            }
        };
        Ok((non_negative(NAME, row)?, non_negative(NAME, column)?))
    }

    pub fn slice_thickness(&self) -> Result<f64> {
        const NAME: &str = "SliceThickness";
        let value = self.required(tags::SLICE_THICKNESS, NAME, |elem| elem.to_float64())?;
        non_negative(NAME, value)
    }

    pub fn bits_allocated(&self) -> Result<u16> {
        self.required(tags::BITS_ALLOCATED, "BitsAllocated", |elem| {
            elem.to_int::<u16>()
        })
    }

    /// `true` for two's complement samples. Defaults to unsigned.
    pub fn is_signed(&self) -> Result<bool> {
        let representation = self.optional(
            tags::PIXEL_REPRESENTATION,
            "PixelRepresentation",
            |elem| elem.to_int::<u16>(),
        )?;
        Ok(representation == Some(1))
    }

    pub fn samples_per_pixel(&self) -> Result<u16> {
        Ok(self
            .optional(tags::SAMPLES_PER_PIXEL, "SamplesPerPixel", |elem| {
                elem.to_int::<u16>()
            })?
            .unwrap_or(1))
    }

    pub fn sample_type(&self) -> Result<SampleType> {
        SampleType::from_bits(self.bits_allocated()?, self.is_signed()?)
    }

    /// Number of Slices (0054,0081), present on multi-slice NM files
    pub fn number_of_slices(&self) -> Result<Option<u32>> {
        self.optional(tags::NUMBER_OF_SLICES, "NumberOfSlices", |elem| {
            elem.to_int::<u32>()
        })
    }

    pub fn number_of_frames(&self) -> Result<Option<u32>> {
        self.optional(tags::NUMBER_OF_FRAMES, "NumberOfFrames", |elem| {
            elem.to_int::<u32>()
        })
    }

    pub fn instance_number(&self) -> Option<f64> {
        self.lenient(tags::INSTANCE_NUMBER, "InstanceNumber", |elem| {
            elem.to_int::<i64>().map(|n| n as f64)
        })
    }

    /// z component of Image Position (Patient)
    pub fn image_position_z(&self) -> Option<f64> {
        self.lenient(
            tags::IMAGE_POSITION_PATIENT,
            "ImagePositionPatient",
            |elem| elem.to_multi_float64(),
        )
        .and_then(|position| position.get(2).copied())
    }

    pub fn table_position(&self) -> Option<f64> {
        self.lenient(tags::TABLE_POSITION, "TablePosition", |elem| {
            elem.to_float64()
        })
    }

    pub fn patient_weight(&self) -> Option<f64> {
        self.lenient(tags::PATIENT_WEIGHT, "PatientWeight", |elem| {
            elem.to_float64()
        })
    }

    /// Patient's Size, in meters
    pub fn patient_size(&self) -> Option<f64> {
        self.lenient(tags::PATIENT_SIZE, "PatientSize", |elem| elem.to_float64())
    }

    pub fn patient_sex(&self) -> Option<PatientSex> {
        let code = self.lenient(tags::PATIENT_SEX, "PatientSex", |elem| {
            elem.to_str().map(|value| value.into_owned())
        })?;
        code.parse()
            .inspect_err(|err| tracing::warn!("Ignoring PatientSex: {}", err))
            .ok()
    }

    pub fn patient_birth_date(&self) -> Option<NaiveDate> {
        let value = self.lenient(tags::PATIENT_BIRTH_DATE, "PatientBirthDate", |elem| {
            elem.to_str().map(|value| value.into_owned())
        })?;
        let date = statistics::parse_birth_date(&value);
        if date.is_none() {
            tracing::warn!("Ignoring PatientBirthDate: {:?}", value);
        }
        date
    }

    /// Demographics evaluated against today's local date.
    pub fn patient_statistics(&self) -> PatientStatistics {
        PatientStatistics::from_metadata(self, chrono::Local::now().date_naive())
    }

    pub fn patient_statistics_at(&self, today: NaiveDate) -> PatientStatistics {
        PatientStatistics::from_metadata(self, today)
    }

    fn element(&self, tag: Tag) -> Option<&InMemElement> {
        self.object.get(tag).filter(|elem| {
            !elem
                .to_str()
                .map(|value| value.trim().is_empty())
                .unwrap_or(false)
        })
    }

    fn optional<T, E>(
        &self,
        tag: Tag,
        name: &'static str,
        convert: impl FnOnce(&InMemElement) -> std::result::Result<T, E>,
    ) -> Result<Option<T>> {
        let Some(elem) = self.element(tag) else {
            return Ok(None);
        };
        convert(elem)
            .map(Some)
            .map_err(|_| VolumeLoaderError::InvalidAttribute {
                name,
                value: elem
                    .to_str()
                    .map(|value| value.into_owned())
                    .unwrap_or_default(),
            })
    }

    fn required<T, E>(
        &self,
        tag: Tag,
        name: &'static str,
        convert: impl FnOnce(&InMemElement) -> std::result::Result<T, E>,
    ) -> Result<T> {
        self.optional(tag, name, convert)?
            .ok_or(VolumeLoaderError::MissingAttribute(name))
    }

    fn lenient<T, E>(
        &self,
        tag: Tag,
        name: &'static str,
        convert: impl FnOnce(&InMemElement) -> std::result::Result<T, E>,
    ) -> Option<T> {
        self.optional(tag, name, convert)
            .inspect_err(|err| tracing::warn!("Ignoring {}: {}", name, err))
            .ok()
            .flatten()
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value < 0.0 {
        return Err(VolumeLoaderError::NegativeSpacing { name, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{dicom_object, ds, element};
    use dicom::core::VR;
    use rstest::rstest;

    #[test]
    fn test_geometry_accessors() {
        let metadata = DicomMetadata::new(dicom_object([
            element(tags::ROWS, VR::US, 4_u16),
            element(tags::COLUMNS, VR::US, 3_u16),
            ds(tags::PIXEL_SPACING, "0.5\\0.75"),
            ds(tags::SLICE_THICKNESS, "2.5"),
            element(tags::BITS_ALLOCATED, VR::US, 16_u16),
            element(tags::PIXEL_REPRESENTATION, VR::US, 1_u16),
        ]));

        assert_eq!(metadata.rows().unwrap(), 4);
        assert_eq!(metadata.columns().unwrap(), 3);
        assert_eq!(metadata.pixel_spacing().unwrap(), (0.5, 0.75));
        assert_eq!(metadata.slice_thickness().unwrap(), 2.5);
        assert_eq!(metadata.sample_type().unwrap(), SampleType::I16);
        assert_eq!(metadata.samples_per_pixel().unwrap(), 1);
    }

    #[test]
    fn test_missing_required_attribute() {
        let metadata = DicomMetadata::new(dicom_object([]));
        assert!(matches!(
            metadata.rows(),
            Err(VolumeLoaderError::MissingAttribute("Rows"))
        ));
        assert!(matches!(
            metadata.pixel_spacing(),
            Err(VolumeLoaderError::MissingAttribute("PixelSpacing"))
        ));
    }

    #[rstest]
    #[case("0.5")]
    #[case("abc\\1.0")]
    fn test_invalid_pixel_spacing(#[case] value: &str) {
        let metadata = DicomMetadata::new(dicom_object([ds(tags::PIXEL_SPACING, value)]));
        assert!(matches!(
            metadata.pixel_spacing(),
            Err(VolumeLoaderError::InvalidAttribute { name: "PixelSpacing", .. })
        ));
    }

    #[test]
    fn test_negative_slice_thickness() {
        let metadata = DicomMetadata::new(dicom_object([ds(tags::SLICE_THICKNESS, "-1.0")]));
        assert!(matches!(
            metadata.slice_thickness(),
            Err(VolumeLoaderError::NegativeSpacing { .. })
        ));
    }

    #[test]
    fn test_cardinality_accessors() {
        let metadata = DicomMetadata::new(dicom_object([
            element(tags::NUMBER_OF_SLICES, VR::US, 7_u16),
            element(tags::NUMBER_OF_FRAMES, VR::IS, "7"),
        ]));
        assert_eq!(metadata.number_of_slices().unwrap(), Some(7));
        assert_eq!(metadata.number_of_frames().unwrap(), Some(7));

        let metadata = DicomMetadata::new(dicom_object([element(
            tags::NUMBER_OF_FRAMES,
            VR::IS,
            "",
        )]));
        assert_eq!(metadata.number_of_slices().unwrap(), None);
        assert_eq!(metadata.number_of_frames().unwrap(), None);
    }

    #[test]
    fn test_sort_keys() {
        let metadata = DicomMetadata::new(dicom_object([
            element(tags::INSTANCE_NUMBER, VR::IS, "12"),
            ds(tags::IMAGE_POSITION_PATIENT, "-10.0\\20.0\\-35.5"),
            ds(tags::TABLE_POSITION, "104.5"),
        ]));
        assert_eq!(metadata.instance_number(), Some(12.0));
        assert_eq!(metadata.image_position_z(), Some(-35.5));
        assert_eq!(metadata.table_position(), Some(104.5));
    }

    #[test]
    fn test_demographics_present() {
        let metadata = DicomMetadata::new(dicom_object([
            ds(tags::PATIENT_WEIGHT, "72.5"),
            ds(tags::PATIENT_SIZE, "1.81"),
            element(tags::PATIENT_SEX, VR::CS, "M"),
            element(tags::PATIENT_BIRTH_DATE, VR::DA, "19900615"),
        ]));
        assert_eq!(metadata.patient_weight(), Some(72.5));
        assert_eq!(metadata.patient_size(), Some(1.81));
        assert_eq!(metadata.patient_sex(), Some(PatientSex::Male));
        assert_eq!(
            metadata.patient_birth_date(),
            NaiveDate::from_ymd_opt(1990, 6, 15)
        );
    }

    #[test]
    fn test_demographics_malformed_are_absent() {
        let metadata = DicomMetadata::new(dicom_object([
            ds(tags::PATIENT_WEIGHT, "heavy"),
            element(tags::PATIENT_SEX, VR::CS, "X"),
            element(tags::PATIENT_BIRTH_DATE, VR::DA, "1990"),
        ]));
        assert_eq!(metadata.patient_weight(), None);
        assert_eq!(metadata.patient_size(), None);
        assert_eq!(metadata.patient_sex(), None);
        assert_eq!(metadata.patient_birth_date(), None);
    }
}
