//! Synthetic DICOM objects for unit tests.

use std::path::Path;

use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::object::mem::InMemElement;
use dicom::object::{DefaultDicomObject, FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{tags, uids};

const NM_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.20";

pub(crate) fn element(tag: Tag, vr: VR, value: impl Into<PrimitiveValue>) -> InMemElement {
    DataElement::new(tag, vr, value.into())
}

/// Decimal string element; backslashes separate multiple values.
pub(crate) fn ds(tag: Tag, value: &str) -> InMemElement {
    DataElement::new(
        tag,
        VR::DS,
        PrimitiveValue::Strs(value.split('\\').map(str::to_string).collect()),
    )
}

fn file_meta(sop_instance_uid: &str) -> FileMetaTableBuilder {
    FileMetaTableBuilder::new()
        .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
        .media_storage_sop_class_uid(NM_IMAGE_STORAGE)
        .media_storage_sop_instance_uid(sop_instance_uid)
}

/// File object holding only the given elements.
pub(crate) fn dicom_object(elements: impl IntoIterator<Item = InMemElement>) -> DefaultDicomObject {
    InMemDicomObject::from_element_iter(elements)
        .with_meta(file_meta("2.25.1"))
        .unwrap()
}

/// Monochrome image with native little endian pixel data.
#[derive(Clone)]
pub(crate) struct SyntheticImage {
    rows: u16,
    columns: u16,
    frames: Option<u32>,
    bits_allocated: u16,
    signed: bool,
    samples_per_pixel: u16,
    pixel_bytes: Vec<u8>,
    extra: Vec<InMemElement>,
}

impl SyntheticImage {
    pub(crate) fn new(rows: u16, columns: u16) -> Self {
        Self {
            rows,
            columns,
            frames: None,
            bits_allocated: 16,
            signed: false,
            samples_per_pixel: 1,
            pixel_bytes: vec![0; rows as usize * columns as usize * 2],
            extra: Vec::new(),
        }
    }

    pub(crate) fn frames(mut self, frames: u32) -> Self {
        self.frames = Some(frames);
        self
    }

    pub(crate) fn pixels_u8(mut self, pixels: Vec<u8>) -> Self {
        self.bits_allocated = 8;
        self.signed = false;
        self.pixel_bytes = pixels;
        self
    }

    pub(crate) fn pixels_u16(mut self, pixels: Vec<u16>) -> Self {
        self.bits_allocated = 16;
        self.signed = false;
        self.pixel_bytes = pixels.iter().flat_map(|v| v.to_le_bytes()).collect();
        self
    }

    pub(crate) fn pixels_i16(mut self, pixels: Vec<i16>) -> Self {
        self.bits_allocated = 16;
        self.signed = true;
        self.pixel_bytes = pixels.iter().flat_map(|v| v.to_le_bytes()).collect();
        self
    }

    pub(crate) fn samples_per_pixel(mut self, samples: u16) -> Self {
        self.samples_per_pixel = samples;
        self
    }

    pub(crate) fn spacing(self, row: f64, column: f64) -> Self {
        self.with(ds(tags::PIXEL_SPACING, &format!("{row}\\{column}")))
    }

    pub(crate) fn thickness(self, thickness: f64) -> Self {
        self.with(ds(tags::SLICE_THICKNESS, &thickness.to_string()))
    }

    pub(crate) fn with(mut self, elem: InMemElement) -> Self {
        self.extra.push(elem);
        self
    }

    pub(crate) fn build(&self) -> DefaultDicomObject {
        let pixel_vr = if self.bits_allocated == 8 { VR::OB } else { VR::OW };
        let photometric = if self.samples_per_pixel == 3 {
            "RGB"
        } else {
            "MONOCHROME2"
        };
        let mut object = InMemDicomObject::from_element_iter([
            element(tags::SOP_CLASS_UID, VR::UI, NM_IMAGE_STORAGE),
            element(tags::SOP_INSTANCE_UID, VR::UI, "2.25.1"),
            element(tags::SAMPLES_PER_PIXEL, VR::US, self.samples_per_pixel),
            element(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, photometric),
            element(tags::ROWS, VR::US, self.rows),
            element(tags::COLUMNS, VR::US, self.columns),
            element(tags::BITS_ALLOCATED, VR::US, self.bits_allocated),
            element(tags::BITS_STORED, VR::US, self.bits_allocated),
            element(tags::HIGH_BIT, VR::US, self.bits_allocated - 1),
            element(tags::PIXEL_REPRESENTATION, VR::US, u16::from(self.signed)),
            element(tags::PIXEL_DATA, pixel_vr, self.pixel_bytes.clone()),
        ]);
        if self.samples_per_pixel > 1 {
            object.put(element(tags::PLANAR_CONFIGURATION, VR::US, 0_u16));
        }
        if let Some(frames) = self.frames {
            object.put(element(tags::NUMBER_OF_FRAMES, VR::IS, frames.to_string()));
        }
        for elem in &self.extra {
            object.put(elem.clone());
        }
        object.with_meta(file_meta("2.25.1")).unwrap()
    }

    pub(crate) fn write(&self, path: impl AsRef<Path>) {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        self.build().write_to_file(path).unwrap();
    }
}
