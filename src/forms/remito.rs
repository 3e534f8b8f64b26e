//! Remito finalization form: edited parts rows, observations and photos.

#[cfg(feature = "server")]
use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::domain::remito::{PHOTO_SLOT_COUNT, RemitoPhoto};
use crate::domain::repuesto::RepuestoItem;
#[cfg(feature = "server")]
use crate::forms::FormError;

/// Finalize payload after transport decoding.
///
/// Parts columns arrive as parallel lists, one entry per table row.
#[derive(Debug, Clone, Default)]
pub struct FinalizeRemitoForm {
    pub codigo: Vec<String>,
    pub descripcion: Vec<String>,
    pub cantidad: Vec<String>,
    pub observaciones: String,
    pub fotos: Vec<RemitoPhoto>,
}

impl FinalizeRemitoForm {
    /// Re-assembles the parts table rows; short columns are padded with `""`.
    pub fn rows(&self) -> Vec<RepuestoItem> {
        let len = self
            .codigo
            .len()
            .max(self.descripcion.len())
            .max(self.cantidad.len());
        let cell = |column: &[String], index: usize| column.get(index).cloned().unwrap_or_default();

        (0..len)
            .map(|i| {
                RepuestoItem::new(
                    cell(&self.codigo, i),
                    cell(&self.descripcion, i),
                    cell(&self.cantidad, i),
                )
            })
            .collect()
    }

    pub fn with_row(mut self, item: RepuestoItem) -> Self {
        self.codigo.push(item.codigo);
        self.descripcion.push(item.descripcion);
        self.cantidad.push(item.cantidad);
        self
    }
}

#[cfg(feature = "server")]
#[derive(MultipartForm)]
/// Multipart body posted by the remito view.
pub struct FinalizeRemitoMultipart {
    pub codigo: Vec<Text<String>>,
    pub descripcion: Vec<Text<String>>,
    pub cantidad: Vec<Text<String>>,
    pub observaciones: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub fotos: Vec<TempFile>,
    /// Storage paths of photos uploaded earlier, by slot.
    pub foto_ref: Vec<Text<String>>,
}

/// Photo file read from the upload, not yet placed in a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPhoto {
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Places uploads and earlier storage paths into the photo slots.
///
/// The n-th file input and the n-th `foto_ref` belong to slot n. A new file
/// replaces the stored path; an empty input keeps it.
pub fn assign_photo_slots(
    uploads: Vec<Option<UploadedPhoto>>,
    refs: Vec<String>,
) -> Vec<RemitoPhoto> {
    let mut uploads = uploads.into_iter();
    let mut refs = refs.into_iter();
    let mut fotos = Vec::new();

    for slot in 0..PHOTO_SLOT_COUNT {
        let upload = uploads.next().flatten();
        let storage_path = refs
            .next()
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty());

        if let Some(upload) = upload {
            fotos.push(RemitoPhoto {
                slot,
                mime_type: upload.mime_type,
                file_name: upload.file_name,
                base64: Some(BASE64.encode(upload.bytes)),
                storage_path: None,
            });
        } else if let Some(path) = storage_path {
            fotos.push(RemitoPhoto {
                slot,
                mime_type: None,
                file_name: None,
                base64: None,
                storage_path: Some(path),
            });
        }
    }

    if uploads.flatten().next().is_some() {
        log::warn!("Ignoring photos beyond the {PHOTO_SLOT_COUNT} available slots");
    }

    fotos
}

#[cfg(feature = "server")]
impl TryFrom<FinalizeRemitoMultipart> for FinalizeRemitoForm {
    type Error = FormError;

    fn try_from(form: FinalizeRemitoMultipart) -> Result<Self, Self::Error> {
        let texts = |values: Vec<Text<String>>| values.into_iter().map(|t| t.0).collect::<Vec<_>>();

        // Browsers post empty file inputs as zero-byte parts.
        let uploads = form
            .fotos
            .into_iter()
            .enumerate()
            .map(|(index, file)| -> Result<Option<UploadedPhoto>, FormError> {
                if file.size == 0 {
                    return Ok(None);
                }
                let bytes = std::fs::read(file.file.path())
                    .map_err(|e| FormError::InvalidPhoto(format!("photo {}: {e}", index + 1)))?;
                Ok(Some(UploadedPhoto {
                    mime_type: file.content_type.as_ref().map(|mime| mime.to_string()),
                    file_name: file.file_name.clone().filter(|name| !name.is_empty()),
                    bytes,
                }))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            codigo: texts(form.codigo),
            descripcion: texts(form.descripcion),
            cantidad: texts(form.cantidad),
            observaciones: form.observaciones.map(|t| t.0).unwrap_or_default(),
            fotos: assign_photo_slots(uploads, texts(form.foto_ref)),
        })
    }
}
