use shared::protocol::AttachmentUpload;
use thiserror::Error;

pub const MAX_ATTACHMENT_BYTES: u64 = 250 * 1024;

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/jpg",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentError {
    #[error("file is too large ({size_bytes} bytes); the limit is 250 KB")]
    TooLarge { size_bytes: u64 },
    #[error("unsupported file type {mime_type}; allowed: PDF, PNG, JPG, JPEG, XLSX, XLS")]
    UnsupportedType { mime_type: String },
}

pub fn validate_attachment(size_bytes: u64, mime_type: &str) -> Result<(), AttachmentError> {
    if size_bytes > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge { size_bytes });
    }
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&essence.as_str()) {
        return Err(AttachmentError::UnsupportedType {
            mime_type: mime_type.to_string(),
        });
    }
    Ok(())
}

pub fn validate_upload(upload: &AttachmentUpload) -> Result<(), AttachmentError> {
    validate_attachment(upload.size_bytes(), &upload.mime_type)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentSlot {
    file: Option<AttachmentUpload>,
}

impl AttachmentSlot {
    pub fn select(&mut self, upload: AttachmentUpload) -> Result<(), AttachmentError> {
        match validate_upload(&upload) {
            Ok(()) => {
                self.file = Some(upload);
                Ok(())
            }
            Err(err) => {
                self.file = None;
                Err(err)
            }
        }
    }

    pub fn file(&self) -> Option<&AttachmentUpload> {
        self.file.as_ref()
    }

    pub fn clear(&mut self) {
        self.file = None;
    }
}
