//! File uploads to the hosted object store.
//!
//! Validation happens client-side, before any network call: a rejected
//! upload has no partial side effect. Limits follow the backend's bucket
//! policy: [`MAX_UPLOAD_BYTES`] per file (a file of exactly the limit
//! passes), image content types only, and at most [`MAX_CAR_IMAGES`]
//! images per listing — a batch that would exceed the cap fails whole.

use crate::client::RemoteClient;
use crate::error::{ApiResult, Error};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_CAR_IMAGES: usize = 10;
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Check one file against the bucket policy.
pub fn validate_upload(content_type: &str, len: usize) -> ApiResult<()> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(Error::validation(format!(
            "unsupported file type {content_type}; allowed: {}",
            ALLOWED_IMAGE_TYPES.join(", ")
        )));
    }
    if len > MAX_UPLOAD_BYTES {
        return Err(Error::validation(format!(
            "file is {len} bytes; the limit is {MAX_UPLOAD_BYTES}"
        )));
    }
    Ok(())
}

/// Append image URLs to a listing's image list, all-or-nothing.
///
/// On error the existing list is left untouched.
pub fn append_images(existing: &mut Vec<String>, adding: Vec<String>) -> ApiResult<()> {
    let total = existing.len() + adding.len();
    if total > MAX_CAR_IMAGES {
        return Err(Error::validation(format!(
            "a listing can have at most {MAX_CAR_IMAGES} images; {total} requested"
        )));
    }
    existing.extend(adding);
    Ok(())
}

impl RemoteClient {
    /// Upload a file and return its public URL.
    ///
    /// Validation failures surface as [`Error::Validation`] without
    /// touching the network.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<String> {
        validate_upload(content_type, bytes.len())?;

        let response = self
            .http()
            .post(self.config().storage_url(bucket, path))
            .header("apikey", &self.config().anon_key)
            .bearer_auth(&self.config().anon_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;
        crate::client::ok_or_remote(response).await?;

        Ok(self.config().public_object_url(bucket, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_file_of_exactly_the_limit_passes() {
        assert!(validate_upload("image/png", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn one_byte_over_fails_validation() {
        let err = validate_upload("image/png", MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn non_image_types_are_rejected() {
        let err = validate_upload("application/pdf", 1024).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn image_batch_over_the_cap_fails_whole_and_changes_nothing() {
        let mut existing: Vec<String> = (0..8).map(|i| format!("img-{i}.jpg")).collect();
        let before = existing.clone();

        let adding: Vec<String> = (0..3).map(|i| format!("new-{i}.jpg")).collect();
        let err = append_images(&mut existing, adding).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(existing, before);
    }

    #[test]
    fn image_batch_up_to_the_cap_is_appended() {
        let mut existing: Vec<String> = (0..8).map(|i| format!("img-{i}.jpg")).collect();
        let adding: Vec<String> = (0..2).map(|i| format!("new-{i}.jpg")).collect();
        append_images(&mut existing, adding).unwrap();
        assert_eq!(existing.len(), MAX_CAR_IMAGES);
    }
}
