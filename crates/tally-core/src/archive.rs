//! Zip archive enumeration for receipt uploads.

use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use crate::{extraction::ReceiptImage, CoreError};

pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Whether `name` ends in one of `extensions` (compared case-insensitively).
pub fn has_image_extension<S: AsRef<str>>(name: &str, extensions: &[S]) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => extensions
            .iter()
            .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(ext)),
        None => false,
    }
}

fn is_resource_fork(name: &str) -> bool {
    let base = name.rsplit('/').next().unwrap_or(name);
    name.starts_with("__MACOSX/") || base.starts_with("._")
}

/// Reads every image member of a zip archive, in archive order.
pub fn read_receipt_archive<S: AsRef<str>>(
    bytes: &[u8],
    extensions: &[S],
) -> Result<Vec<ReceiptImage>, CoreError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut images = Vec::new();
    for index in 0..archive.len() {
        let mut member = archive.by_index(index)?;
        let name = member.name().to_string();
        if member.is_dir() || is_resource_fork(&name) || !has_image_extension(&name, extensions) {
            debug!(member = %name, "skipping archive member");
            continue;
        }
        let mut data = Vec::new();
        member.read_to_end(&mut data)?;
        images.push(ReceiptImage::new(name, data));
    }
    Ok(images)
}
