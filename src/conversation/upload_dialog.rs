use tally_core::{archive::has_image_extension, FileRef, MessageContent};

pub const UPLOAD_PROMPT: &str = "Please upload a zip file or multiple images of your receipts.";
pub const UPLOAD_REPROMPT: &str = "Please send a valid zip file or multiple images of your receipts.";

/// What an upload message asks the pipeline to ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPayload {
    Archive(FileRef),
    Images(Vec<FileRef>),
}

/// Classifies a message as a receipt upload, or `None` when it carries nothing
/// the pipeline accepts.
pub fn classify_upload<S: AsRef<str>>(
    content: &MessageContent,
    image_extensions: &[S],
) -> Option<UploadPayload> {
    match content {
        MessageContent::Text(_) => None,
        MessageContent::Photos(photos) if photos.is_empty() => None,
        MessageContent::Photos(photos) => Some(UploadPayload::Images(photos.clone())),
        MessageContent::Document { file_name, file } => {
            if has_image_extension(file_name, &["zip"]) {
                Some(UploadPayload::Archive(file.clone()))
            } else if has_image_extension(file_name, image_extensions) {
                Some(UploadPayload::Images(vec![file.clone()]))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

    fn document(name: &str) -> MessageContent {
        MessageContent::Document {
            file_name: name.into(),
            file: FileRef::named("f1", name),
        }
    }

    #[test]
    fn zip_documents_are_archives() {
        assert_eq!(
            classify_upload(&document("receipts.ZIP"), &EXTENSIONS),
            Some(UploadPayload::Archive(FileRef::named("f1", "receipts.ZIP")))
        );
    }

    #[test]
    fn image_documents_and_photos_are_batches() {
        assert_eq!(
            classify_upload(&document("scan.jpeg"), &EXTENSIONS),
            Some(UploadPayload::Images(vec![FileRef::named("f1", "scan.jpeg")]))
        );
        let photos = MessageContent::Photos(vec![FileRef::new("p1"), FileRef::new("p2")]);
        assert_eq!(
            classify_upload(&photos, &EXTENSIONS),
            Some(UploadPayload::Images(vec![FileRef::new("p1"), FileRef::new("p2")]))
        );
    }

    #[test]
    fn other_messages_are_not_uploads() {
        assert_eq!(classify_upload(&document("notes.pdf"), &EXTENSIONS), None);
        assert_eq!(
            classify_upload(&MessageContent::Text("hello".into()), &EXTENSIONS),
            None
        );
        assert_eq!(
            classify_upload(&MessageContent::Photos(Vec::new()), &EXTENSIONS),
            None
        );
    }
}
