//! Multipart body absorption.
//!
//! Folds a parsed multipart body into the parameter bag: text fields are
//! decoded with the request's effective encoding, file parts with a
//! non-empty filename are spilled to registered temp files. Parts with an
//! empty filename are dropped without a trace (a submitted-but-unchosen file
//! input is indistinguishable from an omitted field, and downstream
//! consumers rely on the omission).

use std::io::Write;

use {encoding_rs::Encoding, tracing::debug};

use {
    porta_common::{ChannelParameterValue, ChannelParameters, PortalRequest, UploadedFile},
    porta_routing::reserved::is_reserved,
};

use crate::{
    cleanup::TempFileRegistry,
    error::{Context as _, Error, Result},
};

/// Encoding used to decode multipart text fields: the request-declared one,
/// else the configured default. Unknown labels fall back to UTF-8.
pub(crate) fn effective_encoding(
    request: &PortalRequest,
    default_label: &str,
) -> &'static Encoding {
    let label = request.character_encoding().unwrap_or(default_label);
    Encoding::for_label(label.as_bytes()).unwrap_or(encoding_rs::UTF_8)
}

/// Parse the request body and merge every part into `bag`.
///
/// Fields already merged stay in the bag when an error cuts parsing short;
/// the caller records the failure in the upload status instead of unwinding.
pub(crate) async fn absorb_multipart(
    request: &PortalRequest,
    encoding: &'static Encoding,
    max_file_size: u64,
    registry: &TempFileRegistry,
    bag: &mut ChannelParameters,
) -> Result<()> {
    let boundary = multer::parse_boundary(request.content_type().unwrap_or_default())?;
    let body = request.body().clone();
    let stream =
        futures::stream::once(async move { Ok::<_, std::convert::Infallible>(body) });
    let mut parts = multer::Multipart::new(stream, boundary);

    while let Some(field) = parts.next_field().await? {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        let file_name = field.file_name().map(ToOwned::to_owned);
        let content_type = field.content_type().map(ToString::to_string);
        let data = field.bytes().await?;

        // Routing keys are stripped no matter where they ride.
        if is_reserved(&name) {
            debug!(field = %name, "dropping reserved routing key from multipart body");
            continue;
        }

        match file_name.as_deref() {
            // Ordinary form field.
            None => {
                let (text, _, _) = encoding.decode(&data);
                bag.entry(name)
                    .or_default()
                    .push(ChannelParameterValue::Text(text.into_owned()));
            }
            // File input submitted with no file chosen.
            Some("") => {}
            Some(filename) => {
                let size = data.len() as u64;
                if size > max_file_size {
                    return Err(Error::file_too_large(filename, size, max_file_size));
                }

                let mut file = tempfile::Builder::new()
                    .prefix("porta-upload-")
                    .tempfile()?;
                file.write_all(&data)
                    .with_context(|| format!("spill upload `{filename}`"))?;
                let temp_path = file.into_temp_path();
                let path = temp_path.to_path_buf();
                registry.register(temp_path);

                let uploaded =
                    UploadedFile::new(name.clone(), filename, content_type, size, path);
                bag.entry(name)
                    .or_default()
                    .push(ChannelParameterValue::File(uploaded));
            }
        }
    }

    Ok(())
}
