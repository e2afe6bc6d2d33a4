use std::io::{Cursor, Read, Seek};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::TimeVerifyError;
use crate::extraction::EmbeddedImage;

const RELS_PART: &str = "word/_rels/document.xml.rels";
const MEDIA_PREFIX: &str = "word/media/";

/// Extract the images referenced by a `.docx` package.
///
/// Images are found through the main document's relationships, in the order
/// they are declared. Packages without a relationships part fall back to every
/// file under `word/media/`.
pub fn extract_docx_images(
    filename: &str,
    bytes: &[u8],
) -> Result<Vec<EmbeddedImage>, TimeVerifyError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| TimeVerifyError::InvalidDocument {
            filename: filename.to_string(),
            reason: e.to_string(),
        })?;

    let parts = match read_part(&mut archive, RELS_PART) {
        Some(rels) => {
            let xml = String::from_utf8_lossy(&rels);
            image_targets(&xml).map_err(|reason| TimeVerifyError::InvalidDocument {
                filename: filename.to_string(),
                reason,
            })?
        }
        None => {
            debug!(filename, "no document relationships, scanning media folder");
            archive
                .file_names()
                .filter(|n| n.starts_with(MEDIA_PREFIX) && !n.ends_with('/'))
                .map(str::to_string)
                .collect()
        }
    };

    let mut images = Vec::with_capacity(parts.len());
    for part_name in parts {
        match read_part(&mut archive, &part_name) {
            Some(bytes) => images.push(EmbeddedImage { part_name, bytes }),
            None => warn!(filename, part = %part_name, "referenced image missing from package"),
        }
    }
    Ok(images)
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Option<Vec<u8>> {
    let mut file = archive.by_name(name).ok()?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).ok()?;
    Some(buf)
}

/// Archive paths of image relationships, in declaration order.
fn image_targets(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut targets = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                if e.local_name().as_ref() != b"Relationship" {
                    continue;
                }
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut external = false;
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| e.to_string())?;
                    let value = attr.unescape_value().map_err(|e| e.to_string())?;
                    match attr.key.local_name().as_ref() {
                        b"Type" => rel_type = value.into_owned(),
                        b"Target" => target = value.into_owned(),
                        b"TargetMode" => external = value.eq_ignore_ascii_case("external"),
                        _ => {}
                    }
                }
                if external || target.is_empty() {
                    continue;
                }
                if rel_type.contains("image") || target.contains("image") {
                    targets.push(resolve_target(&target));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("malformed relationships part: {e}")),
            _ => {}
        }
    }
    Ok(targets)
}

/// Resolve a relationship target against the `word/` folder.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = vec!["word"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}
