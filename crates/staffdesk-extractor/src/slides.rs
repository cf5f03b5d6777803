//! Slide-deck text extraction.
//!
//! A `.pptx` file is a zip archive with one XML part per slide under
//! `ppt/slides/`. Shapes carry their text in `<p:txBody>` elements; runs
//! (`<a:t>`) concatenate within a paragraph (`<a:p>`), and paragraphs join
//! with newlines, which is what a presentation library reports as the
//! shape text.

use crate::error::ExtractError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read the per-slide shape texts of a slide deck, in slide order.
///
/// Returns one `Vec<String>` per slide: the trimmed, non-empty shape texts
/// in document order. Slides with no text yield an empty vector.
pub fn read_slide_shape_texts(path: &Path) -> Result<Vec<Vec<String>>, ExtractError> {
    let file = File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractError::Archive(e.to_string()))?;

    // Slide parts are named slide1.xml, slide2.xml, ...; lexicographic
    // order would put slide10 before slide2, so sort on the number.
    let mut slide_parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slide_parts.sort_by_key(|(n, _)| *n);

    let mut slides = Vec::with_capacity(slide_parts.len());
    for (number, name) in slide_parts {
        debug!("Reading slide part {}", name);
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| ExtractError::Archive(e.to_string()))?
            .read_to_string(&mut xml)?;

        let shapes = parse_shape_texts(&xml)
            .map_err(|e| ExtractError::Xml(format!("slide {}: {}", number, e)))?;
        slides.push(shapes);
    }

    Ok(slides)
}

/// Extract the slide number from an archive entry name, if it is a slide part.
fn slide_number(name: &str) -> Option<u32> {
    let rest = name.strip_prefix("ppt/slides/slide")?;
    let digits = rest.strip_suffix(".xml")?;
    digits.parse().ok()
}

/// Pull the shape texts out of one slide's XML.
///
/// Within a `<p:txBody>`, text runs concatenate per paragraph and
/// paragraphs join with `\n`. Whitespace-only shapes are dropped.
fn parse_shape_texts(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);

    let mut shapes = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut body_depth = 0usize;
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"p:txBody" => {
                    body_depth += 1;
                    paragraphs.clear();
                }
                b"a:p" if body_depth > 0 => paragraph.clear(),
                b"a:t" if body_depth > 0 => in_run = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"p:txBody" => {
                    body_depth = body_depth.saturating_sub(1);
                    let text = paragraphs.join("\n");
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        shapes.push(trimmed.to_string());
                    }
                }
                b"a:p" if body_depth > 0 => paragraphs.push(paragraph.clone()),
                b"a:t" => in_run = false,
                _ => {}
            },
            Ok(Event::Text(t)) if in_run => {
                let fragment = t.unescape().map_err(|e| e.to_string())?;
                paragraph.push_str(&fragment);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
    }

    Ok(shapes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_shape() {
        let xml = r#"<p:sld><p:cSld><p:spTree>
            <p:sp><p:txBody>
                <a:p><a:r><a:t>Kandidat One</a:t></a:r></a:p>
            </p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;

        let shapes = parse_shape_texts(xml).unwrap();
        assert_eq!(shapes, vec!["Kandidat One".to_string()]);
    }

    #[test]
    fn test_runs_concatenate_within_paragraph() {
        let xml = r#"<p:sp><p:txBody>
            <a:p><a:r><a:t>Data </a:t></a:r><a:r><a:t>Engineer</a:t></a:r></a:p>
        </p:txBody></p:sp>"#;

        let shapes = parse_shape_texts(xml).unwrap();
        assert_eq!(shapes, vec!["Data Engineer".to_string()]);
    }

    #[test]
    fn test_paragraphs_join_with_newline() {
        let xml = r#"<p:sp><p:txBody>
            <a:p><a:r><a:t>Line one</a:t></a:r></a:p>
            <a:p><a:r><a:t>Line two</a:t></a:r></a:p>
        </p:txBody></p:sp>"#;

        let shapes = parse_shape_texts(xml).unwrap();
        assert_eq!(shapes, vec!["Line one\nLine two".to_string()]);
    }

    #[test]
    fn test_empty_shape_dropped() {
        let xml = r#"<p:sld>
            <p:sp><p:txBody><a:p><a:r><a:t>  </a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:txBody><a:p><a:r><a:t>Kept</a:t></a:r></a:p></p:txBody></p:sp>
        </p:sld>"#;

        let shapes = parse_shape_texts(xml).unwrap();
        assert_eq!(shapes, vec!["Kept".to_string()]);
    }

    #[test]
    fn test_multiple_shapes_in_order() {
        let xml = r#"<p:sld>
            <p:sp><p:txBody><a:p><a:r><a:t>First</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:txBody><a:p><a:r><a:t>Second</a:t></a:r></a:p></p:txBody></p:sp>
        </p:sld>"#;

        let shapes = parse_shape_texts(xml).unwrap();
        assert_eq!(shapes, vec!["First".to_string(), "Second".to_string()]);
    }

    #[test]
    fn test_entities_unescaped() {
        let xml = r#"<p:sp><p:txBody>
            <a:p><a:r><a:t>Fish &amp; Chips</a:t></a:r></a:p>
        </p:txBody></p:sp>"#;

        let shapes = parse_shape_texts(xml).unwrap();
        assert_eq!(shapes, vec!["Fish & Chips".to_string()]);
    }

    #[test]
    fn test_slide_number_parsing() {
        assert_eq!(slide_number("ppt/slides/slide1.xml"), Some(1));
        assert_eq!(slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(slide_number("ppt/slides/_rels/slide1.xml.rels"), None);
        assert_eq!(slide_number("ppt/presentation.xml"), None);
        assert_eq!(slide_number("docProps/app.xml"), None);
    }
}
