// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PPTX writer — packages slides as a minimal PresentationML deck.
//
// The package holds one master, one blank layout and one theme; every slide
// draws its own shapes with explicit geometry, so no placeholder inheritance
// is involved. Coordinates arrive in points and are written in EMU.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use satzwerk_core::error::{ConvertError, Result};
use satzwerk_core::{SLIDE_HEIGHT_PT, SLIDE_WIDTH_PT, Slide, SlideFrame};
use tracing::{debug, instrument};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::adapters::SlideSerializer;

/// English Metric Units per point.
const EMU_PER_PT: f32 = 12_700.0;

const TEXT_INSET_PT: f32 = 48.0;
const TITLE_SIZE_PT: u32 = 40;
const HEADING_SIZE_PT: u32 = 32;
const BODY_SIZE_PT: u32 = 18;

const NS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn emu(pt: f32) -> i64 {
    (pt * EMU_PER_PT).round() as i64
}

fn zip_err(err: impl std::fmt::Display) -> ConvertError {
    ConvertError::Serialization(format!("cannot write PPTX package: {err}"))
}

/// Serialises [`Slide`]s into a 16:9 `.pptx` package.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxWriter;

impl SlideSerializer for PptxWriter {
    #[instrument(skip_all, fields(slides = slides.len()))]
    fn serialize(&self, slides: &[Slide]) -> Result<Vec<u8>> {
        if slides.is_empty() {
            return Err(ConvertError::Serialization(
                "a presentation needs at least one slide".into(),
            ));
        }

        let mut package = Package::new();
        package.add("[Content_Types].xml", content_types(slides.len()))?;
        package.add("_rels/.rels", root_rels())?;
        package.add("ppt/presentation.xml", presentation(slides.len()))?;
        package.add("ppt/_rels/presentation.xml.rels", presentation_rels(slides.len()))?;
        package.add("ppt/slideMasters/slideMaster1.xml", slide_master())?;
        package.add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            relationships(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ]),
        )?;
        package.add("ppt/slideLayouts/slideLayout1.xml", slide_layout())?;
        package.add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        )?;
        package.add("ppt/theme/theme1.xml", theme().to_string())?;

        let mut images = 0usize;
        for (position, slide) in slides.iter().enumerate() {
            let number = position + 1;
            let layout_rel = ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml");
            match slide {
                Slide::Image {
                    raster_bytes,
                    frame,
                    ..
                } => {
                    images += 1;
                    let media = format!("ppt/media/image{images}.png");
                    package.add_bytes(&media, raster_bytes)?;
                    let target = format!("../media/image{images}.png");
                    package.add(
                        &format!("ppt/slides/slide{number}.xml"),
                        picture_slide(number, frame),
                    )?;
                    package.add(
                        &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                        relationships(&[layout_rel, ("rId2", "image", target.as_str())]),
                    )?;
                }
                Slide::Text {
                    title, body_lines, ..
                } => {
                    package.add(
                        &format!("ppt/slides/slide{number}.xml"),
                        text_slide(title.as_deref(), body_lines),
                    )?;
                    package.add(
                        &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                        relationships(&[layout_rel]),
                    )?;
                }
            }
        }

        let bytes = package.finish()?;
        debug!(images, bytes = bytes.len(), "PPTX serialised");
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// Zip container
// ---------------------------------------------------------------------------

struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl Package {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default(),
        }
    }

    fn add(&mut self, name: &str, xml: String) -> Result<()> {
        self.add_bytes(name, xml.as_bytes())
    }

    fn add_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.zip.start_file(name, self.options).map_err(zip_err)?;
        self.zip.write_all(bytes).map_err(zip_err)
    }

    fn finish(self) -> Result<Vec<u8>> {
        Ok(self.zip.finish().map_err(zip_err)?.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Package parts
// ---------------------------------------------------------------------------

fn content_types(slide_count: usize) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#
    );
    for number in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{number}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        );
    }
    xml.push_str("</Types>");
    xml
}

fn relationships(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(r#"{XML_DECL}<Relationships xmlns="{REL_NS}">"#);
    for (id, kind, target) in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="{id}" Type="{REL_TYPE}/{kind}" Target="{target}"/>"#
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn root_rels() -> String {
    relationships(&[("rId1", "officeDocument", "ppt/presentation.xml")])
}

fn presentation(slide_count: usize) -> String {
    let mut ids = String::new();
    for i in 0..slide_count {
        let _ = write!(ids, r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, 3 + i);
    }
    format!(
        r#"{XML_DECL}<p:presentation {NS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        emu(SLIDE_WIDTH_PT),
        emu(SLIDE_HEIGHT_PT),
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let slide_targets: Vec<(String, String)> = (1..=slide_count)
        .map(|n| (format!("rId{}", n + 2), format!("slides/slide{n}.xml")))
        .collect();
    let mut rels: Vec<(&str, &str, &str)> = vec![
        ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        ("rId2", "theme", "theme/theme1.xml"),
    ];
    rels.extend(
        slide_targets
            .iter()
            .map(|(id, target)| (id.as_str(), "slide", target.as_str())),
    );
    relationships(&rels)
}

const EMPTY_TREE_HEADER: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;

fn slide_master() -> String {
    format!(
        r#"{XML_DECL}<p:sldMaster {NS}><p:cSld><p:spTree>{EMPTY_TREE_HEADER}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn slide_layout() -> String {
    format!(
        r#"{XML_DECL}<p:sldLayout {NS} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{EMPTY_TREE_HEADER}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn theme() -> &'static str {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Satzwerk"><a:themeElements>"#,
        r#"<a:clrScheme name="Satzwerk"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>"#,
        r#"<a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2>"#,
        r#"<a:accent1><a:srgbClr val="2563EB"/></a:accent1><a:accent2><a:srgbClr val="DC2626"/></a:accent2>"#,
        r#"<a:accent3><a:srgbClr val="16A34A"/></a:accent3><a:accent4><a:srgbClr val="CA8A04"/></a:accent4>"#,
        r#"<a:accent5><a:srgbClr val="9333EA"/></a:accent5><a:accent6><a:srgbClr val="0891B2"/></a:accent6>"#,
        r#"<a:hlink><a:srgbClr val="2563EB"/></a:hlink><a:folHlink><a:srgbClr val="7C3AED"/></a:folHlink></a:clrScheme>"#,
        r#"<a:fontScheme name="Satzwerk"><a:majorFont><a:latin typeface="Helvetica"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
        r#"<a:minorFont><a:latin typeface="Helvetica"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme>"#,
        r#"<a:fmtScheme name="Satzwerk"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst>"#,
        r#"<a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        r#"<a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        r#"<a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst>"#,
        r#"<a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle>"#,
        r#"<a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst>"#,
        r#"<a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme>"#,
        r#"</a:themeElements></a:theme>"#
    )
}

// ---------------------------------------------------------------------------
// Slides
// ---------------------------------------------------------------------------

fn xfrm(frame: &SlideFrame) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        emu(frame.x),
        emu(frame.y),
        emu(frame.width),
        emu(frame.height)
    )
}

/// A text box with one paragraph per line.
fn text_shape(id: u32, name: &str, frame: &SlideFrame, lines: &[&str], size: u32, bold: bool) -> String {
    let mut paragraphs = String::new();
    for line in lines {
        if line.is_empty() {
            paragraphs.push_str(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#);
        } else {
            let _ = write!(
                paragraphs,
                r#"<a:p><a:r><a:rPr lang="en-US" sz="{}" b="{}"/><a:t>{}</a:t></a:r></a:p>"#,
                size * 100,
                u8::from(bold),
                escape(*line)
            );
        }
    }
    if paragraphs.is_empty() {
        paragraphs.push_str("<a:p/>");
    }
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square" anchor="t"><a:normAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        xfrm(frame)
    )
}

fn slide_document(shapes: &str) -> String {
    format!(
        r#"{XML_DECL}<p:sld {NS}><p:cSld><p:spTree>{EMPTY_TREE_HEADER}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn text_slide(title: Option<&str>, body_lines: &[String]) -> String {
    let inner_width = SLIDE_WIDTH_PT - 2.0 * TEXT_INSET_PT;
    let body: Vec<&str> = body_lines.iter().map(String::as_str).collect();

    let shapes = match title {
        // Title-only slide: one large centred-height box.
        Some(title) if body.is_empty() => {
            let frame = SlideFrame {
                x: TEXT_INSET_PT,
                y: SLIDE_HEIGHT_PT / 2.0 - 60.0,
                width: inner_width,
                height: 120.0,
            };
            text_shape(2, "Title", &frame, &[title], TITLE_SIZE_PT, true)
        }
        Some(title) => {
            let heading = SlideFrame {
                x: TEXT_INSET_PT,
                y: 36.0,
                width: inner_width,
                height: 72.0,
            };
            let content = SlideFrame {
                x: TEXT_INSET_PT,
                y: 120.0,
                width: inner_width,
                height: SLIDE_HEIGHT_PT - 120.0 - 36.0,
            };
            text_shape(2, "Title", &heading, &[title], HEADING_SIZE_PT, true)
                + &text_shape(3, "Body", &content, &body, BODY_SIZE_PT, false)
        }
        None => {
            let content = SlideFrame {
                x: TEXT_INSET_PT,
                y: 36.0,
                width: inner_width,
                height: SLIDE_HEIGHT_PT - 72.0,
            };
            text_shape(2, "Body", &content, &body, BODY_SIZE_PT, false)
        }
    };
    slide_document(&shapes)
}

fn picture_slide(number: usize, frame: &SlideFrame) -> String {
    let picture = format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="2" name="Page {number}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        xfrm(frame)
    );
    slide_document(&picture)
}
