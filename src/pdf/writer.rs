//! # PDF Serializer
//!
//! Writes a [`Document`] as a PDF 1.7 byte stream.
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- Catalog, Pages, fonts, images, pages, contents
//! ...
//! xref                <- byte offset of every object
//! trailer             <- /Root and /Info
//! %%EOF
//! ```
//!
//! Fonts and images that are equal across pages are written once. Page
//! content streams are written exactly as the engine built them, so their
//! `/Length` is the compressed size the page already tracks.

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;
use std::sync::Arc;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::font::{same_font, Font, FontType};

use super::content::{fmt_num, text_string};
use super::resources::{ColorSpace, ImageXObject};
use super::Document;

struct PdfObject {
    data: Vec<u8>,
}

/// Object ids are indices into `objects`; index 0 is the free-list head.
struct PdfBuilder {
    objects: Vec<PdfObject>,
}

impl PdfBuilder {
    fn new() -> Self {
        let mut objects = Vec::new();
        // 0 = placeholder, 1 = Catalog, 2 = Pages
        for _ in 0..3 {
            objects.push(PdfObject { data: Vec::new() });
        }
        Self { objects }
    }

    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(PdfObject { data });
        self.objects.len() - 1
    }

    fn push_stream(&mut self, dict: &str, body: &[u8]) -> usize {
        let mut data = Vec::with_capacity(dict.len() + body.len() + 20);
        data.extend_from_slice(dict.as_bytes());
        data.extend_from_slice(b"\nstream\n");
        data.extend_from_slice(body);
        data.extend_from_slice(b"\nendstream");
        self.push(data)
    }
}

/// A font used somewhere in the document, with every glyph shown through it.
struct DocFont {
    font: Arc<dyn Font>,
    used: BTreeMap<u16, char>,
    obj_id: usize,
}

struct DocImage {
    image: Arc<ImageXObject>,
    obj_id: usize,
}

/// Serialize `doc` to PDF bytes.
pub fn serialize(doc: &Document) -> Vec<u8> {
    let mut builder = PdfBuilder::new();
    let fonts = write_fonts(&mut builder, doc);
    let images = write_images(&mut builder, doc);

    let mut page_obj_ids = Vec::with_capacity(doc.pages().len());
    for page in doc.pages() {
        let content_id = builder.push_stream(&page.content.dictionary(), page.content.compressed());

        let mut resources = String::new();
        if !page.resources.fonts().is_empty() {
            resources.push_str("/Font <<");
            for (name, res) in page.resources.fonts() {
                if let Some(f) = fonts.iter().find(|f| same_font(&f.font, &res.font)) {
                    let _ = write!(resources, " /{} {} 0 R", name, f.obj_id);
                }
            }
            resources.push_str(" >> ");
        }
        if !page.resources.xobjects().is_empty() {
            resources.push_str("/XObject <<");
            for (name, image) in page.resources.xobjects() {
                if let Some(img) = images
                    .iter()
                    .find(|i| Arc::ptr_eq(&i.image, image) || *i.image == **image)
                {
                    let _ = write!(resources, " /{} {} 0 R", name, img.obj_id);
                }
            }
            resources.push_str(" >> ");
        }

        let page_dict = format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Contents {} 0 R /Resources << {}>> >>",
            fmt_num(page.width),
            fmt_num(page.height),
            content_id,
            resources
        );
        page_obj_ids.push(builder.push(page_dict.into_bytes()));
    }

    builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

    let kids: String = page_obj_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    builder.objects[2].data = format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids,
        page_obj_ids.len()
    )
    .into_bytes();

    let info_id = write_info(&mut builder, doc);

    log::debug!(
        "serialized {} pages, {} fonts, {} images into {} objects",
        page_obj_ids.len(),
        fonts.len(),
        images.len(),
        builder.objects.len() - 1
    );
    finish(&builder, info_id)
}

fn write_info(builder: &mut PdfBuilder, doc: &Document) -> usize {
    let info = &doc.info;
    let mut data = b"<<".to_vec();
    for (key, value) in [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
    ] {
        if let Some(value) = value {
            let _ = write!(data, " /{} ", key);
            data.extend_from_slice(&text_string(value));
        }
    }
    data.extend_from_slice(b" /Producer ");
    data.extend_from_slice(&text_string(&info.producer));
    data.extend_from_slice(b" >>");
    builder.push(data)
}

fn write_fonts(builder: &mut PdfBuilder, doc: &Document) -> Vec<DocFont> {
    let mut fonts: Vec<DocFont> = Vec::new();
    for page in doc.pages() {
        for res in page.resources.fonts().values() {
            match fonts.iter_mut().find(|f| same_font(&f.font, &res.font)) {
                Some(existing) => existing.used.extend(res.used.iter().map(|(g, c)| (*g, *c))),
                None => fonts.push(DocFont {
                    font: Arc::clone(&res.font),
                    used: res.used.clone(),
                    obj_id: 0,
                }),
            }
        }
    }

    for f in &mut fonts {
        f.obj_id = match f.font.font_type() {
            FontType::Type1 => write_simple_font(builder, f.font.as_ref()),
            FontType::TrueType => write_composite_font(builder, f.font.as_ref(), &f.used),
        };
    }
    fonts
}

fn write_simple_font(builder: &mut PdfBuilder, font: &dyn Font) -> usize {
    let encoding = font
        .encoding_entry()
        .map(|e| format!(" /Encoding /{}", e))
        .unwrap_or_default();
    let dict = format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{}{} >>",
        font.name(),
        encoding
    );
    builder.push(dict.into_bytes())
}

/// The five objects of an embedded TrueType font. Returns the Type0 id.
fn write_composite_font(
    builder: &mut PdfBuilder,
    font: &dyn Font,
    used: &BTreeMap<u16, char>,
) -> usize {
    let name = font.name().to_string();
    let program = font.embedding_stream().unwrap_or_default();

    // 1. FontFile2
    let compressed = compress_to_vec_zlib(program, 6);
    let fontfile2_id = builder.push_stream(
        &format!(
            "<< /Length {} /Length1 {} /Filter /FlateDecode >>",
            compressed.len(),
            program.len()
        ),
        &compressed,
    );

    // 2. FontDescriptor
    let d = font.descriptor();
    let descriptor = format!(
        "<< /Type /FontDescriptor /FontName /{} /Flags {} \
         /FontBBox [{} {} {} {}] /ItalicAngle {} \
         /Ascent {} /Descent {} /CapHeight {} /StemV {} \
         /FontFile2 {} 0 R >>",
        name,
        d.flags,
        d.bbox[0],
        d.bbox[1],
        d.bbox[2],
        d.bbox[3],
        fmt_num(d.italic_angle),
        font.ascent() as i32,
        font.descent() as i32,
        d.cap_height as i32,
        d.stem_v,
        fontfile2_id,
    );
    let descriptor_id = builder.push(descriptor.into_bytes());

    // 3. CIDFontType2
    let cidfont = format!(
        "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
         /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
         /FontDescriptor {} 0 R /DW {} /W {} /CIDToGIDMap /Identity >>",
        name,
        descriptor_id,
        font.advance_width(font.missing_glyph()),
        build_w_array(font, used),
    );
    let cidfont_id = builder.push(cidfont.into_bytes());

    // 4. ToUnicode
    let cmap = build_tounicode_cmap(used, &name);
    let compressed_cmap = compress_to_vec_zlib(cmap.as_bytes(), 6);
    let tounicode_id = builder.push_stream(
        &format!(
            "<< /Length {} /Filter /FlateDecode >>",
            compressed_cmap.len()
        ),
        &compressed_cmap,
    );

    // 5. Type0
    let encoding = font.encoding_entry().unwrap_or("Identity-H");
    let type0 = format!(
        "<< /Type /Font /Subtype /Type0 /BaseFont /{} /Encoding /{} \
         /DescendantFonts [{} 0 R] /ToUnicode {} 0 R >>",
        name, encoding, cidfont_id, tounicode_id,
    );
    builder.push(type0.into_bytes())
}

/// `/W` entries for the glyphs actually shown: `[gid [width] ...]`.
fn build_w_array(font: &dyn Font, used: &BTreeMap<u16, char>) -> String {
    let mut result = String::from("[");
    for gid in used.keys() {
        let _ = write!(result, " {} [{}]", gid, font.advance_width(*gid));
    }
    result.push_str(" ]");
    result
}

fn build_tounicode_cmap(used: &BTreeMap<u16, char>, font_name: &str) -> String {
    let mut cmap = String::new();
    cmap.push_str("/CIDInit /ProcSet findresource begin\n");
    cmap.push_str("12 dict begin\n");
    cmap.push_str("begincmap\n");
    cmap.push_str("/CIDSystemInfo\n");
    cmap.push_str("<< /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
    let _ = writeln!(cmap, "/CMapName /{}-UTF16 def", font_name);
    cmap.push_str("/CMapType 2 def\n");
    cmap.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    let entries: Vec<(u16, char)> = used.iter().map(|(g, c)| (*g, *c)).collect();
    // At most 100 entries per bfchar block.
    for chunk in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (gid, c) in chunk {
            let mut units = [0u16; 2];
            let hex: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", gid, hex);
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\n");
    cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
    cmap.push_str("end\nend\n");
    cmap
}

fn write_images(builder: &mut PdfBuilder, doc: &Document) -> Vec<DocImage> {
    let mut images: Vec<DocImage> = Vec::new();
    for page in doc.pages() {
        for image in page.resources.xobjects().values() {
            if images
                .iter()
                .any(|i| Arc::ptr_eq(&i.image, image) || *i.image == **image)
            {
                continue;
            }
            let obj_id = write_image_xobject(builder, image);
            images.push(DocImage {
                image: Arc::clone(image),
                obj_id,
            });
        }
    }
    images
}

fn write_image_xobject(builder: &mut PdfBuilder, image: &ImageXObject) -> usize {
    let smask_ref = image
        .smask
        .as_ref()
        .map(|alpha| {
            let id = builder.push_stream(
                &format!(
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /{} /BitsPerComponent 8 /Filter /FlateDecode /Length {} >>",
                    image.width,
                    image.height,
                    ColorSpace::DeviceGray.pdf_name(),
                    alpha.len()
                ),
                alpha,
            );
            format!(" /SMask {} 0 R", id)
        })
        .unwrap_or_default();

    let decode = image
        .color_space
        .decode_array()
        .map(|d| format!(" /Decode {}", d))
        .unwrap_or_default();

    builder.push_stream(
        &format!(
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /{}{} /BitsPerComponent 8 /Filter /{} /Length {}{} >>",
            image.width,
            image.height,
            image.color_space.pdf_name(),
            decode,
            image.filter.pdf_name(),
            image.data.len(),
            smask_ref
        ),
        &image.data,
    )
}

fn finish(builder: &PdfBuilder, info_id: usize) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

    output.extend_from_slice(b"%PDF-1.7\n");
    output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

    for (i, obj) in builder.objects.iter().enumerate().skip(1) {
        offsets[i] = output.len();
        let _ = write!(output, "{} 0 obj\n", i);
        output.extend_from_slice(&obj.data);
        output.extend_from_slice(b"\nendobj\n\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
    output.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        let _ = write!(output, "{:010} 00000 n \n", offset);
    }

    let _ = write!(
        output,
        "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        builder.objects.len(),
        info_id,
        xref_offset
    );
    output
}
