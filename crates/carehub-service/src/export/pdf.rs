//! Minimal single-font PDF writer for text listings.

const LINES_PER_PAGE: usize = 60;
const FONT_SIZE: u32 = 8;
const LEADING: u32 = 11;

/// Render `lines` under `title` as a multi-page Courier document.
pub(super) fn render_listing(title: &str, lines: &[String]) -> Vec<u8> {
    let mut all = Vec::with_capacity(lines.len() + 2);
    all.push(title.to_string());
    all.push(String::new());
    all.extend(lines.iter().cloned());

    let pages: Vec<&[String]> = all.chunks(LINES_PER_PAGE).collect();
    let mut doc = Document::default();

    // 1: catalog, 2: page tree, 3: font, then a page/content pair per page.
    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect::<Vec<_>>()
        .join(" ");
    doc.object("<< /Type /Catalog /Pages 2 0 R >>");
    doc.object(&format!(
        "<< /Type /Pages /Kids [{kids}] /Count {} >>",
        pages.len()
    ));
    doc.object("<< /Type /Font /Subtype /Type1 /BaseFont /Courier >>");

    for (i, page) in pages.iter().enumerate() {
        let content = page_content(page);
        doc.object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        doc.object(&format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }

    doc.finish()
}

fn page_content(lines: &[String]) -> String {
    let mut out = format!("BT\n/F1 {FONT_SIZE} Tf\n{LEADING} TL\n36 756 Td\n");
    for line in lines {
        out.push('(');
        out.push_str(&escape(line));
        out.push_str(") Tj T*\n");
    }
    out.push_str("ET");
    out
}

/// Escape string-literal delimiters; anything outside printable ASCII
/// becomes `?` since the standard font has no encoding for it.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

#[derive(Default)]
struct Document {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
}

impl Document {
    fn object(&mut self, body: &str) {
        if self.bytes.is_empty() {
            self.bytes.extend_from_slice(b"%PDF-1.4\n");
        }
        self.offsets.push(self.bytes.len());
        let number = self.offsets.len();
        self.bytes
            .extend_from_slice(format!("{number} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_at = self.bytes.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            self.offsets.len() + 1
        ));
        self.bytes.extend_from_slice(xref.as_bytes());
        self.bytes
    }
}
