use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::report::{Block, Link, ReportDocument, RichText, Segment, Table};

/// Stylesheet shipped with the crate
pub const DEFAULT_STYLESHEET: &str = include_str!("../../data/style.css");

const INDENT: &str = "  ";

/// Escape text for use in element content and attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn rich_text(text: &RichText) -> String {
    text.segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => escape(text),
            Segment::Emphasis(text) => format!("<b>{}</b>", escape(text)),
            Segment::LineBreak => "<br>".to_string(),
        })
        .collect()
}

struct HtmlWriter {
    out: String,
    depth: usize,
}

impl HtmlWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, content: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(content);
        self.out.push('\n');
    }

    fn open(&mut self, tag: &str) {
        self.line(&format!("<{}>", tag));
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{}>", tag));
    }

    fn table(&mut self, table: &Table) {
        self.open("table");
        self.open("thead");
        self.open("tr");
        for cell in &table.header {
            self.line(&format!("<th>{}</th>", rich_text(cell)));
        }
        self.close("tr");
        self.close("thead");

        self.open("tbody");
        for row in &table.rows {
            self.open("tr");
            for cell in row {
                self.line(&format!("<td>{}</td>", rich_text(cell)));
            }
            self.close("tr");
        }
        self.close("tbody");
        self.close("table");
    }

    fn links(&mut self, links: &[Link]) {
        self.open("ul");
        for link in links {
            self.line(&format!(
                "<li><a href=\"{}\">{}</a></li>",
                escape(&link.href),
                escape(&link.label)
            ));
        }
        self.close("ul");
    }
}

/// Render the report as a standalone HTML page with `stylesheet` embedded
pub fn render_html(document: &ReportDocument, stylesheet: &str) -> String {
    let mut html = HtmlWriter::new();

    html.line("<!DOCTYPE html>");
    html.open("html");
    html.open("head");
    html.line("<meta charset=\"utf-8\">");
    html.line(&format!("<title>{}</title>", escape(&document.title)));
    html.open("style");
    for line in stylesheet.lines() {
        html.line(line);
    }
    html.close("style");
    html.close("head");

    html.open("body");
    for block in &document.blocks {
        match block {
            Block::Heading(text) => html.line(&format!("<h1>{}</h1>", escape(text))),
            Block::Table(table) => html.table(table),
            Block::Links(links) => html.links(links),
        }
    }
    html.close("body");
    html.close("html");

    html.out
}

/// Export the report to an HTML file
pub fn export_report<P: AsRef<Path>>(document: &ReportDocument, stylesheet: &str, output_path: P) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(render_html(document, stylesheet).as_bytes())?;
    Ok(())
}
