//! Profile SVG builder: ASCII art on the left, key/value info lines on the right

use crate::error::CoreError;
use crate::models::InfoEntry;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const FONT_FAMILY: &str = "Andale Mono,AndaleMono,Consolas,monospace";
const WIDTH: &str = "1380px";
const HEIGHT: &str = "690px";
const FONT_SIZE: &str = "16px";
const BACKGROUND: &str = "#161b22";
const TEXT_FILL: &str = "#c9d1d9";

const ASCII_X: u32 = 15;
const INFO_X: u32 = 750;
const TOP_Y: u32 = 30;
const LINE_HEIGHT: u32 = 20;

const STYLE: &str = "
        .keyColor {fill: #ffa657;}
        .valueColor {fill: #a5d6ff;}
        .ascii {fill: #c9d1d9;}
        text, tspan {white-space: pre;}
    ";

/// Builds a fresh profile SVG
#[derive(Debug, Clone, Default)]
pub struct SvgBuilder {
    ascii_lines: Vec<String>,
    info: Vec<InfoEntry>,
}

impl SvgBuilder {
    /// Trailing whitespace of every art line is dropped
    pub fn new(ascii_art: &str, info: Vec<InfoEntry>) -> Self {
        Self {
            ascii_lines: ascii_art.lines().map(|l| l.trim_end().to_string()).collect(),
            info,
        }
    }

    pub fn from_ascii_file(path: &Path, info: Vec<InfoEntry>) -> Result<Self, CoreError> {
        let art = std::fs::read_to_string(path).map_err(|e| CoreError::read(path, e))?;
        Ok(Self::new(&art, info))
    }

    pub fn ascii_lines(&self) -> &[String] {
        &self.ascii_lines
    }

    pub fn info(&self) -> &[InfoEntry] {
        &self.info
    }

    /// Serialize the document
    pub fn render(&self) -> Result<String, CoreError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        write(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        )?;
        write(&mut writer, Event::Text(BytesText::from_escaped("\n")))?;

        let mut svg = BytesStart::new("svg");
        svg.push_attribute(("xmlns", SVG_NS));
        svg.push_attribute(("font-family", FONT_FAMILY));
        svg.push_attribute(("width", WIDTH));
        svg.push_attribute(("height", HEIGHT));
        svg.push_attribute(("font-size", FONT_SIZE));
        write(&mut writer, Event::Start(svg))?;

        write(&mut writer, Event::Start(BytesStart::new("style")))?;
        write(&mut writer, Event::Text(BytesText::new(STYLE)))?;
        write(&mut writer, Event::End(BytesEnd::new("style")))?;

        let mut rect = BytesStart::new("rect");
        rect.push_attribute(("width", WIDTH));
        rect.push_attribute(("height", HEIGHT));
        rect.push_attribute(("fill", BACKGROUND));
        rect.push_attribute(("rx", "15"));
        write(&mut writer, Event::Empty(rect))?;

        self.write_ascii(&mut writer)?;
        self.write_info(&mut writer)?;

        write(&mut writer, Event::End(BytesEnd::new("svg")))?;

        String::from_utf8(writer.into_inner().into_inner()).map_err(CoreError::xml)
    }

    /// Render and overwrite `path`
    pub fn write_to(&self, path: &Path) -> Result<(), CoreError> {
        let document = self.render()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CoreError::write(parent, e))?;
            }
        }
        std::fs::write(path, document).map_err(|e| CoreError::write(path, e))?;

        info!(
            path = %path.display(),
            ascii_lines = self.ascii_lines.len(),
            info_entries = self.info.len(),
            "Wrote profile SVG"
        );
        Ok(())
    }

    fn write_ascii(&self, writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<(), CoreError> {
        let x = ASCII_X.to_string();
        let mut text = BytesStart::new("text");
        text.push_attribute(("x", x.as_str()));
        text.push_attribute(("y", TOP_Y.to_string().as_str()));
        text.push_attribute(("class", "ascii"));
        write(writer, Event::Start(text))?;

        for (i, line) in self.ascii_lines.iter().enumerate() {
            let mut tspan = BytesStart::new("tspan");
            tspan.push_attribute(("x", x.as_str()));
            tspan.push_attribute(("y", line_y(i).as_str()));
            write_text_element(writer, tspan, line)?;
        }

        write(writer, Event::End(BytesEnd::new("text")))
    }

    fn write_info(&self, writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<(), CoreError> {
        let x = INFO_X.to_string();
        let mut text = BytesStart::new("text");
        text.push_attribute(("x", x.as_str()));
        text.push_attribute(("y", TOP_Y.to_string().as_str()));
        text.push_attribute(("fill", TEXT_FILL));
        write(writer, Event::Start(text))?;

        for (i, entry) in self.info.iter().enumerate() {
            let mut key = BytesStart::new("tspan");
            key.push_attribute(("x", x.as_str()));
            key.push_attribute(("y", line_y(i).as_str()));
            key.push_attribute(("class", "keyColor"));

            match entry.rendered_value() {
                Some(value) => {
                    write_text_element(writer, key, &format!("{}: ", entry.label))?;
                    let mut tspan = BytesStart::new("tspan");
                    tspan.push_attribute(("class", "valueColor"));
                    write_text_element(writer, tspan, value)?;
                }
                None => write_text_element(writer, key, &entry.label)?,
            }
        }

        write(writer, Event::End(BytesEnd::new("text")))
    }
}

fn line_y(index: usize) -> String {
    (TOP_Y as usize + index * LINE_HEIGHT as usize).to_string()
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    start: BytesStart<'_>,
    content: &str,
) -> Result<(), CoreError> {
    let end = start.to_end().into_owned();
    write(writer, Event::Start(start))?;
    if !content.is_empty() {
        write(writer, Event::Text(BytesText::new(content)))?;
    }
    write(writer, Event::End(end))
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), CoreError> {
    writer.write_event(event).map_err(CoreError::xml)
}
