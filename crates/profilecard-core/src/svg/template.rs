//! In-place patching of the profile card template
//!
//! The template addresses its dynamic values by the document-order index of `tspan`
//! elements. Patching replaces the leading text of three such elements and leaves every other
//! byte of the file untouched: the document is scanned with quick-xml only to locate byte
//! ranges, and the output is the original text with those ranges spliced.

use crate::error::CoreError;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info};

/// `tspan` indices receiving each value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSlots {
    pub age: usize,
    pub repos: usize,
    pub commits: usize,
}

impl Default for TemplateSlots {
    fn default() -> Self {
        Self {
            age: 38,
            repos: 71,
            commits: 73,
        }
    }
}

impl TemplateSlots {
    /// Smallest number of `tspan` elements a compatible template has
    pub fn required_tspans(&self) -> usize {
        self.age.max(self.repos).max(self.commits) + 1
    }

    /// Slots must be pairwise distinct
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.age == self.repos || self.age == self.commits || self.repos == self.commits {
            return Err(CoreError::InvalidConfig {
                message: format!(
                    "template slots must be distinct (age={}, repos={}, commits={})",
                    self.age, self.repos, self.commits
                ),
            });
        }
        Ok(())
    }

    fn targets<'a>(&self, values: &'a PatchValues) -> [(usize, &'a str); 3] {
        [
            (self.age, values.age.as_str()),
            (self.repos, values.repos.as_str()),
            (self.commits, values.commits.as_str()),
        ]
    }
}

/// Text written into the slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchValues {
    pub age: String,
    pub repos: String,
    pub commits: String,
}

/// `1234567` -> `"1,234,567"`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Patch `content` and return the new document.
///
/// `source` only names the document in errors.
pub fn patch_template_str(
    source: &Path,
    content: &str,
    slots: &TemplateSlots,
    values: &PatchValues,
) -> Result<String, CoreError> {
    slots.validate()?;

    let mismatch = |expected: String, found: String| CoreError::TemplateMismatch {
        path: source.to_path_buf(),
        expected,
        found,
    };

    let scan = scan_tspans(content)?;
    let required = slots.required_tspans();
    if scan.tspans.len() < required {
        return Err(mismatch(
            format!("at least {} tspan elements", required),
            format!("{}", scan.tspans.len()),
        ));
    }

    let mut edits: Vec<(Range<usize>, &str)> = Vec::with_capacity(3);
    for (index, value) in slots.targets(values) {
        match &scan.tspans[index] {
            Some(range) => edits.push((range.clone(), value)),
            None => {
                return Err(mismatch(
                    format!("tspan #{} to start with text", index),
                    "an element or no content".to_string(),
                ))
            }
        }
    }
    edits.sort_by_key(|(range, _)| range.start);

    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    for (range, value) in edits {
        out.push_str(&content[cursor..range.start]);
        out.push_str(&escape(value));
        cursor = range.end;
    }
    out.push_str(&content[cursor..]);

    Ok(out)
}

/// Patch the template at `path` in place. The file is only written when patching succeeds.
pub fn patch_template_file(
    path: &Path,
    slots: &TemplateSlots,
    values: &PatchValues,
) -> Result<(), CoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::read(path, e))?;
    let patched = patch_template_str(path, &content, slots, values)?;

    std::fs::write(path, patched).map_err(|e| CoreError::write(path, e))?;
    info!(path = %path.display(), "Patched card template");
    Ok(())
}

struct TspanScan {
    /// Per `tspan` in document order: byte range of its leading text, if it has one
    tspans: Vec<Option<Range<usize>>>,
}

fn scan_tspans(content: &str) -> Result<TspanScan, CoreError> {
    let mut reader = Reader::from_str(content);
    let mut tspans: Vec<Option<Range<usize>>> = Vec::new();
    // Index of a tspan whose first child has not been seen yet
    let mut awaiting: Option<usize> = None;
    let mut depth: usize = 0;

    loop {
        let start = position(&reader)?;
        let event = reader.read_event().map_err(|e| {
            CoreError::xml(format!("{} (at byte {})", e, reader.buffer_position()))
        })?;
        let end = position(&reader)?;

        match event {
            Event::Text(_) | Event::CData(_) => {
                if let Some(index) = awaiting.take() {
                    tspans[index] = Some(start..end);
                }
                continue;
            }
            Event::Eof => break,
            _ => {}
        }
        awaiting = None;

        match event {
            Event::Start(e) => {
                depth += 1;
                if e.local_name().as_ref() == b"tspan" {
                    tspans.push(None);
                    awaiting = Some(tspans.len() - 1);
                }
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"tspan" {
                    tspans.push(None);
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| CoreError::xml("unexpected closing tag"))?;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(CoreError::xml(format!("{} unclosed element(s)", depth)));
    }

    debug!(tspans = tspans.len(), "Scanned template");
    Ok(TspanScan { tspans })
}

fn position(reader: &Reader<&[u8]>) -> Result<usize, CoreError> {
    usize::try_from(reader.buffer_position())
        .map_err(|_| CoreError::xml("document offset out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> PatchValues {
        PatchValues {
            age: "21 years, 9 months, 6 days".to_string(),
            repos: "42".to_string(),
            commits: "1,234".to_string(),
        }
    }

    fn small_slots() -> TemplateSlots {
        TemplateSlots {
            age: 1,
            repos: 3,
            commits: 4,
        }
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_default_slots() {
        let slots = TemplateSlots::default();
        assert_eq!((slots.age, slots.repos, slots.commits), (38, 71, 73));
        assert_eq!(slots.required_tspans(), 74);
    }

    #[test]
    fn test_patch_replaces_only_slot_text() {
        let svg = concat!(
            "<?xml version='1.0' encoding='utf-8'?>\n",
            "<svg xmlns=\"http://www.w3.org/2000/svg\">\n",
            "  <!-- header -->\n",
            "  <text><tspan x=\"1\">zero</tspan><tspan class=\"v\">old age</tspan></text>\n",
            "  <text><tspan>two</tspan><tspan>10</tspan><tspan>99</tspan></text>\n",
            "</svg>\n"
        );

        let out = patch_template_str(Path::new("t.svg"), svg, &small_slots(), &values()).unwrap();

        let expected = svg
            .replace(">old age<", ">21 years, 9 months, 6 days<")
            .replace(">10<", ">42<")
            .replace(">99<", ">1,234<");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_values_are_escaped() {
        let svg = "<svg><tspan>a</tspan><tspan>b</tspan><tspan>c</tspan><tspan>d</tspan><tspan>e</tspan></svg>";
        let mut v = values();
        v.age = "<1 & counting>".to_string();

        let out = patch_template_str(Path::new("t.svg"), svg, &small_slots(), &v).unwrap();
        assert!(out.contains("<tspan>&lt;1 &amp; counting&gt;</tspan>"));
    }

    #[test]
    fn test_too_few_tspans_is_mismatch() {
        let svg = "<svg><tspan>a</tspan><tspan>b</tspan></svg>";
        let err = patch_template_str(Path::new("t.svg"), svg, &small_slots(), &values())
            .unwrap_err();

        match err {
            CoreError::TemplateMismatch {
                expected, found, ..
            } => {
                assert_eq!(expected, "at least 5 tspan elements");
                assert_eq!(found, "2");
            }
            other => panic!("expected TemplateMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_slot_without_leading_text_is_mismatch() {
        let svg = "<svg><tspan>a</tspan><tspan><tspan>nested</tspan></tspan><tspan>c</tspan><tspan>d</tspan></svg>";
        // tspan #1 starts with an element, #2 is the nested one
        let err = patch_template_str(Path::new("t.svg"), svg, &small_slots(), &values())
            .unwrap_err();
        assert!(matches!(err, CoreError::TemplateMismatch { .. }));

        let svg = "<svg><tspan>a</tspan><tspan/><tspan>c</tspan><tspan>d</tspan><tspan>e</tspan></svg>";
        let err = patch_template_str(Path::new("t.svg"), svg, &small_slots(), &values())
            .unwrap_err();
        assert!(matches!(err, CoreError::TemplateMismatch { .. }));
    }

    #[test]
    fn test_duplicate_slots_rejected() {
        let slots = TemplateSlots {
            age: 2,
            repos: 2,
            commits: 3,
        };
        assert!(matches!(
            slots.validate(),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_malformed_template_is_xml_error() {
        let err = patch_template_str(
            Path::new("t.svg"),
            "<svg><tspan>a</tspan>",
            &small_slots(),
            &values(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::XmlParse { .. }));
    }
}
