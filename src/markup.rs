use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use itertools::Itertools;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::error::SetupError;

static POLLS_DIR: Dir = include_dir!("src/polls");

pub const DEFAULT_DEMO: &str = "demo.html";

/// Declarative description of one poll: a title and `|`-separated item values
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PollDefinition {
    #[serde(rename = "pollTitle")]
    pub title: String,
    pub items: String,
}

impl PollDefinition {
    pub fn new(title: impl Into<String>, items: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: items.into(),
        }
    }

    /// Item values in order. A literal `|` cannot be part of a value.
    pub fn item_values(&self) -> Vec<&str> {
        self.items.split('|').collect()
    }

    pub fn summary(&self) -> String {
        format!("{}: {}", self.title, self.item_values().iter().join(", "))
    }
}

#[derive(Deserialize)]
struct RawDefinition {
    #[serde(rename = "pollTitle")]
    title: Option<String>,
    items: Option<String>,
}

fn require(
    value: Option<String>,
    index: usize,
    attribute: &'static str,
) -> Result<String, SetupError> {
    value.ok_or(SetupError::MissingAttribute { index, attribute })
}

/// Replaces the predefined character references of markup attribute values.
fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Reads every `<poll pollTitle=".." items="..">` element of a markup document.
/// Attribute names are matched case-insensitively, values may use either quote
/// and may contain `>`. Commented out elements are skipped.
pub fn parse_markup(source: &str) -> Result<Vec<PollDefinition>, SetupError> {
    let comment = Regex::new(r"(?s)<!--.*?-->")?;
    let poll_tag = Regex::new(r#"(?is)<poll\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#)?;
    let attribute = Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)?;

    let source = comment.replace_all(source, "");
    poll_tag
        .captures_iter(&source)
        .enumerate()
        .map(|(index, tag)| {
            let mut title = None;
            let mut items = None;
            for attr in attribute.captures_iter(&tag[1]) {
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .map(|m| decode_entities(m.as_str()));
                match attr[1].to_ascii_lowercase().as_str() {
                    "polltitle" => title = value,
                    "items" => items = value,
                    _ => {}
                }
            }
            Ok(PollDefinition {
                title: require(title, index, "pollTitle")?,
                items: require(items, index, "items")?,
            })
        })
        .collect()
}

/// Reads a JSON array of `{"pollTitle": .., "items": ..}` objects.
pub fn parse_json(source: &str) -> Result<Vec<PollDefinition>, SetupError> {
    let raw: Vec<RawDefinition> = serde_json::from_str(source)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, def)| {
            Ok(PollDefinition {
                title: require(def.title, index, "pollTitle")?,
                items: require(def.items, index, "items")?,
            })
        })
        .collect()
}

/// Parses a `TITLE=ITEM|ITEM` command line definition.
pub fn parse_inline(arg: &str) -> Result<PollDefinition, SetupError> {
    arg.split_once('=')
        .map(|(title, items)| PollDefinition::new(title.trim(), items.trim()))
        .ok_or_else(|| SetupError::InlineDefinition(arg.to_string()))
}

fn parse_named(name: &str, source: &str) -> Result<Vec<PollDefinition>, SetupError> {
    let definitions = if name.ends_with(".json") {
        parse_json(source)?
    } else {
        parse_markup(source)?
    };
    debug!("parsed {} poll definitions from {}", definitions.len(), name);
    if definitions.is_empty() {
        return Err(SetupError::Empty);
    }
    Ok(definitions)
}

/// Loads definitions from a markup or JSON (by extension) file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<PollDefinition>, SetupError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| SetupError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_named(&path.to_string_lossy(), &source)
}

/// Names of the definition files bundled with the binary
pub fn demo_names() -> Vec<&'static str> {
    POLLS_DIR
        .files()
        .filter_map(|file| file.path().to_str())
        .sorted()
        .collect()
}

pub fn load_demo(name: &str) -> Result<Vec<PollDefinition>, SetupError> {
    let source = POLLS_DIR
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| SetupError::Read {
            path: name.into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such demo"),
        })?;
    parse_named(name, source)
}
