//! Output side: the `normalize` block list of a decoder document.
//!
//! Each block serializes as a mapping with an optional `check`, then either a
//! `parse` directive or a `map` list:
//!
//! ```yaml
//! normalize:
//!   - check: exists($message)
//!     parse:
//!       message: ["<ts> <msg>"]
//!   - map:
//!       - event.kind: rename($kind)
//! ```

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

/// One `field: expression` assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub field: String,
    pub expression: String,
}

impl Statement {
    pub fn new(field: impl Into<String>, expression: impl Into<String>) -> Self {
        Statement {
            field: field.into(),
            expression: expression.into(),
        }
    }
}

impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.expression)?;
        map.end()
    }
}

/// An item of a `map` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MapEntry {
    Statement(Statement),
    /// Name of a sub-pipeline that is referenced but not inlined
    PipelineRef(String),
}

impl From<Statement> for MapEntry {
    fn from(statement: Statement) -> Self {
        MapEntry::Statement(statement)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GuardCondition(pub String);

impl GuardCondition {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirective {
    pub field: String,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody {
    Parse(ParseDirective),
    Map(Vec<MapEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeBlock {
    pub check: Option<GuardCondition>,
    pub body: BlockBody,
}

impl NormalizeBlock {
    pub fn map(&self) -> Option<&[MapEntry]> {
        match &self.body {
            BlockBody::Map(entries) => Some(entries),
            BlockBody::Parse(_) => None,
        }
    }

    pub fn parse(&self) -> Option<&ParseDirective> {
        match &self.body {
            BlockBody::Parse(directive) => Some(directive),
            BlockBody::Map(_) => None,
        }
    }
}

/// How a parse directive's key is spelled in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseKeyStyle {
    /// `parse: {field: [patterns]}`
    #[default]
    Nested,
    /// `parse|field: [patterns]`
    Piped,
}

/// The whole output document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoder {
    pub normalize: Vec<NormalizeBlock>,
    pub parse_style: ParseKeyStyle,
}

impl Serialize for Decoder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            "normalize",
            &BlockList {
                blocks: &self.normalize,
                style: self.parse_style,
            },
        )?;
        map.end()
    }
}

struct BlockList<'a> {
    blocks: &'a [NormalizeBlock],
    style: ParseKeyStyle,
}

impl Serialize for BlockList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.blocks.len()))?;
        for block in self.blocks {
            seq.serialize_element(&BlockView {
                block,
                style: self.style,
            })?;
        }
        seq.end()
    }
}

struct BlockView<'a> {
    block: &'a NormalizeBlock,
    style: ParseKeyStyle,
}

impl Serialize for BlockView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(check) = &self.block.check {
            map.serialize_entry("check", check)?;
        }
        match &self.block.body {
            BlockBody::Parse(directive) => match self.style {
                ParseKeyStyle::Nested => {
                    map.serialize_entry("parse", &ParseView(directive))?;
                }
                ParseKeyStyle::Piped => {
                    map.serialize_entry(
                        &format!("parse|{}", directive.field),
                        &directive.patterns,
                    )?;
                }
            },
            BlockBody::Map(entries) => {
                map.serialize_entry("map", entries)?;
            }
        }
        map.end()
    }
}

struct ParseView<'a>(&'a ParseDirective);

impl Serialize for ParseView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.0.field, &self.0.patterns)?;
        map.end()
    }
}
