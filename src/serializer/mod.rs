//! Map serialization formats.
//!
//! Every format implements [`MapCodec`], turning an ordered mapping of
//! original path → hashed path into text and back.
//!
//! | format  | shape                                              |
//! |---------|----------------------------------------------------|
//! | `txt`   | `key: value` per line                              |
//! | `json`  | sorted, indented object                            |
//! | `jsonp` | `name(\n{...}\n);`                                 |
//! | `js`    | `var name = {...};`                                |
//! | `scss`  | `@mixin name($directive, $path)` if/else-if chain  |
//! | `php`   | `$name = array(\n  "key" => "value",\n)`           |
//! | `sed`   | `s/key/value/g` per line, `/` and `.` escaped      |

mod json;
mod php;
mod scss;
mod sed;
mod text;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use json::{JsCodec, JsonCodec, JsonpCodec};
pub use php::PhpCodec;
pub use scss::ScssCodec;
pub use sed::SedCodec;
pub use text::TextCodec;

/// Ordered original path → hashed path entries.
pub type Mapping = IndexMap<String, String>;

/// A textual representation of a [`Mapping`].
pub trait MapCodec {
    /// Render entries in map order. `name` is used by formats that bind the
    /// map to a variable or mixin.
    fn serialize(&self, mapping: &Mapping, name: &str) -> String;

    /// Parse text produced by [`MapCodec::serialize`].
    fn deserialize(&self, content: &str) -> Result<Mapping, ParseError>;
}

/// Errors from reading a serialized map.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON in map")]
    Json(#[from] serde_json::Error),

    #[error("{format} map is missing `{delimiter}`")]
    MissingDelimiter { format: MapFormat, delimiter: char },

    #[error("{format} map line {line} is malformed: `{text}`")]
    Malformed {
        format: MapFormat,
        line: usize,
        text: String,
    },
}

/// Supported map formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MapFormat {
    #[value(alias = "text")]
    #[serde(alias = "text")]
    Txt,
    Json,
    Jsonp,
    Js,
    Scss,
    Php,
    Sed,
}

impl MapFormat {
    pub const ALL: [Self; 7] = [
        Self::Txt,
        Self::Json,
        Self::Jsonp,
        Self::Js,
        Self::Scss,
        Self::Php,
        Self::Sed,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Json => "json",
            Self::Jsonp => "jsonp",
            Self::Js => "js",
            Self::Scss => "scss",
            Self::Php => "php",
            Self::Sed => "sed",
        }
    }

    /// Guess the format from a map file's extension (`map.json` → `json`).
    pub fn from_path(path: &Path) -> Result<Self, UnknownFormat> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        ext.parse()
    }

    pub fn codec(self) -> &'static dyn MapCodec {
        match self {
            Self::Txt => &TextCodec,
            Self::Json => &JsonCodec,
            Self::Jsonp => &JsonpCodec,
            Self::Js => &JsCodec,
            Self::Scss => &ScssCodec,
            Self::Php => &PhpCodec,
            Self::Sed => &SedCodec,
        }
    }

    pub fn serialize(self, mapping: &Mapping, name: &str) -> String {
        self.codec().serialize(mapping, name)
    }

    pub fn deserialize(self, content: &str) -> Result<Mapping, ParseError> {
        self.codec().deserialize(content)
    }
}

impl fmt::Display for MapFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A format identifier that names no known format.
#[derive(Debug, Clone, Error)]
#[error("invalid map type: '{0}' (expected one of txt, json, jsonp, js, scss, php, sed)")]
pub struct UnknownFormat(pub String);

impl FromStr for MapFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "text" {
            return Ok(Self::Txt);
        }
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}
