//! Sass mixin with one `@if` clause per entry.
//!
//! ```scss
//! @mixin hashedassets($directive, $path) {
//!          @if $path == "img/logo.png" { #{$directive}: url("Xx.png"); }
//!     @else {
//!       @warn "Did not find "#{$path}" in list of assets";
//!       #{$directive}: url($path);
//!     }
//! }
//! ```
//!
//! Clauses are emitted in map order, so the first matching entry wins.

use std::sync::LazyLock;

use regex::Regex;

use super::{MapCodec, Mapping, ParseError};

const PREAMBLE: &str = "($directive, $path) {\n         @";
const EPILOGUE: &str = "{\n      @warn \"Did not find \"#{$path}\" in list of assets\";\n      #{$directive}: url($path);\n    }\n}";

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"if \$path == "([^"]*)" \{ #\{\$directive\}: url\("([^"]*)"\); \}"#)
        .expect("static regex")
});

pub struct ScssCodec;

impl MapCodec for ScssCodec {
    fn serialize(&self, mapping: &Mapping, name: &str) -> String {
        let mut out = format!("@mixin {name}{PREAMBLE}");
        for (key, value) in mapping {
            out.push_str(&format!(
                "if $path == \"{key}\" {{ #{{$directive}}: url(\"{value}\"); }}\n    @else "
            ));
        }
        out.push_str(EPILOGUE);
        out
    }

    /// The fallback clause has no quoted pair and never matches.
    fn deserialize(&self, content: &str) -> Result<Mapping, ParseError> {
        Ok(ENTRY
            .captures_iter(content)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect())
    }
}
