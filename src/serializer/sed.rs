//! sed script, one substitution per entry.
//!
//! Use it like `sed -f map.sed index.html`. Filenames have `/` and `.`
//! backslash-escaped so they match literally.

use super::{MapCodec, MapFormat, Mapping, ParseError};

fn escape(filename: &str) -> String {
    filename.replace('/', "\\/").replace('.', "\\.")
}

fn unescape(filename: &str) -> String {
    filename.replace("\\/", "/").replace("\\.", ".")
}

/// Split on `/` not preceded by a backslash.
fn split_unescaped(line: &str) -> Vec<&str> {
    let mut parts = Vec::with_capacity(4);
    let mut start = 0;
    let mut prev = None;
    for (i, c) in line.char_indices() {
        if c == '/' && prev != Some('\\') {
            parts.push(&line[start..i]);
            start = i + 1;
        }
        prev = Some(c);
    }
    parts.push(&line[start..]);
    parts
}

pub struct SedCodec;

impl MapCodec for SedCodec {
    fn serialize(&self, mapping: &Mapping, _name: &str) -> String {
        let mut out = String::new();
        for (key, value) in mapping {
            out.push_str(&format!("s/{}/{}/g\n", escape(key), escape(value)));
        }
        if out.is_empty() {
            out.push('\n');
        }
        out
    }

    fn deserialize(&self, content: &str) -> Result<Mapping, ParseError> {
        let mut mapping = Mapping::new();
        for (i, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            match split_unescaped(line).as_slice() {
                [_, key, value, _] => {
                    mapping.insert(unescape(key.trim()), unescape(value.trim()));
                }
                _ => {
                    return Err(ParseError::Malformed {
                        format: MapFormat::Sed,
                        line: i + 1,
                        text: line.to_string(),
                    });
                }
            }
        }
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_escapes() {
        let mapping = Mapping::from([("img/logo.png".to_string(), "img/Xx.png".to_string())]);
        assert_eq!(
            SedCodec.serialize(&mapping, "ignored"),
            "s/img\\/logo\\.png/img\\/Xx\\.png/g\n"
        );
    }

    #[test]
    fn test_split_unescaped() {
        assert_eq!(split_unescaped("s/a\\/b/c/g"), ["s", "a\\/b", "c", "g"]);
    }

    #[test]
    fn test_deserialize_malformed() {
        let err = SedCodec.deserialize("s/only-key/g\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 1, .. }));
    }
}
