//! PHP array literal: `$name = array(\n  "key" => "value",\n)`.

use std::sync::LazyLock;

use regex::Regex;

use super::{MapCodec, MapFormat, Mapping, ParseError};

static ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^ *"([^"]*)" => "([^"]*)",? *$"#).expect("static regex"));

pub struct PhpCodec;

impl MapCodec for PhpCodec {
    fn serialize(&self, mapping: &Mapping, name: &str) -> String {
        let mut out = format!("${name} = array(\n");
        for (key, value) in mapping {
            out.push_str(&format!("  \"{key}\" => \"{value}\",\n"));
        }
        out.push(')');
        out
    }

    fn deserialize(&self, content: &str) -> Result<Mapping, ParseError> {
        let mut mapping = Mapping::new();
        // first line opens the array
        for (i, line) in content.lines().enumerate().skip(1) {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed == ")" || trimmed == ");" {
                continue;
            }
            let caps = ENTRY.captures(line).ok_or_else(|| ParseError::Malformed {
                format: MapFormat::Php,
                line: i + 1,
                text: line.to_string(),
            })?;
            mapping.insert(caps[1].to_string(), caps[2].to_string());
        }
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_exact() {
        let mapping = Mapping::from([("a.css".to_string(), "Xx.css".to_string())]);
        assert_eq!(
            PhpCodec.serialize(&mapping, "hashedassets"),
            "$hashedassets = array(\n  \"a.css\" => \"Xx.css\",\n)"
        );
    }

    #[test]
    fn test_deserialize_tolerates_trailing_newline() {
        let parsed = PhpCodec
            .deserialize("$m = array(\n  \"a.css\" => \"Xx.css\",\n  \"b.js\" => \"Yy.js\",\n);\n")
            .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["b.js"], "Yy.js");
    }

    #[test]
    fn test_deserialize_malformed() {
        let err = PhpCodec.deserialize("$m = array(\n  a.css => Xx.css\n)").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 2, .. }));
    }
}
