//! Plain `key: value` lines.

use super::{MapCodec, MapFormat, Mapping, ParseError};

pub struct TextCodec;

impl MapCodec for TextCodec {
    fn serialize(&self, mapping: &Mapping, _name: &str) -> String {
        let mut out = String::new();
        for (key, value) in mapping {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
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
            let (key, value) = line.split_once(':').ok_or_else(|| ParseError::Malformed {
                format: MapFormat::Txt,
                line: i + 1,
                text: line.to_string(),
            })?;
            mapping.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize() {
        let mapping = Mapping::from([("styles/app.css".to_string(), "pMDaxJ5H.css".to_string())]);
        assert_eq!(TextCodec.serialize(&mapping, "ignored"), "styles/app.css: pMDaxJ5H.css\n");
    }

    #[test]
    fn test_deserialize_trims_and_splits_on_first_colon() {
        let parsed = TextCodec.deserialize("  a.css :  x.css \n\nb: c:d\n").unwrap();
        assert_eq!(parsed["a.css"], "x.css");
        assert_eq!(parsed["b"], "c:d");
    }

    #[test]
    fn test_deserialize_malformed() {
        let err = TextCodec.deserialize("a.css: x.css\nno colon here\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 2, .. }));
    }
}
