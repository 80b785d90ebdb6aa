//! Rewrite templates: literal text with `%(pipeline)s` placeholders.

use std::fmt;
use std::str::FromStr;

use super::RewriteError;
use super::transform::{HashFun, PathOp, SourceFile, Stage};

/// A parsed placeholder: one path operation followed by stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    source: PathOp,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub const fn new(source: PathOp, stages: Vec<Stage>) -> Self {
        Self { source, stages }
    }

    fn run(&self, file: &SourceFile) -> Result<String, RewriteError> {
        let mut value = self.source.apply(file).into_bytes();
        for stage in &self.stages {
            value = stage.apply(value)?;
        }
        String::from_utf8(value).map_err(|_| RewriteError::NotText(self.to_string()))
    }

    /// Whether running this pipeline reads file content.
    fn reads_content(&self) -> bool {
        self.stages.contains(&Stage::Content)
    }
}

impl FromStr for Pipeline {
    type Err = RewriteError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut names = text.split('|').map(str::trim);
        let head = names.next().unwrap_or_default();
        let source = PathOp::from_name(head).ok_or_else(|| {
            if Stage::from_name(head).is_some() {
                RewriteError::NotASource(head.to_string())
            } else {
                RewriteError::UnknownTransform(head.to_string())
            }
        })?;
        let stages = names
            .map(|name| Stage::from_name(name).ok_or_else(|| RewriteError::UnknownTransform(name.to_string())))
            .collect::<Result<_, _>>()?;
        Ok(Self { source, stages })
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source.name())?;
        for stage in &self.stages {
            write!(f, "|{stage}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Pipeline(Pipeline),
}

/// How a source file's relative path becomes its hashed name.
///
/// Built once per run and applied to every file:
///
/// ```ignore
/// let rule: RewriteRule = "%(reldir)s%(abspath|content|md5|base64|8)s%(suffix)s".parse()?;
/// let name = rule.apply(&SourceFile::new("css/app.css", "static"))?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    segments: Vec<Segment>,
}

impl RewriteRule {
    /// Compute the rule for a hashing configuration.
    ///
    /// `digest_length` of `None` or `Some(0)` keeps the full digest.
    pub fn from_config(
        hash: HashFun,
        digest_length: Option<usize>,
        keep_dirs: bool,
        strip_extensions: bool,
    ) -> Self {
        let pipeline = |source, stages| Segment::Pipeline(Pipeline::new(source, stages));

        if hash == HashFun::Identity {
            let source = if keep_dirs { PathOp::RelPath } else { PathOp::CompleteFilename };
            return Self { segments: vec![pipeline(source, vec![])] };
        }

        let mut stages = vec![Stage::Content, Stage::Hash(hash), Stage::Base64];
        if let Some(n) = digest_length.filter(|&n| n > 0) {
            stages.push(Stage::Truncate(n));
        }

        let mut segments = Vec::with_capacity(3);
        if keep_dirs {
            segments.push(pipeline(PathOp::RelDir, vec![]));
        }
        segments.push(pipeline(PathOp::AbsPath, stages));
        if !strip_extensions {
            segments.push(pipeline(PathOp::Suffix, vec![]));
        }
        Self { segments }
    }

    /// Render the hashed name for `file`.
    ///
    /// Fails with [`RewriteError::Unreadable`] when a `content` stage cannot
    /// read the file; callers treat that as "skip this file".
    pub fn apply(&self, file: &SourceFile) -> Result<String, RewriteError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Pipeline(pipeline) => out.push_str(&pipeline.run(file)?),
            }
        }
        Ok(out)
    }

    /// Whether names depend on file content (false for identity rules).
    pub fn reads_content(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Pipeline(p) if p.reads_content()))
    }
}

impl FromStr for RewriteRule {
    type Err = RewriteError;

    fn from_str(template: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find("%(") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let body = &rest[start + 2..];
            let end = body
                .find(")s")
                .ok_or_else(|| RewriteError::Unterminated(template.to_string()))?;
            segments.push(Segment::Pipeline(body[..end].parse()?));
            rest = &body[end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        if segments.is_empty() {
            return Err(RewriteError::Empty);
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for RewriteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Pipeline(pipeline) => write!(f, "%({pipeline})s")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn apply(template: &str, relpath: &str) -> String {
        let rule: RewriteRule = template.parse().unwrap();
        rule.apply(&SourceFile::new(relpath, ".")).unwrap()
    }

    #[test]
    fn test_from_config_templates() {
        let rule = |hash, len, keep, strip| RewriteRule::from_config(hash, len, keep, strip).to_string();

        assert_eq!(rule(HashFun::Sha1, None, false, false), "%(abspath|content|sha1|base64)s%(suffix)s");
        assert_eq!(rule(HashFun::Sha1, None, false, true), "%(abspath|content|sha1|base64)s");
        assert_eq!(rule(HashFun::Sha1, Some(3), false, false), "%(abspath|content|sha1|base64|3)s%(suffix)s");
        assert_eq!(rule(HashFun::Md5, Some(0), false, false), "%(abspath|content|md5|base64)s%(suffix)s");
        assert_eq!(
            rule(HashFun::Md5, Some(8), true, false),
            "%(reldir)s%(abspath|content|md5|base64|8)s%(suffix)s"
        );
        assert_eq!(rule(HashFun::Identity, Some(8), true, true), "%(relpath)s");
        assert_eq!(rule(HashFun::Identity, None, false, false), "%(complete_filename)s");
    }

    #[test]
    fn test_pipelines_on_path_values() {
        assert_eq!(apply("%(complete_filename|base64)s", "path/file"), "ZmlsZQ");
        assert_eq!(apply("%(complete_filename|md5|base64)s", "path/file"), "jH3ZIq1HSU_ALDiOEsAOrA");
        assert_eq!(apply("%(relpath|md5|base64|3)s", "path/file"), "3Hc");
        assert_eq!(apply("%(extension|base64)s", "path/pr0n.f"), "Zg");
        assert_eq!(apply("%(relpath|identity)s", "a/b.css"), "a/b.css");
    }

    #[test]
    fn test_literal_segments_round_trip() {
        let template = "v1-%(filename)s.%(relpath|md5|base64|6)s%(suffix)s";
        let rule: RewriteRule = template.parse().unwrap();
        assert_eq!(rule.to_string(), template);
        assert!(!rule.reads_content());
        assert_eq!(rule.apply(&SourceFile::new("path/file.css", ".")).unwrap().len(), "v1-file.".len() + 6 + 4);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("%(sha256)s".parse::<RewriteRule>(), Err(RewriteError::UnknownTransform(_))));
        assert!(matches!("%(content|sha1)s".parse::<RewriteRule>(), Err(RewriteError::NotASource(_))));
        assert!(matches!("%(relpath".parse::<RewriteRule>(), Err(RewriteError::Unterminated(_))));
        assert!(matches!("".parse::<RewriteRule>(), Err(RewriteError::Empty)));
    }

    #[test]
    fn test_hashed_name_truncated() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("styles")).unwrap();
        fs::write(dir.path().join("styles/app.css"), "body{}").unwrap();

        let rule = RewriteRule::from_config(HashFun::Sha1, Some(8), false, false);
        let name = rule.apply(&SourceFile::new("app.css", dir.path().join("styles"))).unwrap();
        assert_eq!(name, "pMDaxJ5H.css");

        let full = RewriteRule::from_config(HashFun::Sha1, None, false, false);
        let name = full.apply(&SourceFile::new("app.css", dir.path().join("styles"))).unwrap();
        assert_eq!(name, "pMDaxJ5H_-DbzKdhX3O3Lva3FUM.css");
    }

    #[test]
    fn test_hashed_name_keep_dirs_and_strip() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css/vendor")).unwrap();
        fs::write(dir.path().join("css/vendor/reset.css"), "body{}").unwrap();

        let rule = RewriteRule::from_config(HashFun::Md5, None, true, true);
        let name = rule.apply(&SourceFile::new("css/vendor/reset.css", dir.path())).unwrap();
        assert_eq!(name, "css/vendor/qmdpcrvSto6U746R6B0gvg");
    }

    #[test]
    fn test_content_change_changes_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.css");
        let rule = RewriteRule::from_config(HashFun::Sha1, None, false, false);
        let file = SourceFile::new("app.css", dir.path());

        fs::write(&path, "body{}").unwrap();
        let before = rule.apply(&file).unwrap();
        assert_eq!(rule.apply(&file).unwrap(), before);

        fs::write(&path, "body{color:red}").unwrap();
        let after = rule.apply(&file).unwrap();
        assert_ne!(before, after);
        assert_eq!(after, "qdlNaggEVuNWqKeMbkCgmu8aFfI.css");
    }

    #[test]
    fn test_unreadable_sources() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let rule = RewriteRule::from_config(HashFun::Sha1, None, false, false);

        let missing = rule.apply(&SourceFile::new("gone.css", dir.path()));
        assert!(matches!(missing, Err(RewriteError::Unreadable { .. })));

        let directory = rule.apply(&SourceFile::new("sub", dir.path()));
        assert!(matches!(directory, Err(RewriteError::Unreadable { .. })));
    }

    #[test]
    fn test_identity_does_not_read() {
        let rule = RewriteRule::from_config(HashFun::Identity, None, false, false);
        let name = rule.apply(&SourceFile::new("deep/dir/missing.png", "/nonexistent")).unwrap();
        assert_eq!(name, "missing.png");
    }
}
