//! Path rewrite engine.
//!
//! Works line by line on already-decoded text and never touches disk.
//! Each line goes through two stages:
//!  1. keyed values (`$key "a/b/c"`) are relocated; every keyed match claims its span,
//!     rewritten or not;
//!  2. any other quoted value containing a separator is relocated, matching only
//!     in the parts of the line stage 1 did not claim.
//!
//! Relocation keeps the last path segment and replaces everything before it
//! with the new base. Values without a separator are never touched, and a
//! value that already equals its relocated form is not a change.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::loader::{SourceFile, split_lines};

static KEYED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(\$[a-z0-9_]+\s+)(["'])([^"']+)(["'])"#).expect("keyed pattern is valid")
});

static QUOTED_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"']*[/\\][^"']*)"|'([^"']*[/\\][^"']*)'"#)
        .expect("quoted path pattern is valid")
});

/// Which pattern produced a change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeKey {
    /// A `$key` token as written in the file.
    Keyed(String),
    /// A bare quoted path not attached to a key.
    Any,
}

impl fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKey::Keyed(k) => f.write_str(k),
            ChangeKey::Any => f.write_str("<any>"),
        }
    }
}

/// One rewritten occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChange {
    /// 1-based line number.
    pub line: usize,
    pub key: ChangeKey,
    /// Value as found in the file.
    pub old_value: String,
    pub new_value: String,
}

impl fmt::Display for PathChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} '{}' -> '{}'",
            self.line, self.key, self.old_value, self.new_value
        )
    }
}

/// Output of the engine for one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    pub lines: Vec<String>,
    pub changes: Vec<PathChange>,
}

impl Rewrite {
    pub fn text(&self) -> String {
        self.lines.concat()
    }

    /// False when nothing changed; such files must not be written.
    pub fn is_candidate(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Rewrite every line of `text` against `new_base`.
///
/// `new_base` is used as given; callers normalize it first
/// (see `config::normalize_new_base`).
pub fn rewrite(text: &str, new_base: &str) -> Rewrite {
    let mut out = Rewrite::default();
    for (idx, line) in split_lines(text).into_iter().enumerate() {
        let (new_line, changes) = rewrite_line(line, idx + 1, new_base);
        out.lines.push(new_line);
        out.changes.extend(changes);
    }
    out
}

/// Rewrite a single line. `line_no` is only used to tag the changes.
pub fn rewrite_line(line: &str, line_no: usize, new_base: &str) -> (String, Vec<PathChange>) {
    if is_comment(line) {
        return (line.to_string(), Vec::new());
    }

    let keyed = keyed_stage(line, line_no, new_base);
    let (text, mut found) = unclaimed_stage(&keyed.text, &keyed.claimed, line_no, new_base);

    found.extend(keyed.changes);
    found.sort_by_key(|(offset, _)| *offset);
    (text, found.into_iter().map(|(_, c)| c).collect())
}

fn is_comment(line: &str) -> bool {
    let stripped = line.trim_start();
    stripped.starts_with("//") || stripped.starts_with("/*")
}

/// Relocate `value` under `new_base`, or `None` when it is not path-like.
pub fn relocate(value: &str, new_base: &str) -> Option<String> {
    let normalized = value.replace('\\', "/");
    let (_, last) = normalized.rsplit_once('/')?;
    Some(format!("{new_base}/{last}"))
}

struct KeyedStage {
    text: String,
    // byte ranges in `text` owned by keyed matches
    claimed: Vec<Range<usize>>,
    // (offset in `text`, change)
    changes: Vec<(usize, PathChange)>,
}

fn keyed_stage(line: &str, line_no: usize, new_base: &str) -> KeyedStage {
    let mut text = String::with_capacity(line.len());
    let mut claimed = Vec::new();
    let mut changes = Vec::new();
    let mut last = 0;

    for caps in KEYED.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        text.push_str(&line[last..whole.start()]);
        let start = text.len();

        let (key, open, value, close) = (&caps[1], &caps[2], &caps[3], &caps[4]);
        match relocate(value, new_base) {
            Some(new_value) if new_value != value => {
                text.push_str(key);
                text.push_str(open);
                text.push_str(&new_value);
                text.push_str(close);
                changes.push((
                    start,
                    PathChange {
                        line: line_no,
                        key: ChangeKey::Keyed(key.trim().to_string()),
                        old_value: value.to_string(),
                        new_value,
                    },
                ));
            }
            _ => text.push_str(whole.as_str()),
        }

        claimed.push(start..text.len());
        last = whole.end();
    }
    text.push_str(&line[last..]);

    KeyedStage {
        text,
        claimed,
        changes,
    }
}

fn unclaimed_stage(
    text: &str,
    claimed: &[Range<usize>],
    line_no: usize,
    new_base: &str,
) -> (String, Vec<(usize, PathChange)>) {
    let mut out = String::with_capacity(text.len());
    let mut changes = Vec::new();
    let mut cursor = 0;
    let tail = text.len()..text.len();

    for span in claimed.iter().chain(std::iter::once(&tail)) {
        let gap = &text[cursor..span.start];
        let mut last = 0;
        for caps in QUOTED_PATH.captures_iter(gap) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1).or_else(|| caps.get(2)))
            else {
                continue;
            };
            out.push_str(&gap[last..whole.start()]);
            match relocate(inner.as_str(), new_base) {
                Some(new_value) if new_value != inner.as_str() => {
                    let quote = &gap[whole.start()..inner.start()];
                    out.push_str(quote);
                    out.push_str(&new_value);
                    out.push_str(quote);
                    changes.push((
                        cursor + whole.start(),
                        PathChange {
                            line: line_no,
                            key: ChangeKey::Any,
                            old_value: inner.as_str().to_string(),
                            new_value,
                        },
                    ));
                }
                _ => out.push_str(whole.as_str()),
            }
            last = whole.end();
        }
        out.push_str(&gap[last..]);
        out.push_str(&text[span.clone()]);
        cursor = span.end;
    }

    (out, changes)
}

/// A loaded file together with its rewritten lines. Consumed by the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    source: SourceFile,
    rewrite: Rewrite,
}

impl RewriteResult {
    pub fn new(source: SourceFile, new_base: &str) -> Self {
        let rewrite = rewrite(source.text(), new_base);
        Self { source, rewrite }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn changes(&self) -> &[PathChange] {
        &self.rewrite.changes
    }

    pub fn lines(&self) -> &[String] {
        &self.rewrite.lines
    }

    pub fn text(&self) -> String {
        self.rewrite.text()
    }

    pub fn is_candidate(&self) -> bool {
        self.rewrite.is_candidate()
    }

    pub fn into_parts(self) -> (SourceFile, Rewrite) {
        (self.source, self.rewrite)
    }
}
