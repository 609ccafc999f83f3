//! Lexical path handling.
//!
//! Paths in a manifest are plain strings that may not exist on this machine,
//! and may even come from another platform. Everything here is textual: no
//! disk access, no symlink resolution, no current-directory lookups.

use std::fmt;

/// Whether `c` separates path segments on this host.
fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}

/// Split a leading `<letter>:` drive marker off `raw`.
fn split_drive(raw: &str) -> (Option<String>, &str) {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        (Some(raw[..2].to_ascii_uppercase()), &raw[2..])
    } else {
        (None, raw)
    }
}

/// The part of a path that is not a segment: drive marker and root.
///
/// Two paths can only be related textually when their anchors are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub drive: Option<String>,
    pub rooted: bool,
}

/// A lexically normalized path.
///
/// `.` segments are dropped and `..` cancels the segment before it. Leading
/// `..` segments survive only on unrooted paths (`/..` is `/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalPath {
    anchor: Anchor,
    segments: Vec<String>,
}

impl LexicalPath {
    pub fn parse(raw: &str) -> Self {
        let (drive, rest) = split_drive(raw);
        let mut path = Self::anchored(drive, rest);
        for segment in rest.split(is_separator) {
            path.push(segment);
        }
        path
    }

    /// The directory containing `raw`: its last segment is dropped before
    /// normalizing, so `/a/b/..` lives in `/a/b`. The parent of a bare file
    /// name is `.`.
    pub fn parse_parent(raw: &str) -> Self {
        let (drive, rest) = split_drive(raw);
        let mut path = Self::anchored(drive, rest);
        let mut segments: Vec<&str> = rest
            .split(is_separator)
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        segments.pop();
        for segment in segments {
            path.push(segment);
        }
        path
    }

    fn anchored(drive: Option<String>, rest: &str) -> Self {
        Self {
            anchor: Anchor {
                drive,
                rooted: rest.starts_with(is_separator),
            },
            segments: Vec::new(),
        }
    }

    /// The `.` placeholder directory.
    pub fn current() -> Self {
        Self {
            anchor: Anchor::default(),
            segments: Vec::new(),
        }
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn push(&mut self, segment: &str) {
        match segment {
            "" | "." => {}
            ".." => match self.segments.last() {
                Some(last) if last.as_str() != ".." => {
                    self.segments.pop();
                }
                _ if self.anchor.rooted => {}
                _ => self.segments.push("..".to_string()),
            },
            other => self.segments.push(other.to_string()),
        }
    }

    /// Append a relative path, normalizing as it goes.
    pub fn join(&self, relative: &str) -> Self {
        let mut joined = self.clone();
        for segment in relative.split(is_separator) {
            joined.push(segment);
        }
        joined
    }

    /// Express `self` relative to `base`, walking up with `..` as needed.
    ///
    /// Returns `None` when the anchors differ, or when `base` climbs above
    /// its anchor with `..` segments `self` does not share: the directories
    /// those segments name are unknown without the filesystem.
    pub fn relative_to(&self, base: &LexicalPath) -> Option<String> {
        if self.anchor != base.anchor {
            return None;
        }

        let shared = common_len(&self.segments, &base.segments);
        let ups = &base.segments[shared..];
        if ups.iter().any(|s| s == "..") {
            return None;
        }

        let mut parts: Vec<&str> = vec![".."; ups.len()];
        parts.extend(self.segments[shared..].iter().map(String::as_str));
        if parts.is_empty() {
            Some(".".to_string())
        } else {
            Some(parts.join("/"))
        }
    }

    /// The segments with drive marker and root stripped, joined with `/`.
    pub fn without_anchor(&self) -> String {
        if self.segments.is_empty() {
            ".".to_string()
        } else {
            self.segments.join("/")
        }
    }
}

impl fmt::Display for LexicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(drive) = &self.anchor.drive {
            f.write_str(drive)?;
        }
        if self.anchor.rooted {
            f.write_str("/")?;
        } else if self.segments.is_empty() && self.anchor.drive.is_none() {
            return f.write_str(".");
        }
        f.write_str(&self.segments.join("/"))
    }
}

fn common_len(a: &[String], b: &[String]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Longest common leading-segment run of `dirs`.
///
/// An empty input yields `.`. Returns `None` when the directories do not all
/// share the same anchor.
pub fn common_dir_prefix<'a, I>(dirs: I) -> Option<LexicalPath>
where
    I: IntoIterator<Item = &'a LexicalPath>,
{
    let mut dirs = dirs.into_iter();
    let Some(first) = dirs.next() else {
        return Some(LexicalPath::current());
    };

    let mut common = first.clone();
    for dir in dirs {
        if dir.anchor != common.anchor {
            return None;
        }
        let shared = common_len(&common.segments, &dir.segments);
        common.segments.truncate(shared);
    }
    Some(common)
}

/// The final segment of `raw`, without any directory components.
///
/// Trailing separators and `.` segments are skipped; a bare root or drive
/// has no basename and yields an empty string.
pub fn basename(raw: &str) -> &str {
    let (_, rest) = split_drive(raw);
    rest.rsplit(is_separator)
        .find(|s| !s.is_empty() && *s != ".")
        .unwrap_or("")
}
