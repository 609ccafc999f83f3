use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::paths::{basename, common_dir_prefix, LexicalPath};
use crate::records::{read_records, Record};

/// Header of every output file, in column order.
pub const OUTPUT_HEADER: [&str; 3] = ["file_name", "relative_path", "transcription"];

/// One output row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub file_name: String,
    pub relative_path: String,
    pub transcription: String,
}

/// Where the base directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseSource {
    /// Supplied by the caller.
    Explicit,
    /// Longest common prefix of the input parents.
    Common,
    /// The inputs share no anchor; `.` is used and rooted paths fall back.
    Unrelated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirectory {
    pub path: LexicalPath,
    pub source: BaseSource,
}

/// Pick the anchor for relative paths: `explicit` verbatim when given,
/// otherwise the longest common prefix of the parent directories of the
/// record paths.
pub fn resolve_base_dir(records: &[Record], explicit: Option<&Path>) -> BaseDirectory {
    if let Some(dir) = explicit {
        return BaseDirectory {
            path: LexicalPath::parse(&dir.to_string_lossy()),
            source: BaseSource::Explicit,
        };
    }

    let parents: Vec<LexicalPath> = records
        .iter()
        .map(|r| LexicalPath::parse_parent(&r.file_name))
        .collect();
    match common_dir_prefix(&parents) {
        Some(path) => BaseDirectory {
            path,
            source: BaseSource::Common,
        },
        None => BaseDirectory {
            path: LexicalPath::current(),
            source: BaseSource::Unrelated,
        },
    }
}

/// A computed relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relative {
    Exact(String),
    /// Best-effort stand-in: the path with drive and root stripped.
    Fallback(String),
}

impl Relative {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(s) | Self::Fallback(s) => s,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Exact(s) | Self::Fallback(s) => s,
        }
    }
}

/// Express `path` relative to `base`. Paths that cannot be related
/// textually get the stripped fallback, or [`Error::PathFallback`] when
/// `strict` is set.
pub fn compute_relative(path: &LexicalPath, base: &LexicalPath, strict: bool) -> Result<Relative> {
    if let Some(rel) = path.relative_to(base) {
        return Ok(Relative::Exact(rel));
    }
    if strict {
        return Err(Error::PathFallback {
            path: path.to_string(),
            base: base.to_string(),
        });
    }
    let fallback = path.without_anchor();
    tracing::warn!(
        "Cannot express {} relative to {}; using best-effort {}",
        path,
        base,
        fallback
    );
    Ok(Relative::Fallback(fallback))
}

/// Output of [`transform`].
#[derive(Debug)]
pub struct Transformed {
    pub rows: Vec<OutputRow>,
    pub base_dir: BaseDirectory,
    /// Rows whose relative path is a fallback.
    pub fallbacks: usize,
}

/// Turn records into output rows: basename `file_name`, a `relative_path`
/// against the resolved base, and the transcription untouched.
pub fn transform(records: &[Record], base_dir: Option<&Path>, strict: bool) -> Result<Transformed> {
    let paths: Vec<LexicalPath> = records
        .iter()
        .map(|r| LexicalPath::parse(&r.file_name))
        .collect();
    let base_dir = resolve_base_dir(records, base_dir);
    if base_dir.source == BaseSource::Unrelated {
        tracing::warn!("Input paths share no common root; relative paths are best-effort");
    }

    let mut rows = Vec::with_capacity(records.len());
    let mut fallbacks = 0;
    for (record, path) in records.iter().zip(&paths) {
        let relative = compute_relative(path, &base_dir.path, strict)?;
        if relative.is_fallback() {
            fallbacks += 1;
        }
        tracing::debug!("{} -> {}", record.file_name, relative.as_str());
        rows.push(OutputRow {
            file_name: basename(&record.file_name).to_string(),
            relative_path: relative.into_string(),
            transcription: record.transcription.clone(),
        });
    }

    Ok(Transformed {
        rows,
        base_dir,
        fallbacks,
    })
}

/// Write `rows` to `path` with a header and minimal quoting, replacing any
/// existing file.
pub fn write_output(rows: &[OutputRow], path: &Path, create_parent_dirs: bool) -> Result<()> {
    if create_parent_dirs {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::output(path, e))?;
        }
    }

    let file = File::create(path).map_err(|e| Error::output(path, e))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(file);

    writer
        .write_record(OUTPUT_HEADER)
        .map_err(|e| Error::output(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| Error::output(path, e))?;
    }
    writer.flush().map_err(|e| Error::output(path, e))?;
    Ok(())
}

/// Inputs of a full rewrite run.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub base_dir: Option<PathBuf>,
    pub strict: bool,
    pub create_parent_dirs: bool,
}

impl RewriteOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            base_dir: None,
            strict: false,
            create_parent_dirs: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSummary {
    pub rows: usize,
    pub base_dir: String,
    pub fallbacks: usize,
}

/// Read, transform and write. The output file is only touched once every
/// row has been transformed.
pub fn run(options: &RewriteOptions) -> Result<RewriteSummary> {
    tracing::info!(
        "Rewriting {} -> {}",
        options.input.display(),
        options.output.display()
    );

    let records = read_records(&options.input)?;
    let transformed = transform(&records, options.base_dir.as_deref(), options.strict)?;
    tracing::info!("Using base directory {}", transformed.base_dir.path);

    write_output(
        &transformed.rows,
        &options.output,
        options.create_parent_dirs,
    )?;

    Ok(RewriteSummary {
        rows: transformed.rows.len(),
        base_dir: transformed.base_dir.path.to_string(),
        fallbacks: transformed.fallbacks,
    })
}
