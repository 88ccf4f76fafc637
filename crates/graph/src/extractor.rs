//! Extraction of prerequisite markers from depfile text.
//!
//! Two strategies are available:
//!
//! - [`ExtractMode::Anchored`] scans for the literal anchor
//!   `<buildDir>/<base>.ok: <buildDir>/` and captures the shortest run up to
//!   the next `.ok`. Each anchor occurrence yields one base name, so a rule
//!   listing several prerequisites contributes only its first one. Build
//!   steps that emit one rule per edge rely on exactly this behaviour.
//! - [`ExtractMode::Rule`] parses make rules (continuations joined), keeps
//!   the rules whose targets include `<base>.ok`, and yields every
//!   `<buildDir>/<X>.ok` prerequisite.

use crate::build_dir::MARKER_SUFFIX;
use crate::{BuildDir, Error, Result};
use indexmap::IndexSet;
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// How prerequisite markers are pulled out of a depfile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExtractMode {
    /// One capture per `<base>.ok: <buildDir>/<X>.ok` occurrence.
    #[default]
    Anchored,
    /// Every `.ok` prerequisite of every rule targeting `<base>.ok`.
    Rule,
}

#[derive(Debug)]
enum Matcher {
    Anchored(Regex),
    Rule { target: String, prefix: String },
}

/// Extractor bound to a single base name.
///
/// Compiles the anchor once so it can be applied to every depfile of the
/// same node.
#[derive(Debug)]
pub struct Extractor {
    matcher: Matcher,
}

impl Extractor {
    /// Build an extractor for the rules of `base` under `build_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Anchor`] if the anchor regex cannot be compiled.
    pub fn new(build_dir: &BuildDir, base: &str, mode: ExtractMode) -> Result<Self> {
        let matcher = match mode {
            ExtractMode::Anchored => {
                let pattern = format!(
                    r"{}(.*?)\.ok",
                    regex::escape(&build_dir.rule_anchor(base))
                );
                let regex = Regex::new(&pattern).map_err(|source| Error::Anchor {
                    base: base.to_string(),
                    source,
                })?;
                Matcher::Anchored(regex)
            }
            ExtractMode::Rule => Matcher::Rule {
                target: build_dir.marker_path(base),
                prefix: build_dir.prefix(),
            },
        };
        Ok(Self { matcher })
    }

    /// Base names referenced by `text`, first occurrence order, no duplicates.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut found = IndexSet::new();
        match &self.matcher {
            Matcher::Anchored(regex) => {
                for caps in regex.captures_iter(text) {
                    if let Some(name) = caps.get(1) {
                        found.insert(name.as_str().to_string());
                    }
                }
            }
            Matcher::Rule { target, prefix } => {
                for (targets, prereqs) in rules(text) {
                    if !targets.split_whitespace().any(|t| t == target.as_str()) {
                        continue;
                    }
                    for prereq in prereqs.split_whitespace() {
                        if let Some(name) = prereq
                            .strip_prefix(prefix.as_str())
                            .and_then(|rest| rest.strip_suffix(MARKER_SUFFIX))
                            .filter(|name| !name.is_empty())
                        {
                            found.insert(name.to_string());
                        }
                    }
                }
            }
        }
        found.into_iter().collect()
    }
}

/// Split depfile text into `(targets, prerequisites)` rule pairs.
fn rules(text: &str) -> Vec<(String, String)> {
    let joined = text.replace("\\\r\n", " ").replace("\\\n", " ");
    joined
        .lines()
        .filter(|line| !line.starts_with('\t') && !line.trim_start().starts_with('#'))
        .filter_map(|line| {
            let sep = rule_separator(line)?;
            Some((line[..sep].to_string(), line[sep + 1..].to_string()))
        })
        .collect()
}

/// Position of the rule colon: a `:` followed by whitespace or end of line.
///
/// Skips colons inside paths such as `C:/out`.
fn rule_separator(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    bytes.iter().enumerate().find_map(|(i, &b)| {
        let at_boundary = bytes.get(i + 1).is_none_or(|next| next.is_ascii_whitespace());
        (b == b':' && at_boundary).then_some(i)
    })
}

/// Base names referenced by `text` for the rules of `base`.
///
/// # Errors
///
/// Returns [`Error::Anchor`] if the anchor regex cannot be compiled.
pub fn extract_from_str(
    build_dir: &BuildDir,
    text: &str,
    base: &str,
    mode: ExtractMode,
) -> Result<Vec<String>> {
    Ok(Extractor::new(build_dir, base, mode)?.extract(text))
}

/// Read a depfile and return the base names its rules for `base` reference.
///
/// # Errors
///
/// Returns [`Error::Read`] if the file cannot be read.
pub fn extract_targets(
    build_dir: &BuildDir,
    path: &Path,
    base: &str,
    mode: ExtractMode,
) -> Result<Vec<String>> {
    let extractor = Extractor::new(build_dir, base, mode)?;
    read_and_extract(&extractor, path)
}

pub(crate) fn read_and_extract(extractor: &Extractor, path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let targets = extractor.extract(&text);
    debug!(path = %path.display(), count = targets.len(), "extracted targets");
    Ok(targets)
}
