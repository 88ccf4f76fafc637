//! Depth-first closure walk over depfile dependencies.

use crate::extractor::read_and_extract;
use crate::{
    BuildDir, DependencyGraph, DependencySource, ExtractMode, Extractor, Result, locate,
    validate_base_name,
};
use indexmap::IndexSet;
use tracing::{debug, instrument, warn};

/// Dependency source backed by the depfiles of a build directory.
#[derive(Debug, Clone)]
pub struct DepFileSource<'a> {
    build_dir: &'a BuildDir,
    mode: ExtractMode,
}

impl<'a> DepFileSource<'a> {
    /// Create a source reading depfiles under `build_dir`.
    #[must_use]
    pub const fn new(build_dir: &'a BuildDir, mode: ExtractMode) -> Self {
        Self { build_dir, mode }
    }
}

impl DependencySource for DepFileSource<'_> {
    fn dependencies(&mut self, base: &str) -> Result<Vec<String>> {
        let files = locate(self.build_dir, base)?;
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let extractor = Extractor::new(self.build_dir, base, self.mode)?;
        let mut targets = Vec::new();
        for file in &files {
            targets.extend(read_and_extract(&extractor, file)?);
        }
        Ok(targets)
    }
}

/// Base names reachable from a start node, in visitation order.
#[derive(Debug, Clone)]
pub struct Closure {
    start: String,
    visited: IndexSet<String>,
    graph: DependencyGraph,
}

impl Closure {
    /// The base name the walk started from.
    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Visited base names; the start node comes first.
    pub fn bases(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    /// Number of visited base names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Always false: the start node is part of every closure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Check if a base name was reached.
    #[must_use]
    pub fn contains(&self, base: &str) -> bool {
        self.visited.contains(base)
    }

    /// Marker path of every visited base name, in visitation order.
    #[must_use]
    pub fn markers(&self, build_dir: &BuildDir) -> Vec<String> {
        self.bases().map(|base| build_dir.marker_path(base)).collect()
    }

    /// Every edge discovered during the walk.
    #[must_use]
    pub const fn graph(&self) -> &DependencyGraph {
        &self.graph
    }
}

/// Walk every base name reachable from `start`.
///
/// Each node is expanded at most once, so cycles and shared dependencies
/// terminate. Nodes are visited in the same pre-order a recursive
/// depth-first search would produce, using an explicit stack.
///
/// # Errors
///
/// Returns an error if `start` is not a valid base name or if the source
/// fails for any visited node.
#[instrument(skip(source))]
pub fn closure<S>(source: &mut S, start: &str) -> Result<Closure>
where
    S: DependencySource + ?Sized,
{
    validate_base_name(start)?;

    let mut visited = IndexSet::new();
    let mut graph = DependencyGraph::new();
    let mut to_process = vec![start.to_string()];

    while let Some(current) = to_process.pop() {
        if visited.contains(&current) {
            continue;
        }
        graph.add_node(&current);
        let deps = source.dependencies(&current)?;
        debug!(base = %current, deps = deps.len(), "expanded node");

        let mut next = Vec::with_capacity(deps.len());
        for dep in deps {
            if let Err(e) = validate_base_name(&dep) {
                warn!(base = %current, "skipping dependency: {e}");
                continue;
            }
            graph.add_edge(&current, &dep);
            next.push(dep);
        }
        visited.insert(current);

        // Reverse so the first discovered dependency is expanded first
        to_process.extend(next.into_iter().rev().filter(|dep| !visited.contains(dep)));
    }

    debug!(count = visited.len(), "closure complete");
    Ok(Closure {
        start: start.to_string(),
        visited,
        graph,
    })
}

/// Marker paths of everything `start` depends on under `build_dir`,
/// including its own marker.
///
/// # Errors
///
/// Returns an error if a located depfile cannot be read or the inputs are
/// invalid.
pub fn compute_markers(build_dir: &BuildDir, start: &str, mode: ExtractMode) -> Result<Vec<String>> {
    let mut source = DepFileSource::new(build_dir, mode);
    Ok(closure(&mut source, start)?.markers(build_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// In-memory source that records how often each node was expanded.
    #[derive(Default)]
    struct MapSource {
        edges: HashMap<String, Vec<String>>,
        calls: HashMap<String, usize>,
    }

    impl MapSource {
        fn with(edges: &[(&str, &[&str])]) -> Self {
            Self {
                edges: edges
                    .iter()
                    .map(|(from, to)| {
                        (
                            (*from).to_string(),
                            to.iter().map(|s| (*s).to_string()).collect(),
                        )
                    })
                    .collect(),
                calls: HashMap::new(),
            }
        }
    }

    impl DependencySource for MapSource {
        fn dependencies(&mut self, base: &str) -> Result<Vec<String>> {
            *self.calls.entry(base.to_string()).or_default() += 1;
            Ok(self.edges.get(base).cloned().unwrap_or_default())
        }
    }

    fn bases(closure: &Closure) -> Vec<&str> {
        closure.bases().collect()
    }

    #[test]
    fn test_leaf_start() {
        let mut source = MapSource::default();
        let result = closure(&mut source, "main").unwrap();
        assert_eq!(bases(&result), vec!["main"]);
        assert_eq!(result.start(), "main");
        assert!(!result.is_empty());
    }

    #[test]
    fn test_transitive_closure() {
        let mut source = MapSource::with(&[("a", &["b", "c"]), ("b", &["d"])]);
        let result = closure(&mut source, "a").unwrap();
        assert_eq!(bases(&result), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_diamond_visits_once() {
        let mut source = MapSource::with(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"])]);
        let result = closure(&mut source, "a").unwrap();
        assert_eq!(result.len(), 4);
        assert!(source.calls.values().all(|&n| n == 1));
        assert_eq!(result.graph().edge_count(), 4);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut source = MapSource::with(&[("a", &["b"]), ("b", &["a"])]);
        let result = closure(&mut source, "a").unwrap();
        assert_eq!(bases(&result), vec!["a", "b"]);
        assert!(result.graph().has_cycles());
    }

    #[test]
    fn test_self_loop() {
        let mut source = MapSource::with(&[("a", &["a"])]);
        let result = closure(&mut source, "a").unwrap();
        assert_eq!(bases(&result), vec!["a"]);
        assert_eq!(source.calls["a"], 1);
    }

    #[test]
    fn test_recursive_preorder() {
        // a -> [b, c], b -> [c, e], c -> [d]
        let mut source = MapSource::with(&[("a", &["b", "c"]), ("b", &["c", "e"]), ("c", &["d"])]);
        let result = closure(&mut source, "a").unwrap();
        assert_eq!(bases(&result), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let names: Vec<String> = (0..50_000).map(|i| format!("n{i}")).collect();
        let mut source = MapSource::default();
        for pair in names.windows(2) {
            source.edges.insert(pair[0].clone(), vec![pair[1].clone()]);
        }
        let result = closure(&mut source, "n0").unwrap();
        assert_eq!(result.len(), names.len());
    }

    #[test]
    fn test_empty_dependency_names_skipped() {
        let mut source = MapSource::with(&[("a", &["", "b"])]);
        let result = closure(&mut source, "a").unwrap();
        assert_eq!(bases(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_start_rejected() {
        let mut source = MapSource::default();
        let err = closure(&mut source, "").unwrap_err();
        assert!(matches!(err, Error::InvalidBaseName { .. }));
    }

    #[test]
    fn test_markers() {
        let build_dir = BuildDir::new("_build/exe").unwrap();
        let mut source = MapSource::with(&[("main", &["util"])]);
        let result = closure(&mut source, "main").unwrap();
        assert_eq!(
            result.markers(&build_dir),
            vec!["_build/exe/main.ok", "_build/exe/util.ok"]
        );
    }

    #[test]
    fn test_depfile_source_concatenates_variants() {
        let temp = TempDir::new().unwrap();
        let build_dir = BuildDir::new(temp.path()).unwrap();
        let root = build_dir.as_str();
        fs::write(
            temp.path().join("main.a.d"),
            format!("{root}/main.ok: {root}/x.ok\n"),
        )
        .unwrap();
        fs::write(
            temp.path().join("main.b.d"),
            format!("{root}/main.ok: {root}/y.ok\n"),
        )
        .unwrap();

        let mut source = DepFileSource::new(&build_dir, ExtractMode::Anchored);
        let deps = source.dependencies("main").unwrap();
        assert_eq!(deps, vec!["x", "y"]);
    }

    #[test]
    fn test_compute_markers_end_to_end() {
        let temp = TempDir::new().unwrap();
        let build_dir = BuildDir::new(temp.path()).unwrap();
        let root = build_dir.as_str();
        fs::write(
            temp.path().join("main.linux.d"),
            format!("{root}/main.ok: {root}/util.ok {root}/io.ok\n"),
        )
        .unwrap();
        fs::write(
            temp.path().join("util.linux.d"),
            format!("{root}/util.ok: {root}/io.ok\n"),
        )
        .unwrap();
        fs::write(temp.path().join("io.linux.d"), "# nothing for io\n").unwrap();

        let markers = compute_markers(&build_dir, "main", ExtractMode::Anchored).unwrap();
        assert_eq!(
            markers,
            vec![
                format!("{root}/main.ok"),
                format!("{root}/util.ok"),
                format!("{root}/io.ok"),
            ]
        );
    }

    #[test]
    fn test_rule_mode_follows_every_prerequisite() {
        let temp = TempDir::new().unwrap();
        let build_dir = BuildDir::new(temp.path()).unwrap();
        let root = build_dir.as_str();
        fs::write(
            temp.path().join("main.linux.d"),
            format!("{root}/main.ok: {root}/a.ok {root}/b.ok\n"),
        )
        .unwrap();

        let anchored = compute_markers(&build_dir, "main", ExtractMode::Anchored).unwrap();
        assert_eq!(anchored.len(), 2);
        let rule = compute_markers(&build_dir, "main", ExtractMode::Rule).unwrap();
        assert_eq!(
            rule,
            vec![
                format!("{root}/main.ok"),
                format!("{root}/a.ok"),
                format!("{root}/b.ok"),
            ]
        );
    }
}
