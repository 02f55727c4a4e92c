//! Config file loading with override chains
//!
//! A document may name a parent through the top-level `override` key. The parent is
//! resolved relative to the directory of the document that names it, loaded first,
//! and the child is deep-merged over it.

use super::merge::merge_mappings;
use crate::error::ConfigError;
use crate::options::DEFAULT_MAX_DEPTH;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reserved top-level key naming the parent document.
pub const OVERRIDE_KEY: &str = "override";

/// Canonical paths visited while following `override` references, entry document first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideChain {
    paths: Vec<PathBuf>,
}

impl OverrideChain {
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths in the order they were visited (entry document first).
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// Paths from the root ancestor down to the entry document.
    pub fn ancestry(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().rev().map(PathBuf::as_path)
    }

    fn push(&mut self, path: PathBuf) -> Result<(), ConfigError> {
        if self.contains(&path) {
            let mut chain = self.paths.clone();
            chain.push(path);
            return Err(ConfigError::Cycle { chain });
        }
        self.paths.push(path);
        Ok(())
    }
}

/// Loads a YAML document and everything it transitively overrides.
#[derive(Debug, Clone)]
pub struct Loader {
    max_depth: usize,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }

    /// Set the longest override chain accepted before failing with `DepthExceeded`.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load `path` and merge it over its ancestors.
    pub fn load(&self, path: &Path) -> Result<Value, ConfigError> {
        self.load_with_chain(path).map(|(tree, _)| tree)
    }

    /// Like [`Loader::load`], also returning the chain of files that were merged.
    pub fn load_with_chain(&self, path: &Path) -> Result<(Value, OverrideChain), ConfigError> {
        let mut chain = OverrideChain::default();
        let tree = self.load_recursive(path, &mut chain)?;
        Ok((Value::Mapping(tree), chain))
    }

    fn load_recursive(&self, path: &Path, chain: &mut OverrideChain) -> Result<Mapping, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.to_path_buf() });
        }
        let path = path.canonicalize().map_err(|e| ConfigError::read(path, e))?;
        chain.push(path.clone())?;
        if chain.len() > self.max_depth {
            return Err(ConfigError::DepthExceeded {
                limit: self.max_depth,
                stage: "following override chain",
            });
        }

        let mut current = read_document(&path)?;
        let parent = take_override(&mut current, &path)?;

        let Some(parent) = parent else {
            debug!(path = %path.display(), "Loaded config without override");
            return Ok(current);
        };

        // Relative to the file that names it, never the working directory.
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let parent_path = base_dir.join(&parent);
        debug!(
            path = %path.display(),
            parent = %parent_path.display(),
            "Applying override"
        );

        let base = self.load_recursive(&parent_path, chain)?;
        Ok(merge_mappings(base, current))
    }
}

/// Convenience wrapper around [`Loader::load`] with default limits.
pub fn load_config(path: &Path) -> Result<Value, ConfigError> {
    Loader::new().load(path)
}

fn read_document(path: &Path) -> Result<Mapping, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;

    // Empty or comment-only files count as an empty mapping.
    if content.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
        return Ok(Mapping::new());
    }

    let raw: Value = serde_yaml::from_str(&content).map_err(|e| ConfigError::parse(path, e))?;
    match raw {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ConfigError::NotAMapping { path: path.to_path_buf() }),
    }
}

/// Remove the reserved key, returning the parent path it named (if any).
fn take_override(document: &mut Mapping, path: &Path) -> Result<Option<String>, ConfigError> {
    match document.shift_remove(OVERRIDE_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ConfigError::InvalidOverride {
            path: path.to_path_buf(),
            found: describe(&other).to_string(),
        }),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(&path, content).expect("write");
        path
    }

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).expect("valid yaml")
    }

    #[test]
    fn test_document_without_override_loads_as_is() {
        let tmp = TempDir::new().expect("tmp");
        let entry = write(tmp.path(), "test.yaml", "a: 1\nb:\n  c: [x, y]\n");

        let tree = load_config(&entry).expect("load");
        assert_eq!(tree, yaml("a: 1\nb:\n  c: [x, y]"));
    }

    #[test]
    fn test_child_merges_over_parent() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "base.yaml", "greeting: x\nother: 1\nnested:\n  keep: yes\n  swap: old\n");
        let entry = write(
            tmp.path(),
            "test.yaml",
            "override: base.yaml\ngreeting: hello\nnested:\n  swap: new\n",
        );

        let tree = load_config(&entry).expect("load");
        assert_eq!(tree, yaml("greeting: hello\nother: 1\nnested:\n  keep: yes\n  swap: new"));
    }

    #[test]
    fn test_override_key_never_appears_in_output() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "root.yaml", "level: root\n");
        write(tmp.path(), "mid.yaml", "override: root.yaml\nlevel: mid\n");
        let entry = write(tmp.path(), "leaf.yaml", "override: mid.yaml\n");

        let tree = load_config(&entry).expect("load");
        assert_eq!(tree, yaml("level: mid"));
        assert!(tree.get(OVERRIDE_KEY).is_none());
    }

    #[test]
    fn test_override_resolves_relative_to_declaring_file() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "shared/base.yaml", "from: shared\n");
        write(tmp.path(), "shared/profiles/dev.yaml", "override: ../base.yaml\nprofile: dev\n");
        let entry = write(tmp.path(), "app/test.yaml", "override: ../shared/profiles/dev.yaml\n");

        let (tree, chain) = Loader::new().load_with_chain(&entry).expect("load");
        assert_eq!(tree, yaml("from: shared\nprofile: dev"));
        assert_eq!(chain.len(), 3);
        let root = chain.ancestry().next().expect("root");
        assert!(root.ends_with("shared/base.yaml"), "root was {}", root.display());
    }

    #[test]
    fn test_missing_entry_is_not_found() {
        let tmp = TempDir::new().expect("tmp");
        let err = load_config(&tmp.path().join("nope.yaml")).expect_err("should fail");
        assert!(matches!(err, ConfigError::NotFound { .. }), "got {err:?}");
    }

    #[test]
    fn test_missing_override_target_is_not_found() {
        let tmp = TempDir::new().expect("tmp");
        let entry = write(tmp.path(), "test.yaml", "override: gone.yaml\na: 1\n");

        let err = load_config(&entry).expect_err("should fail");
        match err {
            ConfigError::NotFound { path } => assert!(path.ends_with("gone.yaml")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_yaml_is_parse_error_with_path() {
        let tmp = TempDir::new().expect("tmp");
        let entry = write(tmp.path(), "bad.yaml", "a: [1, 2\nb: : :\n");

        let err = load_config(&entry).expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_empty_and_comment_only_documents_are_empty_mappings() {
        let tmp = TempDir::new().expect("tmp");
        let empty = write(tmp.path(), "empty.yaml", "");
        let comments = write(tmp.path(), "comments.yaml", "# nothing here\n\n");
        let tilde = write(tmp.path(), "tilde.yaml", "~\n");

        for path in [empty, comments, tilde] {
            assert_eq!(load_config(&path).expect("load"), Value::Mapping(Mapping::new()));
        }
    }

    #[test]
    fn test_top_level_sequence_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let entry = write(tmp.path(), "list.yaml", "- a\n- b\n");

        let err = load_config(&entry).expect_err("should fail");
        assert!(matches!(err, ConfigError::NotAMapping { .. }), "got {err:?}");
    }

    #[test]
    fn test_null_or_empty_override_means_no_parent() {
        let tmp = TempDir::new().expect("tmp");
        let null = write(tmp.path(), "null.yaml", "override: null\na: 1\n");
        let blank = write(tmp.path(), "blank.yaml", "override: ''\na: 1\n");

        assert_eq!(load_config(&null).expect("load"), yaml("a: 1"));
        assert_eq!(load_config(&blank).expect("load"), yaml("a: 1"));
    }

    #[test]
    fn test_non_string_override_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let entry = write(tmp.path(), "test.yaml", "override: [a.yaml]\n");

        let err = load_config(&entry).expect_err("should fail");
        assert!(matches!(err, ConfigError::InvalidOverride { .. }), "got {err:?}");
    }

    #[test]
    fn test_nested_override_keys_are_plain_data() {
        let tmp = TempDir::new().expect("tmp");
        let entry = write(tmp.path(), "test.yaml", "section:\n  override: not-a-file.yaml\n");

        let tree = load_config(&entry).expect("load");
        assert_eq!(tree["section"]["override"], Value::String("not-a-file.yaml".to_string()));
    }

    #[test]
    fn test_two_file_cycle_is_detected() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "a.yaml", "override: b.yaml\n");
        write(tmp.path(), "b.yaml", "override: a.yaml\n");

        let err = load_config(&tmp.path().join("a.yaml")).expect_err("should fail");
        match err {
            ConfigError::Cycle { chain } => {
                assert_eq!(chain.len(), 3);
                assert_eq!(chain.first(), chain.last());
            }
            other => panic!("expected Cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_override_is_a_cycle() {
        let tmp = TempDir::new().expect("tmp");
        let entry = write(tmp.path(), "self.yaml", "override: ./self.yaml\n");

        let err = load_config(&entry).expect_err("should fail");
        assert!(matches!(err, ConfigError::Cycle { .. }), "got {err:?}");
    }

    #[test]
    fn test_chain_longer_than_limit_fails() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "c0.yaml", "n: 0\n");
        for i in 1..5 {
            write(tmp.path(), &format!("c{i}.yaml"), &format!("override: c{}.yaml\nn: {i}\n", i - 1));
        }
        let entry = tmp.path().join("c4.yaml");

        let err = Loader::new().max_depth(3).load(&entry).expect_err("should fail");
        assert!(matches!(err, ConfigError::DepthExceeded { limit: 3, .. }), "got {err:?}");

        let tree = Loader::new().max_depth(5).load(&entry).expect("load");
        assert_eq!(tree, yaml("n: 4"));
    }

    #[test]
    fn test_shared_parent_loaded_fresh_for_each_chain() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "base.yaml", "db:\n  host: localhost\n");
        let a = write(tmp.path(), "a.yaml", "override: base.yaml\ndb:\n  host: a.example\n");
        let b = write(tmp.path(), "b.yaml", "override: base.yaml\ndb:\n  port: 1\n");

        let loader = Loader::new();
        let tree_a = loader.load(&a).expect("load a");
        let tree_b = loader.load(&b).expect("load b");
        assert_eq!(tree_a, yaml("db:\n  host: a.example"));
        assert_eq!(tree_b, yaml("db:\n  host: localhost\n  port: 1"));
    }
}
