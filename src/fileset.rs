//! Named filesets: glob include/exclude groups resolved to ordered file
//! lists.
//!
//! Built-in sets mirror a CMS-style source tree: site code lives next to
//! generated exports, vendored `contrib`/`libraries` trees, and minified
//! assets, none of which should be analyzed. Resolution is deterministic:
//! matches are deduplicated and sorted so check runs and fail-fast behavior
//! are reproducible.

use glob::{glob, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
/// A named, glob-defined group of files used to scope a check.
pub struct Fileset {
    pub name: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Fileset {
    pub fn new(name: &str, include: &[&str], exclude: &[&str]) -> Self {
        Fileset {
            name: name.to_string(),
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }
}

const PHP_INCLUDE: &[&str] = &[
    "**/*.php",
    "**/*.module",
    "**/*.install",
    "**/*.inc",
    "**/*.profile",
    "**/*.test",
];

// Machine-generated export files; in their generated state they cannot be
// expected to conform to coding standards.
const PHP_GENERATED: &[&str] = &[
    "**/*.features.*",
    "**/*.field_group.inc",
    "**/*.layouts.inc",
    "**/*.pages_default.inc",
    "**/*.panels_default.inc",
    "**/*.strongarm.inc",
    "**/*.views_default.inc",
];

const CONTRIB: &[&str] = &["**/contrib/**", "**/libraries/**"];

/// All built-in filesets. Config may override patterns per name or add new
/// names entirely.
pub fn builtin_filesets() -> Vec<Fileset> {
    let php_excludes: Vec<&str> = PHP_GENERATED.iter().chain(CONTRIB).copied().collect();
    let js_excludes: Vec<&str> = ["**/*.min.js"].iter().chain(CONTRIB).copied().collect();
    vec![
        Fileset::new("php", PHP_INCLUDE, &[]),
        Fileset::new("js", &["**/*.js"], &["**/*.min.js"]),
        Fileset::new("css", &["**/*.css"], &[]),
        Fileset::new("php-custom", PHP_INCLUDE, &php_excludes),
        Fileset::new("js-custom", &["**/*.js"], &js_excludes),
        Fileset::new("css-custom", &["**/*.css"], CONTRIB),
    ]
}

pub fn find_fileset<'a>(sets: &'a [Fileset], name: &str) -> Option<&'a Fileset> {
    sets.iter().find(|f| f.name == name)
}

/// Resolve a fileset to an ordered list of absolute file paths under `root`.
pub fn resolve(root: &Path, set: &Fileset) -> Result<Vec<PathBuf>, glob::PatternError> {
    let excludes: Vec<Pattern> = set
        .exclude
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<Result<_, _>>()?;
    // Directory patterns like `**/contrib/**` are also tried with the
    // trailing `/**` stripped against each ancestor of the path.
    let dir_excludes: Vec<Pattern> = set
        .exclude
        .iter()
        .filter_map(|p| p.strip_suffix("/**"))
        .map(Pattern::new)
        .collect::<Result<_, _>>()?;

    let mut out: BTreeSet<PathBuf> = BTreeSet::new();
    for pat in &set.include {
        let abs = root.join(pat);
        for entry in glob(&abs.to_string_lossy())? {
            let path = match entry {
                Ok(p) => p,
                Err(_) => continue,
            };
            if !path.is_file() {
                continue;
            }
            let rel = path.strip_prefix(root).unwrap_or(&path);
            if is_excluded(rel, &excludes, &dir_excludes) {
                continue;
            }
            out.insert(path);
        }
    }
    Ok(out.into_iter().collect())
}

fn is_excluded(rel: &Path, excludes: &[Pattern], dir_excludes: &[Pattern]) -> bool {
    if excludes.iter().any(|p| p.matches_path(rel)) {
        return true;
    }
    rel.ancestors()
        .skip(1)
        .filter(|a| !a.as_os_str().is_empty())
        .any(|a| dir_excludes.iter().any(|p| p.matches_path(a)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, "x").unwrap();
    }

    fn rel_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_resolve_includes_are_sorted_and_deduped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "b.php");
        touch(root, "a.php");
        touch(root, "sites/all/custom/mod.module");
        touch(root, "notes.txt");

        let set = find_fileset(&builtin_filesets(), "php").unwrap().clone();
        let files = resolve(root, &set).unwrap();
        assert_eq!(
            rel_names(root, &files),
            vec!["a.php", "b.php", "sites/all/custom/mod.module"]
        );
    }

    #[test]
    fn test_minified_js_excluded() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "app.js");
        touch(root, "vendor.min.js");
        touch(root, "sub/deep.min.js");

        let set = find_fileset(&builtin_filesets(), "js").unwrap().clone();
        let files = resolve(root, &set).unwrap();
        assert_eq!(rel_names(root, &files), vec!["app.js"]);
    }

    #[test]
    fn test_custom_set_excludes_contrib_and_generated() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "sites/all/custom/good.php");
        touch(root, "sites/all/contrib/bad.php");
        touch(root, "sites/all/libraries/lib.inc");
        touch(root, "sites/all/custom/exported.views_default.inc");

        let set = find_fileset(&builtin_filesets(), "php-custom")
            .unwrap()
            .clone();
        let files = resolve(root, &set).unwrap();
        assert_eq!(rel_names(root, &files), vec!["sites/all/custom/good.php"]);
    }

    #[test]
    fn test_empty_tree_resolves_empty() {
        let dir = tempdir().unwrap();
        let set = find_fileset(&builtin_filesets(), "css").unwrap().clone();
        assert!(resolve(dir.path(), &set).unwrap().is_empty());
    }

    #[test]
    fn test_builtin_names() {
        let names: Vec<String> = builtin_filesets().into_iter().map(|f| f.name).collect();
        assert!(names.contains(&"php-custom".to_string()));
        assert!(names.contains(&"js-custom".to_string()));
    }
}
