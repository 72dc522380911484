//! Documentation-build command assembly.
//!
//! Pure string building, no execution: the sphinx invocation for a given
//! build target, with the conventional `docs` source directory and
//! `docs/_build` output tree.

use std::path::Path;

/// Build the sphinx command string for the given build target (`"html"`,
/// `"doctest"`, ...). `python` is the pinned interpreter to run sphinx with.
pub fn sphinx_cmd(python: &Path, build: &str) -> String {
    let docs_dir = Path::new("docs");
    let build_dir = docs_dir.join("_build");
    let doctrees = build_dir.join("doctrees");
    let output_dir = build_dir.join(build);
    format!(
        "{} -m sphinx -b {} -d {} {} {}",
        python.display(),
        build,
        doctrees.display(),
        docs_dir.display(),
        output_dir.display()
    )
}
