//! Compile-unit discovery.
//!
//! Walks the declared source directories and maps every recognized source
//! file to its object path inside the build directory. Discovery is sorted
//! so unit order (and therefore stage output) is deterministic.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::core::layout::OutputLayout;

/// Source language of a compile unit, selecting the tool that compiles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cxx,
    Asm,
}

fn language_of(path: &Path) -> Option<Language> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("c") => Some(Language::C),
        Some("cpp") | Some("cc") | Some("cxx") => Some(Language::Cxx),
        Some("s") | Some("S") => Some(Language::Asm),
        _ => None,
    }
}

/// One source file and its object destination, both relative to the
/// project root (unless the layout itself is absolute).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileUnit {
    pub source: PathBuf,
    pub object: PathBuf,
    pub lang: Language,
}

/// Discover compile units under the declared source directories.
///
/// The object path mirrors the source path beneath the build directory,
/// with `.o` appended to the full file name (`src/main.c` becomes
/// `<build_dir>/src/main.c.o`).
pub fn discover_units(
    root: &Path,
    src_dirs: &[String],
    layout: &OutputLayout,
) -> Result<Vec<CompileUnit>> {
    let mut units = Vec::new();

    for dir in src_dirs {
        let abs_dir = root.join(dir);
        if !abs_dir.is_dir() {
            continue;
        }

        for entry in WalkDir::new(&abs_dir).sort_by_file_name() {
            let entry = entry.with_context(|| format!("failed to scan `{}`", dir))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let lang = match language_of(entry.path()) {
                Some(lang) => lang,
                None => continue,
            };

            let source = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();
            let mut object_name = source.as_os_str().to_os_string();
            object_name.push(".o");
            let object = layout.build_dir.join(object_name);

            units.push(CompileUnit {
                source,
                object,
                lang,
            });
        }
    }

    units.sort_by(|a, b| a.source.cmp(&b.source));
    Ok(units)
}
