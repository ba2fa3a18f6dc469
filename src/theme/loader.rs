//! Theme loader - resolves templates and copies static assets

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::BUILTIN_TEMPLATES;
use crate::template::TemplateEngine;

/// Resolves the templates of a site directory against the built-in set
pub struct ThemeLoader {
    /// Site template directory (may not exist)
    template_dir: PathBuf,
}

impl ThemeLoader {
    pub fn new<P: AsRef<Path>>(template_dir: P) -> Self {
        Self {
            template_dir: template_dir.as_ref().to_path_buf(),
        }
    }

    /// Parse every template into an engine.
    ///
    /// A malformed template aborts the build with the offending file named.
    pub fn load(&self, autoescape: bool) -> Result<TemplateEngine> {
        let mut engine = TemplateEngine::new().autoescape(autoescape);

        for (name, builtin) in BUILTIN_TEMPLATES {
            let path = self.template_dir.join(name);
            let source = if path.is_file() {
                tracing::debug!("Using template {:?}", path);
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read template {:?}", path))?
            } else {
                tracing::debug!("Using built-in template {}", name);
                builtin.to_string()
            };

            engine
                .register(name, &source)
                .with_context(|| format!("Malformed template {}", name))?;
        }

        Ok(engine)
    }

    /// Write the built-in templates into the template directory, keeping
    /// files that already exist
    pub fn write_builtins(&self) -> Result<usize> {
        fs::create_dir_all(&self.template_dir)?;
        let mut written = 0;
        for (name, source) in BUILTIN_TEMPLATES {
            let path = self.template_dir.join(name);
            if path.exists() {
                continue;
            }
            fs::write(&path, source)?;
            written += 1;
        }
        Ok(written)
    }
}

/// Copy a static asset directory into the output directory.
///
/// Files under a component starting with `_` or `.` are skipped. Returns the
/// number of files copied.
pub fn copy_static(static_dir: &Path, output_dir: &Path) -> Result<usize> {
    if !static_dir.exists() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(static_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(static_dir)?;
        let should_skip = relative.components().any(|c| {
            c.as_os_str()
                .to_str()
                .map(|s| s.starts_with('_') || s.starts_with('.'))
                .unwrap_or(false)
        });
        if should_skip {
            continue;
        }

        let dest = output_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
        tracing::debug!("Copied: {:?} -> {:?}", path, dest);
        copied += 1;
    }

    Ok(copied)
}
