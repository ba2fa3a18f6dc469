//! Clean the output directory

use anyhow::Result;
use std::fs;

use crate::Store;

/// Delete the generated site
pub fn run(store: &Store) -> Result<()> {
    if store.output_dir.exists() {
        fs::remove_dir_all(&store.output_dir)?;
        tracing::info!("Deleted: {:?}", store.output_dir);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path()).unwrap();
        fs::create_dir_all(store.output_dir.join("blog")).unwrap();
        fs::write(store.output_dir.join("index.html"), "x").unwrap();

        run(&store).unwrap();
        assert!(!store.output_dir.exists());
        // Nothing to delete is fine
        run(&store).unwrap();
    }
}
