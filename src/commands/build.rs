//! Build the static site

use anyhow::Result;
use chrono::NaiveDate;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::{BuildSummary, Generator};
use crate::Store;

/// Load records, filter publishable ones and write every page
pub fn run(store: &Store, today: NaiveDate) -> Result<BuildSummary> {
    let start = Instant::now();

    let loader = store.loader(today);
    let products = loader.load_products()?;
    let posts = loader.load_posts()?;

    tracing::info!("Loaded {} products and {} posts", products.len(), posts.len());

    let generator = Generator::new(store, today)?;
    let summary = generator.generate(&products, &posts)?;

    tracing::info!(
        "Generated {} pages ({} static files) in {:.2}s",
        summary.pages,
        summary.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(summary)
}

/// Watch data, templates and static assets and rebuild on change
pub async fn watch(store: &Store, today: Option<NaiveDate>) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in [&store.data_dir, &store.template_dir, &store.static_dir] {
        if dir.exists() {
            watcher.watch(dir.as_ref(), notify::RecursiveMode::Recursive)?;
        }
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, rebuilding...");
                    // Config may have changed too
                    let rebuilt = Store::new(&store.base_dir).and_then(|store| {
                        store.build(today.unwrap_or_else(crate::helpers::today))
                    });
                    if let Err(e) = rebuilt {
                        tracing::error!("Build failed: {:#}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
