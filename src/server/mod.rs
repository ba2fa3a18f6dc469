//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Store;

/// Live reload client, inserted before `</body>`
const LIVE_RELOAD_SCRIPT: &str = r#"<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
"#;

/// Options of `storegen serve`
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub ip: String,
    pub port: u16,
    /// Rebuild on change and push reloads to the browser
    pub watch: bool,
    pub open: bool,
    /// Pinned build date; the current date when absent
    pub today: Option<NaiveDate>,
}

struct ServerState {
    output_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Serve the output directory until interrupted
pub async fn start(store: &Store, options: ServeOptions) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        output_dir: store.output_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: options.watch,
    });

    let app = Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_ip = if options.ip == "localhost" {
        "127.0.0.1"
    } else {
        options.ip.as_str()
    };
    let addr: SocketAddr = format!("{}:{}", bind_ip, options.port).parse()?;

    let url = format!("http://{}:{}", options.ip, options.port);
    println!("Server running at {}", url);
    if options.watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if options.open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if options.watch {
        let store = store.clone();
        let today = options.today;
        tokio::spawn(async move {
            if let Err(e) = watch_and_rebuild(store, today, reload_tx).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rebuild whenever site inputs change, then tell clients to reload
async fn watch_and_rebuild(
    store: Store,
    today: Option<NaiveDate>,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&store.data_dir, &store.template_dir, &store.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    // Debounced events arrive on a std channel
    tokio::task::spawn_blocking(move || {
        let _debouncer = debouncer;
        loop {
            match rx.recv() {
                Ok(Ok(events)) => {
                    let changed: Vec<_> = events
                        .iter()
                        .filter(|e| is_relevant_change(&e.path))
                        .collect();
                    if changed.is_empty() {
                        continue;
                    }
                    for event in &changed {
                        tracing::info!("File changed: {}", event.path.display());
                    }

                    let rebuilt = Store::new(&store.base_dir).and_then(|store| {
                        store.build(today.unwrap_or_else(crate::helpers::today))
                    });
                    match rebuilt {
                        Ok(summary) => {
                            tracing::info!("Rebuilt {} pages", summary.pages);
                            let _ = reload_tx.send(());
                        }
                        Err(e) => tracing::error!("Build failed: {:#}", e),
                    }
                }
                Ok(Err(e)) => tracing::error!("Watch error: {:?}", e),
                Err(_) => break,
            }
        }
    })
    .await?;

    Ok(())
}

/// Editor swap files and VCS metadata do not trigger rebuilds
fn is_relevant_change(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve HTML with the reload client injected; everything else via ServeDir
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let file_path = match resolve_request_path(&state.output_dir, request.uri().path()) {
        Some(path) => path,
        None => return (StatusCode::NOT_FOUND, "Not found").into_response(),
    };

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        let mut service = ServeDir::new(&state.output_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Map a request path onto a file in the output directory.
///
/// Directories resolve to their `index.html`, and `/blog/hello` to
/// `blog/hello.html` when that file exists. Paths that climb out of the
/// output directory resolve to nothing.
fn resolve_request_path(output_dir: &Path, uri_path: &str) -> Option<PathBuf> {
    let clean_path = uri_path.trim_start_matches('/');
    let relative = Path::new(clean_path);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let candidate = output_dir.join(relative);
    if candidate.is_dir() {
        return Some(candidate.join("index.html"));
    }
    if candidate.exists() {
        return Some(candidate);
    }

    let with_html = output_dir.join(format!("{}.html", clean_path));
    if with_html.exists() {
        Some(with_html)
    } else {
        Some(candidate)
    }
}

fn inject_live_reload(html: &str) -> String {
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}{}", &html[..pos], LIVE_RELOAD_SCRIPT, &html[pos..]),
        None => format!("{}{}", html, LIVE_RELOAD_SCRIPT),
    }
}

fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
