use crate::filter::FilterState;
use crate::view::{CatalogView, ModalView, Notice};
use async_trait::async_trait;
use cardex_schema::Backend;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Prints UI changes to stdout and writes each grid to `<dir>/<backend>.html`.
pub struct TerminalView {
    output_dir: PathBuf,
}

impl TerminalView {
    pub fn new(output_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn grid_path(&self, backend: Backend) -> PathBuf {
        self.output_dir.join(format!("{backend}.html"))
    }

    fn write_grid(path: &Path, backend: Backend, html: &str) -> io::Result<()> {
        std::fs::write(
            path,
            format!(r#"<div id="{backend}-cards" class="cards-grid">{html}</div>"#),
        )
    }
}

/// Reads one line from stdin off the async runtime. `None` on EOF.
pub async fn read_stdin_line() -> io::Result<Option<String>> {
    tokio::task::spawn_blocking(|| -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        Ok((read > 0).then_some(line))
    })
    .await
    .map_err(io::Error::other)?
}

#[async_trait]
impl CatalogView for TerminalView {
    fn show_tab(&self, backend: Backend) {
        println!("[tab] {backend}");
    }

    // One small local file write; stays within the non-blocking contract.
    fn render_grid(&self, backend: Backend, html: &str) {
        let path = self.grid_path(backend);
        match Self::write_grid(&path, backend, html) {
            Ok(()) => println!("[{backend}] grid updated: {}", path.display()),
            Err(error) => warn!(path = %path.display(), %error, "Failed to write grid"),
        }
    }

    fn show_modal(&self, modal: ModalView<'_>) {
        println!("[{}] {}", modal.backend, modal.title);
        if let Some(id) = modal.card_id {
            println!("  id             = {id}");
        }
        let form = modal.form;
        for (field, value) in [
            ("name", &form.name),
            ("manufacturer", &form.manufacturer),
            ("model", &form.model),
            ("memory_gb", &form.memory_gb),
            ("memory_type", &form.memory_type),
            ("core_clock_mhz", &form.core_clock_mhz),
            ("boost_clock_mhz", &form.boost_clock_mhz),
            ("price_usd", &form.price_usd),
            ("release_date", &form.release_date),
        ] {
            println!("  {field:<15}= {value}");
        }
    }

    fn hide_modal(&self) {
        println!("[form] closed");
    }

    fn sync_filters(&self, backend: Backend, filters: &FilterState) {
        if filters.is_empty() {
            println!("[{backend}] filters cleared");
        } else {
            println!("[{backend}] filters: {}", filters.query_string());
        }
    }

    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(text) => println!("ok: {text}"),
            Notice::Error(text) => println!("error: {text}"),
        }
    }

    async fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();
        match read_stdin_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(error) => {
                warn!(%error, "Failed to read confirmation");
                false
            }
        }
    }
}
