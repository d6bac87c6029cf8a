// Dashboard and route commands

use crate::output::OutputFormat;
use crate::routes::{self, Route};
use crate::views;
use anyhow::{anyhow, Result};
use sitewatch_core::AppStore;

pub fn dashboard(store: &AppStore, output: OutputFormat) -> Result<()> {
    let summary = store.summary();
    if output.is_text() {
        println!("{}", views::dashboard::render(&summary));
        Ok(())
    } else {
        output.print_value(&summary)
    }
}

/// Render the page behind a path, with the sidebar
pub async fn route(path: &str, store: &AppStore, output: OutputFormat) -> Result<()> {
    let route = Route::from_path(path).ok_or_else(|| {
        let known: Vec<&str> = Route::ALL.iter().map(|r| r.path()).collect();
        anyhow!("No view for path {} (known: {})", path, known.join(", "))
    })?;

    if output.is_text() {
        println!("{}", routes::render(route, store).await?);
        Ok(())
    } else {
        output.print_value(&serde_json::json!({
            "route": route,
            "path": route.path(),
            "title": route.title(),
        }))
    }
}
