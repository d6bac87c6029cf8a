// Violation listing
//
// Records come from the backend on every call; they are never cached locally.

use crate::output::OutputFormat;
use crate::views;
use anyhow::{bail, Result};
use clap::Subcommand;
use sitewatch_core::{AppStore, StoreError};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum ViolationsCommand {
    /// List detected violations, newest first
    List {
        /// Only show violations from this camera
        #[arg(long)]
        camera: Option<Uuid>,
    },
}

pub async fn run(command: ViolationsCommand, store: &AppStore, output: OutputFormat) -> Result<()> {
    match command {
        ViolationsCommand::List { camera } => list(store, camera, output).await,
    }
}

async fn list(store: &AppStore, camera: Option<Uuid>, output: OutputFormat) -> Result<()> {
    let mut events = match store.backend().list_violations().await {
        Ok(events) => events,
        Err(e) => bail!(views::store_error_message(
            &StoreError::from(e),
            views::violations::LOAD_FAILED
        )),
    };
    if let Some(camera_id) = camera {
        events.retain(|e| e.camera_id == camera_id);
    }

    if output.is_text() {
        println!("{}", views::violations::render(&events, &store.cameras()));
        Ok(())
    } else {
        output.print_value(&events)
    }
}
