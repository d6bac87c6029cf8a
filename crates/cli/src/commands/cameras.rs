// Camera management commands
//
// Add, edit and delete go through the backend first (write-through store).
// `watch` and `stream` run a StatusPoller until the poll count is reached or
// the user presses Ctrl-C; the poller is stopped on every exit path.

use crate::output::OutputFormat;
use crate::views;
use crate::views::stream::StreamFrame;
use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use sitewatch_core::{
    AppStore, CameraDraft, CameraForm, ClientConfig, PollState, StatusPoller, StoreError,
    ViolationType,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const VIOLATIONS: [&str; 3] = ["no_helmet", "no_vest", "no_gloves"];

#[derive(Subcommand)]
pub enum CamerasCommand {
    /// List cameras grouped by facility
    List {
        /// Only show this facility
        #[arg(long)]
        facility: Option<Uuid>,
    },

    /// Register a camera with the backend
    Add {
        /// Facility ID
        #[arg(long)]
        facility: Uuid,

        /// Camera name
        #[arg(long)]
        name: String,

        /// IPv4 address
        #[arg(long)]
        ip: String,

        /// Port (0-65535)
        #[arg(long)]
        port: String,

        /// Violation type to monitor (repeatable)
        #[arg(long, short, value_parser = VIOLATIONS)]
        violation: Vec<String>,
    },

    /// Edit a camera; omitted fields keep their value
    Edit {
        /// Camera ID
        camera_id: Uuid,

        /// Move to another facility
        #[arg(long)]
        facility: Option<Uuid>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        ip: Option<String>,

        #[arg(long)]
        port: Option<String>,

        /// Replace the monitored violations (repeatable)
        #[arg(long, short, value_parser = VIOLATIONS)]
        violation: Vec<String>,

        /// Stop monitoring all violations
        #[arg(long, conflicts_with = "violation")]
        clear_violations: bool,
    },

    /// Delete a camera
    Delete {
        /// Camera ID
        camera_id: Uuid,
    },

    /// Check a camera's status once
    Status {
        /// Camera ID
        camera_id: Uuid,
    },

    /// Poll a camera's status until interrupted
    Watch {
        /// Camera ID
        camera_id: Uuid,

        /// Stop after this many polls
        #[arg(long, short)]
        count: Option<u64>,

        /// Seconds between polls (defaults to the configured poll interval)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Show the live stream URL while monitoring the camera
    Stream {
        /// Camera ID
        camera_id: Uuid,

        /// Stop after this many checks
        #[arg(long, short)]
        count: Option<u64>,
    },
}

pub async fn run(
    command: CamerasCommand,
    store: &AppStore,
    config: &ClientConfig,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        CamerasCommand::List { facility } => list(store, facility, output),
        CamerasCommand::Add {
            facility,
            name,
            ip,
            port,
            violation,
        } => {
            let mut draft = CameraDraft::for_facility(Some(facility));
            draft.name = name;
            draft.ip_address = ip;
            draft.port = port;
            draft.monitored_violations = violation.into_iter().map(ViolationType::from).collect();
            submit(store, CameraForm::create(), draft, output, quiet).await
        }
        CamerasCommand::Edit {
            camera_id,
            facility,
            name,
            ip,
            port,
            violation,
            clear_violations,
        } => {
            let existing = store
                .camera(camera_id)
                .ok_or_else(|| anyhow!("Camera not found: {}", camera_id))?;
            let mut draft = CameraDraft::from_camera(&existing);
            if let Some(facility) = facility {
                draft.facility_id = Some(facility);
            }
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(ip) = ip {
                draft.ip_address = ip;
            }
            if let Some(port) = port {
                draft.port = port;
            }
            if clear_violations {
                draft.monitored_violations.clear();
            } else if !violation.is_empty() {
                draft.monitored_violations =
                    violation.into_iter().map(ViolationType::from).collect();
            }
            submit(store, CameraForm::edit(camera_id), draft, output, quiet).await
        }
        CamerasCommand::Delete { camera_id } => delete(store, camera_id, output, quiet).await,
        CamerasCommand::Status { camera_id } => status(store, camera_id, output).await,
        CamerasCommand::Watch {
            camera_id,
            count,
            interval,
        } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or(config.poll_interval);
            watch(store, camera_id, interval, count, output).await
        }
        CamerasCommand::Stream { camera_id, count } => {
            stream(store, camera_id, config.stream_poll_interval, count, output).await
        }
    }
}

fn list(store: &AppStore, facility: Option<Uuid>, output: OutputFormat) -> Result<()> {
    let facilities = match facility {
        Some(id) => vec![store
            .facility(id)
            .ok_or_else(|| anyhow!("Facility not found: {}", id))?],
        None => store.facilities(),
    };
    let cameras = match facility {
        Some(id) => store.cameras_for(id),
        None => store.cameras(),
    };

    if output.is_text() {
        println!("{}", views::cameras::render(&facilities, &cameras));
        Ok(())
    } else {
        output.print_value(&cameras)
    }
}

async fn submit(
    store: &AppStore,
    form: CameraForm,
    draft: CameraDraft,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    if store.facilities().is_empty() {
        bail!(views::cameras::NO_FACILITIES);
    }
    let camera_id = match form.submit(store, &draft).await {
        Ok(id) => id,
        Err(e) => bail!(
            "Camera could not be saved:\n{}",
            views::form_error_message(&e, "An unexpected error occurred")
        ),
    };
    let camera = store
        .camera(camera_id)
        .ok_or_else(|| anyhow!("Camera not found: {}", camera_id))?;

    if !output.is_text() {
        return output.print_value(&camera);
    }
    if quiet {
        println!("{}", camera.id);
    } else {
        let facility = store.facility(camera.facility_id);
        let verb = if form.edit_id().is_some() { "Updated" } else { "Added" };
        println!(
            "{} camera\n{}",
            verb,
            views::cameras::render_detail(&camera, facility.as_ref())
        );
    }
    Ok(())
}

async fn delete(store: &AppStore, camera_id: Uuid, output: OutputFormat, quiet: bool) -> Result<()> {
    let camera = store
        .camera(camera_id)
        .ok_or_else(|| anyhow!("Camera not found: {}", camera_id))?;

    if let Err(e) = store.delete_camera(camera_id).await {
        bail!(views::store_error_message(&e, views::cameras::DELETE_FAILED));
    }

    if !output.is_text() {
        return output.print_value(&camera);
    }
    if !quiet {
        println!("Deleted camera {}", camera.name);
    }
    Ok(())
}

async fn status(store: &AppStore, camera_id: Uuid, output: OutputFormat) -> Result<()> {
    let camera = store
        .camera(camera_id)
        .ok_or_else(|| anyhow!("Camera not found: {}", camera_id))?;

    let report = match store.backend().check_status(camera_id).await {
        Ok(report) => report,
        Err(e) => bail!(views::store_error_message(
            &StoreError::from(e),
            views::stream::CHECK_FAILED
        )),
    };
    store.apply_status(camera_id, &report);

    if output.is_text() {
        println!("{}", views::cameras::render_status(&camera, &report));
        Ok(())
    } else {
        output.print_value(&report)
    }
}

async fn watch(
    store: &AppStore,
    camera_id: Uuid,
    interval: Duration,
    count: Option<u64>,
    output: OutputFormat,
) -> Result<()> {
    let camera = store
        .camera(camera_id)
        .ok_or_else(|| anyhow!("Camera not found: {}", camera_id))?;

    follow(store, camera_id, interval, count, |state| {
        if output.is_text() {
            println!("{}", views::cameras::render_poll(&camera, state));
            Ok(())
        } else {
            output.print_value(&serde_json::json!({
                "status": state.status,
                "error": state.error,
                "polls": state.polls,
            }))
        }
    })
    .await
}

async fn stream(
    store: &AppStore,
    camera_id: Uuid,
    interval: Duration,
    count: Option<u64>,
    output: OutputFormat,
) -> Result<()> {
    let camera = store
        .camera(camera_id)
        .ok_or_else(|| anyhow!("Camera not found: {}", camera_id))?;
    if !camera.status.is_active() {
        bail!(views::stream::NOT_ACTIVE);
    }
    let stream_url = store.backend().stream_url(camera_id);

    if output.is_text() {
        println!("{}", views::stream::render_header(&camera));
    }
    let mut shown: Option<StreamFrame> = None;
    follow(store, camera_id, interval, count, |state| {
        let frame = StreamFrame::from_poll(&stream_url, state);
        if shown.as_ref() == Some(&frame) {
            return Ok(());
        }
        if output.is_text() {
            println!("{}", views::stream::render_frame(&frame));
        } else {
            output.print_value(&serde_json::json!({
                "cameraId": camera_id,
                "streamUrl": stream_url,
                "frame": views::stream::render_frame(&frame),
            }))?;
        }
        shown = Some(frame);
        Ok(())
    })
    .await
}

/// Run a poller for `camera_id`, handing every completed poll to `on_poll`
async fn follow<F>(
    store: &AppStore,
    camera_id: Uuid,
    interval: Duration,
    count: Option<u64>,
    mut on_poll: F,
) -> Result<()>
where
    F: FnMut(&PollState) -> Result<()>,
{
    let mut handle = StatusPoller::spawn(Arc::clone(store.backend()), camera_id, interval);
    let mut seen = 0;

    let result = loop {
        let next = tokio::select! {
            state = handle.wait_for_polls(seen + 1) => state,
            _ = tokio::signal::ctrl_c() => {
                debug!(camera_id = %camera_id, "Interrupted");
                break Ok(());
            }
        };
        let Some(state) = next else {
            break Ok(());
        };
        seen = state.polls;

        if let Some(report) = &state.status {
            store.apply_status(camera_id, report);
        }
        if let Err(e) = on_poll(&state) {
            break Err(e);
        }
        if count.is_some_and(|limit| seen >= limit) {
            break Ok(());
        }
    };

    handle.stop().await;
    result
}
