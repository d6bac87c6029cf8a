// Facility management commands
//
// Facilities live only in the local store; nothing here calls the backend.

use crate::output::OutputFormat;
use crate::views;
use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use sitewatch_core::{AppStore, FacilityDraft, FacilityForm};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum FacilitiesCommand {
    /// List all facilities
    List,

    /// Register a new facility
    Add {
        /// Facility name
        #[arg(long)]
        name: String,

        /// Street address
        #[arg(long)]
        address: String,
    },

    /// Edit a facility; omitted fields keep their value
    Edit {
        /// Facility ID
        facility_id: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },

    /// Delete a facility and all of its cameras
    Delete {
        /// Facility ID
        facility_id: Uuid,
    },
}

pub fn run(
    command: FacilitiesCommand,
    store: &AppStore,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        FacilitiesCommand::List => list(store, output),
        FacilitiesCommand::Add { name, address } => {
            submit(store, FacilityForm::create(), FacilityDraft::new(name, address), output, quiet)
        }
        FacilitiesCommand::Edit {
            facility_id,
            name,
            address,
        } => {
            let existing = store
                .facility(facility_id)
                .ok_or_else(|| anyhow!("Facility not found: {}", facility_id))?;
            let mut draft = FacilityDraft::from_facility(&existing);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(address) = address {
                draft.address = address;
            }
            submit(store, FacilityForm::edit(facility_id), draft, output, quiet)
        }
        FacilitiesCommand::Delete { facility_id } => delete(store, facility_id, output, quiet),
    }
}

fn list(store: &AppStore, output: OutputFormat) -> Result<()> {
    let facilities = store.facilities();
    if output.is_text() {
        println!("{}", views::facilities::render(&facilities));
        Ok(())
    } else {
        output.print_value(&facilities)
    }
}

fn submit(
    store: &AppStore,
    form: FacilityForm,
    draft: FacilityDraft,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let facility = match form.submit(store, &draft) {
        Ok(facility) => facility,
        Err(e) => bail!(
            "Facility could not be saved:\n{}",
            views::form_error_message(&e, "An unexpected error occurred")
        ),
    };

    if !output.is_text() {
        return output.print_value(&facility);
    }
    if quiet {
        println!("{}", facility.id);
    } else {
        let verb = if form.edit_id().is_some() { "Updated" } else { "Created" };
        println!("{} facility\n{}", verb, views::facilities::render_detail(&facility));
    }
    Ok(())
}

fn delete(store: &AppStore, facility_id: Uuid, output: OutputFormat, quiet: bool) -> Result<()> {
    let Some(removal) = store.delete_facility(facility_id) else {
        bail!("Facility not found: {}", facility_id);
    };

    if !output.is_text() {
        return output.print_value(&serde_json::json!({
            "facility": removal.facility,
            "removedCameras": removal.cameras.iter().map(|c| c.id).collect::<Vec<_>>(),
        }));
    }
    if !quiet {
        println!("{}", views::facilities::render_removal(&removal));
    }
    Ok(())
}
