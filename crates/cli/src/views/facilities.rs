// Facilities view: list with creation dates

use sitewatch_core::{Facility, FacilityRemoval};

use crate::output::{field, table};
use crate::views::DATE_FORMAT;

pub const EMPTY: &str = "No facilities yet. Add one with `sitewatch facilities add`.";

pub fn render(facilities: &[Facility]) -> String {
    if facilities.is_empty() {
        return EMPTY.to_string();
    }
    let rows: Vec<Vec<String>> = facilities
        .iter()
        .map(|f| {
            vec![
                f.id.to_string(),
                f.name.clone(),
                f.address.clone(),
                f.created_at.format(DATE_FORMAT).to_string(),
            ]
        })
        .collect();
    table(
        &[("ID", 36), ("NAME", 24), ("ADDRESS", 32), ("ADDED", 10)],
        &rows,
    )
}

pub fn render_detail(facility: &Facility) -> String {
    [
        field("ID", &facility.id.to_string()),
        field("Name", &facility.name),
        field("Address", &facility.address),
        field("Added", &facility.created_at.format(DATE_FORMAT).to_string()),
    ]
    .join("\n")
}

pub fn render_removal(removal: &FacilityRemoval) -> String {
    match removal.cameras.len() {
        0 => format!("Deleted facility {}", removal.facility.name),
        1 => format!(
            "Deleted facility {} and its 1 camera",
            removal.facility.name
        ),
        n => format!(
            "Deleted facility {} and its {} cameras",
            removal.facility.name, n
        ),
    }
}
