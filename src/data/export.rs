use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::filter::FilteredView;

/// Default file name offered in the save dialog.
pub const EXPORT_FILE_NAME: &str = "filtered_workation_cities.csv";
/// MIME type of the exported file.
pub const EXPORT_MIME: &str = "text/csv";

/// Serialize the view (raw and derived columns) as UTF-8 CSV with a header.
pub fn write_csv<W: Write>(view: &FilteredView, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for city in view.rows() {
        writer
            .serialize(city)
            .with_context(|| format!("serializing {}", city.city))?;
    }
    // An empty view still gets its header row.
    if view.is_empty() {
        writer.write_record(EXPORT_HEADER)?;
    }
    writer.flush().context("flushing CSV writer")?;
    Ok(())
}

/// The view as CSV bytes.
pub fn to_csv_bytes(view: &FilteredView) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(buf)
}

/// Write the view to `path`, replacing any existing file.
pub fn export_to_path(view: &FilteredView, path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(view)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} cities to {}", view.len(), path.display());
    Ok(())
}

/// Column order of [`crate::data::model::CityRecord`] as serialized.
const EXPORT_HEADER: [&str; 18] = [
    "Country",
    "City",
    "WiFi Speed",
    "Rent",
    "Sunshine Hours",
    "Coworking Spaces",
    "Instagram Photos",
    "Things To Do",
    "Meal Price",
    "Coffee Price",
    "Beer Price",
    "Taxi Price",
    "Sunshine per Day",
    "Workation Score",
    "Total Cost",
    "Rent_inv",
    "Composite Score",
    "Continent",
];
