//! Terminal output for locator results

use std::fmt::Write as _;

use application::{LocatorResult, PipelineEvent};
use domain::{BatteryLevel, EBike, MergedStation, Ranked};

/// Width of the station name column
const NAME_WIDTH: usize = 28;

/// Format a distance as whole meters below 1 km, tenths of kilometers above
///
/// Whole kilometers drop the decimal: `1km`, `1.2km`.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.0}m")
    } else {
        format!("{}km", (meters / 100.0).round() / 10.0)
    }
}

/// Bar glyph for one battery level
pub fn battery_glyph(level: BatteryLevel) -> char {
    match level.percentage() {
        None => '?',
        Some(p) if p >= 90.0 => '█',
        Some(p) if p >= 60.0 => '▆',
        Some(p) if p >= 30.0 => '▄',
        Some(_) => '▁',
    }
}

/// Glyph bar for the first `max_shown` ebikes, with a `+N` overflow marker
pub fn battery_bar(ebikes: &[EBike], max_shown: usize) -> String {
    let mut bar: String = ebikes
        .iter()
        .take(max_shown)
        .map(|e| battery_glyph(e.battery))
        .collect();
    if ebikes.len() > max_shown {
        let _ = write!(bar, " +{}", ebikes.len() - max_shown);
    }
    bar
}

/// One line per pipeline step, for progressive display
pub fn progress_line(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::LocationReady { location } => format!("Location: {location}"),
        PipelineEvent::CatalogReady { operator, stations } => {
            format!("{operator}: {stations} stations listed")
        },
        PipelineEvent::DetailsReady {
            operator,
            fetched,
            failed: 0,
        } => format!("{operator}: {fetched} nearby stations loaded"),
        PipelineEvent::DetailsReady {
            operator,
            fetched,
            failed,
        } => format!("{operator}: {fetched} nearby stations loaded, {failed} unavailable"),
        PipelineEvent::Reconciled { stations, merged } => {
            format!("{stations} stations ({merged} shared by both operators)")
        },
    }
}

/// Render the station table
///
/// With `details`, each row is followed by the shown ebikes and a maps link.
pub fn station_table(result: &LocatorResult, max_shown_ebikes: usize, details: bool) -> String {
    if result.stations.is_empty() {
        return format!("No stations found near {}\n", result.user_location);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<NAME_WIDTH$} {:>7} {:>5} {:>7}  Battery",
        "Station", "Dist", "Bikes", "E-Bikes"
    );
    for station in &result.stations {
        write_row(&mut out, station, max_shown_ebikes);
        if details {
            write_details(&mut out, &station.item, max_shown_ebikes);
        }
    }
    out
}

fn write_row(out: &mut String, station: &Ranked<MergedStation>, max_shown_ebikes: usize) {
    let item = &station.item;
    let _ = writeln!(
        out,
        "{:<NAME_WIDTH$} {:>7} {:>5} {:>7}  {}",
        truncate(&item.name, NAME_WIDTH),
        format_distance(station.distance_meters),
        item.bikes,
        item.ebike_count(),
        battery_bar(&item.ebikes, max_shown_ebikes),
    );
}

fn write_details(out: &mut String, station: &MergedStation, max_shown_ebikes: usize) {
    let shown: Vec<String> = station
        .ebikes
        .iter()
        .take(max_shown_ebikes)
        .map(|e| format!("{} ({})", e.name, e.battery))
        .collect();
    if !shown.is_empty() {
        let _ = writeln!(out, "    {}", shown.join("  "));
    }
    let _ = writeln!(out, "    {}", station.coordinate.maps_url());
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut short: String = name.chars().take(width - 1).collect();
    short.push('…');
    short
}
