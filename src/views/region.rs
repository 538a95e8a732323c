use crate::airports::ReferenceTable;
use crate::dataset::AirportDirectoryEntry;
use crate::views::types::RegionFilter;

/// Narrows the airport directory to one region.
///
/// [`RegionFilter::All`] returns every entry in order. A named region keeps
/// only entries whose reference-table region matches exactly, so airports
/// missing from the table never appear in a regional list.
pub fn filter_by_region<'a>(
    directory: &'a [AirportDirectoryEntry],
    table: &ReferenceTable,
    region: &RegionFilter,
) -> Vec<&'a AirportDirectoryEntry> {
    match region {
        RegionFilter::All => directory.iter().collect(),
        RegionFilter::Region(wanted) => directory
            .iter()
            .filter(|entry| table.region_of(&entry.code) == Some(wanted.as_str()))
            .collect(),
    }
}
