use pocmap_types::{GroupKind, TargetGroups, TargetRecord};
use tracing::debug;

/// Minimum populated columns for a row to be considered.
const MIN_COLUMNS: usize = 3;

/// Turn raw table rows into target records.
///
/// The first row is a header. A row counts its populated columns up to the
/// last non-blank cell; rows with fewer than three are skipped, as are rows
/// whose URL is blank.
pub fn parse_rows(rows: &[Vec<String>]) -> Vec<TargetRecord> {
    let mut records = Vec::new();
    for (index, row) in rows.iter().enumerate().skip(1) {
        let populated = row
            .iter()
            .rposition(|cell| !cell.trim().is_empty())
            .map_or(0, |last| last + 1);
        if populated < MIN_COLUMNS {
            debug!(row = index + 1, populated, "skipping short row");
            continue;
        }
        let record = TargetRecord::from_cells(&row[0], &row[1], &row[2]);
        if record.url.is_empty() {
            continue;
        }
        records.push(record);
    }
    records
}

/// Split records into the CMS and server groupings.
pub fn group_records(records: &[TargetRecord]) -> (TargetGroups, TargetGroups) {
    let mut cms = TargetGroups::new(GroupKind::Cms);
    let mut server = TargetGroups::new(GroupKind::Server);
    for record in records {
        if let Some(fp) = record.label(GroupKind::Cms) {
            cms.push(fp, record.url.clone());
        }
        if let Some(fp) = record.label(GroupKind::Server) {
            server.push(fp, record.url.clone());
        }
    }
    (cms, server)
}

/// [`parse_rows`] followed by [`group_records`].
pub fn group_rows(rows: &[Vec<String>]) -> (TargetGroups, TargetGroups) {
    group_records(&parse_rows(rows))
}
