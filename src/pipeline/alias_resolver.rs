use metrics::counter;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::constants::{NEIGHBORHOOD_COLUMN, NOT_AVAILABLE, SOURCE_CHUNK_SIZE};
use crate::error::Result;
use crate::normalize::NameIndex;
use crate::types::{Context, Neighborhood};

/// Outcome of scanning one source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveReport {
    pub source: String,
    pub rows_read: usize,
    pub assigned: usize,
    /// Every unmatched value in row order, duplicates included.
    pub missing: Vec<String>,
    pub stopped_early: bool,
}

impl ResolveReport {
    /// Distinct unmatched values, first occurrence order.
    pub fn distinct_missing(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.missing
            .iter()
            .map(String::as_str)
            .filter(|v| seen.insert(*v))
            .collect()
    }
}

/// Fills in aliases from one tab-delimited source file and hands the context on.
pub fn resolve(source_path: &Path, mut ctx: Context) -> Result<Context> {
    resolve_with_report(source_path, &mut ctx)?;
    Ok(ctx)
}

#[instrument(skip(ctx), fields(source = %source_path.display()))]
pub fn resolve_with_report(source_path: &Path, ctx: &mut Context) -> Result<ResolveReport> {
    let file = File::open(source_path)?;
    let source = source_path.display().to_string();
    let report = resolve_from_reader(file, &source, &mut ctx.neighborhoods)?;

    let distinct = report.distinct_missing();
    info!(
        "Values of {} from {} missing match.",
        distinct.join(", "),
        source
    );
    info!(
        "Set neighborhood aliases from {} ({} assigned, {} rows read{})",
        source,
        report.assigned,
        report.rows_read,
        if report.stopped_early { ", stopped early" } else { "" }
    );
    Ok(report)
}

/// End of the chunk holding byte offset `pos`. Chunks are aligned to the
/// start of the file.
fn chunk_end(pos: u64) -> u64 {
    pos.div_ceil(SOURCE_CHUNK_SIZE) * SOURCE_CHUNK_SIZE
}

/// Scans `reader` for `NEIGHBORHOOD` values. Aliases are only ever added,
/// never replaced.
///
/// The file is treated as arriving in `SOURCE_CHUNK_SIZE` chunks. Once every
/// neighborhood has an alias no further chunk is taken, but rows that end
/// inside the chunk already taken are still checked, so their unmatched
/// values are reported.
pub fn resolve_from_reader<R: Read>(
    reader: R,
    source: &str,
    neighborhoods: &mut [Neighborhood],
) -> Result<ResolveReport> {
    let mut report = ResolveReport {
        source: source.to_string(),
        ..ResolveReport::default()
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quote(b'"')
        .double_quote(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_reader(reader);

    let column = match rdr
        .byte_headers()?
        .iter()
        .position(|h| trim_cr(h) == NEIGHBORHOOD_COLUMN.as_bytes())
    {
        Some(c) => c,
        None => {
            warn!("{} has no {} column", source, NEIGHBORHOOD_COLUMN);
            return Ok(report);
        }
    };

    let index = NameIndex::build(neighborhoods);
    let mut record = csv::ByteRecord::new();
    let mut taken_until: Option<u64> = None;

    while rdr.read_byte_record(&mut record)? {
        // position() now points just past this row
        let row_end = rdr.position().byte();
        if taken_until.is_some_and(|limit| row_end > limit) {
            break;
        }
        report.rows_read += 1;

        let value = match record.get(column) {
            Some(raw) => String::from_utf8_lossy(trim_cr(raw)).into_owned(),
            None => continue,
        };
        if value.is_empty() || value == NOT_AVAILABLE {
            continue;
        }

        match index.lookup(&value) {
            Some(pos) => {
                if neighborhoods[pos].assign_alias(&value) {
                    debug!("{} -> {}", neighborhoods[pos].name, value);
                    report.assigned += 1;
                    counter!("aliases_assigned_total", "source" => source.to_string())
                        .increment(1);

                    if neighborhoods.iter().all(Neighborhood::has_alias) {
                        report.stopped_early = true;
                        taken_until = Some(chunk_end(row_end));
                    }
                }
            }
            None => {
                counter!("alias_rows_missing_total", "source" => source.to_string())
                    .increment(1);
                report.missing.push(value);
            }
        }
    }

    Ok(report)
}

/// The terminator is `\n` only, so CRLF files leave a `\r` on the last field.
fn trim_cr(field: &[u8]) -> &[u8] {
    field.strip_suffix(b"\r").unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoods(names: &[&str]) -> Vec<Neighborhood> {
        names.iter().map(|n| Neighborhood::new(*n)).collect()
    }

    #[test]
    fn skips_blank_and_na_values() {
        let mut n = hoods(&["Midtown", "East End"]);
        let data = "CASE\tNEIGHBORHOOD\n1\t\n2\tNA\n3\tMIDTOWN\n4\tUnknown Place\n4\tUnknown Place\n";
        let report = resolve_from_reader(data.as_bytes(), "t", &mut n).unwrap();

        assert_eq!(n[0].alias.as_deref(), Some("MIDTOWN"));
        assert_eq!(n[1].alias, None);
        assert_eq!(report.missing, vec!["Unknown Place", "Unknown Place"]);
        assert_eq!(report.distinct_missing(), vec!["Unknown Place"]);
        assert!(!report.stopped_early);
    }

    #[test]
    fn first_match_wins_and_is_not_counted_missing_again() {
        let mut n = hoods(&["Midtown", "East End"]);
        let data = "NEIGHBORHOOD\nMid-Town\nMIDTOWN\nmidtown\n";
        let report = resolve_from_reader(data.as_bytes(), "t", &mut n).unwrap();
        assert_eq!(n[0].alias.as_deref(), Some("Mid-Town"));
        assert_eq!(report.assigned, 1);
        assert!(report.missing.is_empty());
        assert_eq!(report.rows_read, 3);
    }

    #[test]
    fn rows_in_the_taken_chunk_still_count_as_missing() {
        let mut n = hoods(&["Midtown", "East End"]);
        let data = "NEIGHBORHOOD\nMIDTOWN\n\nNA\nEast-End\nUnknown Place\nmid-town\n";
        let report = resolve_from_reader(data.as_bytes(), "t", &mut n).unwrap();
        assert!(report.stopped_early);
        assert_eq!(n[0].alias.as_deref(), Some("MIDTOWN"));
        assert_eq!(n[1].alias.as_deref(), Some("East-End"));
        assert_eq!(report.distinct_missing(), vec!["Unknown Place"]);
    }

    #[test]
    fn later_chunks_are_not_read_after_completion() {
        let mut n = hoods(&["Midtown", "East End"]);
        let mut data = String::from("NEIGHBORHOOD\nmidtown\nEAST END\n");
        let filler_rows = 20_000;
        for _ in 0..filler_rows {
            data.push_str("Filler\n");
        }
        // would replace the alias if aliases were not set-once
        data.push_str("MID TOWN\n");
        assert!(data.len() as u64 > 2 * SOURCE_CHUNK_SIZE);

        let report = resolve_from_reader(data.as_bytes(), "t", &mut n).unwrap();
        assert!(report.stopped_early);
        assert_eq!(n[0].alias.as_deref(), Some("midtown"));
        assert!(report.rows_read > 2);
        assert!(report.rows_read < filler_rows + 3);
        assert!(report.missing.iter().all(|v| v == "Filler"));
        assert!((report.missing.len() as u64) * 7 <= SOURCE_CHUNK_SIZE);
    }

    #[test]
    fn chunk_end_rounds_up_to_boundary() {
        assert_eq!(chunk_end(1), SOURCE_CHUNK_SIZE);
        assert_eq!(chunk_end(SOURCE_CHUNK_SIZE), SOURCE_CHUNK_SIZE);
        assert_eq!(chunk_end(SOURCE_CHUNK_SIZE + 1), 2 * SOURCE_CHUNK_SIZE);
    }

    #[test]
    fn quoted_fields_and_crlf() {
        let mut n = hoods(&["Greater Heights"]);
        let data = "ID\tNEIGHBORHOOD\r\n1\t\"GREATER HEIGHTS\"\r\n";
        resolve_from_reader(data.as_bytes(), "t", &mut n).unwrap();
        assert_eq!(n[0].alias.as_deref(), Some("GREATER HEIGHTS"));
    }

    #[test]
    fn missing_column_matches_nothing() {
        let mut n = hoods(&["Midtown"]);
        let data = "ID\tAREA\n1\tMIDTOWN\n";
        let report = resolve_from_reader(data.as_bytes(), "t", &mut n).unwrap();
        assert_eq!(report.rows_read, 0);
        assert_eq!(n[0].alias, None);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let mut n = hoods(&["Midtown"]);
        let data = "ID\tX\tNEIGHBORHOOD\n1\n2\ta\tMidtown\n";
        resolve_from_reader(data.as_bytes(), "t", &mut n).unwrap();
        assert_eq!(n[0].alias.as_deref(), Some("Midtown"));
    }
}
