//! CSV edge lists.
//!
//! **Expected CSV format:** `source, target, layer, kind`, with a header row.
//! `kind` is `intra` or `inter`; the column may be left empty or omitted, in
//! which case the edge is intra. Lines starting with `#` are skipped.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use mgrid_core::{EdgeKind, EdgeRecord, LayerId};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct EdgeRow {
    source: String,
    target: String,
    layer: usize,
    #[serde(default)]
    kind: Option<String>,
}

/// Read edge records from any CSV source.
pub fn read_edgelist<R: Read>(reader: R) -> Result<Vec<EdgeRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let mut records = Vec::new();
    for (row, result) in rdr.deserialize().enumerate() {
        let raw: EdgeRow =
            result.with_context(|| format!("parsing edge list record {}", row + 1))?;
        let kind = match raw.kind.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("intra") => EdgeKind::Intra,
            Some("inter") => EdgeKind::Inter,
            Some(other) => bail!(
                "edge list record {}: unknown edge kind '{other}' (expected intra or inter)",
                row + 1
            ),
        };
        records.push(EdgeRecord {
            source: raw.source,
            target: raw.target,
            layer: LayerId::new(raw.layer),
            kind,
        });
    }
    debug!(edges = records.len(), "read edge list");
    Ok(records)
}

/// Read edge records from a CSV file.
pub fn read_edgelist_path(path: &Path) -> Result<Vec<EdgeRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening edge list {}", path.display()))?;
    read_edgelist(file).with_context(|| format!("reading edge list {}", path.display()))
}
