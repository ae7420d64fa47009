//! Level data records
//!
//! Level data is a list of comma separated records. Lane declarations come
//! first (`Lane,Left,192`), followed by notes for a declared lane type
//! (`Left,Hold,360`). Records for unknown lanes or note kinds are skipped;
//! missing fields or bad numbers fail the whole load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::lane::LaneKind;
use super::note::NoteSpec;
use crate::error::LoadError;

/// `Lane,<type>,<x>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneDecl {
    pub kind: LaneKind,
    pub x: i32,
}

/// `<laneType>,<noteKind>,<appearanceFrame>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDecl {
    pub lane: LaneKind,
    pub spec: NoteSpec,
    pub frame: u64,
}

/// Parsed level data, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub lanes: Vec<LaneDecl>,
    pub notes: Vec<NoteDecl>,
}

impl Chart {
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let mut chart = Chart::default();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let missing = || {
                LoadError::malformed(
                    line_no,
                    format!("expected 3 fields, found {}", fields.len()),
                )
            };
            let head = fields.first().copied().unwrap_or_default();

            if head == "Lane" {
                let &[_, kind, number, ..] = fields.as_slice() else {
                    return Err(missing());
                };
                let x = number.parse::<i32>().map_err(|e| {
                    LoadError::malformed(line_no, format!("bad lane position '{number}': {e}"))
                })?;
                match LaneKind::from_name(kind) {
                    Some(kind) => chart.lanes.push(LaneDecl { kind, x }),
                    None => log::debug!("Line {line_no}: skipping unknown lane type '{kind}'"),
                }
                continue;
            }

            let Some(lane) = LaneKind::from_name(head).filter(|k| chart.has_lane(*k)) else {
                log::debug!("Line {line_no}: skipping note for undeclared lane '{head}'");
                continue;
            };
            let &kind = fields.get(1).ok_or_else(missing)?;
            let Some(spec) = NoteSpec::from_name(kind) else {
                log::debug!("Line {line_no}: skipping unknown note kind '{kind}'");
                continue;
            };
            let &number = fields.get(2).ok_or_else(missing)?;
            let frame = number.parse::<u64>().map_err(|e| {
                LoadError::malformed(line_no, format!("bad appearance frame '{number}': {e}"))
            })?;
            chart.notes.push(NoteDecl { lane, spec, frame });
        }

        Ok(chart)
    }

    pub fn has_lane(&self, kind: LaneKind) -> bool {
        self.lanes.iter().any(|decl| decl.kind == kind)
    }
}

/// Read and parse a level data file
pub fn load_chart(path: &Path) -> Result<Chart, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let chart = Chart::parse(&text)?;
    log::info!(
        "Loaded {}: {} lanes, {} notes",
        path.display(),
        chart.lanes.len(),
        chart.notes.len()
    );
    Ok(chart)
}
