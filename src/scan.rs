//! Table scanning: drive a row source through a layout configuration and
//! emit one feature descriptor per column.
//!
//! The scanner owns the narrowing loop: it positions the cursor at the
//! configured header and data rows, establishes the column count from the
//! first data row, intersects per-column masks across every scanned row, and
//! finally applies the default kind/scale selection. Any shape or
//! configuration violation aborts the scan with no partial result.

use anyhow::{Context, Result, bail};
use log::debug;

use crate::{
    descriptor::ColumnFeatureDescriptor,
    error::{ConfigError, ShapeError},
    infer,
    kind::TypeMask,
    rows::{RawRow, RowSource},
};

pub const DEFAULT_NAME_PREFIX: &str = "column";

/// File-layout configuration for one scan. Row positions are zero-based
/// indexes into the raw row sequence.
#[derive(Debug, Clone)]
pub struct ScanLayout {
    /// Row providing column names; `None` means the table is headerless and
    /// names are synthesized.
    pub header_row: Option<usize>,
    /// Row where data begins; defaults to the row after the header, or the
    /// first row of a headerless table.
    pub data_start_row: Option<usize>,
    /// Cap on the number of data rows scanned; `None` scans to exhaustion.
    pub max_rows: Option<usize>,
    /// Prefix for synthesized names: `prefix1, prefix2, ...`.
    pub name_prefix: String,
}

impl Default for ScanLayout {
    fn default() -> Self {
        Self {
            header_row: Some(0),
            data_start_row: None,
            max_rows: None,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

impl ScanLayout {
    pub fn headerless() -> Self {
        Self {
            header_row: None,
            ..Self::default()
        }
    }

    pub fn with_header(row: usize) -> Self {
        Self {
            header_row: Some(row),
            ..Self::default()
        }
    }

    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    pub fn data_start(mut self, row: usize) -> Self {
        self.data_start_row = Some(row);
        self
    }

    pub fn max_rows(mut self, cap: Option<usize>) -> Self {
        self.max_rows = cap;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let (Some(header), Some(data_start)) = (self.header_row, self.data_start_row)
            && data_start <= header
        {
            return Err(ConfigError::DataStartNotAfterHeader { header, data_start });
        }
        Ok(())
    }

    fn resolved_data_start(&self) -> usize {
        match (self.header_row, self.data_start_row) {
            (_, Some(start)) => start,
            (Some(header), None) => header + 1,
            (None, None) => 0,
        }
    }
}

/// Scan `source` to exhaustion (or the layout's row cap) and produce one
/// descriptor per column. The source is consumed, so it is dropped on every
/// exit path.
pub fn scan_columns<S: RowSource>(
    mut source: S,
    layout: &ScanLayout,
) -> Result<Vec<ColumnFeatureDescriptor>> {
    layout.validate()?;
    let mut cursor = RowCursor::new(&mut source);

    let header = match layout.header_row {
        Some(position) => {
            if !cursor.skip_to(position)? {
                bail!(ConfigError::NoColumns);
            }
            match cursor.advance()? {
                Some(row) => Some(named_cells(&row, &layout.name_prefix)),
                None => bail!(ConfigError::NoColumns),
            }
        }
        None => None,
    };

    let reached_data = cursor.skip_to(layout.resolved_data_start())?;
    let first = if reached_data { cursor.advance()? } else { None };
    let Some(first) = first else {
        // A named but empty table keeps every column unconstrained; with no
        // header either, there is nothing to describe.
        return match header {
            Some(names) => {
                debug!("no data rows; emitting {} unconstrained column(s)", names.len());
                let masks = vec![TypeMask::ALL; names.len()];
                Ok(build_descriptors(names, masks))
            }
            None => bail!(ConfigError::NoColumns),
        };
    };

    let width = first.len();
    let names = match header {
        Some(names) => pair_header(names, width)
            .with_context(|| format!("row {}", cursor.position()))?,
        None => (1..=width)
            .map(|idx| format!("{}{}", layout.name_prefix, idx))
            .collect(),
    };

    let mut masks = infer::narrow_row(&first, &vec![TypeMask::ALL; width])
        .with_context(|| format!("row {}", cursor.position()))?;
    let mut scanned = 1usize;

    while !layout.max_rows.is_some_and(|cap| scanned >= cap) {
        let Some(row) = cursor.advance()? else { break };
        if row.len() != width {
            return Err(ShapeError::RowWidth {
                expected: width,
                found: row.len(),
            })
            .with_context(|| format!("row {}", cursor.position()));
        }
        masks = infer::narrow_row(&row, &masks)
            .with_context(|| format!("row {}", cursor.position()))?;
        scanned += 1;
    }

    debug!("scanned {scanned} data row(s) across {width} column(s)");
    Ok(build_descriptors(names, masks))
}

struct RowCursor<'a, S: RowSource> {
    source: &'a mut S,
    consumed: usize,
}

impl<'a, S: RowSource> RowCursor<'a, S> {
    fn new(source: &'a mut S) -> Self {
        Self { source, consumed: 0 }
    }

    fn advance(&mut self) -> Result<Option<RawRow>> {
        let row = self
            .source
            .next_row()
            .with_context(|| format!("Reading row {}", self.consumed + 1))?;
        if row.is_some() {
            self.consumed += 1;
        }
        Ok(row)
    }

    /// Consume rows until `target` rows have gone by. Returns false when the
    /// source runs dry first.
    fn skip_to(&mut self, target: usize) -> Result<bool> {
        while self.consumed < target {
            if self.advance()?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// One-based number of the most recently consumed row.
    fn position(&self) -> usize {
        self.consumed
    }
}

fn named_cells(row: &RawRow, prefix: &str) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(idx, cell)| {
            cell.clone()
                .unwrap_or_else(|| format!("{}{}", prefix, idx + 1))
        })
        .collect()
}

/// Pair header names with data columns. A header exactly one cell wider than
/// the data carries a leading row-header label, which is dropped.
fn pair_header(mut names: Vec<String>, width: usize) -> Result<Vec<String>, ShapeError> {
    if names.len() == width + 1 {
        names.remove(0);
        Ok(names)
    } else if names.len() == width {
        Ok(names)
    } else {
        Err(ShapeError::HeaderWidth {
            headers: names.len(),
            columns: width,
        })
    }
}

fn build_descriptors(names: Vec<String>, masks: Vec<TypeMask>) -> Vec<ColumnFeatureDescriptor> {
    names
        .into_iter()
        .zip(masks)
        .map(|(name, mask)| ColumnFeatureDescriptor::from_mask(name, mask))
        .collect()
}
