use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use tracing::{debug, info, warn};

use super::enrich::{enrich, LoadOptions};
use super::{EnrichedCatalog, RawGame};
use crate::error::CatalogError;

/// Header Steam exports place over the two data fields `Discount` and `DLC count`.
/// Every column after it in such an export is shifted one field to the right.
pub const MERGED_DISCOUNT_DLC_HEADER: &str = "DiscountDLC count";

const COL_APP_ID: &str = "AppID";
const COL_NAME: &str = "Name";
const COL_RELEASE_DATE: &str = "Release date";
const COL_PRICE: &str = "Price";
const COL_GENRES: &str = "Genres";
const COL_POSITIVE: &str = "Positive";
const COL_NEGATIVE: &str = "Negative";
const COL_PUBLISHERS: &str = "Publishers";

/// Data-field positions of the columns the enricher reads. Every other column
/// (discount, DLC count, "About the game", movies, ...) is never decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub app_id: usize,
    pub name: usize,
    pub release_date: usize,
    pub price: usize,
    pub genres: usize,
    pub positive: usize,
    pub negative: usize,
    pub publishers: usize,
    /// Whether a merged discount/DLC header shifted later columns.
    pub shifted: bool,
}

impl ColumnMap {
    /// Resolve column positions from a header row.
    ///
    /// When the merged `DiscountDLC count` header is present, columns named
    /// after it live one field further right in the data rows.
    pub fn resolve(headers: &ByteRecord) -> Result<Self, CatalogError> {
        if headers.is_empty() {
            return Err(CatalogError::EmptyHeader);
        }
        let names: Vec<String> = headers
            .iter()
            .map(|h| {
                String::from_utf8_lossy(h)
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .to_string()
            })
            .collect();
        let merged_at = names.iter().position(|h| h == MERGED_DISCOUNT_DLC_HEADER);

        let find = |name: &'static str| -> Result<usize, CatalogError> {
            let idx = names
                .iter()
                .position(|h| h == name)
                .ok_or(CatalogError::MissingColumn(name))?;
            Ok(match merged_at {
                Some(m) if idx > m => idx + 1,
                _ => idx,
            })
        };

        Ok(Self {
            app_id: find(COL_APP_ID)?,
            name: find(COL_NAME)?,
            release_date: find(COL_RELEASE_DATE)?,
            price: find(COL_PRICE)?,
            genres: find(COL_GENRES)?,
            positive: find(COL_POSITIVE)?,
            negative: find(COL_NEGATIVE)?,
            publishers: find(COL_PUBLISHERS)?,
            shifted: merged_at.is_some(),
        })
    }
}

/// Load and enrich a catalog export from disk.
pub fn load_catalog(path: &Path, opts: &LoadOptions) -> Result<EnrichedCatalog, CatalogError> {
    let file = File::open(path).map_err(|e| CatalogError::io(path, e))?;
    info!(target = "catalog", path = %path.display(), "loading catalog export");
    load_catalog_from_reader(BufReader::with_capacity(1 << 20, file), opts)
}

/// Load and enrich a catalog export from any CSV byte stream.
///
/// Rows are read as raw bytes; only the columns in [`ColumnMap`] are decoded,
/// so stray non-UTF-8 bytes elsewhere in a row cannot fail the load.
pub fn load_catalog_from_reader<R: Read>(
    reader: R,
    opts: &LoadOptions,
) -> Result<EnrichedCatalog, CatalogError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let headers = rdr.byte_headers()?.clone();
    let columns = ColumnMap::resolve(&headers)?;
    if columns.shifted {
        info!(
            target = "catalog",
            "merged {MERGED_DISCOUNT_DLC_HEADER:?} header detected; realigning later columns"
        );
    }

    let mut raws: Vec<RawGame> = Vec::new();
    let mut bad_ids = 0usize;
    let mut lossy_cells = 0usize;
    let mut rec = ByteRecord::new();
    while rdr.read_byte_record(&mut rec)? {
        let mut row = RowReader {
            rec: &rec,
            lossy_cells: 0,
        };
        match row.parse(&columns) {
            Some(raw) => raws.push(raw),
            None => {
                bad_ids += 1;
                debug!(
                    target = "catalog",
                    line = ?rec.position().map(|p| p.line()),
                    "row skipped: AppID missing or not an integer"
                );
            }
        }
        lossy_cells += row.lossy_cells;
    }
    if bad_ids > 0 {
        warn!(target = "catalog", count = bad_ids, "rows without a usable AppID skipped");
    }
    if lossy_cells > 0 {
        warn!(
            target = "catalog",
            count = lossy_cells,
            "text cells with invalid UTF-8 decoded lossily"
        );
    }

    let mut catalog = enrich(raws, opts);
    catalog.stats.rows_read += bad_ids;
    catalog.stats.dropped_bad_app_id = bad_ids;
    catalog.stats.lossy_text_cells = lossy_cells;
    Ok(catalog)
}

/// Decodes the fields of one record, counting text cells that needed lossy decoding.
struct RowReader<'r> {
    rec: &'r ByteRecord,
    lossy_cells: usize,
}

impl<'r> RowReader<'r> {
    fn bytes(&self, idx: usize) -> Option<&'r [u8]> {
        self.rec.get(idx).map(|b| b.trim_ascii()).filter(|b| !b.is_empty())
    }

    /// Strict UTF-8; numeric cells with bad bytes are treated as unparseable.
    fn str(&self, idx: usize) -> Option<&'r str> {
        self.bytes(idx).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Lossy UTF-8 for free text, so a stray Latin-1 byte keeps the rest of the cell.
    fn text(&mut self, idx: usize) -> Option<String> {
        let b = self.bytes(idx)?;
        let decoded = String::from_utf8_lossy(b);
        if matches!(decoded, Cow::Owned(_)) {
            self.lossy_cells += 1;
        }
        Some(decoded.trim().to_string()).filter(|s| !s.is_empty())
    }

    fn count(&self, idx: usize) -> u64 {
        self.str(idx)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
            .unwrap_or(0)
    }

    fn price(&self, idx: usize) -> f64 {
        self.str(idx)
            .map(|s| s.trim_start_matches('$'))
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0)
    }

    /// Project the record onto [`RawGame`]. `None` when the AppID is unusable.
    fn parse(&mut self, columns: &ColumnMap) -> Option<RawGame> {
        let app_id = self.str(columns.app_id)?.parse::<u64>().ok()?;
        Some(RawGame {
            app_id,
            name: self.text(columns.name).unwrap_or_default(),
            release_date: self.text(columns.release_date),
            price: self.price(columns.price),
            genres: self.text(columns.genres),
            positive: self.count(columns.positive),
            negative: self.count(columns.negative),
            publishers: self.text(columns.publishers),
        })
    }
}
