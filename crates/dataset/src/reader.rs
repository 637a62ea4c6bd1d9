use crate::error::DatasetError;
use crate::locale::NumberFormat;
use configuration::{ColumnNames, MalformedRowPolicy, SourceSettings};
use core_types::Product;
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// The products read from a source plus the rows that had to be skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadOutcome {
    pub products: Vec<Product>,
    pub skipped: Vec<RowIssue>,
}

/// A data row that could not be turned into a `Product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// 1-based line number in the source, header included.
    pub line: u64,
    pub column: String,
    pub value: String,
}

impl From<RowIssue> for DatasetError {
    fn from(issue: RowIssue) -> Self {
        DatasetError::MalformedRow {
            line: issue.line,
            column: issue.column,
            value: issue.value,
        }
    }
}

/// Loads the product table from a file.
///
/// A missing file is reported as `DatasetError::SourceNotFound` so callers
/// can present it as a recoverable condition.
pub fn load_products(path: &Path, source: &SourceSettings) -> Result<LoadOutcome, DatasetError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DatasetError::SourceNotFound(path.to_path_buf()),
        _ => DatasetError::Io(e),
    })?;

    let outcome = read_products(file, source)?;
    info!(
        path = %path.display(),
        products = outcome.products.len(),
        skipped = outcome.skipped.len(),
        "Dataset loaded."
    );
    Ok(outcome)
}

/// Reads products from any delimited-text reader.
pub fn read_products<R: Read>(reader: R, source: &SourceSettings) -> Result<LoadOutcome, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(source.delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let layout = ColumnLayout::locate(csv_reader.headers()?, &source.columns)?;
    let format = NumberFormat::from_settings(source);

    let mut outcome = LoadOutcome::default();
    for result in csv_reader.records() {
        let record = result?;
        match layout.parse(&record, &format) {
            Ok(product) => outcome.products.push(product),
            Err(issue) => match source.on_malformed {
                MalformedRowPolicy::Fail => return Err(issue.into()),
                MalformedRowPolicy::Skip => {
                    warn!(
                        line = issue.line,
                        column = %issue.column,
                        value = %issue.value,
                        "Skipping malformed row."
                    );
                    outcome.skipped.push(issue);
                }
            },
        }
    }

    debug!(
        products = outcome.products.len(),
        skipped = outcome.skipped.len(),
        "Rows parsed."
    );
    Ok(outcome)
}

/// Positions of the required columns in the header row.
struct ColumnLayout<'a> {
    names: &'a ColumnNames,
    description: usize,
    cost: usize,
    price: usize,
    profit: usize,
    margin: usize,
}

impl<'a> ColumnLayout<'a> {
    fn locate(headers: &StringRecord, names: &'a ColumnNames) -> Result<Self, DatasetError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            names,
            description: find(names.description.as_str())?,
            cost: find(names.cost.as_str())?,
            price: find(names.price.as_str())?,
            profit: find(names.profit.as_str())?,
            margin: find(names.margin.as_str())?,
        })
    }

    fn parse(&self, record: &StringRecord, format: &NumberFormat) -> Result<Product, RowIssue> {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let number = |idx: usize, column: &str| -> Result<Decimal, RowIssue> {
            let raw = record.get(idx).unwrap_or_default();
            format.parse(raw).ok_or_else(|| RowIssue {
                line,
                column: column.to_string(),
                value: raw.to_string(),
            })
        };

        Ok(Product {
            description: record
                .get(self.description)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            cost: number(self.cost, self.names.cost.as_str())?,
            price: number(self.price, self.names.price.as_str())?,
            profit: number(self.profit, self.names.profit.as_str())?,
            margin_pct: number(self.margin, self.names.margin.as_str())?,
        })
    }
}
