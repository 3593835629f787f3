//! One row of an AmeriFlux station file.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;

use super::{Derived, Reading};

pub const TIMESTAMP_START: &str = "TIMESTAMP_START";
pub const TIMESTAMP_END: &str = "TIMESTAMP_END";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";
const DELIMITER: char = ',';

/// Where a requested variable's value comes from.
#[derive(Debug, Clone, PartialEq)]
struct Source {
    column: Option<usize>,
    /// Fallback when the column is absent or holds a missing value.
    derived: Option<(Derived, Vec<usize>)>,
}

/// Column positions of the timestamps and the requested variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    timestamp_start: usize,
    timestamp_end: usize,
    variables: Vec<Source>,
    missing_value: f64,
}

impl Header {
    /// Locates the columns in a header line. With `derive`, `NETRAD` and `ALB`
    /// may be computed from their input columns. On failure, returns the names
    /// that are not present.
    pub fn from_line(
        line: &str,
        variables: &[String],
        missing_value: f64,
        derive: bool,
    ) -> std::result::Result<Self, Vec<String>> {
        let columns: Vec<&str> = line.trim().split(DELIMITER).map(str::trim).collect();
        let position = |name: &str| columns.iter().position(|c| *c == name);

        let mut missing = vec![];
        let mut locate = |name: &str| {
            let found = position(name);
            if found.is_none() {
                missing.push(name.to_string());
            }
            found.unwrap_or_default()
        };

        let timestamp_start = locate(TIMESTAMP_START);
        let timestamp_end = locate(TIMESTAMP_END);

        let variables = variables
            .iter()
            .map(|name| {
                let column = position(name.as_str());
                let derived = Derived::from_name(name)
                    .filter(|_| derive)
                    .and_then(|kind| {
                        let inputs: Option<Vec<usize>> =
                            kind.inputs().iter().map(|input| position(*input)).collect();
                        inputs.map(|inputs| (kind, inputs))
                    });

                if column.is_none() && derived.is_none() {
                    missing.push(name.to_string());
                }
                Source { column, derived }
            })
            .collect();

        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(Header {
            timestamp_start,
            timestamp_end,
            variables,
            missing_value,
        })
    }
}

/// A station file row. Values are `None` where the sentinel or an unparsable
/// entry was found and no derived value could replace it.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxRecord {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub values: Vec<Option<f64>>,
}

impl Reading for FluxRecord {
    fn from_line(line: &str, header: &Header) -> Result<Self> {
        let fields: Vec<&str> = line.trim().split(DELIMITER).map(str::trim).collect();
        let field = |index: usize| {
            fields
                .get(index)
                .copied()
                .ok_or_else(|| anyhow!("Row has {} fields, wanted column {}", fields.len(), index))
        };
        let value = |index: usize| -> Result<Option<f64>> {
            Ok(parse_value(field(index)?, header.missing_value))
        };

        let start = parse_timestamp(field(header.timestamp_start)?)?;
        let end = parse_timestamp(field(header.timestamp_end)?)?;

        let mut values = Vec::with_capacity(header.variables.len());
        for source in &header.variables {
            let direct = match source.column {
                Some(index) => value(index)?,
                None => None,
            };

            let resolved = match (direct, &source.derived) {
                (Some(v), _) => Some(v),
                (None, Some((kind, inputs))) => inputs
                    .iter()
                    .map(|&index| value(index))
                    .collect::<Result<Option<Vec<f64>>>>()?
                    .and_then(|inputs| kind.compute(&inputs)),
                (None, None) => None,
            };
            values.push(resolved);
        }

        Ok(FluxRecord { start, end, values })
    }

    fn is_valid(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .with_context(|| format!("Invalid timestamp `{}`", s))
}

fn parse_value(s: &str, missing_value: f64) -> Option<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v != missing_value)
}

// -- Tests ----------------------------------------------------------------------------
