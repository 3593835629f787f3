//! Save and load observation series as parquet files.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Float64Array, UInt32Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    file::properties::WriterProperties,
};

use crate::series::ObservationSeries;

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const WEIGHT_COLUMN: &str = "weight";

/// Writes `series` to `file_path`, with a `weight` column when `weights` is
/// given.
pub fn save_series(
    series: &ObservationSeries,
    weights: Option<&[usize]>,
    file_path: &Path,
) -> Result<()> {
    if let Some(weights) = weights {
        if weights.len() != series.len() {
            return Err(anyhow!(
                "{} weights for a series of {} rows",
                weights.len(),
                series.len()
            ));
        }
    }

    let mut fields = vec![Field::new(TIMESTAMP_COLUMN, DataType::Float64, false)];
    fields.extend(
        series
            .variables()
            .iter()
            .map(|v| Field::new(v, DataType::Float64, false)),
    );
    if weights.is_some() {
        fields.push(Field::new(WEIGHT_COLUMN, DataType::UInt32, false));
    }
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![Arc::new(Float64Array::from(series.timestamps().to_vec()))];
    for index in 0..series.variables().len() {
        let column: Vec<f64> = series.values().iter().map(|row| row[index]).collect();
        columns.push(Arc::new(Float64Array::from(column)));
    }
    if let Some(weights) = weights {
        let weights = weights
            .iter()
            .map(|&w| u32::try_from(w))
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Weight does not fit a UInt32 column")?;
        columns.push(Arc::new(UInt32Array::from(weights)));
    }

    let batch = RecordBatch::try_new(schema.clone(), columns)?;

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let file = File::create(file_path)
        .with_context(|| format!("Could not create `{}`", file_path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

/// Reads a file written by [`save_series`], returning the series and its
/// weights if the file has them.
pub fn load_series(file_path: &Path) -> Result<(ObservationSeries, Option<Vec<usize>>)> {
    let file = File::open(file_path)
        .with_context(|| format!("Could not open `{}`", file_path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema().clone();
    let variables: Vec<String> = schema
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .filter(|name| name != TIMESTAMP_COLUMN && name != WEIGHT_COLUMN)
        .collect();
    let has_weights = schema.column_with_name(WEIGHT_COLUMN).is_some();

    let mut timestamps = vec![];
    let mut values: Vec<Vec<f64>> = vec![];
    let mut weights = vec![];

    for batch in builder.build()? {
        let batch = batch?;

        let columns = variables
            .iter()
            .map(|v| float_column(&batch, v))
            .collect::<Result<Vec<_>>>()?;
        for row in 0..batch.num_rows() {
            values.push(columns.iter().map(|c| c.value(row)).collect());
        }

        timestamps.extend(float_column(&batch, TIMESTAMP_COLUMN)?.values().iter());

        if has_weights {
            let column = batch
                .column_by_name(WEIGHT_COLUMN)
                .and_then(|c| c.as_any().downcast_ref::<UInt32Array>())
                .ok_or_else(|| anyhow!("Column `{}` is not UInt32", WEIGHT_COLUMN))?;
            weights.extend(column.values().iter().map(|&w| w as usize));
        }
    }

    let series = ObservationSeries::new(variables, timestamps, values)
        .with_context(|| format!("`{}` is not a valid series", file_path.display()))?;

    Ok((series, has_weights.then_some(weights)))
}

fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("Missing column `{}`", name))?;
    if column.null_count() > 0 {
        return Err(anyhow!("Column `{}` has null values", name));
    }

    column
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| anyhow!("Column `{}` is not Float64", name))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::NamedTempFile;

    use super::*;

    fn series_fixture() -> ObservationSeries {
        ObservationSeries::new(
            vec!["TA".to_string(), "H".to_string()],
            vec![5400.0, 16200.0, 37800.0],
            vec![vec![2.0, 3.0], vec![8.0, 9.0], vec![-1.5, 120.25]],
        )
        .unwrap()
    }

    #[test]
    fn should_write_schema_and_data() {
        let series = series_fixture();
        let temp_file = NamedTempFile::new().unwrap();

        save_series(&series, Some(&[3, 3, 2][..]), temp_file.path()).unwrap();

        let file = fs::File::open(temp_file.path()).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();

        let mut total_rows = 0;
        for batch in reader {
            let batch = batch.unwrap();
            total_rows += batch.num_rows();

            let schema = batch.schema();
            assert_eq!(schema.fields().len(), 4);
            assert_eq!(schema.field(0).name(), "timestamp");
            assert_eq!(schema.field(1).name(), "TA");
            assert_eq!(schema.field(2).name(), "H");
            assert_eq!(schema.field(3).name(), "weight");
            assert_eq!(schema.field(3).data_type(), &DataType::UInt32);

            let h = float_column(&batch, "H").unwrap();
            assert_eq!(h.value(2), 120.25);
        }
        assert_eq!(total_rows, 3);
    }

    #[test]
    fn should_load_saved_series() {
        let series = series_fixture();
        let temp_file = NamedTempFile::new().unwrap();

        save_series(&series, Some(&[3, 3, 2][..]), temp_file.path()).unwrap();
        let (loaded, weights) = load_series(temp_file.path()).unwrap();

        assert_eq!(loaded, series);
        assert_eq!(weights, Some(vec![3, 3, 2]));
    }

    #[test]
    fn should_omit_weights_for_raw_series() {
        let series = series_fixture();
        let temp_file = NamedTempFile::new().unwrap();

        save_series(&series, None, temp_file.path()).unwrap();
        let (loaded, weights) = load_series(temp_file.path()).unwrap();

        assert_eq!(loaded.variables(), series.variables());
        assert_eq!(weights, None);
    }

    #[test]
    fn should_reject_mismatched_weights() {
        let temp_file = NamedTempFile::new().unwrap();

        assert!(save_series(&series_fixture(), Some(&[1, 2][..]), temp_file.path()).is_err());
    }
}
