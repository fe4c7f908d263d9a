use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Int64Array, StringArray, TimestampMicrosecondArray},
    datatypes::{DataType, Field, Schema, TimeUnit},
    record_batch::RecordBatch,
};
use csv::WriterBuilder;
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

use super::assemble::Series;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn finish(tmp: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp, path).with_context(|| {
        format!(
            "failed to rename `{}` to `{}`",
            tmp.display(),
            path.display()
        )
    })
}

/// Write `dt,first,second,<columns>` rows; missing values and groups are empty.
pub fn write_csv(series: &Series, path: &Path) -> Result<()> {
    let tmp = tmp_sibling(path);
    let mut wtr = WriterBuilder::new()
        .from_path(&tmp)
        .with_context(|| format!("creating `{}`", tmp.display()))?;

    let header = ["dt", "first", "second"]
        .iter()
        .map(|s| s.to_string())
        .chain(series.columns.iter().cloned());
    wtr.write_record(header)?;

    for row in &series.rows {
        let mut record = Vec::with_capacity(3 + row.values.len());
        record.push(row.timestamp.format(TIMESTAMP_FORMAT).to_string());
        record.push(row.group.map(|g| g.as_str().to_string()).unwrap_or_default());
        record.push(row.bucket.clone());
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|n| n.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()
        .with_context(|| format!("flushing `{}`", tmp.display()))?;
    drop(wtr);

    finish(&tmp, path)?;
    info!(path = %path.display(), rows = series.rows.len(), "wrote series csv");
    Ok(())
}

fn arrow_schema(series: &Series) -> Schema {
    let mut fields = vec![
        Field::new("dt", DataType::Timestamp(TimeUnit::Microsecond, None), false),
        Field::new("first", DataType::Utf8, true),
        Field::new("second", DataType::Utf8, false),
    ];
    fields.extend(
        series
            .columns
            .iter()
            .map(|c| Field::new(c.as_str(), DataType::Int64, true)),
    );
    Schema::new(fields)
}

/// Write the series as a single Snappy-compressed Parquet row group.
pub fn write_parquet(series: &Series, path: &Path) -> Result<()> {
    let schema = Arc::new(arrow_schema(series));

    let dt = TimestampMicrosecondArray::from(
        series
            .rows
            .iter()
            .map(|r| r.timestamp.and_utc().timestamp_micros())
            .collect::<Vec<i64>>(),
    );
    let first = StringArray::from(
        series
            .rows
            .iter()
            .map(|r| r.group.map(|g| g.as_str()))
            .collect::<Vec<Option<&str>>>(),
    );
    let second = StringArray::from(
        series
            .rows
            .iter()
            .map(|r| r.bucket.as_str())
            .collect::<Vec<&str>>(),
    );

    let mut columns: Vec<ArrayRef> = vec![Arc::new(dt), Arc::new(first), Arc::new(second)];
    for i in 0..series.columns.len() {
        let values: Int64Array = series.rows.iter().map(|r| r.values[i]).collect();
        columns.push(Arc::new(values));
    }

    let batch =
        RecordBatch::try_new(schema.clone(), columns).context("building series record batch")?;

    let tmp = tmp_sibling(path);
    let file =
        File::create(&tmp).with_context(|| format!("creating `{}`", tmp.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(BufWriter::new(file), schema, Some(props))
        .context("creating Arrow writer for series")?;
    writer.write(&batch).context("writing series batch")?;
    writer.close().context("closing series writer")?;

    finish(&tmp, path)?;
    info!(path = %path.display(), rows = series.rows.len(), "wrote series parquet");
    Ok(())
}
