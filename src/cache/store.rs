use anyhow::{anyhow, bail, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use glob::{glob, Pattern};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::process::CanonicalTable;
use crate::report::{GroupLabel, ReportId, ReportType};

/// Index column headers of a cached table.
pub const INDEX_COLUMNS: [&str; 2] = ["first", "second"];

/// Column produced by earlier header-collision renames; never carries data.
pub const DUPLICATE_ARTIFACT_COLUMN: &str = "..1";

/// Directory of canonical tables, one CSV per report identifier.
///
/// Entries are written once and never overwritten, so re-runs only fetch
/// identifiers that are still missing.
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Open the cache at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating cache directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &ReportId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    pub fn exists(&self, id: &ReportId) -> bool {
        self.path_for(id).is_file()
    }

    pub fn read(&self, id: &ReportId) -> Result<CanonicalTable> {
        read_table(&self.path_for(id))
    }

    /// Persist `table` for `id` via a temporary file and rename.
    /// Fails if an entry already exists.
    pub fn write(&self, id: &ReportId, table: &CanonicalTable) -> Result<()> {
        let final_path = self.path_for(id);
        if final_path.exists() {
            bail!("cache entry `{}` already exists", final_path.display());
        }
        let tmp_path = self.dir.join(format!("{}.tmp", id.file_name()));

        write_table(&tmp_path, table)?;
        fs::rename(&tmp_path, &final_path).with_context(|| {
            format!(
                "failed to rename `{}` to `{}`",
                tmp_path.display(),
                final_path.display()
            )
        })?;
        debug!(path = %final_path.display(), rows = table.len(), "cached table");
        Ok(())
    }

    /// All cached identifiers of `report`, ordered by date then part.
    pub fn entries(&self, report: ReportType) -> Result<Vec<ReportId>> {
        let pattern = format!("{}/*.csv", Pattern::escape(&self.dir.to_string_lossy()));
        let mut ids = Vec::new();
        for entry in glob(&pattern).context("invalid glob pattern for cache scan")? {
            let path = match entry {
                Ok(p) => p,
                Err(e) => {
                    warn!("cannot read glob entry: {:?}", e);
                    continue;
                }
            };
            let Some(name) = path.file_name().and_then(|f| f.to_str()) else {
                continue;
            };
            match ReportId::from_file_name(name) {
                Ok(id) if id.report == report => ids.push(id),
                Ok(_) => {}
                Err(e) => warn!(file = name, error = %e, "skipping unrecognised cache file"),
            }
        }
        ids.sort_by_key(|id| (id.date, id.part));
        Ok(ids)
    }

    /// Read every cached table of `report`.
    pub fn load_all(&self, report: ReportType) -> Result<Vec<(ReportId, CanonicalTable)>> {
        self.entries(report)?
            .into_iter()
            .map(|id| Ok((id, self.read(&id)?)))
            .collect()
    }
}

fn write_table(path: &Path, table: &CanonicalTable) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating `{}`", path.display()))?;

    let header = INDEX_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .chain(table.columns.iter().cloned());
    wtr.write_record(header)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(2 + row.values.len());
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
        .with_context(|| format!("flushing `{}`", path.display()))?;
    Ok(())
}

fn read_table(path: &Path) -> Result<CanonicalTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening `{}`", path.display()))?;

    let headers = rdr
        .headers()
        .with_context(|| format!("reading header of `{}`", path.display()))?
        .clone();
    if headers.len() < INDEX_COLUMNS.len() {
        bail!("`{}` has no (first, second) index columns", path.display());
    }
    let columns: Vec<String> = headers.iter().skip(2).map(str::to_string).collect();
    let mut table = CanonicalTable::new(columns);

    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error in {} at record {}", path.display(), idx))?;
        let group = match record.get(0).unwrap_or("") {
            "" => None,
            label => Some(GroupLabel::from_label(label).ok_or_else(|| {
                anyhow!("unknown group `{}` in {} at record {}", label, path.display(), idx)
            })?),
        };
        let bucket = record.get(1).unwrap_or("").to_string();
        let values = record
            .iter()
            .skip(2)
            .map(|v| match v.trim() {
                "" => Ok(None),
                s => s.parse::<i64>().map(Some).with_context(|| {
                    format!("bad value `{}` in {} at record {}", s, path.display(), idx)
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        table.push(group, bucket, values);
    }

    table.drop_column(DUPLICATE_ARTIFACT_COLUMN);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Part;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn id(report: ReportType, d: u32, part: Part) -> ReportId {
        ReportId::new(report, NaiveDate::from_ymd_opt(2020, 4, d).unwrap(), part)
    }

    fn sample() -> CanonicalTable {
        let mut t = CanonicalTable::new(vec!["hospitalized".into(), "confirmed".into()]);
        t.push(None, "Unknown".into(), vec![Some(1), None]);
        t.push(Some(GroupLabel::AgeGroup), "18-44".into(), vec![Some(1200), Some(900)]);
        t.push(Some(GroupLabel::Borough), "Staten Island".into(), vec![Some(3), Some(4)]);
        t
    }

    #[test]
    fn write_then_read_round_trips() -> Result<()> {
        let tmp = tempdir()?;
        let store = CacheStore::new(tmp.path().join("nyc"))?;
        let key = id(ReportType::Hospitalizations, 2, Part::Morning);

        assert!(!store.exists(&key));
        store.write(&key, &sample())?;
        assert!(store.exists(&key));
        assert_eq!(store.read(&key)?, sample());

        let text = fs::read_to_string(store.path_for(&key))?;
        assert!(text.starts_with("first,second,hospitalized,confirmed\n"));
        assert!(text.contains("Age Group,18-44,1200,900\n"));
        assert!(text.contains(",Unknown,1,\n"));
        Ok(())
    }

    #[test]
    fn existing_entries_are_never_overwritten() -> Result<()> {
        let tmp = tempdir()?;
        let store = CacheStore::new(tmp.path())?;
        let key = id(ReportType::Confirmed, 1, Part::Evening);
        store.write(&key, &sample())?;
        assert!(store.write(&key, &CanonicalTable::default()).is_err());
        assert_eq!(store.read(&key)?, sample());
        Ok(())
    }

    #[test]
    fn entries_are_filtered_and_ordered() -> Result<()> {
        let tmp = tempdir()?;
        let store = CacheStore::new(tmp.path())?;
        let table = sample();
        for key in [
            id(ReportType::Deaths, 3, Part::Evening),
            id(ReportType::Deaths, 1, Part::Evening),
            id(ReportType::Deaths, 3, Part::Morning),
            id(ReportType::Confirmed, 2, Part::Morning),
        ] {
            store.write(&key, &table)?;
        }
        fs::write(tmp.path().join("README.csv"), "x")?;

        let deaths = store.entries(ReportType::Deaths)?;
        assert_eq!(
            deaths,
            vec![
                id(ReportType::Deaths, 1, Part::Evening),
                id(ReportType::Deaths, 3, Part::Morning),
                id(ReportType::Deaths, 3, Part::Evening),
            ]
        );
        assert_eq!(store.entries(ReportType::Confirmed)?.len(), 1);
        assert!(store.entries(ReportType::Hospitalizations)?.is_empty());
        assert_eq!(store.load_all(ReportType::Deaths)?.len(), 3);
        Ok(())
    }

    #[test]
    fn cache_dir_with_glob_characters_is_scanned() -> Result<()> {
        let tmp = tempdir()?;
        let store = CacheStore::new(tmp.path().join("nyc [old]*"))?;
        store.write(&id(ReportType::Deaths, 7, Part::Morning), &sample())?;
        assert_eq!(
            store.entries(ReportType::Deaths)?,
            vec![id(ReportType::Deaths, 7, Part::Morning)]
        );
        Ok(())
    }

    #[test]
    fn duplicate_artifact_column_is_dropped_on_read() -> Result<()> {
        let tmp = tempdir()?;
        let store = CacheStore::new(tmp.path())?;
        let key = id(ReportType::Confirmed, 5, Part::Morning);
        fs::write(
            store.path_for(&key),
            "first,second,Total Cases,..1\nSex,Female,10,\nSex,Male,12,3\n",
        )?;
        let t = store.read(&key)?;
        assert_eq!(t.columns, vec!["Total Cases"]);
        assert_eq!(t.get(Some(GroupLabel::Sex), "Male", "Total Cases"), Some(12));
        Ok(())
    }

    #[test]
    fn unknown_group_labels_are_rejected() -> Result<()> {
        let tmp = tempdir()?;
        let store = CacheStore::new(tmp.path())?;
        let key = id(ReportType::Confirmed, 6, Part::Morning);
        fs::write(store.path_for(&key), "first,second,Total Cases\nRace,Asian,10\n")?;
        assert!(store.read(&key).is_err());
        Ok(())
    }
}
