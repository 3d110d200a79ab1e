use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::{DataLoadError, Result};
use super::loader::load_file;
use super::model::FullDataset;

// ---------------------------------------------------------------------------
// DatasetSource – the single owner of the prepared dataset
// ---------------------------------------------------------------------------

/// Identity of the file contents as far as the filesystem tells us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceStamp {
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceStamp {
    fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|e| DataLoadError::io(path, e))?;
        Ok(SourceStamp {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// A source file bound to its memoized [`FullDataset`].
///
/// [`DatasetSource::load`] prepares the dataset on first use and hands out
/// the same `Arc` until the file's length or modification time changes.
#[derive(Debug)]
pub struct DatasetSource {
    path: PathBuf,
    cached: Option<(SourceStamp, Arc<FullDataset>)>,
}

impl DatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the prepared dataset, recomputing only if the source changed.
    pub fn load(&mut self) -> Result<Arc<FullDataset>> {
        let stamp = SourceStamp::of(&self.path)?;
        if let Some((cached_stamp, dataset)) = &self.cached {
            if *cached_stamp == stamp {
                log::debug!("Dataset cache hit for {}", self.path.display());
                return Ok(Arc::clone(dataset));
            }
        }

        let dataset = match load_file(&self.path) {
            Ok(ds) => Arc::new(ds),
            Err(e) => {
                self.cached = None;
                return Err(e);
            }
        };
        log::info!(
            "Loaded {} cities from {} countries ({})",
            dataset.len(),
            dataset.countries().len(),
            self.path.display()
        );
        self.cached = Some((stamp, Arc::clone(&dataset)));
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "City,Country,WiFi Speed,Rent,Sunshine Hours,Coworking Spaces,\
Instagram Photos,Things To Do,Meal Price,Coffee Price,Beer Price,Taxi Price\n";

    fn write(file: &mut std::fs::File, rows: &[&str]) {
        file.set_len(0).unwrap();
        let mut body = HEADER.to_string();
        for r in rows {
            body.push_str(r);
            body.push('\n');
        }
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
    }

    #[test]
    fn repeated_load_returns_the_same_dataset() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write(file.as_file_mut(), &["Lisbon,Portugal,40,1300,2800,10,1500,500,10,1.5,2.5,5"]);

        let mut source = DatasetSource::new(file.path());
        let first = source.load().unwrap();
        let second = source.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn changed_source_is_recomputed() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write(file.as_file_mut(), &["Lisbon,Portugal,40,1300,2800,10,1500,500,10,1.5,2.5,5"]);
        let mut source = DatasetSource::new(file.path());
        let first = source.load().unwrap();

        // Rewind and append a second row; the length change invalidates the cache.
        let mut reopened = file.reopen().unwrap();
        write(
            &mut reopened,
            &[
                "Lisbon,Portugal,40,1300,2800,10,1500,500,10,1.5,2.5,5",
                "Hanoi,Vietnam,30,500,1600,12,900,300,2,1,1,2",
            ],
        );
        let second = source.load().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn missing_source_surfaces_error() {
        let mut source = DatasetSource::new("/nonexistent/workation.csv");
        assert!(matches!(source.load(), Err(DataLoadError::Io { .. })));
    }
}
