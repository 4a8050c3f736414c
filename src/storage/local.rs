//! Local filesystem storage implementation.
//!
//! Writes are atomic (temp file, then rename) so the content API never
//! serves a half-written catalog file. Chunk files left over from a larger
//! previous run are removed after each bundle write.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::catalog::CatalogBundle;
use crate::error::{AppError, Result};
use crate::models::{CategoryFile, PathsConfig, SourceDump};
use crate::storage::{CatalogStore, HERO_BANNER_FILE, RECENT_FILE, TRENDING_FILE, WriteSummary};

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStore {
    data_dir: PathBuf,
    paths: PathsConfig,
}

impl LocalStore {
    /// Create a new store rooted at the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>, paths: PathsConfig) -> Self {
        Self {
            data_dir: data_dir.into(),
            paths,
        }
    }

    fn dumps_dir(&self) -> PathBuf {
        self.data_dir.join(&self.paths.dumps)
    }

    fn catalog_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(&self.paths.catalog).join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
        Self::ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        Self::write_bytes(path, &bytes).await
    }

    /// Read JSON, returning None if the file doesn't exist.
    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Remove `chunk_N.json` files numbered past the current page count.
    async fn clean_stale_chunks(&self, category_dir: &Path, pages: usize) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(category_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let number = name
                .strip_prefix("chunk_")
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|n| n.parse::<usize>().ok());

            if let Some(number) = number {
                if number >= pages {
                    tokio::fs::remove_file(entry.path()).await?;
                    log::debug!("Removed stale chunk {}", name);
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl CatalogStore for LocalStore {
    async fn write_dump(&self, dump: &SourceDump) -> Result<()> {
        let path = self.dumps_dir().join(format!("{}.json", dump.source));
        Self::write_json(&path, dump).await?;
        log::info!("{}: {} items written to {:?}", dump.source, dump.count, path);
        Ok(())
    }

    async fn read_dumps(&self) -> Result<Vec<SourceDump>> {
        let dir = self.dumps_dir();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Dump directory {:?} not found", dir);
                return Ok(Vec::new());
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let mut dumps = Vec::new();
        for path in files {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("Skipping unreadable dump {:?}: {}", path, e);
                    continue;
                }
            };
            match serde_json::from_slice::<SourceDump>(&bytes) {
                Ok(dump) => dumps.push(dump),
                Err(e) => log::warn!("Skipping invalid dump {:?}: {}", path, e),
            }
        }
        Ok(dumps)
    }

    async fn write_bundle(&self, bundle: &CatalogBundle) -> Result<WriteSummary> {
        let timestamp = Utc::now();
        let mut files_written = 0;

        for category in &bundle.categories {
            let dir_name = category.category.dir_name();
            let empty_page = Vec::new();
            let (index_page, overflow) = match category.chunks.split_first() {
                Some((first, rest)) => (first, rest),
                None => (&empty_page, &[][..]),
            };

            let index_path = self.catalog_path(&format!("{dir_name}/index.json"));
            Self::write_json(&index_path, &CategoryFile::new(index_page.clone())).await?;
            files_written += 1;

            for (offset, page) in overflow.iter().enumerate() {
                let chunk_path =
                    self.catalog_path(&format!("{dir_name}/chunk_{}.json", offset + 1));
                Self::write_json(&chunk_path, &CategoryFile::new(page.clone())).await?;
                files_written += 1;
            }

            let category_dir = self.catalog_path(dir_name);
            self.clean_stale_chunks(&category_dir, category.chunks.len().max(1))
                .await?;

            let trending_path = self.catalog_path(&format!("{dir_name}/{TRENDING_FILE}"));
            Self::write_json(&trending_path, &CategoryFile::new(category.trending.clone()))
                .await?;
            let hero_path = self.catalog_path(&format!("{dir_name}/{HERO_BANNER_FILE}"));
            Self::write_json(&hero_path, &CategoryFile::new(category.hero.clone())).await?;
            files_written += 2;

            log::info!(
                "{}: {} items across {} pages",
                category.category,
                category.total,
                category.chunks.len()
            );
        }

        Self::write_json(
            &self.catalog_path(TRENDING_FILE),
            &CategoryFile::new(bundle.trending.clone()),
        )
        .await?;
        Self::write_json(
            &self.catalog_path(HERO_BANNER_FILE),
            &CategoryFile::new(bundle.hero.clone()),
        )
        .await?;
        Self::write_json(
            &self.catalog_path(RECENT_FILE),
            &CategoryFile::new(bundle.recent.clone()),
        )
        .await?;
        files_written += 3;

        log::info!(
            "Catalog written: {} files, {} items classified, {} unclassified, {} duplicates",
            files_written,
            bundle.stats.classified(),
            bundle.stats.unclassified,
            bundle.stats.duplicates
        );

        Ok(WriteSummary {
            files_written,
            timestamp,
        })
    }

    async fn read_catalog(&self, key: &str) -> Result<Option<CategoryFile>> {
        Self::read_json(&self.catalog_path(key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::models::{AggregatorConfig, Category, ContentItem};
    use crate::storage::category_index;
    use chrono::{DateTime, TimeZone};
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> LocalStore {
        LocalStore::new(tmp.path(), PathsConfig::default())
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn make_item(id: &str, kind: &str) -> ContentItem {
        let now = fixed_now();
        ContentItem {
            id: id.to_string(),
            title: format!("Title {id}"),
            kind: kind.to_string(),
            year: Some(2024),
            rating: Some(7.0),
            poster: Some(format!("https://img.example.com/{id}-p.jpg")),
            backdrop: Some(format!("https://img.example.com/{id}-b.jpg")),
            genres: vec![],
            cast: vec![],
            episodes: None,
            url: format!("https://example.com/{id}"),
            source: "test".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn drama_dump(source: &str, count: usize) -> SourceDump {
        let items = (0..count)
            .map(|i| make_item(&format!("{source}-{i:03}"), "drama"))
            .collect::<Vec<_>>();
        SourceDump {
            source: source.to_string(),
            scraped_at: fixed_now(),
            count: items.len(),
            items,
        }
    }

    #[tokio::test]
    async fn test_dump_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.write_dump(&drama_dump("dramacool", 3)).await.unwrap();
        let dumps = store.read_dumps().await.unwrap();

        assert_eq!(dumps.len(), 1);
        assert_eq!(dumps[0].source, "dramacool");
        assert_eq!(dumps[0].count, 3);
        assert_eq!(dumps[0].items.len(), 3);
    }

    #[tokio::test]
    async fn test_read_dumps_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let dumps = store(&tmp).read_dumps().await.unwrap();
        assert!(dumps.is_empty());
    }

    #[tokio::test]
    async fn test_read_dumps_skips_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.write_dump(&drama_dump("good", 2)).await.unwrap();
        let bad = tmp.path().join("dumps/broken.json");
        tokio::fs::write(&bad, b"{ not json").await.unwrap();

        let dumps = store.read_dumps().await.unwrap();
        assert_eq!(dumps.len(), 1);
        assert_eq!(dumps[0].source, "good");
    }

    #[tokio::test]
    async fn test_read_dumps_skips_unreadable_entries() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.write_dump(&drama_dump("good", 2)).await.unwrap();
        // Passes the .json name filter but fails the file read.
        tokio::fs::create_dir(tmp.path().join("dumps/nested.json"))
            .await
            .unwrap();

        let dumps = store.read_dumps().await.unwrap();
        assert_eq!(dumps.len(), 1);
        assert_eq!(dumps[0].source, "good");
        assert_eq!(dumps[0].items.len(), 2);
    }

    #[tokio::test]
    async fn test_bundle_layout() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let builder = CatalogBuilder::new(AggregatorConfig::default());

        let dumps = vec![drama_dump("dramacool", 5)];
        let bundle = builder.build(&dumps, fixed_now());
        store.write_bundle(&bundle).await.unwrap();

        let index = store
            .read_catalog(&category_index(Category::Drama))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(index.count, 5);
        assert_eq!(index.results.len(), 5);

        for key in [
            TRENDING_FILE.to_string(),
            HERO_BANNER_FILE.to_string(),
            RECENT_FILE.to_string(),
            format!("dramas/{TRENDING_FILE}"),
            format!("dramas/{HERO_BANNER_FILE}"),
            category_index(Category::Anime),
        ] {
            assert!(
                store.read_catalog(&key).await.unwrap().is_some(),
                "missing catalog file {key}"
            );
        }
    }

    #[tokio::test]
    async fn test_overflow_chunks_written_and_stale_removed() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let config = AggregatorConfig {
            max_items_per_file: 10,
            ..AggregatorConfig::default()
        };
        let builder = CatalogBuilder::new(config);

        // 25 items: index + chunk_1 + chunk_2.
        let bundle = builder.build(&[drama_dump("s", 25)], fixed_now());
        store.write_bundle(&bundle).await.unwrap();
        assert!(store.read_catalog("dramas/chunk_1.json").await.unwrap().is_some());
        assert!(store.read_catalog("dramas/chunk_2.json").await.unwrap().is_some());

        // Shrink to a single page; the old chunk files must go away.
        let bundle = builder.build(&[drama_dump("s", 8)], fixed_now());
        store.write_bundle(&bundle).await.unwrap();

        let index = store
            .read_catalog(&category_index(Category::Drama))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(index.count, 8);
        assert!(store.read_catalog("dramas/chunk_1.json").await.unwrap().is_none());
        assert!(store.read_catalog("dramas/chunk_2.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_index_holds_all_items_under_page_limit() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let builder = CatalogBuilder::new(AggregatorConfig::default());

        // Three dumps totaling 250 drama items, well under the 1000 page cap.
        let dumps = vec![
            drama_dump("alpha", 80),
            drama_dump("beta", 85),
            drama_dump("gamma", 85),
        ];
        let bundle = builder.build(&dumps, fixed_now());
        store.write_bundle(&bundle).await.unwrap();

        let index = store
            .read_catalog(&category_index(Category::Drama))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(index.count, 250);
        assert_eq!(index.results.len(), 250);
        assert!(store.read_catalog("dramas/chunk_1.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rerun_identical_except_updated_at() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let builder = CatalogBuilder::new(AggregatorConfig::default());
        let dumps = vec![drama_dump("alpha", 12), drama_dump("beta", 7)];

        let index_key = category_index(Category::Drama);
        let mut snapshots = Vec::new();
        for _ in 0..2 {
            let bundle = builder.build(&dumps, fixed_now());
            store.write_bundle(&bundle).await.unwrap();

            let path = tmp.path().join("catalog").join(&index_key);
            let bytes = tokio::fs::read(&path).await.unwrap();
            let mut value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            value.as_object_mut().unwrap().remove("updated_at");
            snapshots.push(value);
        }

        assert_eq!(snapshots[0], snapshots[1]);
    }
}
