// ============================================================
// Layer 4 - Dataset Fetcher
// ============================================================
// Downloads a ZIP archive over HTTP and extracts it into a
// working directory.
//
//   GET <url> ──► status check ──► bytes ──► ZipArchive ──► files
//
// A non-success status or a transport failure stops here with
// PipelineError::Network and nothing is written to disk.
//
// No caching and no checksum check: every run downloads and
// overwrites the extracted files.
//
// Reference: reqwest::blocking documentation
//            zip crate documentation

use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::blocking::Client;

use crate::domain::error::{PipelineError, PipelineResult};

/// Blocking HTTP client that fetches and unpacks dataset archives.
pub struct DatasetFetcher {
    client: Client,
}

impl DatasetFetcher {
    /// Build a fetcher. `timeout = None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> PipelineResult<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| PipelineError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Download `url` and extract the archive under `target_dir`.
    /// Returns the paths of the extracted files.
    pub fn fetch(&self, url: &str, target_dir: &Path) -> PipelineResult<Vec<PathBuf>> {
        tracing::info!("Downloading dataset archive from {}", url);

        let network = |reason: String| PipelineError::Network {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(network(format!("HTTP status {status}")));
        }

        let bytes = response.bytes().map_err(|e| network(e.to_string()))?;
        tracing::debug!("Downloaded {} bytes", bytes.len());

        extract_archive(&bytes, target_dir)
    }
}

/// Unpack an in-memory ZIP archive into `target_dir`.
///
/// Entries whose names would land outside `target_dir`
/// (absolute paths, `..` components) are skipped.
pub fn extract_archive(bytes: &[u8], target_dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| PipelineError::Archive(e.to_string()))?;

    fs::create_dir_all(target_dir).map_err(|e| PipelineError::io(target_dir, e))?;

    let mut extracted = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| PipelineError::Archive(e.to_string()))?;

        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!("Skipping unsafe archive entry '{}'", entry.name());
            continue;
        };
        let out_path = target_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| PipelineError::io(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }

        let mut out_file =
            fs::File::create(&out_path).map_err(|e| PipelineError::io(&out_path, e))?;
        std::io::copy(&mut entry, &mut out_file).map_err(|e| PipelineError::io(&out_path, e))?;

        tracing::debug!("Extracted '{}'", out_path.display());
        extracted.push(out_path);
    }

    tracing::info!(
        "Extracted {} files into '{}'",
        extracted.len(),
        target_dir.display()
    );
    Ok(extracted)
}

/// Locate the data table inside an extraction directory.
///
/// Files are visited in sorted path order; the first `.csv.gz`
/// wins, otherwise the first `.csv`.
pub fn find_table(dir: &Path) -> PipelineResult<PathBuf> {
    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort();

    let has_suffix = |p: &PathBuf, suffix: &str| {
        p.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(suffix))
            .unwrap_or(false)
    };

    files
        .iter()
        .find(|p| has_suffix(p, ".csv.gz"))
        .or_else(|| files.iter().find(|p| has_suffix(p, ".csv")))
        .cloned()
        .ok_or_else(|| {
            PipelineError::format(dir.display().to_string(), "no .csv.gz or .csv table found")
        })
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> PipelineResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| PipelineError::io(dir, e))?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, body) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Serve exactly one canned HTTP response on a local port.
    fn serve_once(head: &str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let head = format!(
            "{head}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
            }
        });
        format!("http://{addr}/dataset.zip")
    }

    #[test]
    fn test_non_success_status_is_network_error() {
        let url = serve_once("HTTP/1.1 404 Not Found", Vec::new());
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data");

        let fetcher = DatasetFetcher::new(Some(Duration::from_secs(10))).unwrap();
        let err = fetcher.fetch(&url, &target).unwrap_err();

        assert!(matches!(err, PipelineError::Network { .. }), "got {err:?}");
        // Extraction never started
        assert!(!target.exists());
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        // Bind then drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let fetcher = DatasetFetcher::new(Some(Duration::from_secs(5))).unwrap();
        let err = fetcher
            .fetch(&format!("http://{addr}/x.zip"), dir.path())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Network { .. }));
    }

    #[test]
    fn test_fetch_extracts_archive() {
        let archive = build_zip(&[("bbbp/bbbp.csv", b"smiles,label\nCCO,1\n")]);
        let url = serve_once("HTTP/1.1 200 OK", archive);
        let dir = tempfile::tempdir().unwrap();

        let fetcher = DatasetFetcher::new(Some(Duration::from_secs(10))).unwrap();
        let files = fetcher.fetch(&url, dir.path()).unwrap();

        assert_eq!(files, vec![dir.path().join("bbbp/bbbp.csv")]);
        let text = fs::read_to_string(&files[0]).unwrap();
        assert_eq!(text, "smiles,label\nCCO,1\n");
    }

    #[test]
    fn test_garbage_payload_is_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_archive(b"definitely not a zip", dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Archive(_)));
    }

    #[test]
    fn test_escaping_entries_are_skipped() {
        let archive = build_zip(&[("../evil.csv", b"x"), ("ok.csv", b"y")]);
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("inner");

        let files = extract_archive(&archive, &target).unwrap();
        assert_eq!(files, vec![target.join("ok.csv")]);
        assert!(!dir.path().join("evil.csv").exists());
    }

    #[test]
    fn test_find_table_prefers_gzip() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "x").unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/z.csv.gz"), "x").unwrap();
        fs::write(dir.path().join("README.txt"), "x").unwrap();

        let found = find_table(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("sub/z.csv.gz"));
    }

    #[test]
    fn test_find_table_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.txt"), "x").unwrap();
        assert!(matches!(
            find_table(dir.path()),
            Err(PipelineError::Format { .. })
        ));
    }
}
