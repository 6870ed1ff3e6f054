//! Recursive backup traversal and upload engine.
//!
//! Walks every entry declared in the backup list depth first, checking
//! the ignore list before anything else, and uploads each regular file it
//! reaches. A failing file or branch is logged and abandoned; it never
//! stops the rest of the run. Uploads are strictly sequential: the next
//! entry only starts once the previous subtree is fully processed.

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use tokio::fs;
use tracing::{error, info};

use crate::manifest::BackupList;
use crate::path::expand_path;
use crate::remote::RemoteStore;

/// Outcome summary of one backup run.
#[derive(Debug, Default)]
pub struct BackupReport {
    /// Files uploaded, in upload order.
    pub uploaded: Vec<UploadedFile>,
    /// Entries skipped by the ignore list (files or whole subtrees).
    pub ignored: usize,
    /// Files or branches abandoned after an error.
    pub failed: usize,
}

/// A single successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub local: PathBuf,
    pub remote: String,
}

/// Upload every entry of `list`, in order, to the remote store.
///
/// `exec_dir` anchors relative list entries; it is the directory holding
/// the running executable, not the working directory.
pub async fn backup<S>(list: &BackupList, store: &S, exec_dir: Option<&Path>) -> BackupReport
where
    S: RemoteStore + ?Sized,
{
    info!(dirname = %list.dirname, "destination dir");

    let mut report = BackupReport::default();
    for entry in &list.files {
        let expanded = expand_path(entry, exec_dir);
        visit(list, store, expanded, &mut report).await;
    }
    report
}

/// Depth-first visit of one path. The ignore check comes before any
/// stat, so an ignored directory prunes its whole subtree.
fn visit<'a, S>(
    list: &'a BackupList,
    store: &'a S,
    path: PathBuf,
    report: &'a mut BackupReport,
) -> BoxFuture<'a, ()>
where
    S: RemoteStore + ?Sized,
{
    Box::pin(async move {
        if let Some(name) = path.file_name() {
            if list.is_ignored(&name.to_string_lossy()) {
                info!(path = %path.display(), "ignoring");
                report.ignored += 1;
                return;
            }
        }

        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) => {
                error!(path = %path.display(), error = %e, "error while reading file");
                report.failed += 1;
                return;
            }
        };

        if meta.is_dir() {
            let mut entries = match fs::read_dir(&path).await {
                Ok(entries) => entries,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "error while recursing directory");
                    report.failed += 1;
                    return;
                }
            };
            loop {
                match entries.next_entry().await {
                    Ok(Some(entry)) => visit(list, store, entry.path(), report).await,
                    Ok(None) => break,
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "error while recursing directory");
                        report.failed += 1;
                        break;
                    }
                }
            }
        } else {
            upload_file(list, store, &path, report).await;
        }
    })
}

async fn upload_file<S>(list: &BackupList, store: &S, path: &Path, report: &mut BackupReport)
where
    S: RemoteStore + ?Sized,
{
    let remote = remote_path(&list.dirname, path);

    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) => {
            error!(path = %path.display(), error = %e, "error while reading file");
            report.failed += 1;
            return;
        }
    };

    match store.upload(content, &remote).await {
        Ok(()) => {
            info!(path = %path.display(), remote, "uploaded successfully");
            report.uploaded.push(UploadedFile {
                local: path.to_path_buf(),
                remote,
            });
        }
        Err(e) => {
            error!(path = %path.display(), remote, error = %e, "error while uploading");
            report.failed += 1;
        }
    }
}

/// Mirror a local absolute path under the destination directory.
///
/// Two same-named files at different local paths keep distinct remote
/// paths; nothing is collapsed or renamed.
fn remote_path(dirname: &str, local: &Path) -> String {
    let local = local.to_string_lossy();
    format!(
        "/{}/{}",
        dirname.trim_matches('/'),
        local.trim_start_matches('/')
    )
}
