//! Command-line surface and run orchestration.
//!
//! All business logic lives in the library modules; this module parses
//! arguments, wires config, credential, remote client and backup list
//! together and reports the outcome. [`run`] is a plain async function
//! so integration tests can drive the CLI without spawning a process.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::info;

use crate::backup::backup;
use crate::config::Config;
use crate::manifest::BackupList;
use crate::remote::DropboxClient;

/// Sample backup list printed by `--generate`, in the accepted JWCC
/// dialect (comments and trailing commas are allowed).
const SAMPLE_BACKUP_LIST: &str = r#"// sample backup list in JSON(JWCC)
{
    // destination directory's name
    "dirname": "backup_20240601",

    // file paths that will be backed up
    "files": [
        "/etc/sysctl.conf",
        "/etc/dhcp/dhclient.conf",
        "/etc/samba/smb.conf",
        "~/.custom_aliases",
        "~/files/photos",
    ],

    // names that will be ignored
    "ignore": [
        ".ssh",
        ".git",
        ".svn",
        ".DS_Store",
    ],
}
"#;

/// Back up a declared list of local files and directories to Dropbox.
#[derive(Parser)]
#[clap(
    name = "boxup",
    version,
    about = "Back up a declared list of local files and directories to Dropbox"
)]
pub struct Cli {
    /// Print a sample backup list file and exit.
    #[clap(short = 'g', long = "generate")]
    pub generate: bool,

    /// Path to the backup list file (JSON with comments and trailing commas).
    pub backup_list: Option<PathBuf>,
}

/// Entrypoint shared by `main` and the integration tests.
///
/// Setup failures (config, credential, backup list) return `Err` and
/// abort the run; per-file failures inside the engine do not.
pub async fn run(cli: Cli) -> Result<()> {
    if cli.generate {
        print!("{SAMPLE_BACKUP_LIST}");
        return Ok(());
    }

    let Some(list_path) = cli.backup_list else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = Config::load()?;
    let source = config.credential_source()?;
    let token = source.resolve().await?;
    let store = DropboxClient::new(token);

    let list = BackupList::load(&list_path)?;

    let exec_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let report = backup(&list, &store, exec_dir.as_deref()).await;

    info!(
        uploaded = report.uploaded.len(),
        ignored = report.ignored,
        failed = report.failed,
        "backup complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::SAMPLE_BACKUP_LIST;
    use crate::manifest::BackupList;

    #[test]
    fn the_sample_list_parses_in_the_accepted_dialect() {
        let list: BackupList = json5::from_str(SAMPLE_BACKUP_LIST).unwrap();
        assert_eq!(list.dirname, "backup_20240601");
        assert_eq!(list.files.len(), 5);
        assert!(list.is_ignored(".git"));
    }
}
