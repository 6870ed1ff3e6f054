//! boxup: back up a declared list of local files and directories to
//! Dropbox.
//!
//! A run is driven by a JWCC backup list file naming a destination
//! directory, the paths to upload and the base names to skip. Credentials
//! come from the local config file or from Infisical. Uploads are
//! sequential and best effort: a failing file is logged and skipped,
//! never fatal; only setup failures abort the run.

pub mod backup;
pub mod cli;
pub mod config;
pub mod manifest;
pub mod path;
pub mod remote;
pub mod secrets;
