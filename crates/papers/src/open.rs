//! Fire-and-forget launch of the platform's default file opener.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::Result;

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const OPENER: &str = "xdg-open";

/// Opens `path` with the platform's default handler.
///
/// The child process is not waited on and its output streams are discarded;
/// only a failure to spawn at all is reported.
pub fn open_external(path: &Path) -> Result<()> {
    log::debug!("opening {} with {OPENER}", path.display());
    Command::new(OPENER)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
