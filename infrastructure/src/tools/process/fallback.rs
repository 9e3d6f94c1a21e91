//! Portable fallback for platforms without process groups.
//!
//! The spawned process is not grouped; cancellation kills only the direct
//! child through its handle.

use std::io;
use std::process::ExitStatus;
use tokio::process::Command;
use toolchat_domain::ExitOutcome;

pub(super) fn new_process_group(_cmd: &mut Command) {}

pub(super) fn process_group_of(_pid: u32) -> Option<i32> {
    None
}

pub(super) fn terminate_group(_pgid: i32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "process groups are not supported on this platform",
    ))
}

pub(super) fn decode_status(status: ExitStatus) -> ExitOutcome {
    if status.success() {
        return ExitOutcome::success();
    }
    match status.code() {
        Some(code) => ExitOutcome::exited(code, status.to_string()),
        None => ExitOutcome::failed(status.to_string()),
    }
}
