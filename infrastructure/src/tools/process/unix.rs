//! Unix process-group handling via `libc`.

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use tokio::process::Command;
use toolchat_domain::ExitOutcome;

/// Make the spawned command lead a fresh process group (pgid == pid).
pub(super) fn new_process_group(cmd: &mut Command) {
    cmd.process_group(0);
}

/// Current process group of `pid`, or `None` once it has been reaped.
pub(super) fn process_group_of(pid: u32) -> Option<i32> {
    let pid = libc::pid_t::try_from(pid).ok()?;
    // SAFETY: getpgid has no memory-safety preconditions.
    let pgid = unsafe { libc::getpgid(pid) };
    (pgid >= 0).then_some(pgid)
}

/// Send SIGTERM to every member of the group.
pub(super) fn terminate_group(pgid: i32) -> io::Result<()> {
    // SAFETY: kill has no memory-safety preconditions. A negative pid
    // addresses the whole group.
    let rc = unsafe { libc::kill(-pgid, libc::SIGTERM) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

pub(super) fn decode_status(status: ExitStatus) -> ExitOutcome {
    if status.success() {
        return ExitOutcome::success();
    }
    match (status.code(), status.signal()) {
        (Some(code), _) => ExitOutcome::exited(code, status.to_string()),
        (None, Some(signal)) => ExitOutcome::signaled(signal, status.to_string()),
        (None, None) => ExitOutcome::failed(status.to_string()),
    }
}
