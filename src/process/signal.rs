use crate::process::error::ControlError;

/// Signal delivered by [`kill_process`] when none is requested.
#[cfg(unix)]
pub const DEFAULT_KILL_SIGNAL: i32 = nix::libc::SIGKILL;

/// Delivers `signal` to the process with the given id (Unix implementation)
///
/// `None` and `Some(0)` both mean the default, `SIGKILL`. A process that has
/// already exited is not an error.
///
/// # Errors
///
/// Returns [`ControlError::InvalidSignal`] for numbers that are not a known
/// signal, or [`ControlError::Signal`] when the OS refuses delivery.
#[cfg(unix)]
pub fn kill_process(process_id: u32, signal: Option<i32>) -> Result<(), ControlError> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let number = match signal {
        Some(0) | None => DEFAULT_KILL_SIGNAL,
        Some(n) => n,
    };
    let sig = Signal::try_from(number).map_err(|_| ControlError::InvalidSignal(number))?;

    let pid = i32::try_from(process_id)
        .ok()
        .filter(|pid| *pid > 0)
        .ok_or_else(|| ControlError::Signal(format!("Invalid PID: {}", process_id)))?;

    match kill(Pid::from_raw(pid), sig) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(pid, "Process already exited, nothing to signal");
            Ok(())
        }
        Err(Errno::EPERM) => Err(ControlError::Signal(format!(
            "Permission denied to signal PID {}",
            pid
        ))),
        Err(e) => Err(ControlError::Signal(format!(
            "Failed to send {} to PID {}: {}",
            sig, pid, e
        ))),
    }
}

/// Terminates the process with the given id (Windows implementation)
///
/// Windows has no equivalent of POSIX signals for arbitrary processes, so the
/// requested signal is ignored and the process is always terminated forcibly
/// with exit code 1.
///
/// # Errors
///
/// Returns [`ControlError::Signal`] if the process cannot be opened or
/// terminated.
#[cfg(windows)]
pub fn kill_process(process_id: u32, _signal: Option<i32>) -> Result<(), ControlError> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Threading::{OpenProcess, PROCESS_TERMINATE, TerminateProcess};

    unsafe {
        let process_handle = OpenProcess(PROCESS_TERMINATE, false, process_id).map_err(|e| {
            ControlError::Signal(format!(
                "Failed to open process with PID {}: {:?}",
                process_id, e
            ))
        })?;

        let result = TerminateProcess(process_handle, 1).map_err(|e| {
            ControlError::Signal(format!(
                "Failed to terminate process with PID {}: {:?}",
                process_id, e
            ))
        });

        let _ = CloseHandle(process_handle);
        result
    }
}

#[cfg(not(any(unix, windows)))]
pub fn kill_process(_process_id: u32, _signal: Option<i32>) -> Result<(), ControlError> {
    Err(ControlError::Signal("Unsupported platform".to_string()))
}
