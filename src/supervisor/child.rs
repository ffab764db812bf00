//! Platform-specific child termination.

use crate::error::Result;

/// Handle through which a tracked child can be asked to terminate. Split out
/// as a trait so shutdown ordering can be tested without a live process.
pub trait ChildControl: Send {
    fn terminate(&mut self) -> Result<()>;
}

/// Termination by process id.
///
/// Unix delivers SIGTERM, giving the server a chance to stop its
/// applications cleanly. Windows has no equivalent for console children
/// without a shared console, so the process is terminated directly.
pub struct PidHandle {
    pid: u32,
}

impl PidHandle {
    pub fn new(pid: u32) -> Self {
        Self { pid }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

#[cfg(unix)]
impl ChildControl for PidHandle {
    fn terminate(&mut self) -> Result<()> {
        use crate::error::LaunchError;

        let rc = unsafe { libc::kill(self.pid as libc::pid_t, libc::SIGTERM) };
        if rc == 0 {
            Ok(())
        } else {
            // The child may already have exited between wait starting and
            // the signal arriving; ESRCH is not a failure here.
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::ESRCH) {
                Ok(())
            } else {
                Err(LaunchError::SystemError(format!(
                    "Failed to signal pid {}: {err}",
                    self.pid
                )))
            }
        }
    }
}

#[cfg(windows)]
impl ChildControl for PidHandle {
    fn terminate(&mut self) -> Result<()> {
        use crate::error::LaunchError;
        use winapi::um::handleapi::CloseHandle;
        use winapi::um::processthreadsapi::{OpenProcess, TerminateProcess};
        use winapi::um::winnt::PROCESS_TERMINATE;

        unsafe {
            let handle = OpenProcess(PROCESS_TERMINATE, 0, self.pid);
            if handle.is_null() {
                // Already gone.
                return Ok(());
            }
            let ok = TerminateProcess(handle, 1);
            CloseHandle(handle);
            if ok == 0 {
                return Err(LaunchError::SystemError(format!(
                    "Failed to terminate pid {}: {}",
                    self.pid,
                    std::io::Error::last_os_error()
                )));
            }
        }
        Ok(())
    }
}
