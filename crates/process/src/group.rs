// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Containment group: an OS-level grouping whose handle closure terminates
//! every member (§3 "ContainmentGroup", §4.5 "kill on close" policy).

use crate::error::ProcessError;
use std::sync::Arc;

/// A group that processes can be attached to, guaranteeing they are all
/// terminated together when the group is released.
pub trait ContainmentGroup: Send + Sync {
    /// Attach `pid` to the group. Must be called before the process writes
    /// to any redirected stream (§4.5 step 4).
    fn assign(&self, pid: u32) -> Result<(), ProcessError>;

    /// Release the group. The OS terminates any surviving members.
    /// Idempotent.
    fn release(&self) -> Result<(), ProcessError>;
}

/// Creates the platform containment group: a Win32 job object configured
/// with `JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE` on Windows, or an in-process
/// bookkeeping stand-in elsewhere.
pub fn new_containment_group() -> Result<Arc<dyn ContainmentGroup>, ProcessError> {
    #[cfg(windows)]
    {
        Ok(Arc::new(win::JobObjectContainmentGroup::create()?))
    }
    #[cfg(not(windows))]
    {
        Ok(Arc::new(NullContainmentGroup::default()))
    }
}

/// Non-Windows stand-in: tracks assigned pids for introspection but cannot
/// enforce kill-on-close (there is no job-object equivalent contracted by
/// this crate on other platforms).
#[cfg(not(windows))]
#[derive(Default)]
pub struct NullContainmentGroup {
    assigned: parking_lot::Mutex<Vec<u32>>,
}

#[cfg(not(windows))]
impl ContainmentGroup for NullContainmentGroup {
    fn assign(&self, pid: u32) -> Result<(), ProcessError> {
        self.assigned.lock().push(pid);
        Ok(())
    }

    fn release(&self) -> Result<(), ProcessError> {
        self.assigned.lock().clear();
        Ok(())
    }
}

#[cfg(windows)]
mod win {
    use super::ContainmentGroup;
    use crate::error::ProcessError;
    use std::io;
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::System::JobObjects::{
        AssignProcessToJobObject, CreateJobObjectW, JobObjectExtendedLimitInformation,
        SetInformationJobObject, JOBOBJECT_BASIC_LIMIT_INFORMATION,
        JOBOBJECT_EXTENDED_LIMIT_INFORMATION, JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE,
    };
    use windows::Win32::System::Threading::OpenProcess;
    use windows::Win32::System::Threading::PROCESS_ALL_ACCESS;

    pub struct JobObjectContainmentGroup {
        handle: parking_lot::Mutex<Option<HANDLE>>,
    }

    // SAFETY: the raw HANDLE is only ever touched behind `handle`'s lock.
    unsafe impl Send for JobObjectContainmentGroup {}
    unsafe impl Sync for JobObjectContainmentGroup {}

    impl JobObjectContainmentGroup {
        pub fn create() -> Result<Self, ProcessError> {
            // SAFETY: CreateJobObjectW with a null name and null security
            // attributes returns a process-private, unnamed job object.
            let handle = unsafe { CreateJobObjectW(None, None) }
                .map_err(|e| ProcessError::ContainmentAttach {
                    pid: 0,
                    source: io::Error::from(e),
                })?;

            let mut info = JOBOBJECT_EXTENDED_LIMIT_INFORMATION::default();
            info.BasicLimitInformation = JOBOBJECT_BASIC_LIMIT_INFORMATION {
                LimitFlags: JOB_OBJECT_LIMIT_KILL_ON_JOB_CLOSE,
                ..Default::default()
            };

            // SAFETY: `info` is a valid, fully-initialized limit structure
            // sized exactly as the API expects.
            let set_result = unsafe {
                SetInformationJobObject(
                    handle,
                    JobObjectExtendedLimitInformation,
                    &info as *const _ as *const core::ffi::c_void,
                    std::mem::size_of_val(&info) as u32,
                )
            };
            if set_result.is_err() {
                // SAFETY: `handle` was just created above and is still valid.
                unsafe {
                    let _ = CloseHandle(handle);
                }
                return Err(ProcessError::ContainmentAttach {
                    pid: 0,
                    source: io::Error::last_os_error(),
                });
            }

            Ok(Self {
                handle: parking_lot::Mutex::new(Some(handle)),
            })
        }
    }

    impl ContainmentGroup for JobObjectContainmentGroup {
        fn assign(&self, pid: u32) -> Result<(), ProcessError> {
            let guard = self.handle.lock();
            let Some(job) = *guard else {
                return Err(ProcessError::ContainmentAttach {
                    pid,
                    source: io::Error::new(io::ErrorKind::Other, "containment group released"),
                });
            };

            // SAFETY: `pid` names a process this component just spawned and
            // still owns; PROCESS_ALL_ACCESS is requested transiently only to
            // obtain a handle for the assignment call below.
            let process = unsafe { OpenProcess(PROCESS_ALL_ACCESS, false, pid) }
                .map_err(|e| ProcessError::ContainmentAttach {
                    pid,
                    source: io::Error::from(e),
                })?;

            // SAFETY: both handles are valid and owned for the duration of
            // this call.
            let result = unsafe { AssignProcessToJobObject(job, process) };
            // SAFETY: `process` was opened immediately above.
            unsafe {
                let _ = CloseHandle(process);
            }

            result.map_err(|e| ProcessError::ContainmentAttach {
                pid,
                source: io::Error::from(e),
            })
        }

        fn release(&self) -> Result<(), ProcessError> {
            let mut guard = self.handle.lock();
            if let Some(job) = guard.take() {
                // SAFETY: `job` is a handle this struct exclusively owns.
                unsafe {
                    CloseHandle(job).map_err(|e| ProcessError::ContainmentRelease {
                        source: io::Error::from(e),
                    })?;
                }
            }
            Ok(())
        }
    }

    impl Drop for JobObjectContainmentGroup {
        fn drop(&mut self) {
            let _ = self.release();
        }
    }
}
