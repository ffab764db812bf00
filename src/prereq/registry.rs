//! HKLM-backed [`RedistStore`] implementation.

use crate::error::{LaunchError, Result};
use crate::prereq::RedistStore;
use std::ffi::OsStr;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;
use std::ptr::null_mut;
use winapi::shared::minwindef::{DWORD, HKEY};
use winapi::shared::winerror::{ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS};
use winapi::um::winnt::KEY_READ;
use winapi::um::winreg::{HKEY_LOCAL_MACHINE, RegCloseKey, RegEnumKeyExW, RegOpenKeyExW};

const SUBKEY_NAME_CAPACITY: usize = 256;

/// Live registry view rooted at HKEY_LOCAL_MACHINE.
pub struct WindowsRegistry;

struct OwnedKey(HKEY);

impl Drop for OwnedKey {
    fn drop(&mut self) {
        unsafe {
            RegCloseKey(self.0);
        }
    }
}

fn wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(once(0)).collect()
}

fn open_key(path: &str) -> Result<Option<OwnedKey>> {
    let mut hkey: HKEY = null_mut();
    let path_wide = wide(path);

    let rc = unsafe {
        RegOpenKeyExW(HKEY_LOCAL_MACHINE, path_wide.as_ptr(), 0, KEY_READ, &mut hkey)
    } as DWORD;

    match rc {
        ERROR_SUCCESS => Ok(Some(OwnedKey(hkey))),
        ERROR_FILE_NOT_FOUND => Ok(None),
        other => Err(LaunchError::SystemError(format!(
            "Failed to open registry key HKLM\\{path}: error {other}"
        ))),
    }
}

impl RedistStore for WindowsRegistry {
    fn subkeys(&self, path: &str) -> Result<Vec<String>> {
        let Some(key) = open_key(path)? else {
            return Ok(Vec::new());
        };

        let mut names = Vec::new();
        let mut index: DWORD = 0;
        loop {
            let mut buf = [0u16; SUBKEY_NAME_CAPACITY];
            let mut len = buf.len() as DWORD;

            let rc = unsafe {
                RegEnumKeyExW(
                    key.0,
                    index,
                    buf.as_mut_ptr(),
                    &mut len,
                    null_mut(),
                    null_mut(),
                    null_mut(),
                    null_mut(),
                )
            } as DWORD;

            match rc {
                ERROR_SUCCESS => {
                    names.push(String::from_utf16_lossy(&buf[..len as usize]));
                    index += 1;
                }
                ERROR_NO_MORE_ITEMS => break,
                other => {
                    return Err(LaunchError::SystemError(format!(
                        "Failed to enumerate registry key HKLM\\{path}: error {other}"
                    )));
                }
            }
        }

        Ok(names)
    }

    fn has_subkey(&self, path: &str, name: &str) -> Result<bool> {
        let full = format!("{path}\\{name}");
        Ok(open_key(&full)?.is_some())
    }
}
