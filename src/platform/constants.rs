//! Platform-specific constants and utility functions.

use crate::platform::PlatformKind;

/// Platform-specific search-path separator
pub fn path_separator(platform: PlatformKind) -> char {
    match platform {
        PlatformKind::Windows => ';',
        PlatformKind::PosixLike => ':',
    }
}

/// Get the server entry-point script name for the given platform
pub fn server_script_name(platform: PlatformKind) -> &'static str {
    match platform {
        PlatformKind::Windows => "rabbitmq-server.bat",
        PlatformKind::PosixLike => "rabbitmq-server",
    }
}

/// Get the epmd binary name for the given platform
pub fn epmd_binary_name(platform: PlatformKind) -> &'static str {
    match platform {
        PlatformKind::Windows => "epmd.exe",
        PlatformKind::PosixLike => "epmd",
    }
}
