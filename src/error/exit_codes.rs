use crate::error::LaunchError;

pub fn get_exit_code(error: &LaunchError) -> i32 {
    match error {
        LaunchError::UnsupportedPlatform(_) | LaunchError::ConfigFile(_) => 2,

        LaunchError::RuntimeNotFound { .. } => 3,

        LaunchError::PrerequisiteInstall(_) => 4,

        LaunchError::PreconditionViolation(_) => 5,

        LaunchError::ConfigRewrite(_) => 6,

        _ => 1,
    }
}
