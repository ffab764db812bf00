use crate::config::BurrowConfig;
use crate::env_binding::{EnvBinding, plan_binding};
use crate::error::Result;
use crate::platform::PlatformKind;
use crate::runtime::RuntimeLocation;
use std::io::Write;
use std::path::Path;

/// Print the environment reconciliation without applying it.
///
/// On POSIX the binding is a PATH prepend, printed as a shell-evaluable
/// export. The Windows binding rewrites a file, so it is only described.
pub struct EnvCommand<'a> {
    config: &'a BurrowConfig,
    bundle_root: &'a Path,
    platform: PlatformKind,
}

impl<'a> EnvCommand<'a> {
    pub fn new(
        config: &'a BurrowConfig,
        bundle_root: &'a Path,
        platform: PlatformKind,
    ) -> Result<Self> {
        Ok(Self {
            config,
            bundle_root,
            platform,
        })
    }

    pub fn execute(&self) -> Result<()> {
        let runtime = RuntimeLocation::discover(self.platform, self.config, self.bundle_root)?;
        let binding = plan_binding(self.platform, &runtime);

        let mut stdout = std::io::stdout();
        match binding {
            EnvBinding::SearchPath { var, prepend } => {
                writeln!(stdout, "export {var}=\"{}:${var}\"", prepend.display())?;
                eprintln!("# Run this command to configure your shell:");
                eprintln!("# eval \"$(burrow env)\"");
            }
            EnvBinding::ErlIni {
                home_var,
                home,
                ini_path,
                ..
            } => {
                writeln!(stdout, "{home_var}={}", home.display())?;
                writeln!(
                    stdout,
                    "# Bindir/Rootdir are reconciled in {} by 'burrow run'",
                    ini_path.display()
                )?;
            }
        }
        stdout.flush()?;
        Ok(())
    }
}
