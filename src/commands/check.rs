use crate::config::BurrowConfig;
use crate::error::Result;
use crate::platform::PlatformKind;
use crate::runtime::RuntimeLocation;
use std::path::Path;

/// Diagnostic pass over the bundle: platform, runtime location, server
/// entry point, prerequisite status. Launches nothing; an unusable bundle
/// surfaces as the same error the launch itself would hit.
pub struct CheckCommand<'a> {
    config: &'a BurrowConfig,
    bundle_root: &'a Path,
    platform: PlatformKind,
}

impl<'a> CheckCommand<'a> {
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
        println!("Platform: {:?}", self.platform);
        println!("Bundle root: {}", self.bundle_root.display());

        let runtime = RuntimeLocation::discover(self.platform, self.config, self.bundle_root)?;
        println!("Erlang root: {}", runtime.root.display());
        println!("ERTS bin dir: {}", runtime.erts_bin_dir.display());

        let server_script = self
            .config
            .server_sbin_dir(self.bundle_root)
            .join(crate::platform::server_script_name(self.platform));
        if server_script.exists() {
            println!("Server script: {}", server_script.display());
        } else {
            println!("Server script missing: {}", server_script.display());
        }

        self.report_prerequisite()?;
        Ok(())
    }

    #[cfg(windows)]
    fn report_prerequisite(&self) -> Result<()> {
        use crate::prereq::{self, WindowsRegistry};

        match prereq::check_prerequisite(self.platform, &WindowsRegistry)? {
            Some(version) => println!("VC++ runtime: present (VisualStudio {version})"),
            None => println!("VC++ runtime: missing (will be installed on first run)"),
        }
        Ok(())
    }

    #[cfg(not(windows))]
    fn report_prerequisite(&self) -> Result<()> {
        println!("VC++ runtime: not required on this platform");
        Ok(())
    }
}
