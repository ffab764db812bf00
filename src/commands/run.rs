use crate::config::BurrowConfig;
use crate::env_binding::plan_binding;
use crate::error::Result;
use crate::platform::PlatformKind;
use crate::runtime::RuntimeLocation;
use crate::supervisor::Supervisor;
use std::path::Path;

/// The full launch sequence: locate the runtime, satisfy the Windows
/// prerequisite, reconcile the environment, then spawn and supervise the
/// server. Any failure before the spawn aborts the launch outright.
pub struct RunCommand<'a> {
    config: &'a BurrowConfig,
    bundle_root: &'a Path,
    platform: PlatformKind,
}

impl<'a> RunCommand<'a> {
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

    pub fn execute(&self, node_name: Option<&str>) -> Result<()> {
        let runtime = RuntimeLocation::discover(self.platform, self.config, self.bundle_root)?;

        self.ensure_prerequisite()?;

        plan_binding(self.platform, &runtime).apply(self.platform)?;

        let node_name = node_name.or(self.config.node_name.as_deref());

        let supervisor = Supervisor::new(self.platform);
        supervisor.install_interrupt_handler()?;
        supervisor.run(
            &self.config.server_sbin_dir(self.bundle_root),
            node_name,
            &runtime,
        )
    }

    #[cfg(windows)]
    fn ensure_prerequisite(&self) -> Result<()> {
        use crate::prereq::{self, WindowsRegistry};

        match prereq::check_prerequisite(self.platform, &WindowsRegistry)? {
            Some(version) => {
                log::debug!("VC++ runtime already present (VisualStudio {version})");
                Ok(())
            }
            None => {
                let installer = self.bundle_root.join("external").join(prereq::INSTALLER_NAME);
                prereq::install_prerequisite(&installer)
            }
        }
    }

    #[cfg(not(windows))]
    fn ensure_prerequisite(&self) -> Result<()> {
        // No system-level prerequisite outside Windows.
        Ok(())
    }
}
