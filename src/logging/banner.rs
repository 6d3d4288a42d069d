//! Startup banner written at the top of a fresh or rotated log file

use std::path::PathBuf;

use chrono::{DateTime, Local};

use super::format::timestamp;

/// Legend explaining the severity tags
pub const MARKERS_LEGEND: &str =
    "Markers: (II) informational, (WW) warning, (EE) error, (FF) fatal error.";

/// Source of the environment details shown in the banner
pub trait EnvironmentInfo: Send + Sync {
    /// Full path of the running executable
    fn executable(&self) -> String;
    /// When the executable was built (last modified)
    fn build_time(&self) -> String;
    /// Operating system family name
    fn os_family(&self) -> String;
}

/// Reads environment details from the current process
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    fn executable_path() -> Option<PathBuf> {
        std::env::current_exe().ok()
    }
}

impl EnvironmentInfo for ProcessEnvironment {
    fn executable(&self) -> String {
        Self::executable_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn build_time(&self) -> String {
        Self::executable_path()
            .and_then(|p| std::fs::metadata(p).ok())
            .and_then(|m| m.modified().ok())
            .map(|modified| {
                DateTime::<Local>::from(modified)
                    .format("%d.%m.%Y %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn os_family(&self) -> String {
        os_family_name(std::env::consts::OS, cfg!(unix)).to_string()
    }
}

/// Map a `std::env::consts::OS` value to a display name
fn os_family_name(os: &str, is_unix: bool) -> &'static str {
    match os {
        "linux" | "android" => "Linux",
        "windows" => "Windows",
        "macos" | "ios" => "macOS",
        _ if is_unix => "Unix",
        _ => "Unknown",
    }
}

/// Renders the multi-line banner
pub struct Banner {
    version: String,
    started_at: DateTime<Local>,
    environment: Box<dyn EnvironmentInfo>,
}

impl Banner {
    /// Create a banner for the current process
    pub fn new(version: impl Into<String>) -> Self {
        Self::with_environment(version, Box::new(ProcessEnvironment))
    }

    /// Create a banner with a custom environment source
    pub fn with_environment(
        version: impl Into<String>,
        environment: Box<dyn EnvironmentInfo>,
    ) -> Self {
        Self {
            version: version.into(),
            started_at: Local::now(),
            environment,
        }
    }

    /// When the process (writer) started
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Render the banner text, terminated by a newline
    pub fn render(&self) -> String {
        let mut text = String::from("\n\n\n\n\n");
        text.push_str(&format!("Name: {}\n", self.environment.executable()));
        text.push_str(&format!("Version: {}\n", self.version));
        text.push_str(&format!("Build on: {}\n", self.environment.build_time()));
        text.push_str(MARKERS_LEGEND);
        text.push('\n');
        text.push_str(&format!(
            "Current Operating System: {}\n",
            self.environment.os_family()
        ));
        text.push_str(&format!(
            "Runned at: {}\n",
            timestamp(&self.started_at).trim_end()
        ));
        text
    }
}

impl std::fmt::Debug for Banner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Banner")
            .field("version", &self.version)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fixed environment for deterministic banners
    pub(crate) struct FixedEnvironment;

    impl EnvironmentInfo for FixedEnvironment {
        fn executable(&self) -> String {
            "/opt/app/bin/app".to_string()
        }

        fn build_time(&self) -> String {
            "01.02.2024 10:00:00".to_string()
        }

        fn os_family(&self) -> String {
            "Linux".to_string()
        }
    }

    #[test]
    fn test_banner_render_fields() {
        let banner = Banner::with_environment("1.2.3", Box::new(FixedEnvironment));
        let text = banner.render();

        assert!(text.starts_with("\n\n\n\n\nName: /opt/app/bin/app\n"));
        assert!(text.contains("Version: 1.2.3\n"));
        assert!(text.contains("Build on: 01.02.2024 10:00:00\n"));
        assert!(text.contains(MARKERS_LEGEND));
        assert!(text.contains("Current Operating System: Linux\n"));
        assert!(text.contains("Runned at: ["));
        assert!(text.ends_with("]\n"));
    }

    #[test]
    fn test_banner_new_reads_process() {
        let before = Local::now();
        let banner = Banner::new("0.9.0");
        assert!(banner.started_at() >= before);
        assert!(banner.started_at() <= Local::now());

        let text = banner.render();
        assert!(text.contains("Version: 0.9.0\n"));
        assert!(text.contains(&format!("Name: {}\n", ProcessEnvironment.executable())));
        assert!(text.contains(&format!(
            "Runned at: {}\n",
            timestamp(&banner.started_at()).trim_end()
        )));
    }

    #[test]
    fn test_os_family_name() {
        assert_eq!(os_family_name("linux", true), "Linux");
        assert_eq!(os_family_name("windows", false), "Windows");
        assert_eq!(os_family_name("freebsd", true), "Unix");
        assert_eq!(os_family_name("solid_asp3", false), "Unknown");
    }

    #[test]
    fn test_process_environment_does_not_panic() {
        let env = ProcessEnvironment;
        assert!(!env.executable().is_empty());
        assert!(!env.build_time().is_empty());
        assert!(!env.os_family().is_empty());
    }
}
