//! Marp CLI discovery and on-demand installation
//!
//! ```text
//! NotChecked ──► Checking ──► Found
//!                   │
//!                   └──► Installing ──► Found
//!                                  └──► Unavailable
//! ```
//!
//! `Found` and `Unavailable` are terminal: the locator never re-checks the
//! disk once it has reached either of them.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// npm package providing the renderer
pub const MARP_PACKAGE: &str = "@marp-team/marp-cli";

/// Pinned renderer version
pub const MARP_VERSION: &str = "1.7.1";

/// Renderer discovery settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Explicit renderer command (program followed by arguments).
    /// When set, no search or install happens.
    pub command: Vec<String>,
    /// Node.js executable used to run the installed script
    pub node: String,
    /// npm executable used for installation
    pub npm: String,
    /// Install prefix (`~` expands to the home directory)
    pub install_prefix: String,
    /// npm package name
    pub package: String,
    /// Pinned package version
    pub version: String,
    /// Install the package when it is missing
    pub auto_install: bool,
    /// Seconds before a render is abandoned
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            node: "node".to_string(),
            npm: "npm".to_string(),
            install_prefix: "~/.local".to_string(),
            package: MARP_PACKAGE.to_string(),
            version: MARP_VERSION.to_string(),
            auto_install: true,
            timeout_secs: 120,
        }
    }
}

impl RendererConfig {
    /// Install prefix with `~` expanded
    pub fn prefix_path(&self) -> PathBuf {
        expand_home(&self.install_prefix)
    }

    /// Where the installed CLI script lives
    pub fn script_path(&self) -> PathBuf {
        let mut path = self.prefix_path().join("lib").join("node_modules");
        for part in self.package.split('/') {
            path.push(part);
        }
        path.join(script_name(&self.package))
    }

    /// `<package>@<version>`
    pub fn package_spec(&self) -> String {
        format!("{}@{}", self.package, self.version)
    }
}

/// `@marp-team/marp-cli` -> `marp-cli.js`
fn script_name(package: &str) -> String {
    let base = package.rsplit('/').next().unwrap_or(package);
    format!("{}.js", base)
}

fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    }
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        None => PathBuf::from(path),
    }
}

/// How to launch a located renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererHandle {
    program: OsString,
    args: Vec<OsString>,
}

impl RendererHandle {
    /// Create a handle from a program and its leading arguments
    pub fn new<I, S>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Program that gets executed
    pub fn program(&self) -> &OsString {
        &self.program
    }

    /// Leading arguments placed before per-call arguments
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// A fresh command with the leading arguments applied
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for RendererHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Availability of the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorState {
    /// `locate` has not run yet
    NotChecked,
    /// Looking at the install location
    Checking,
    /// Running the package install
    Installing,
    /// Ready to render
    Found(RendererHandle),
    /// Missing after an install attempt (or install disabled)
    Unavailable(String),
}

/// Finds (and if needed installs) the renderer, caching the outcome
#[derive(Debug, Clone)]
pub struct RendererLocator {
    config: RendererConfig,
    state: LocatorState,
}

impl RendererLocator {
    /// Create a locator that has not checked anything yet
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            state: LocatorState::NotChecked,
        }
    }

    /// Active settings
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Current availability
    pub fn state(&self) -> &LocatorState {
        &self.state
    }

    /// Locate the renderer, installing it on first use when allowed
    pub fn locate(&mut self) -> RenderResult<&RendererHandle> {
        if matches!(self.state, LocatorState::NotChecked) {
            self.state = self.resolve();
        }

        match &self.state {
            LocatorState::Found(handle) => Ok(handle),
            LocatorState::Unavailable(reason) => Err(RenderError::Unavailable(reason.clone())),
            other => Err(RenderError::Unavailable(format!(
                "renderer lookup interrupted in state {:?}",
                other
            ))),
        }
    }

    fn resolve(&mut self) -> LocatorState {
        if let Some((program, args)) = self.config.command.split_first() {
            tracing::debug!(program = %program, "using configured renderer command");
            return LocatorState::Found(RendererHandle::new(program, args));
        }

        self.state = LocatorState::Checking;
        let script = self.config.script_path();
        if let Some(handle) = self.check(&script) {
            return LocatorState::Found(handle);
        }

        if !self.config.auto_install {
            return LocatorState::Unavailable(format!(
                "Marp CLI not found at {} (auto-install disabled)",
                script.display()
            ));
        }

        tracing::warn!(path = %script.display(), "Marp CLI not found, installing");
        self.state = LocatorState::Installing;
        if let Err(reason) = self.install() {
            tracing::error!("Marp CLI install failed: {}", reason);
            return LocatorState::Unavailable(reason);
        }

        match self.check(&script) {
            Some(handle) => {
                tracing::info!(path = %script.display(), "Marp CLI installed");
                LocatorState::Found(handle)
            }
            None => LocatorState::Unavailable(format!(
                "install of {} succeeded but {} is missing",
                self.config.package_spec(),
                script.display()
            )),
        }
    }

    fn check(&self, script: &Path) -> Option<RendererHandle> {
        if script.is_file() {
            tracing::debug!(path = %script.display(), "found Marp CLI");
            Some(RendererHandle::new(
                &self.config.node,
                [script.as_os_str().to_os_string()],
            ))
        } else {
            None
        }
    }

    fn install(&self) -> Result<(), String> {
        let prefix = self.config.prefix_path();
        let output = Command::new(&self.config.npm)
            .arg("install")
            .arg("--prefix")
            .arg(&prefix)
            .arg(self.config.package_spec())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| format!("failed to run {}: {}", self.config.npm, e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(format!(
                "{} install {} exited with {}: {}",
                self.config.npm,
                self.config.package_spec(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        }
    }
}
