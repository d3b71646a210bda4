use crate::process::{CommandRunner, ExecOptions, ShellRunner};
use npmcmd_core::{ArgSource, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Options for `npm install`. When both are set, `save` wins and
/// `--save-dev` is never rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    pub save: bool,
    pub save_dev: bool,
}

/// Fluent builder over the npm CLI.
///
/// Every setter mutates the builder in place and returns it for chaining;
/// every operation spawns exactly one npm process against the configuration
/// current at call time. Instances are independent of each other.
///
/// ```no_run
/// use npmcmd::{FlagMap, Npm};
///
/// let mut flags = FlagMap::new();
/// flags.insert("no-save", "");
/// Npm::new()
///     .current_dir(Some("web"))
///     .output(false)
///     .arguments(flags)
///     .run("build");
/// ```
pub struct Npm {
    options: ExecOptions,
    passthrough: Vec<String>,
    runner: Arc<dyn CommandRunner>,
}

impl Npm {
    /// New builder with defaults: inherit the caller's working directory,
    /// show output on the console, and seed the passthrough list from this
    /// process's own command line (everything after the program path).
    pub fn new() -> Self {
        Self::with_runner(Arc::new(ShellRunner))
    }

    /// New builder backed by a custom [`CommandRunner`]. Used by tests to
    /// exercise command rendering without spawning processes.
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            options: ExecOptions::default(),
            passthrough: std::env::args().skip(1).collect(),
            runner,
        }
    }

    /// Sets the directory npm runs in, or clears the override with `None`.
    /// The path is not validated; a bad directory shows up as a failed call.
    pub fn current_dir<P: Into<PathBuf>>(&mut self, dir: Option<P>) -> &mut Self {
        self.options.working_directory = dir.map(Into::into);
        self
    }

    /// Whether npm's output streams to the console. When hidden, stdout is
    /// captured and returned instead.
    pub fn output(&mut self, visible: bool) -> &mut Self {
        self.options.show_output = visible;
        self
    }

    /// Replaces the passthrough argument list wholesale: a [`FlagMap`] is
    /// rendered to `--flag value` tokens, [`ArgSource::Disabled`] clears the
    /// list regardless of what it held before.
    ///
    /// [`FlagMap`]: npmcmd_core::FlagMap
    pub fn arguments(&mut self, source: impl Into<ArgSource>) -> &mut Self {
        self.passthrough = match source.into() {
            ArgSource::Flags(flags) => flags.render(),
            ArgSource::Disabled => Vec::new(),
        };
        self
    }

    /// `npm install [pkg] [--save|--save-dev]`, blocking.
    /// Returns captured stdout, or `None` if the command failed.
    pub fn install(&self, module: Option<&str>, options: InstallOptions) -> Option<String> {
        self.runner
            .run_blocking(&install_command(module, options), &self.options)
            .ok()
    }

    /// `npm install [pkg] [--save|--save-dev]`, non-blocking.
    pub async fn install_async(
        &self,
        module: Option<&str>,
        options: InstallOptions,
    ) -> Result<String> {
        self.runner
            .run(&install_command(module, options), &self.options)
            .await
    }

    /// `npm remove <pkg>`, blocking.
    pub fn remove(&self, module: &str) -> Option<String> {
        self.runner
            .run_blocking(&simple_command("remove", Some(module)), &self.options)
            .ok()
    }

    /// `npm remove <pkg>`, non-blocking.
    pub async fn remove_async(&self, module: &str) -> Result<String> {
        self.runner
            .run(&simple_command("remove", Some(module)), &self.options)
            .await
    }

    /// `npm link [pkg]`, blocking.
    pub fn link(&self, module: Option<&str>) -> Option<String> {
        self.runner
            .run_blocking(&simple_command("link", module), &self.options)
            .ok()
    }

    /// `npm link [pkg]`, non-blocking.
    pub async fn link_async(&self, module: Option<&str>) -> Result<String> {
        self.runner
            .run(&simple_command("link", module), &self.options)
            .await
    }

    /// `npm unlink [pkg]`, blocking.
    pub fn unlink(&self, module: Option<&str>) -> Option<String> {
        self.runner
            .run_blocking(&simple_command("unlink", module), &self.options)
            .ok()
    }

    /// `npm unlink [pkg]`, non-blocking.
    pub async fn unlink_async(&self, module: Option<&str>) -> Result<String> {
        self.runner
            .run(&simple_command("unlink", module), &self.options)
            .await
    }

    /// `npm run <script> [-- <passthrough...>]`, blocking. The `--`
    /// separator is only rendered when the passthrough list is non-empty.
    pub fn run(&self, script: &str) -> Option<String> {
        self.runner
            .run_blocking(&self.run_command(script), &self.options)
            .ok()
    }

    /// `npm run <script> [-- <passthrough...>]`, non-blocking.
    pub async fn run_async(&self, script: &str) -> Result<String> {
        self.runner.run(&self.run_command(script), &self.options).await
    }

    fn run_command(&self, script: &str) -> String {
        if self.passthrough.is_empty() {
            format!("npm run {}", script)
        } else {
            format!("npm run {} -- {}", script, self.passthrough.join(" "))
        }
    }
}

impl Default for Npm {
    fn default() -> Self {
        Self::new()
    }
}

fn install_command(module: Option<&str>, options: InstallOptions) -> String {
    let save_mode = if options.save {
        Some("--save")
    } else if options.save_dev {
        Some("--save-dev")
    } else {
        None
    };

    let mut command = String::from("npm install");
    if let Some(module) = module.filter(|m| !m.is_empty()) {
        command.push(' ');
        command.push_str(module);
    }
    if let Some(save_mode) = save_mode {
        command.push(' ');
        command.push_str(save_mode);
    }
    command
}

fn simple_command(subcommand: &str, module: Option<&str>) -> String {
    match module.filter(|m| !m.is_empty()) {
        Some(module) => format!("npm {} {}", subcommand, module),
        None => format!("npm {}", subcommand),
    }
}
