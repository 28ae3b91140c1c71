use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::config::IngestConfig;

/// Receives a prepared trace folder. Called once per successful run, after
/// the metadata file has been patched.
pub trait Ingestor {
    fn hand_off(&mut self, folder: &Path) -> Result<()>;
}

/// Launches the companion CLI's `store-explore ingest` on the folder.
#[derive(Debug, Clone)]
pub struct CompanionCli {
    config: IngestConfig,
}

impl CompanionCli {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Executable to launch. A relative program is looked up in the install
    /// directory first and falls back to a `PATH` search.
    pub fn program_path(&self) -> PathBuf {
        let program = Path::new(&self.config.program);
        let install_dir = self.config.working_dir.as_deref().filter(|_| program.is_relative());
        if let Some(dir) = install_dir {
            let installed = dir.join(program);
            if installed.is_file() {
                return installed;
            }
            if cfg!(windows) && installed.extension().is_none() {
                let exe = installed.with_extension("exe");
                if exe.is_file() {
                    return exe;
                }
            }
        }
        program.to_path_buf()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(self.program_path());
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// `store-explore get-stats --data-pool-id <id>`, unless the pool is unset
    /// or empty.
    pub fn stats_command(&self) -> Option<Command> {
        let pool = self.config.data_pool_id.as_ref().filter(|p| !p.is_empty())?;
        let mut cmd = self.command();
        cmd.args(["store-explore", "get-stats", "--data-pool-id"]).arg(pool);
        Some(cmd)
    }

    pub fn ingest_command(&self, folder: &Path) -> Command {
        let mut cmd = self.command();
        cmd.args(["store-explore", "ingest", "-s"]).arg(folder);
        cmd
    }
}

impl Ingestor for CompanionCli {
    fn hand_off(&mut self, folder: &Path) -> Result<()> {
        if let Some(mut stats) = self.stats_command() {
            // Warms up the CLI session; its result does not gate ingestion
            match stats.status() {
                Ok(status) => tracing::info!("get-stats finished: {}", status),
                Err(e) => tracing::warn!("get-stats could not run: {}", e),
            }
        }

        let child = self
            .ingest_command(folder)
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch {}", self.config.program))?;

        tracing::info!(
            "Ingestion of {} started (pid {})",
            folder.display(),
            child.id()
        );
        Ok(())
    }
}

/// Logs the hand-off without launching anything.
#[derive(Debug, Default)]
pub struct DryRun;

impl Ingestor for DryRun {
    fn hand_off(&mut self, folder: &Path) -> Result<()> {
        tracing::info!("Dry run: would ingest {}", folder.display());
        Ok(())
    }
}
