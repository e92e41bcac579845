//! Running the sync workflow from the TUI.

use anyhow::{Result, bail};
use tracing::{debug, info, warn};

use crate::app::{App, Background, ConfirmAction, Mode, SyncProgress};
use crate::error;
use crate::workflow::{self, Progress, Summary};

use super::Actions;

impl Actions {
    /// Ask before syncing the current branch with the configured main branch
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD is detached or already on the main branch
    pub fn request_sync(app: &mut App) -> Result<()> {
        let Some(feature) = app.git.current_branch() else {
            bail!("HEAD is detached; check out the branch to sync first");
        };
        let main = app.config.main_branch.clone();
        if feature == main {
            bail!("Already on {main}; check out a feature branch to sync");
        }
        app.enter_mode(Mode::Confirming(ConfirmAction::Sync { main, feature }));
        Ok(())
    }

    /// Start the sync workflow on a worker thread
    ///
    /// # Errors
    ///
    /// Returns an error if the configured rebase arguments cannot be parsed
    pub fn start_sync(app: &mut App, main: String, feature: String) -> Result<()> {
        let rebase_args = app.config.rebase_argv()?;
        info!(%main, %feature, ?rebase_args, "Starting sync from TUI");

        app.sync = Some(SyncProgress::new(main.clone(), feature.clone()));
        app.enter_mode(Mode::Syncing);

        let git = app.git.clone();
        let sender = app.background_sender();
        std::thread::spawn(move || {
            let progress = sender.clone();
            let result = workflow::run_with_progress(&git, &main, &feature, &rebase_args, |p| {
                if progress.send(Background::Sync(p)).is_err() {
                    debug!("Receiver gone before sync progress was delivered");
                }
            });
            if sender.send(Background::SyncDone(result)).is_err() {
                debug!("Receiver gone before sync finished");
            }
        });
        Ok(())
    }

    pub(super) fn sync_progress(app: &mut App, progress: Progress) {
        if let Some(sync) = app.sync.as_mut() {
            sync.apply(progress);
        }
    }

    pub(super) fn finish_sync(app: &mut App, result: error::Result<Summary>) {
        match result {
            Ok(summary) => {
                info!(%summary, "Sync finished");
                app.sync = None;
                app.show_success(summary.to_string());
            }
            Err(e) => {
                warn!(error = %e, "Sync failed");
                if let Some(sync) = app.sync.as_mut() {
                    sync.fail();
                }
                let mut message = e.to_string();
                if Self::refresh_files(app).is_ok() && !app.files.is_empty() {
                    message.push_str(&format!(
                        "\n\n{} conflicted file(s) listed. Resolve them, then save.",
                        app.files.len()
                    ));
                }
                app.show_error(message);
            }
        }
    }
}
