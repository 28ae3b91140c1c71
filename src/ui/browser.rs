use std::io;
use std::path::{Path, PathBuf};

use super::console::Operator;
use super::drives::{list_removable_volumes, Volume, VolumeSource};
use super::input::{parse_input, InputAction};
use super::menu;
use super::navigation::NavigationState;
use crate::scanner::types::{ExtensionMatch, FolderEntry};
use crate::scanner::{self, is_trace_listing};

/// Browser state machine phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserState {
    /// Waiting for the operator to pick a volume
    SelectingVolume,
    /// Showing the children of a folder
    Browsing(PathBuf),
    /// The operator chose this folder for upload
    TraceFound(PathBuf),
    /// No volumes left or the operator quit
    Exhausted,
}

/// What the operator sees while in `Browsing`.
#[derive(Debug, Clone)]
pub struct FolderView {
    pub path: PathBuf,
    /// Subfolders, most recently modified first
    pub folders: Vec<FolderEntry>,
    /// Log, html and json files are all present
    pub is_trace: bool,
}

/// Interactive folder navigator over removable volumes.
///
/// Driven one [`InputAction`] at a time through [`TraceBrowser::apply`];
/// [`TraceBrowser::run`] wires it to an [`Operator`].
pub struct TraceBrowser<'a> {
    source: &'a dyn VolumeSource,
    matching: ExtensionMatch,
    state: BrowserState,
    volumes: Vec<Volume>,
    navigation: Option<NavigationState>,
    view: Option<FolderView>,
    notices: Vec<String>,
}

impl<'a> TraceBrowser<'a> {
    /// Start a session; enumerates volumes immediately.
    pub fn new(source: &'a dyn VolumeSource, matching: ExtensionMatch) -> Self {
        let mut browser = Self {
            source,
            matching,
            state: BrowserState::SelectingVolume,
            volumes: Vec::new(),
            navigation: None,
            view: None,
            notices: Vec::new(),
        };
        browser.select_volume();
        browser
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    /// Current folder listing, if browsing.
    pub fn view(&self) -> Option<&FolderView> {
        self.view.as_ref()
    }

    /// Number of folders that "back" would unwind before volume selection.
    pub fn depth(&self) -> usize {
        self.navigation.as_ref().map_or(0, NavigationState::depth)
    }

    /// Messages for the operator produced since the last call.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, BrowserState::TraceFound(_) | BrowserState::Exhausted)
    }

    /// Advance the state machine by one operator decision.
    pub fn apply(&mut self, action: InputAction) -> &BrowserState {
        if action == InputAction::Quit && !self.is_finished() {
            tracing::info!("Browsing cancelled by operator");
            self.finish(BrowserState::Exhausted);
            return &self.state;
        }

        match self.state.clone() {
            BrowserState::SelectingVolume => match action {
                InputAction::Select(n) => {
                    let volume = n.checked_sub(1).and_then(|i| self.volumes.get(i)).cloned();
                    match volume {
                        Some(volume) => {
                            tracing::info!("Volume {} selected", volume.id);
                            self.navigation = Some(NavigationState::new(volume.root));
                            self.open_current();
                        }
                        None => self.invalid("No such volume."),
                    }
                }
                // Rescan, a drive may have been plugged in meanwhile
                InputAction::Back => self.select_volume(),
                _ => self.invalid("Enter a volume number."),
            },

            BrowserState::Browsing(path) => match action {
                InputAction::Upload if self.view.as_ref().is_some_and(|v| v.is_trace) => {
                    tracing::info!("Trace folder selected: {}", path.display());
                    self.finish(BrowserState::TraceFound(path));
                }
                InputAction::Upload => self.invalid("This folder is not a trace folder."),
                InputAction::Select(n) => {
                    let child = self
                        .view
                        .as_ref()
                        .zip(n.checked_sub(1))
                        .and_then(|(v, i)| v.folders.get(i))
                        .map(|f| f.path.clone());
                    match child {
                        Some(child) => {
                            if let Some(nav) = self.navigation.as_mut() {
                                nav.descend(child);
                            }
                            self.open_current();
                        }
                        None => self.invalid("No such folder."),
                    }
                }
                InputAction::Back => self.back(),
                _ => self.invalid("Invalid choice."),
            },

            BrowserState::TraceFound(_) | BrowserState::Exhausted => {}
        }

        &self.state
    }

    /// Drive the session on `operator` until a trace folder is chosen or the
    /// session ends. `None` means nothing was chosen.
    pub fn run(&mut self, operator: &mut dyn Operator) -> io::Result<Option<PathBuf>> {
        loop {
            for notice in self.take_notices() {
                operator.show(&notice)?;
            }

            let line = match &self.state {
                BrowserState::TraceFound(path) => return Ok(Some(path.clone())),
                BrowserState::Exhausted => return Ok(None),
                BrowserState::SelectingVolume => {
                    operator.show(&menu::render_volumes(&self.volumes))?;
                    operator.ask(menu::volume_prompt())?
                }
                BrowserState::Browsing(_) => match &self.view {
                    Some(view) => {
                        operator.show(&menu::render_folder(view))?;
                        operator.ask(&menu::folder_prompt(view))?
                    }
                    None => None,
                },
            };

            self.apply(parse_input(line.as_deref()));
        }
    }

    fn invalid(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn finish(&mut self, state: BrowserState) {
        self.navigation = None;
        self.view = None;
        self.state = state;
    }

    /// (Re)enumerate volumes; no volumes ends the session.
    fn select_volume(&mut self) {
        self.navigation = None;
        self.view = None;
        self.volumes = list_removable_volumes(self.source);

        if self.volumes.is_empty() {
            tracing::warn!("No removable volumes detected");
            self.notices.push("No removable volumes detected.".to_string());
            self.finish(BrowserState::Exhausted);
        } else {
            self.state = BrowserState::SelectingVolume;
        }
    }

    /// List the navigation's current folder, backing out of unreadable ones.
    fn open_current(&mut self) {
        loop {
            let Some(path) = self.navigation.as_ref().map(|n| n.current().to_path_buf()) else {
                self.select_volume();
                return;
            };

            match self.list(&path) {
                Ok(view) => {
                    self.view = Some(view);
                    self.state = BrowserState::Browsing(path);
                    return;
                }
                Err(e) => {
                    tracing::warn!("Cannot open {}: {}", path.display(), e);
                    self.notices.push(format!("Cannot open {}: {}", path.display(), e));
                    if !self.unwind() {
                        self.select_volume();
                        return;
                    }
                }
            }
        }
    }

    fn back(&mut self) {
        if self.unwind() {
            self.open_current();
        } else {
            self.select_volume();
        }
    }

    /// Pop one history entry. False when the history is exhausted.
    fn unwind(&mut self) -> bool {
        self.navigation.as_mut().is_some_and(NavigationState::navigate_up)
    }

    fn list(&self, path: &Path) -> io::Result<FolderView> {
        let listing = scanner::list_directory(path)?;
        let is_trace = is_trace_listing(&listing, self.matching);
        Ok(FolderView {
            path: path.to_path_buf(),
            folders: listing.folders,
            is_trace,
        })
    }
}
