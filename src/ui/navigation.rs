use std::path::{Path, PathBuf};

/// Navigation state: tracks the current folder and history.
#[derive(Debug, Clone)]
pub struct NavigationState {
    /// Stack of previously visited folders (for back navigation)
    history: Vec<PathBuf>,
    /// Current folder
    current: PathBuf,
}

impl NavigationState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            history: Vec::new(),
            current: root,
        }
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    /// Descend into `folder`, remembering where we came from.
    pub fn descend(&mut self, folder: PathBuf) {
        let previous = std::mem::replace(&mut self.current, folder);
        self.history.push(previous);
    }

    /// Navigate back one level.
    /// Returns false if the history is empty.
    pub fn navigate_up(&mut self) -> bool {
        if let Some(prev) = self.history.pop() {
            self.current = prev;
            true
        } else {
            false
        }
    }

    /// Current depth in navigation history.
    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::NavigationState;

    #[test]
    fn back_unwinds_in_reverse_order() {
        let mut nav = NavigationState::new(PathBuf::from("/media/usb"));
        nav.descend(PathBuf::from("/media/usb/2025"));
        nav.descend(PathBuf::from("/media/usb/2025/AU1, drive, Ulm"));
        assert_eq!(nav.depth(), 2);

        assert!(nav.navigate_up());
        assert_eq!(nav.current(), Path::new("/media/usb/2025"));
        assert!(nav.navigate_up());
        assert_eq!(nav.current(), Path::new("/media/usb"));
        assert!(!nav.navigate_up());
        assert_eq!(nav.current(), Path::new("/media/usb"));
    }
}
