//! Which region the single-page client shows.

/// Mutually exclusive view modes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Home,
    Viewing(String),
    Creating,
}

/// Viewport effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Top,
    Keep,
}

/// Navigation state. There is no history: every transition replaces the
/// mode outright.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    mode: ViewMode,
}

impl Navigation {
    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.mode {
            ViewMode::Viewing(id) => Some(id),
            _ => None,
        }
    }

    pub fn select(&mut self, id: impl Into<String>) -> Scroll {
        self.mode = ViewMode::Viewing(id.into());
        Scroll::Top
    }

    pub fn write_post(&mut self) -> Scroll {
        self.mode = ViewMode::Creating;
        Scroll::Top
    }

    pub fn go_home(&mut self) -> Scroll {
        self.mode = ViewMode::Home;
        Scroll::Keep
    }
}
