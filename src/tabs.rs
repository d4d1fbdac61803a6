use thiserror::Error;
use tracing::debug;

use crate::page::{Page, PageError};

pub const PREDICT_TAB: &str = "predict";
pub const DASHBOARD_TAB: &str = "dashboard";
pub const MODELS_TAB: &str = "models";
pub const ABOUT_TAB: &str = "about";

pub const TABS: [&str; 4] = [PREDICT_TAB, DASHBOARD_TAB, MODELS_TAB, ABOUT_TAB];

pub const PANEL_CLASS: &str = "tab-content";
pub const BUTTON_CLASS: &str = "tab-btn";
pub const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TabError {
    #[error("unknown tab `{0}`")]
    Unknown(String),
    #[error(transparent)]
    Page(#[from] PageError),
}

// Data load a tab fires when it becomes active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    None,
    Dashboard,
    ModelPerformance,
}

pub fn panel_id(tab: &str) -> String {
    format!("{tab}-tab")
}

pub fn button_id(tab: &str) -> String {
    format!("{tab}-btn")
}

pub fn load_action(tab: &str) -> LoadAction {
    match tab {
        DASHBOARD_TAB => LoadAction::Dashboard,
        MODELS_TAB => LoadAction::ModelPerformance,
        _ => LoadAction::None,
    }
}

#[derive(Debug, Clone)]
pub struct TabController {
    active: String,
}

impl TabController {
    /// Start on `initial`, which must be one of [`TABS`].
    pub fn new(initial: &str) -> Result<Self, TabError> {
        if !TABS.contains(&initial) {
            return Err(TabError::Unknown(initial.to_string()));
        }
        Ok(TabController { active: initial.to_string() })
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn is_active(&self, tab: &str) -> bool {
        self.active == tab
    }

    /// Activate `tab`, highlighting `trigger` (the selector control that asked for it).
    /// Every activation returns its load action; nothing is cached between switches.
    pub fn activate(&mut self, page: &mut Page, tab: &str, trigger: &str) -> Result<LoadAction, TabError> {
        if !TABS.contains(&tab) {
            return Err(TabError::Unknown(tab.to_string()));
        }
        page.remove_class_where(PANEL_CLASS, ACTIVE_CLASS);
        page.remove_class_where(BUTTON_CLASS, ACTIVE_CLASS);
        page.add_class(&panel_id(tab), ACTIVE_CLASS)?;
        page.add_class(trigger, ACTIVE_CLASS)?;
        debug!(from = %self.active, to = tab, "tab switched");
        self.active = tab.to_string();
        Ok(load_action(tab))
    }
}
