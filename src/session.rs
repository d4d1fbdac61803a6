//! One dashboard view: page, charts, tabs and in-flight requests.
//!
//! Each user action is split in two: `begin_*` takes a ticket and prepares the
//! request, and `complete_*` applies the outcome. Completions whose ticket has
//! been superseded, or whose tab is no longer active, are dropped. The blocking
//! helpers (`submit`, `switch_tab`, `load_initial`) run both halves against a
//! [`Backend`].

use tracing::{debug, error, info, warn};

use crate::charts::ChartRegistry;
use crate::client::{Backend, ClientError};
use crate::comparison::{self, LOAD_FAILED_MESSAGE, UNAVAILABLE_MESSAGE};
use crate::dashboard;
use crate::form::{ProfileForm, FIELD_IDS};
use crate::html;
use crate::model::{DatasetStatsResponse, ModelInfoResponse, PredictionRequest, PredictionResponse};
use crate::page::{Page, PageError};
use crate::prediction::{self, RenderOptions, ResultView};
use crate::requests::{RequestSlot, RequestTracker, Ticket};
use crate::tabs::{self, LoadAction, TabController, TabError, DASHBOARD_TAB, MODELS_TAB};

#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Rendered,
    Prediction(ResultView),
    Stale,
    Skipped,
}

#[derive(Debug)]
pub struct DashboardSession {
    page: Page,
    charts: ChartRegistry,
    tabs: TabController,
    tracker: RequestTracker,
    options: RenderOptions,
}

impl DashboardSession {
    pub fn new(initial_tab: &str, options: RenderOptions) -> Result<Self, TabError> {
        let tabs = TabController::new(initial_tab)?;
        let page = html::skeleton(initial_tab);
        Ok(DashboardSession {
            page,
            charts: ChartRegistry::new(),
            tabs,
            tracker: RequestTracker::new(),
            options,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    pub fn active_tab(&self) -> &str {
        self.tabs.active()
    }

    /// Eager load for the tab that is active in the initial markup.
    pub fn initial_load(&self) -> LoadAction {
        match self.tabs.active() {
            DASHBOARD_TAB => LoadAction::Dashboard,
            _ => LoadAction::None,
        }
    }

    /// Keeps the typed values on the form and takes a ticket for the request.
    pub fn begin_submit(&mut self, form: &ProfileForm) -> Result<(Ticket, PredictionRequest), PageError> {
        for id in FIELD_IDS {
            self.page.set_value(id, form.value(id).unwrap_or_default())?;
        }
        let request = form.serialize();
        let ticket = self.tracker.begin(RequestSlot::Predict);
        debug!(?request, "prediction submitted");
        Ok((ticket, request))
    }

    pub fn complete_submit(&mut self, ticket: Ticket, outcome: Result<PredictionResponse, ClientError>) -> Result<Applied, PageError> {
        if !self.tracker.is_current(&ticket) {
            debug!("dropping superseded prediction response");
            return Ok(Applied::Stale);
        }
        let view = match outcome {
            Ok(response) => prediction::render_prediction(&mut self.page, &response, &self.options)?,
            Err(err) => {
                error!(error = %err, "prediction request failed");
                prediction::render_failure(&mut self.page, &err.to_string())?
            }
        };
        if let ResultView::Error(message) = &view {
            warn!(%message, "prediction rendered as error");
        }
        Ok(Applied::Prediction(view))
    }

    /// Switch tabs. Returns a ticket when the new tab has data to load.
    pub fn activate_tab(&mut self, tab: &str, trigger: &str) -> Result<Option<(LoadAction, Ticket)>, TabError> {
        let action = self.tabs.activate(&mut self.page, tab, trigger)?;
        // loads for tabs we just left can no longer land
        if tab != DASHBOARD_TAB {
            self.tracker.cancel(RequestSlot::Dashboard);
        }
        if tab != MODELS_TAB {
            self.tracker.cancel(RequestSlot::Models);
        }
        Ok(self.begin_load(action))
    }

    pub fn begin_load(&mut self, action: LoadAction) -> Option<(LoadAction, Ticket)> {
        let slot = match action {
            LoadAction::Dashboard => RequestSlot::Dashboard,
            LoadAction::ModelPerformance => RequestSlot::Models,
            LoadAction::None => return None,
        };
        Some((action, self.tracker.begin(slot)))
    }

    pub fn complete_dashboard(&mut self, ticket: Ticket, outcome: Result<DatasetStatsResponse, ClientError>) -> Result<Applied, PageError> {
        if !self.accepts(&ticket, DASHBOARD_TAB) {
            return Ok(Applied::Stale);
        }
        match outcome {
            Ok(DatasetStatsResponse { success: true, stats: Some(stats), .. }) => {
                dashboard::render_dashboard(&mut self.page, &mut self.charts, &stats)?;
                Ok(Applied::Rendered)
            }
            Ok(response) => {
                warn!(error = ?response.error, "dataset statistics unavailable");
                Ok(Applied::Skipped)
            }
            Err(err) => {
                error!(error = %err, "error loading dashboard");
                Ok(Applied::Skipped)
            }
        }
    }

    pub fn complete_models(&mut self, ticket: Ticket, outcome: Result<ModelInfoResponse, ClientError>) -> Result<Applied, PageError> {
        if !self.accepts(&ticket, MODELS_TAB) {
            return Ok(Applied::Stale);
        }
        match outcome {
            Ok(ModelInfoResponse { success: true, results: Some(results), .. }) => {
                comparison::render_model_comparison(&mut self.page, &mut self.charts, &results)?;
            }
            Ok(response) => {
                warn!(error = ?response.error, "model results unavailable");
                comparison::render_unavailable(&mut self.page, UNAVAILABLE_MESSAGE)?;
            }
            Err(err) => {
                error!(error = %err, "error loading model performance");
                comparison::render_unavailable(&mut self.page, LOAD_FAILED_MESSAGE)?;
            }
        }
        Ok(Applied::Rendered)
    }

    fn accepts(&self, ticket: &Ticket, tab: &str) -> bool {
        if !self.tracker.is_current(ticket) {
            debug!(?ticket, "dropping superseded load");
            return false;
        }
        if !self.tabs.is_active(tab) {
            debug!(tab, "dropping load for inactive tab");
            return false;
        }
        true
    }

    pub fn submit(&mut self, backend: &dyn Backend, form: &ProfileForm) -> Result<Applied, PageError> {
        let (ticket, request) = self.begin_submit(form)?;
        let outcome = backend.predict(&request);
        self.complete_submit(ticket, outcome)
    }

    pub fn switch_tab(&mut self, backend: &dyn Backend, tab: &str) -> Result<Applied, TabError> {
        let trigger = tabs::button_id(tab);
        match self.activate_tab(tab, &trigger)? {
            Some((action, ticket)) => Ok(self.run_load(backend, action, ticket)?),
            None => Ok(Applied::Skipped),
        }
    }

    pub fn load_initial(&mut self, backend: &dyn Backend) -> Result<Applied, PageError> {
        match self.begin_load(self.initial_load()) {
            Some((action, ticket)) => {
                info!(tab = self.tabs.active(), "loading initial tab");
                self.run_load(backend, action, ticket)
            }
            None => Ok(Applied::Skipped),
        }
    }

    fn run_load(&mut self, backend: &dyn Backend, action: LoadAction, ticket: Ticket) -> Result<Applied, PageError> {
        match action {
            LoadAction::Dashboard => {
                let outcome = backend.dataset_stats();
                self.complete_dashboard(ticket, outcome)
            }
            LoadAction::ModelPerformance => {
                let outcome = backend.model_info();
                self.complete_models(ticket, outcome)
            }
            LoadAction::None => Ok(Applied::Skipped),
        }
    }

    pub fn render_document(&self) -> String {
        html::render_document(&self.page, &self.charts)
    }
}
