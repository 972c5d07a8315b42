//! Builder for assembling a draw controller.

use super::error::BuildError;
use super::DrawController;
use crate::config::DrawConfiguration;
use crate::display::RevealDisplay;
use crate::history::{HistoryStore, KeyValueStore};
use crate::schedule::Scheduler;
use crate::selector::Selector;

/// Fluent builder for [`DrawController`].
///
/// Selector, storage, scheduler and display are required; configuration
/// and the history key have defaults.
pub struct DrawControllerBuilder<Sel, K, Sch, D> {
    selector: Option<Sel>,
    storage: Option<K>,
    history_key: Option<String>,
    scheduler: Option<Sch>,
    display: Option<D>,
    config: DrawConfiguration,
}

impl<Sel, K, Sch, D> DrawControllerBuilder<Sel, K, Sch, D> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            selector: None,
            storage: None,
            history_key: None,
            scheduler: None,
            display: None,
            config: DrawConfiguration::default(),
        }
    }

    /// Set the winner selector (required).
    pub fn selector(mut self, selector: Sel) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Set the storage backing the history (required).
    pub fn storage(mut self, storage: K) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Store the history under `key` instead of the default key.
    pub fn history_key(mut self, key: impl Into<String>) -> Self {
        self.history_key = Some(key.into());
        self
    }

    /// Set the timer service driving reveals (required).
    pub fn scheduler(mut self, scheduler: Sch) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Set the result surface (required).
    pub fn display(mut self, display: D) -> Self {
        self.display = Some(display);
        self
    }

    pub fn config(mut self, config: DrawConfiguration) -> Self {
        self.config = config;
        self
    }
}

impl<Sel, K, Sch, D> DrawControllerBuilder<Sel, K, Sch, D>
where
    Sel: Selector,
    K: KeyValueStore,
    Sch: Scheduler,
    D: RevealDisplay,
{
    /// Build the controller and load the persisted history.
    ///
    /// A history that cannot be loaded is not an error: the controller
    /// starts with an empty log and keeps the warning, see
    /// [`DrawController::load_warning`].
    pub fn build(self) -> Result<DrawController<Sel, K, Sch, D>, BuildError> {
        let selector = self.selector.ok_or(BuildError::MissingSelector)?;
        let storage = self.storage.ok_or(BuildError::MissingStorage)?;
        let scheduler = self.scheduler.ok_or(BuildError::MissingScheduler)?;
        let display = self.display.ok_or(BuildError::MissingDisplay)?;

        let mut history = HistoryStore::new(storage);
        if let Some(key) = self.history_key {
            history = history.with_key(key);
        }
        let load_warning = history.load().into_warning();

        Ok(DrawController::assemble(
            self.config,
            selector,
            history,
            scheduler,
            display,
            load_warning,
        ))
    }
}

impl<Sel, K, Sch, D> Default for DrawControllerBuilder<Sel, K, Sch, D> {
    fn default() -> Self {
        Self::new()
    }
}
