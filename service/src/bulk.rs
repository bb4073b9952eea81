//! [`BulkActions`] orchestrating actions over selected [`ServiceRequest`]s.

use std::collections::BTreeSet;

use derive_more::{Display, Error, From};
use tokio::sync::Mutex;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::read::ServiceRequest;
use crate::{
    command::{execute_bulk_action, Command, ExecuteBulkAction},
    domain::{
        bulk::{ActionId, Params},
        ticket::{self, AssigneeId, Priority},
    },
    Locale,
};

/// Action applicable to the selected [`ServiceRequest`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BulkAction {
    /// ID of this [`BulkAction`].
    pub id: ActionId,

    /// Human-readable label.
    pub label: &'static str,

    /// Indicator whether at least one [`ServiceRequest`] must be selected.
    pub requires_selection: bool,

    /// Indicator whether an explicit confirmation is required.
    pub confirmation_required: bool,

    /// Indicator whether this [`BulkAction`] is destructive.
    pub danger_action: bool,
}

/// [`BulkActions`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Catalogue of the offered [`BulkAction`]s.
    pub actions: Vec<BulkAction>,

    /// Word to type literally to confirm [`ActionId::DeleteSelected`].
    pub delete_confirmation: &'static str,
}

impl Config {
    /// Creates the default [`Config`] labeled with the provided [`Locale`].
    #[must_use]
    pub fn from_locale(locale: &Locale) -> Self {
        let actions = ActionId::ALL
            .into_iter()
            .map(|id| BulkAction {
                id,
                label: locale.bulk_action(id),
                requires_selection: true,
                confirmation_required: matches!(
                    id,
                    ActionId::MarkCompleted | ActionId::DeleteSelected,
                ),
                danger_action: id == ActionId::DeleteSelected,
            })
            .collect();
        Self {
            actions,
            delete_confirmation: locale.delete_confirmation(),
        }
    }

    /// Looks up the [`BulkAction`] with the provided [`ActionId`].
    #[must_use]
    pub fn action(&self, id: ActionId) -> Option<&BulkAction> {
        self.actions.iter().find(|a| a.id == id)
    }
}

/// Input collected for a [`Pending`] action.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ActionData {
    /// Technician chosen for [`ActionId::AssignTechnician`].
    pub technician_id: Option<AssigneeId>,

    /// [`Priority`] chosen for [`ActionId::ChangePriority`].
    pub priority: Option<Priority>,

    /// Text typed to confirm [`ActionId::DeleteSelected`].
    pub confirmation_text: String,
}

/// Partial update of [`ActionData`].
///
/// Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct ActionDataUpdate {
    /// New technician.
    pub technician_id: Option<AssigneeId>,

    /// New [`Priority`].
    pub priority: Option<Priority>,

    /// New confirmation text.
    pub confirmation_text: Option<String>,
}

/// Action awaiting an explicit confirmation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pending {
    /// [`ActionId`] to be confirmed.
    pub action: ActionId,

    /// [`ActionData`] collected so far.
    pub data: ActionData,
}

impl Pending {
    /// Returns [`Params`] of this [`Pending`] action, unless its
    /// [`ActionData`] is incomplete.
    ///
    /// [`ActionId::DeleteSelected`] is complete only once the provided
    /// confirmation word is typed exactly.
    fn params(&self, delete_confirmation: &str) -> Option<Params> {
        let ActionData {
            technician_id,
            priority,
            confirmation_text,
        } = &self.data;
        match self.action {
            ActionId::AssignTechnician => {
                technician_id.clone().map(Params::AssignTechnician)
            }
            ActionId::ChangePriority => priority.map(Params::ChangePriority),
            ActionId::DeleteSelected => {
                (confirmation_text == delete_confirmation)
                    .then_some(Params::None)
            }
            ActionId::MarkInProgress
            | ActionId::MarkCompleted
            | ActionId::ExportSelected => Some(Params::None),
        }
    }
}

/// State of [`BulkActions`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct State {
    /// IDs of the selected [`ServiceRequest`]s.
    pub selection: BTreeSet<ticket::Id>,

    /// Action awaiting confirmation, if any.
    pub pending: Option<Pending>,
}

/// Outcome of choosing a [`BulkAction`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Action awaits a confirmation.
    Pending(ActionId),

    /// Action was executed right away.
    Executed(ActionId),
}

/// Orchestrator of [`BulkAction`]s over selected [`ServiceRequest`]s.
///
/// A successful execution clears the selection, after which the caller is
/// expected to refetch the list. A failed one preserves everything for a
/// retry.
#[derive(Debug)]
pub struct BulkActions<S> {
    /// Service to execute [`BulkAction`]s with.
    service: S,

    /// Configuration of these [`BulkActions`].
    config: Config,

    /// Current [`State`].
    state: Mutex<State>,
}

impl<S> BulkActions<S> {
    /// Creates new [`BulkActions`] with nothing selected.
    #[must_use]
    pub fn new(service: S, config: Config) -> Self {
        Self {
            service,
            config,
            state: Mutex::new(State::default()),
        }
    }

    /// Returns the offered [`BulkAction`]s.
    #[must_use]
    pub fn actions(&self) -> &[BulkAction] {
        &self.config.actions
    }

    /// Returns a snapshot of the current [`State`].
    pub async fn state(&self) -> State {
        self.state.lock().await.clone()
    }

    /// Toggles selection of the provided ID, returning whether it's selected
    /// now.
    pub async fn toggle(&self, id: ticket::Id) -> bool {
        let mut state = self.state.lock().await;
        if state.selection.remove(&id) {
            false
        } else {
            state.selection.insert(id)
        }
    }

    /// Replaces the selection with the provided IDs.
    pub async fn select(&self, ids: impl IntoIterator<Item = ticket::Id>) {
        self.state.lock().await.selection = ids.into_iter().collect();
    }

    /// Selects all the provided IDs, or deselects them if all of them are
    /// selected already.
    pub async fn select_all(&self, ids: impl IntoIterator<Item = ticket::Id>) {
        let ids = ids.into_iter().collect::<BTreeSet<_>>();
        let mut state = self.state.lock().await;
        if ids.is_subset(&state.selection) {
            state.selection.retain(|id| !ids.contains(id));
        } else {
            state.selection.extend(ids);
        }
    }

    /// Clears the selection.
    pub async fn clear_selection(&self) {
        self.state.lock().await.selection.clear();
    }

    /// Updates [`ActionData`] of the [`Pending`] action.
    ///
    /// # Errors
    ///
    /// With [`ActionError::NoPendingAction`] if no action is pending.
    pub async fn update_action_data(
        &self,
        update: ActionDataUpdate,
    ) -> Result<ActionData, Traced<ActionError>> {
        let mut state = self.state.lock().await;
        let pending = state
            .pending
            .as_mut()
            .ok_or(ActionError::NoPendingAction)
            .map_err(tracerr::wrap!())?;

        let ActionDataUpdate {
            technician_id,
            priority,
            confirmation_text,
        } = update;
        if let Some(id) = technician_id {
            pending.data.technician_id = Some(id);
        }
        if let Some(p) = priority {
            pending.data.priority = Some(p);
        }
        if let Some(text) = confirmation_text {
            pending.data.confirmation_text = text;
        }
        Ok(pending.data.clone())
    }

    /// Indicates whether confirming the [`Pending`] action is not possible
    /// yet, or there is no such action at all.
    pub async fn is_modal_action_disabled(&self) -> bool {
        self.state.lock().await.pending.as_ref().map_or(true, |p| {
            p.params(self.config.delete_confirmation).is_none()
        })
    }

    /// Drops the [`Pending`] action with its [`ActionData`], keeping the
    /// selection.
    pub async fn cancel(&self) {
        self.state.lock().await.pending = None;
    }
}

impl<S> BulkActions<S>
where
    S: Command<
        ExecuteBulkAction,
        Ok = (),
        Err = Traced<execute_bulk_action::ExecutionError>,
    >,
{
    /// Chooses the [`BulkAction`] with the provided [`ActionId`].
    ///
    /// Actions needing input or a confirmation become [`Pending`], others
    /// are executed right away.
    ///
    /// # Errors
    ///
    /// - [`ActionError::UnknownAction`] if the action is not offered;
    /// - [`ActionError::NoSelection`] if nothing is selected while the action
    ///   requires a selection;
    /// - [`ActionError::Execution`] if the immediate execution fails.
    #[tracing::instrument(skip_all, fields(action = %id))]
    pub async fn select_action(
        &self,
        id: ActionId,
    ) -> Result<Outcome, Traced<ActionError>> {
        use ActionError as E;

        let action = self
            .config
            .action(id)
            .copied()
            .ok_or(E::UnknownAction(id))
            .map_err(tracerr::wrap!())?;

        let mut state = self.state.lock().await;
        if action.requires_selection && state.selection.is_empty() {
            return Err(tracerr::new!(E::NoSelection(id)));
        }

        if action.confirmation_required || id.is_parameterized() {
            state.pending = Some(Pending {
                action: id,
                data: ActionData::default(),
            });
            return Ok(Outcome::Pending(id));
        }

        self.execute(&mut state, id, Params::None).await?;
        Ok(Outcome::Executed(id))
    }

    /// Executes the [`Pending`] action.
    ///
    /// # Errors
    ///
    /// - [`ActionError::NoPendingAction`] if no action is pending;
    /// - [`ActionError::IncompleteActionData`] if the collected
    ///   [`ActionData`] is not enough to execute the action;
    /// - [`ActionError::Execution`] if the execution fails, in which case the
    ///   selection and the [`Pending`] action are preserved.
    #[tracing::instrument(skip_all)]
    pub async fn confirm(&self) -> Result<ActionId, Traced<ActionError>> {
        use ActionError as E;

        let mut state = self.state.lock().await;
        let pending = state
            .pending
            .as_ref()
            .ok_or(E::NoPendingAction)
            .map_err(tracerr::wrap!())?;
        let id = pending.action;
        let params = pending
            .params(self.config.delete_confirmation)
            .ok_or(E::IncompleteActionData(id))
            .map_err(tracerr::wrap!())?;

        self.execute(&mut state, id, params).await?;
        Ok(id)
    }

    /// Executes the provided action over the current selection, clearing the
    /// [`State`] on success.
    async fn execute(
        &self,
        state: &mut State,
        action: ActionId,
        params: Params,
    ) -> Result<(), Traced<ActionError>> {
        let ids = state.selection.iter().cloned().collect();
        self.service
            .execute(ExecuteBulkAction {
                action,
                ids,
                params,
            })
            .await
            .inspect_err(|e| log::error!("`{action}` bulk action failed: {e}"))
            .map_err(tracerr::map_from_and_wrap!(=> ActionError))?;

        state.selection.clear();
        state.pending = None;
        Ok(())
    }
}

/// Error of a [`BulkActions`] operation.
#[derive(Debug, Display, Error, From)]
pub enum ActionError {
    /// Execution of the action failed.
    #[display("Bulk action failed: {_0}")]
    #[from]
    Execution(execute_bulk_action::ExecutionError),

    /// [`ActionData`] is not enough to execute the action.
    #[display("`{_0}` bulk action misses required input")]
    IncompleteActionData(#[error(not(source))] ActionId),

    /// No [`ServiceRequest`] is selected.
    #[display("`{_0}` bulk action requires a selection")]
    NoSelection(#[error(not(source))] ActionId),

    /// No action awaits a confirmation.
    #[display("No bulk action is pending")]
    NoPendingAction,

    /// Action is not offered.
    #[display("`{_0}` bulk action is not offered")]
    UnknownAction(#[error(not(source))] ActionId),
}

#[cfg(test)]
mod spec {
    use std::cell::{Cell, RefCell};

    use common::operations::Perform;
    use tracerr::Traced;

    use super::{
        ActionDataUpdate, ActionError, BulkActions, Config, Outcome,
    };
    use crate::{
        domain::{
            bulk::{ActionId, Mutation, Params},
            ticket::{self, Priority},
        },
        infra::{backend, Backend},
        locale::Language,
        Locale, Service,
    };

    #[derive(Default)]
    struct Recording {
        performed: RefCell<Vec<Mutation>>,
        failing: Cell<bool>,
    }

    impl Backend<Perform<Mutation>> for Recording {
        type Ok = ();
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            Perform(mutation): Perform<Mutation>,
        ) -> Result<Self::Ok, Self::Err> {
            if self.failing.get() {
                return Err(tracerr::new!(backend::Error::Other(
                    "service unavailable".into(),
                )));
            }
            self.performed.borrow_mut().push(mutation);
            Ok(())
        }
    }

    fn bulk(language: Language) -> BulkActions<Service<Recording>> {
        let locale = Locale::new(language);
        BulkActions::new(
            Service::new(crate::Config { locale }, Recording::default()),
            Config::from_locale(&locale),
        )
    }

    fn ids(ids: &[&str]) -> Vec<ticket::Id> {
        ids.iter().map(|&id| id.into()).collect()
    }

    fn performed(bulk: &BulkActions<Service<Recording>>) -> Vec<Mutation> {
        bulk.service.backend().performed.borrow().clone()
    }

    #[test]
    fn default_catalogue() {
        let config = Config::from_locale(&Locale::default());

        let completed = config.action(ActionId::MarkCompleted).unwrap();
        assert!(completed.confirmation_required);
        assert!(!completed.danger_action);

        let delete = config.action(ActionId::DeleteSelected).unwrap();
        assert!(delete.confirmation_required);
        assert!(delete.danger_action);
        assert_eq!(delete.label, "Seçilenleri Sil");

        let progress = config.action(ActionId::MarkInProgress).unwrap();
        assert!(!progress.confirmation_required);
        assert_eq!(config.actions.len(), 6);
    }

    #[tokio::test]
    async fn confirmation_required_action_waits() {
        let bulk = bulk(Language::Tr);
        bulk.select(ids(&["a", "b", "c"])).await;

        let outcome = bulk.select_action(ActionId::MarkCompleted).await.unwrap();

        assert_eq!(outcome, Outcome::Pending(ActionId::MarkCompleted));
        assert!(performed(&bulk).is_empty());
        assert!(!bulk.is_modal_action_disabled().await);

        assert_eq!(bulk.confirm().await.unwrap(), ActionId::MarkCompleted);
        let performed = performed(&bulk);
        assert_eq!(performed.len(), 1);
        assert_eq!(performed[0].ids, ids(&["a", "b", "c"]));
        assert_eq!(bulk.state().await, super::State::default());
    }

    #[tokio::test]
    async fn plain_action_executes_immediately() {
        let bulk = bulk(Language::Tr);
        bulk.select(ids(&["a"])).await;

        let outcome = bulk.select_action(ActionId::MarkInProgress).await.unwrap();

        assert_eq!(outcome, Outcome::Executed(ActionId::MarkInProgress));
        assert_eq!(performed(&bulk)[0].params, Params::None);
        assert!(bulk.state().await.selection.is_empty());
    }

    #[tokio::test]
    async fn empty_selection_is_refused() {
        let bulk = bulk(Language::Tr);

        let err = bulk.select_action(ActionId::ExportSelected).await.unwrap_err();

        assert!(matches!(err.as_ref(), ActionError::NoSelection(_)));
        assert!(performed(&bulk).is_empty());
    }

    #[tokio::test]
    async fn delete_needs_exact_confirmation_word() {
        let bulk = bulk(Language::Tr);
        bulk.select(ids(&["a"])).await;
        let _ = bulk.select_action(ActionId::DeleteSelected).await.unwrap();
        assert!(bulk.is_modal_action_disabled().await);

        for wrong in ["SIL", "sil", "SİL ", "DELETE"] {
            let _ = bulk
                .update_action_data(ActionDataUpdate {
                    confirmation_text: Some(wrong.into()),
                    ..ActionDataUpdate::default()
                })
                .await
                .unwrap();
            assert!(bulk.is_modal_action_disabled().await, "{wrong}");
        }
        let err = bulk.confirm().await.unwrap_err();
        assert!(matches!(err.as_ref(), ActionError::IncompleteActionData(_)));

        let _ = bulk
            .update_action_data(ActionDataUpdate {
                confirmation_text: Some("SİL".into()),
                ..ActionDataUpdate::default()
            })
            .await
            .unwrap();
        assert!(!bulk.is_modal_action_disabled().await);
    }

    #[tokio::test]
    async fn confirmation_word_follows_locale() {
        let bulk = bulk(Language::En);
        bulk.select(ids(&["a"])).await;
        let _ = bulk.select_action(ActionId::DeleteSelected).await.unwrap();

        let _ = bulk
            .update_action_data(ActionDataUpdate {
                confirmation_text: Some("DELETE".into()),
                ..ActionDataUpdate::default()
            })
            .await
            .unwrap();

        assert!(!bulk.is_modal_action_disabled().await);
    }

    #[tokio::test]
    async fn parameterized_actions_need_input() {
        let bulk = bulk(Language::Tr);
        bulk.select(ids(&["a", "b"])).await;

        let outcome = bulk.select_action(ActionId::ChangePriority).await.unwrap();
        assert_eq!(outcome, Outcome::Pending(ActionId::ChangePriority));
        assert!(bulk.is_modal_action_disabled().await);

        let _ = bulk
            .update_action_data(ActionDataUpdate {
                priority: Some(Priority::High),
                ..ActionDataUpdate::default()
            })
            .await
            .unwrap();
        assert!(!bulk.is_modal_action_disabled().await);

        let _ = bulk.confirm().await.unwrap();
        assert_eq!(
            performed(&bulk)[0].params,
            Params::ChangePriority(Priority::High),
        );
    }

    #[tokio::test]
    async fn failure_preserves_state() {
        let bulk = bulk(Language::Tr);
        bulk.select(ids(&["a", "b", "c"])).await;
        let _ = bulk.select_action(ActionId::AssignTechnician).await.unwrap();
        let _ = bulk
            .update_action_data(ActionDataUpdate {
                technician_id: Some("u-7".into()),
                ..ActionDataUpdate::default()
            })
            .await
            .unwrap();
        bulk.service.backend().failing.set(true);

        let err = bulk.confirm().await.unwrap_err();

        assert!(matches!(err.as_ref(), ActionError::Execution(_)));
        let state = bulk.state().await;
        assert_eq!(state.selection.len(), 3);
        let pending = state.pending.unwrap();
        assert_eq!(pending.action, ActionId::AssignTechnician);
        assert_eq!(
            pending.data.technician_id.as_ref().map(|id| id.as_str()),
            Some("u-7"),
        );

        bulk.service.backend().failing.set(false);
        let _ = bulk.confirm().await.unwrap();
        assert!(bulk.state().await.selection.is_empty());
    }

    #[tokio::test]
    async fn cancel_keeps_selection() {
        let bulk = bulk(Language::Tr);
        bulk.select(ids(&["a", "b"])).await;
        let _ = bulk.select_action(ActionId::MarkCompleted).await.unwrap();

        bulk.cancel().await;

        let state = bulk.state().await;
        assert_eq!(state.pending, None);
        assert_eq!(state.selection.len(), 2);
    }

    #[tokio::test]
    async fn selection_operations() {
        let bulk = bulk(Language::Tr);

        assert!(bulk.toggle("a".into()).await);
        assert!(!bulk.toggle("a".into()).await);

        bulk.select_all(ids(&["a", "b"])).await;
        assert_eq!(bulk.state().await.selection.len(), 2);
        bulk.select_all(ids(&["a", "b"])).await;
        assert!(bulk.state().await.selection.is_empty());

        bulk.select(ids(&["c"])).await;
        bulk.clear_selection().await;
        assert!(bulk.state().await.selection.is_empty());
    }
}
