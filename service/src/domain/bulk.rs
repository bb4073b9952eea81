//! Bulk mutation definitions.

use strum::{Display, EnumString, IntoStaticStr};

use super::ticket::{self, AssigneeId, Priority};

/// ID of an action applicable to many [`Ticket`]s at once.
///
/// [`Ticket`]: ticket::Ticket
#[derive(
    Clone, Copy, Debug, Display, EnumString, Eq, Hash, IntoStaticStr, PartialEq,
)]
#[strum(serialize_all = "snake_case")]
pub enum ActionId {
    /// Move the selected requests to [`ticket::Status::InProgress`].
    MarkInProgress,

    /// Move the selected requests to [`ticket::Status::Resolved`].
    MarkCompleted,

    /// Assign the selected requests to a technician.
    AssignTechnician,

    /// Change [`Priority`] of the selected requests.
    ChangePriority,

    /// Export the selected requests.
    ExportSelected,

    /// Delete the selected requests irreversibly.
    DeleteSelected,
}

impl ActionId {
    /// All the [`ActionId`]s, in the order they are offered.
    pub const ALL: [Self; 6] = [
        Self::MarkInProgress,
        Self::MarkCompleted,
        Self::AssignTechnician,
        Self::ChangePriority,
        Self::ExportSelected,
        Self::DeleteSelected,
    ];

    /// Returns the `snake_case` name of this [`ActionId`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Indicates whether this action can't be executed without additional
    /// [`Params`].
    #[must_use]
    pub const fn is_parameterized(self) -> bool {
        matches!(self, Self::AssignTechnician | Self::ChangePriority)
    }
}

/// Action-specific parameters of a [`Mutation`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Params {
    /// Action requires no parameters.
    #[default]
    None,

    /// Technician to assign the requests to.
    AssignTechnician(AssigneeId),

    /// New [`Priority`] of the requests.
    ChangePriority(Priority),
}

impl Params {
    /// Indicates whether these [`Params`] satisfy the provided [`ActionId`].
    #[must_use]
    pub const fn fits(&self, action: ActionId) -> bool {
        match action {
            ActionId::AssignTechnician => {
                matches!(self, Self::AssignTechnician(_))
            }
            ActionId::ChangePriority => matches!(self, Self::ChangePriority(_)),
            ActionId::MarkInProgress
            | ActionId::MarkCompleted
            | ActionId::ExportSelected
            | ActionId::DeleteSelected => true,
        }
    }
}

/// Single mutation of many [`Ticket`]s, succeeding or failing as a whole.
///
/// [`Ticket`]: ticket::Ticket
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mutation {
    /// [`ActionId`] to apply.
    pub action: ActionId,

    /// IDs of the [`Ticket`]s to apply the action to.
    ///
    /// [`Ticket`]: ticket::Ticket
    pub ids: Vec<ticket::Id>,

    /// Action-specific [`Params`].
    pub params: Params,
}
