//! [`Command`] for executing a bulk action over many [`Ticket`]s.

use common::operations::Perform;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Ticket;
use crate::{
    domain::{bulk, ticket},
    infra::{backend, Backend},
    Service,
};

use super::Command;

/// [`Command`] for executing a bulk action over many [`Ticket`]s.
///
/// Succeeds or fails as a whole: partial success is not reported.
#[derive(Clone, Debug)]
pub struct ExecuteBulkAction {
    /// [`bulk::ActionId`] to execute.
    pub action: bulk::ActionId,

    /// IDs of the [`Ticket`]s to execute the action over.
    pub ids: Vec<ticket::Id>,

    /// Action-specific [`bulk::Params`].
    pub params: bulk::Params,
}

impl<Bk> Command<ExecuteBulkAction> for Service<Bk>
where
    Bk: Backend<
        Perform<bulk::Mutation>,
        Ok = (),
        Err = Traced<backend::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ExecuteBulkAction,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ExecuteBulkAction {
            action,
            ids,
            params,
        } = cmd;

        if ids.is_empty() {
            return Err(tracerr::new!(E::NoSelection(action)));
        }
        if !params.fits(action) {
            return Err(tracerr::new!(E::MissingParameter(action)));
        }

        let count = ids.len();
        self.backend()
            .execute(Perform(bulk::Mutation {
                action,
                ids,
                params,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("executed `{action}` bulk action over {count} ticket(s)");
        Ok(())
    }
}

/// Error of [`ExecuteBulkAction`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Backend`] error.
    #[display("`Backend` operation failed: {_0}")]
    #[from]
    Backend(backend::Error),

    /// Action requires parameters that were not provided.
    #[display("`{_0}` bulk action misses its parameter")]
    MissingParameter(#[error(not(source))] bulk::ActionId),

    /// No [`Ticket`]s to execute the action over.
    #[display("`{_0}` bulk action has no tickets selected")]
    NoSelection(#[error(not(source))] bulk::ActionId),
}

#[cfg(test)]
mod spec {
    use std::cell::RefCell;

    use common::operations::Perform;
    use tracerr::Traced;

    use super::{ExecuteBulkAction, ExecutionError};
    use crate::{
        domain::{bulk, ticket::Priority},
        infra::{backend, Backend},
        Command as _, Config, Service,
    };

    #[derive(Default)]
    struct Recording(RefCell<Vec<bulk::Mutation>>);

    impl Backend<Perform<bulk::Mutation>> for Recording {
        type Ok = ();
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            Perform(mutation): Perform<bulk::Mutation>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.borrow_mut().push(mutation);
            Ok(())
        }
    }

    #[tokio::test]
    async fn performs_mutation() {
        let service = Service::new(Config::default(), Recording::default());

        service
            .execute(ExecuteBulkAction {
                action: bulk::ActionId::ChangePriority,
                ids: vec!["a".into(), "b".into()],
                params: bulk::Params::ChangePriority(Priority::Low),
            })
            .await
            .unwrap();

        let performed = service.backend().0.borrow();
        assert_eq!(performed.len(), 1);
        assert_eq!(performed[0].ids.len(), 2);
    }

    #[tokio::test]
    async fn refuses_incomplete_mutation() {
        let service = Service::new(Config::default(), Recording::default());

        let err = service
            .execute(ExecuteBulkAction {
                action: bulk::ActionId::AssignTechnician,
                ids: vec!["a".into()],
                params: bulk::Params::None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::MissingParameter(_)));

        let err = service
            .execute(ExecuteBulkAction {
                action: bulk::ActionId::MarkCompleted,
                ids: vec![],
                params: bulk::Params::None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NoSelection(_)));

        assert!(service.backend().0.borrow().is_empty());
    }
}
