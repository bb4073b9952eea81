//! [`Query`] collection related to [`ServiceRequest`]s.

use common::{
    operations::{By, Select},
    pagination::Page,
};
use tracerr::Traced;

use crate::{
    infra::{backend, Backend},
    read::{ticket::list, ServiceRequest},
    Service,
};

use super::{tickets, Query};

/// Queries a page of [`ServiceRequest`]s labeled with the [`Service`]
/// locale.
#[derive(Clone, Debug)]
pub struct List(pub list::Query);

impl<Bk> Query<List> for Service<Bk>
where
    Bk: Backend<
        Select<By<list::Page, list::Query>>,
        Ok = list::Page,
        Err = Traced<backend::Error>,
    >,
{
    type Ok = Page<ServiceRequest>;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        List(query): List,
    ) -> Result<Self::Ok, Self::Err> {
        let locale = self.config().locale;
        self.execute(tickets::List::by(query))
            .await
            .map(|page| {
                page.map(|ticket| ServiceRequest::from_ticket(ticket, &locale))
            })
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        pagination::{Limit, Page},
    };
    use serde_json::json;
    use tracerr::Traced;

    use super::List;
    use crate::{
        infra::{backend, Backend},
        locale::Language,
        read::ticket::list,
        Config, Locale, Query as _, Service,
    };

    struct Fixed;

    impl Backend<Select<By<list::Page, list::Query>>> for Fixed {
        type Ok = list::Page;
        type Err = Traced<backend::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<list::Page, list::Query>>,
        ) -> Result<Self::Ok, Self::Err> {
            let query = by.into_inner();
            assert_eq!(query.page, 3);
            Ok(Page {
                items: serde_json::from_value(json!([
                    { "id": "a", "status": "WAITING" },
                ]))
                .unwrap(),
                total: 21,
            })
        }
    }

    #[tokio::test]
    async fn maps_page_with_service_locale() {
        let service = Service::new(
            Config {
                locale: Locale::new(Language::En),
            },
            Fixed,
        );

        let page = service
            .execute(List(list::Query::new(3, Limit::Ten)))
            .await
            .unwrap();

        assert_eq!(page.total, 21);
        assert_eq!(page.items[0].status.label, "Waiting");
    }
}
