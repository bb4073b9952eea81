//! REST [`Backend`] implementation.

use std::time::Duration;

use common::operations::{By, Perform, Select};
use derive_more::{Display, Error as StdError, From};
use reqwest::{
    header::{self, HeaderMap, HeaderValue, InvalidHeaderValue},
    RequestBuilder,
};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        bulk,
        ticket::{self, AssigneeId},
    },
    infra::{backend, Backend},
    read::ticket::{list, Counts},
};

/// [`Rest`] client configuration.
#[derive(Debug)]
pub struct Config {
    /// Base URL of the ticket API, e.g. `https://example.com/api`.
    pub url: String,

    /// Bearer token to authorize with, if any.
    pub token: Option<SecretString>,

    /// Timeout of a single request.
    pub timeout: Duration,
}

/// REST client of the ticket API.
#[derive(Clone, Debug)]
pub struct Rest {
    /// Underlying HTTP client.
    client: reqwest::Client,

    /// Base URL without a trailing slash.
    url: String,
}

impl Rest {
    /// Creates a new [`Rest`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the token is not a valid header value or the HTTP client cannot be
    /// built.
    pub fn new(conf: &Config) -> Result<Self, Traced<backend::Error>> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &conf.token {
            let mut auth =
                HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                    .map_err(tracerr::from_and_wrap!(=> Error))
                    .map_err(tracerr::map_from)?;
            auth.set_sensitive(true);
            drop(headers.insert(header::AUTHORIZATION, auth));
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(conf.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Ok(Self {
            client,
            url: conf.url.trim_end_matches('/').to_owned(),
        })
    }

    /// Returns the URL of the provided `path` under the base URL.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.url)
    }

    /// Sends the provided request, failing on a non-success status.
    async fn send(
        req: RequestBuilder,
    ) -> Result<reqwest::Response, Traced<Error>> {
        let resp = req.send().await.map_err(tracerr::from_and_wrap!(=> Error))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::warn!("ticket API responded with `{status}`: {body}");
            return Err(tracerr::new!(Error::Status {
                status: status.as_u16(),
                body,
            }));
        }
        Ok(resp)
    }

    /// Sends the provided request and decodes its JSON response.
    async fn fetch<T: DeserializeOwned>(
        req: RequestBuilder,
    ) -> Result<T, Traced<Error>> {
        Self::send(req)
            .await?
            .json()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
    }
}

/// [`Rest`] client error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Request failed to be sent or its response failed to be decoded.
    #[display("Ticket API request failed: {_0}")]
    Request(reqwest::Error),

    /// Ticket API responded with a non-success status.
    #[display("Ticket API responded with `{status}`: {body}")]
    #[from(ignore)]
    Status {
        /// HTTP status code.
        status: u16,

        /// Response body, if readable.
        body: String,
    },

    /// Bearer token is not a valid header value.
    #[display("Invalid bearer token: {_0}")]
    Token(InvalidHeaderValue),
}

impl Backend<Select<By<list::Page, list::Query>>> for Rest {
    type Ok = list::Page;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::Page, list::Query>>,
    ) -> Result<Self::Ok, Self::Err> {
        let req = self.client.get(self.endpoint("tickets")).query(by.get());
        Self::fetch::<list::Response>(req)
            .await
            .map(Into::into)
            .map_err(tracerr::map_from)
    }
}

impl Backend<Select<By<Counts, ()>>> for Rest {
    type Ok = Counts;
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        _: Select<By<Counts, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let req = self.client.get(self.endpoint("tickets/summary"));
        Self::fetch(req).await.map_err(tracerr::map_from)
    }
}

/// Body of a bulk mutation request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkBody<'a> {
    /// Action to apply.
    action: &'static str,

    /// IDs of the tickets to apply the action to.
    ticket_ids: &'a [ticket::Id],

    /// Technician to assign the tickets to.
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee_id: Option<&'a AssigneeId>,

    /// New priority of the tickets.
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<&'static str>,
}

impl<'a> From<&'a bulk::Mutation> for BulkBody<'a> {
    fn from(mutation: &'a bulk::Mutation) -> Self {
        let (assignee_id, priority) = match &mutation.params {
            bulk::Params::None => (None, None),
            bulk::Params::AssignTechnician(id) => (Some(id), None),
            bulk::Params::ChangePriority(p) => (None, Some(p.as_str())),
        };
        Self {
            action: mutation.action.as_str(),
            ticket_ids: &mutation.ids,
            assignee_id,
            priority,
        }
    }
}

impl Backend<Perform<bulk::Mutation>> for Rest {
    type Ok = ();
    type Err = Traced<backend::Error>;

    async fn execute(
        &self,
        Perform(mutation): Perform<bulk::Mutation>,
    ) -> Result<Self::Ok, Self::Err> {
        let req = self
            .client
            .post(self.endpoint("tickets/bulk"))
            .json(&BulkBody::from(&mutation));
        Self::send(req)
            .await
            .map(drop)
            .map_err(tracerr::map_from)
    }
}
