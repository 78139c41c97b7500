use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::container::ContainerTransport;
use crate::error::{not_found_error, unauthorized_error, upstream_error, Error};
use crate::external::session::SessionProvider;

#[derive(Debug)]
pub struct PodTransport<S> {
    client: reqwest::Client,
    session: S,
}

impl<S: SessionProvider> PodTransport<S> {
    pub fn new(session: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            session,
        }
    }

    fn token(&self) -> Result<String, Error> {
        self.session.access_token().ok_or_else(unauthorized_error)
    }
}

#[async_trait]
impl<S: SessionProvider> ContainerTransport for PodTransport<S> {
    #[tracing::instrument(skip(self))]
    async fn get(&self, locator: &str) -> Result<String, Error> {
        let token = self.token()?;

        let res = self.client.get(locator).bearer_auth(token).send().await?;

        let status_code = res.status().as_u16();

        if status_code == 404 {
            return Err(not_found_error());
        } else if status_code == 401 || status_code == 403 {
            return Err(unauthorized_error());
        } else if status_code >= 400 {
            return Err(upstream_error());
        }

        Ok(res.text().await?)
    }

    #[tracing::instrument(skip(self, body))]
    async fn put(&self, locator: &str, body: String) -> Result<(), Error> {
        let token = self.token()?;

        let res = self
            .client
            .put(locator)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code == 404 {
            return Err(not_found_error());
        } else if status_code == 401 || status_code == 403 {
            return Err(unauthorized_error());
        } else if status_code >= 400 {
            return Err(upstream_error());
        }

        Ok(())
    }
}
