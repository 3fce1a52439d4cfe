use super::Error;
use async_trait::async_trait;
use http::header::REFERER;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{RequestBuilder, Url};
use std::sync::Arc;

/// HTTP access to the upstream site. Every instance owns its own cookie jar, so creating a new
/// instance starts a new upstream session.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url`, returning the body of a 2xx response.
    async fn get(&self, url: &str, referer: Option<&str>) -> Result<String, Error>;

    /// POST `form` url-encoded to `url` and return the response body whatever its status. The
    /// outcome of a form submission is judged by the cookies it leaves behind.
    async fn post_form(
        &self,
        url: &str,
        referer: Option<&str>,
        form: &[(&str, &str)],
    ) -> Result<String, Error>;

    /// Look up cookie `name` the jar would send to `url`. Never touches the network.
    fn cookie(&self, url: &str, name: &str) -> Option<String>;
}

/// Map transport failures and non-2xx statuses to Error
fn map_network_err(error: reqwest::Error) -> Error {
    match error.status() {
        Some(status) => Error::NetworkError(format!(
            "upstream responded {} for {}",
            status,
            error
                .url()
                .map(Url::as_str)
                .unwrap_or("(unknown url)")
        )),
        None => Error::NetworkError(error.to_string()),
    }
}

/// Find `name` in a `Cookie` header value (`a=1; b=2`). The jar only hands out the header it
/// would send, and the authentication cookie may arrive on any redirect hop, so the final
/// response's `Set-Cookie` list is not enough.
fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
}

pub struct HttpTransport {
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl HttpTransport {
    pub fn new() -> Result<Self, Error> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::ClientBuilder::new()
            .cookie_provider(jar.clone())
            .build()
            .map_err(|e| Error::InternalError(e.to_string()))?;

        Ok(HttpTransport { client, jar })
    }

    async fn send(
        request: RequestBuilder,
        referer: Option<&str>,
        require_success: bool,
    ) -> Result<String, Error> {
        let request = match referer {
            Some(referer) => request.header(REFERER, referer),
            None => request,
        };

        let response = request.send().await.map_err(map_network_err)?;
        log::trace!("{} responded {}", response.url(), response.status());

        let response = if require_success {
            response.error_for_status().map_err(map_network_err)?
        } else {
            response
        };

        response
            .text()
            .await
            .map_err(|e| Error::NetworkError(format!("Error reading upstream response: {}", e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, referer: Option<&str>) -> Result<String, Error> {
        log::trace!("GET {}", url);
        HttpTransport::send(self.client.get(url), referer, true).await
    }

    async fn post_form(
        &self,
        url: &str,
        referer: Option<&str>,
        form: &[(&str, &str)],
    ) -> Result<String, Error> {
        log::trace!("POST {}", url);
        HttpTransport::send(self.client.post(url).form(form), referer, false).await
    }

    fn cookie(&self, url: &str, name: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let header = self.jar.cookies(&url)?;

        header
            .to_str()
            .ok()
            .and_then(|header| find_cookie(header, name))
    }
}
