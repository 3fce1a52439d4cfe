use super::document::Document;
use super::endpoint;
use super::transport::Transport;
use super::Error;
use crate::model;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated { token: String },
}

/// Upstream session bound to one cookie jar (the `transport`).
pub struct SiteSession<T> {
    site: model::Site,
    transport: T,
    state: SessionState,
}

impl<T: Transport> SiteSession<T> {
    pub fn new(site: model::Site, transport: T) -> Self {
        SiteSession {
            site,
            transport,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn url(&self, endpoint: &endpoint::Endpoint) -> String {
        format!("{}{}", self.site.base_url, endpoint)
    }

    fn auth_cookie(&self) -> Option<String> {
        self.transport
            .cookie(&self.site.base_url, endpoint::AUTH_COOKIE)
    }

    /// Log in with the site credentials: fetch the login form, echo its anti-forgery token back
    /// with the credentials, and check the authentication cookie was issued.
    pub async fn login(&mut self) -> Result<(), Error> {
        self.state = SessionState::Unauthenticated;
        let login_url = self.url(endpoint::LOGIN);

        let login_page = self.transport.get(&login_url, None).await?;
        let authenticity_token = Document::parse(&login_page)
            .first_attr(endpoint::TOKEN_INPUT, endpoint::VALUE_ATTR)?
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                Error::ParseError(format!(
                    "no {} field found on login page",
                    endpoint::FORM_TOKEN
                ))
            })?;

        let form = [
            (endpoint::FORM_EMAIL, self.site.username.as_str()),
            (endpoint::FORM_PASSWORD, self.site.password.as_str()),
            (endpoint::FORM_TOKEN, authenticity_token.as_str()),
            (endpoint::FORM_COMMIT, endpoint::FORM_COMMIT_VALUE),
        ];
        self.transport
            .post_form(&login_url, Some(login_url.as_str()), &form)
            .await?;

        match self.auth_cookie() {
            Some(token) => {
                log::info!("Login successful for {}", self.site.username);
                self.state = SessionState::Authenticated { token };
                Ok(())
            }
            None => {
                log::warn!("Login failed for {}", self.site.username);
                Err(Error::AuthenticationError(format!(
                    "no {} cookie received after login; credentials rejected?",
                    endpoint::AUTH_COOKIE
                )))
            }
        }
    }

    /// Local check only: a server-side expired session still counts as authenticated until
    /// the cookie itself disappears from the jar.
    pub fn is_authenticated(&self) -> bool {
        match self.state {
            SessionState::Authenticated { .. } => self.auth_cookie().is_some(),
            SessionState::Unauthenticated => false,
        }
    }

    /// GET `path` below the base url with the session cookies.
    pub async fn fetch_authenticated(&self, path: &str) -> Result<String, Error> {
        if self.state == SessionState::Unauthenticated {
            return Err(Error::AuthenticationError(String::from(
                "session is not logged in",
            )));
        }

        let referer = self.url(endpoint::TANKS);
        self.transport
            .get(&self.url(path), Some(referer.as_str()))
            .await
    }
}
