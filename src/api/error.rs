use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::fmt;
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    ConfigurationError(String),
    NetworkError(String),
    AuthenticationError(String),
    ParseError(String),
    FormatError,
    InternalError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigurationError(s) => write!(f, "configuration error: {}", s),
            Error::NetworkError(s) => write!(f, "network error: {}", s),
            Error::AuthenticationError(s) => write!(f, "authentication error: {}", s),
            Error::ParseError(s) => write!(f, "parse error: {}", s),
            Error::FormatError => write!(f, "unable to format metrics"),
            Error::InternalError(s) => write!(f, "internal error: {}", s),
        }
    }
}

impl std::error::Error for Error {}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Error {
    /// Status and HTML body reported to API clients. Upstream text is escaped, it may carry
    /// scraped markup.
    fn error_page(&self) -> (Status, String) {
        let (status, heading, detail) = match self {
            Error::NetworkError(s) => (
                Status::BadGateway,
                "502 Bad Gateway",
                format!("Unable to reach upstream site: <code>{}</code>", escape_html(s)),
            ),
            Error::AuthenticationError(s) => (
                Status::BadGateway,
                "502 Bad Gateway",
                format!(
                    "Error while authenticating to upstream site: <code>{}</code>",
                    escape_html(s)
                ),
            ),
            Error::ParseError(s) => (
                Status::BadGateway,
                "502 Bad Gateway",
                format!("Unexpected upstream page markup: <code>{}</code>", escape_html(s)),
            ),
            _ => (
                Status::InternalServerError,
                "Unknown exception",
                format!("<code>{}</code>", escape_html(&format!("{:?}", self))),
            ),
        };

        (
            status,
            format!("<html><body><h3>{}</h3>{}</body></html>", heading, detail),
        )
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        log::error!("{}", self);

        let (status, body) = self.error_page();
        Response::build()
            .status(status)
            .sized_body(body.len(), Cursor::new(body))
            .header(ContentType::new("text", "html"))
            .ok()
    }
}
