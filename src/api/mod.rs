pub mod document;
pub mod endpoint;
pub mod error;
pub mod scrape;
pub mod session;
pub mod transport;

pub use error::Error;
pub use scrape::{parse_tank_page, scrape, tank_path};
pub use session::{SessionState, SiteSession};
pub use transport::{HttpTransport, Transport};

use crate::model;

pub fn site(base_url: String, username: String, password: String) -> model::Site {
    model::Site {
        base_url: base_url.trim_end_matches('/').to_owned(),
        username,
        password,
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn site_base_url_without_trailing_slash() {
        let site = super::site(
            "https://www.boilerjuice.com/uk/".to_string(),
            "user".to_string(),
            "pass".to_string(),
        );
        assert_eq!("https://www.boilerjuice.com/uk", site.base_url);
    }
}
