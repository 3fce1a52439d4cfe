pub type Endpoint = str;

pub const BASE_URL: &str = "https://www.boilerjuice.com/uk";

pub const LOGIN: &Endpoint = "/users/login";
pub const TANKS: &Endpoint = "/users/tanks/";

/* Login form */
pub const FORM_EMAIL: &str = "user[email]";
pub const FORM_PASSWORD: &str = "user[password]";
pub const FORM_TOKEN: &str = "authenticity_token";
pub const FORM_COMMIT: &str = "commit";
pub const FORM_COMMIT_VALUE: &str = "Log in";

/// Cookie carried by an authenticated session
pub const AUTH_COOKIE: &str = "jwt";

/* Page markup */
pub const TOKEN_INPUT: &str = "input[name='authenticity_token']";
pub const USABLE_LEVEL: &str = "div[id*='usable-oil'] > div > p";
pub const TOTAL_LEVEL: &str = "div[id*='total-oil'] > div > p";
pub const USABLE_PERCENT: &str = "div[id*='usable-oil'] div[data-percentage]";
pub const TOTAL_PERCENT: &str = "div[id*='total-oil'] div[data-percentage]";
pub const CAPACITY_INPUT: &str = "input[title='tank-size-count']";
pub const STATUS_LABEL: &str = "div.bar-container > div.status > p";

pub const PERCENTAGE_ATTR: &str = "data-percentage";
pub const VALUE_ATTR: &str = "value";
