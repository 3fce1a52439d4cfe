use crate::api::{self, Error, SiteSession, Transport};
use crate::model::{Site, TankReading};
use tokio::sync::Mutex;

/// Produces tank readings, keeping one upstream session alive between calls.
///
/// `connect` builds the transport for every fresh login, so a new login never inherits cookies
/// of a previous session. The session slot is locked for the whole login/fetch/scrape sequence,
/// which serializes concurrent callers.
pub struct ReadingService<T, F> {
    site: Site,
    tank_id: String,
    connect: F,
    session: Mutex<Option<SiteSession<T>>>,
}

impl<T, F> ReadingService<T, F>
where
    T: Transport,
    F: Fn() -> Result<T, Error> + Send + Sync,
{
    pub fn new(site: Site, tank_id: String, connect: F) -> Self {
        ReadingService {
            site,
            tank_id,
            connect,
            session: Mutex::new(None),
        }
    }

    pub fn username(&self) -> &str {
        &self.site.username
    }

    /// Log in, or reuse the current session while it still holds its authentication cookie,
    /// then scrape the tank page.
    ///
    /// Failures are not retried within the call. A failed fetch or scrape discards the session
    /// so the next call starts with a fresh login.
    pub async fn reading(&self) -> Result<TankReading, Error> {
        let mut slot = self.session.lock().await;

        let session = match slot.take() {
            Some(session) if session.is_authenticated() => slot.insert(session),
            _ => {
                let mut session = SiteSession::new(self.site.clone(), (self.connect)()?);
                session.login().await?;
                slot.insert(session)
            }
        };

        let result = api::scrape(session, &self.tank_id).await;

        if let Err(e) = &result {
            log::warn!("Discarding upstream session after failed scrape: {}", e);
            *slot = None;
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::ReadingService;
    use crate::api::transport::fixture::FixtureTransport;
    use crate::api::Error;
    use crate::model::Site;
    use crate::test_util::read_resource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const LOGIN: &str = "https://bj.test/uk/users/login";
    const TANK: &str = "https://bj.test/uk/users/tanks/12345/edit";

    fn site() -> Site {
        Site {
            base_url: "https://bj.test/uk".to_string(),
            username: "user@example.test".to_string(),
            password: "secret".to_string(),
        }
    }

    fn upstream() -> FixtureTransport {
        FixtureTransport::default()
            .page(LOGIN, &read_resource("login.html"))
            .page(TANK, &read_resource("tank.html"))
            .sets_cookie("jwt", "token-value")
    }

    /// Service whose every fresh session shares `transport`'s recorders; counts sessions made.
    fn service(
        transport: FixtureTransport,
    ) -> (
        ReadingService<FixtureTransport, impl Fn() -> Result<FixtureTransport, Error>>,
        Arc<AtomicUsize>,
    ) {
        let connects = Arc::new(AtomicUsize::new(0));
        let counter = connects.clone();
        let service = ReadingService::new(site(), "12345".to_string(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(transport.clone())
        });
        (service, connects)
    }

    fn logins(transport: &FixtureTransport) -> usize {
        transport
            .calls()
            .iter()
            .filter(|(method, url, _)| *method == "POST" && url == LOGIN)
            .count()
    }

    #[tokio::test]
    async fn first_call_logs_in_before_fetch() {
        let transport = upstream();
        let (service, connects) = service(transport.clone());

        let reading = service.reading().await.unwrap();

        assert_eq!(1234.5, reading.usable_litres);
        assert_eq!(1, connects.load(Ordering::SeqCst));
        assert_eq!(1, logins(&transport));

        let urls: Vec<String> = transport.calls().into_iter().map(|(_, url, _)| url).collect();
        assert_eq!(vec![LOGIN, LOGIN, TANK], urls);
    }

    #[tokio::test]
    async fn authenticated_session_is_reused() {
        let transport = upstream();
        let (service, connects) = service(transport.clone());

        let first = service.reading().await.unwrap();
        let second = service.reading().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(1, connects.load(Ordering::SeqCst));
        assert_eq!(1, logins(&transport));
    }

    #[tokio::test]
    async fn lost_cookie_triggers_new_login() {
        let transport = upstream();
        let (service, connects) = service(transport.clone());

        service.reading().await.unwrap();
        transport.drop_cookie("jwt");
        service.reading().await.unwrap();

        assert_eq!(2, connects.load(Ordering::SeqCst));
        assert_eq!(2, logins(&transport));
    }

    #[tokio::test]
    async fn rejected_login_propagates() {
        let transport = FixtureTransport::default()
            .page(LOGIN, &read_resource("login.html"))
            .page(TANK, &read_resource("tank.html"));
        let (service, _) = service(transport.clone());

        assert!(matches!(
            service.reading().await,
            Err(Error::AuthenticationError(_))
        ));
        /* no tank fetch without a session */
        assert!(transport.calls().iter().all(|(_, url, _)| url != TANK));
    }

    #[tokio::test]
    async fn failed_scrape_is_not_retried_and_discards_session() {
        let transport = FixtureTransport::default()
            .page(LOGIN, &read_resource("login.html"))
            .page(TANK, &read_resource("login.html"))
            .sets_cookie("jwt", "token-value");
        let (service, connects) = service(transport.clone());

        assert!(matches!(service.reading().await, Err(Error::ParseError(_))));
        assert_eq!(1, logins(&transport));

        assert!(service.reading().await.is_err());
        assert_eq!(2, connects.load(Ordering::SeqCst));
        assert_eq!(2, logins(&transport));
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_login() {
        let transport = upstream();
        let (service, connects) = service(transport.clone());

        let (a, b) = tokio::join!(service.reading(), service.reading());

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(1, connects.load(Ordering::SeqCst));
    }
}
