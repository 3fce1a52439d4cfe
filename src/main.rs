#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;
#[macro_use]
extern crate rocket;

use boilerjuice_rs::api::{self, endpoint, HttpTransport};
use boilerjuice_rs::model::TankReading;
use boilerjuice_rs::ReadingService;
use config::Config;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State};

mod metrics;

type Connect = fn() -> Result<HttpTransport, api::Error>;
type Service = ReadingService<HttpTransport, Connect>;

#[derive(Clone, serde::Deserialize)]
pub struct BoilerJuiceConfig {
    base_url: String,
    username: String,
    password: String,
    tank_id: String,
}

/// Reject settings still holding the placeholders from the sample environment.
fn validate(settings: BoilerJuiceConfig) -> Result<BoilerJuiceConfig, api::Error> {
    if settings.username.is_empty() || settings.username == "username" {
        return Err(api::Error::ConfigurationError(String::from(
            "Please set the username in BJ_USERNAME",
        )));
    }
    if settings.password.is_empty() || settings.password == "password" {
        return Err(api::Error::ConfigurationError(String::from(
            "Please set the password in BJ_PASSWORD",
        )));
    }
    if settings.tank_id.trim().is_empty() || settings.tank_id == "id" {
        return Err(api::Error::ConfigurationError(String::from(
            "Please set the tank ID in BJ_TANK_ID",
        )));
    }
    Ok(settings)
}

pub fn read_settings() -> Result<BoilerJuiceConfig, api::Error> {
    let config_err = |e: config::ConfigError| api::Error::ConfigurationError(e.to_string());

    let mut settings = Config::default();
    settings
        .set_default("base_url", endpoint::BASE_URL)
        .map_err(config_err)?;
    if let Ok(tank_id) = std::env::var("TANK_ID") {
        settings.set_default("tank_id", tank_id).map_err(config_err)?;
    }
    settings
        .merge(config::Environment::with_prefix("BJ"))
        .map_err(config_err)?;

    settings.try_into().map_err(config_err).and_then(validate)
}

#[get("/")]
async fn reading_route(service: &State<Service>) -> Result<Json<TankReading>, api::Error> {
    service.reading().await.map(Json)
}

#[get("/metrics")]
async fn metrics_route(service: &State<Service>) -> Result<String, api::Error> {
    let reading = service.reading().await?;
    metrics::record(service.username(), &reading);
    metrics::read()
}

#[launch]
fn rocket() -> Rocket<Build> {
    env_logger::init();

    let settings = match read_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let site = api::site(settings.base_url, settings.username, settings.password);
    let service: Service =
        ReadingService::new(site, settings.tank_id, HttpTransport::new as Connect);

    rocket::build()
        .manage(service)
        .mount("/", routes![reading_route, metrics_route])
}
