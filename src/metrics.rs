use boilerjuice_rs::api;
use boilerjuice_rs::model::{LevelName, TankReading};
use prometheus::{Encoder, GaugeVec, TextEncoder};

lazy_static! {
    static ref LITRES_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("oil_level_litres", "BoilerJuice tank level in Litres",),
        &["email"],
    )
    .unwrap();
    static ref TOTAL_LITRES_GAUGE: GaugeVec = register_gauge_vec!(
        opts!(
            "oil_level_total_litres",
            "BoilerJuice tank total level in Litres",
        ),
        &["email"],
    )
    .unwrap();
    static ref PERCENT_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("oil_level_percent", "BoilerJuice tank level percentage full",),
        &["email"],
    )
    .unwrap();
    static ref TOTAL_PERCENT_GAUGE: GaugeVec = register_gauge_vec!(
        opts!(
            "oil_level_total_percent",
            "BoilerJuice tank total level percentage full",
        ),
        &["email"],
    )
    .unwrap();
    static ref CAPACITY_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("oil_level_capacity", "BoilerJuice tank capacity in Litres",),
        &["email"],
    )
    .unwrap();
    /* Enum-style metric: 1 for the current state, 0 for the others */
    static ref LEVEL_NAME_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("oil_level_name", "BoilerJuice tank level name",),
        &["email", "oil_level_name"],
    )
    .unwrap();
}

/// Set the level name states for `email` to `current`.
fn record_level_name(email: &str, current: LevelName) {
    for state in LevelName::ALL.iter() {
        let value = if *state == current { 1.0 } else { 0.0 };
        LEVEL_NAME_GAUGE
            .with_label_values(&[email, state.as_str()])
            .set(value);
    }
}

/// Feed `reading` of the account `email` into the Prometheus registry.
pub fn record(email: &str, reading: &TankReading) {
    LITRES_GAUGE
        .with_label_values(&[email])
        .set(reading.usable_litres);
    TOTAL_LITRES_GAUGE
        .with_label_values(&[email])
        .set(reading.total_litres);
    PERCENT_GAUGE
        .with_label_values(&[email])
        .set(reading.usable_percent);
    TOTAL_PERCENT_GAUGE
        .with_label_values(&[email])
        .set(reading.total_percent);
    CAPACITY_GAUGE
        .with_label_values(&[email])
        .set(reading.capacity_litres);

    match reading.status_label.as_deref().map(str::parse::<LevelName>) {
        Some(Ok(level_name)) => record_level_name(email, level_name),
        Some(Err(e)) => log::warn!("{}; oil_level_name left unchanged", e),
        None => log::warn!("No level name on tank page; oil_level_name left unchanged"),
    }
}

/// Read metrics from Prometheus exporter registry.
pub fn read() -> Result<String, api::Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode(&metric_families, &mut buffer)
        .or(Err(api::Error::FormatError))?;
    String::from_utf8(buffer).or(Err(api::Error::FormatError))
}

#[cfg(test)]
mod test {
    use boilerjuice_rs::model::TankReading;

    fn reading(status_label: Option<&str>) -> TankReading {
        TankReading {
            usable_litres: 1234.5,
            total_litres: 2000.0,
            usable_percent: 61.7,
            total_percent: 100.0,
            capacity_litres: 2000.0,
            status_label: status_label.map(String::from),
        }
    }

    #[test]
    fn exposition() {
        super::record("a@example.test", &reading(Some("Medium")));
        let body = super::read().unwrap();

        assert!(body.contains("oil_level_litres{email=\"a@example.test\"} 1234.5"));
        assert!(body.contains("oil_level_total_litres{email=\"a@example.test\"} 2000"));
        assert!(body.contains("oil_level_percent{email=\"a@example.test\"} 61.7"));
        assert!(body.contains("oil_level_total_percent{email=\"a@example.test\"} 100"));
        assert!(body.contains("oil_level_capacity{email=\"a@example.test\"} 2000"));
        assert!(body.contains("oil_level_name{email=\"a@example.test\",oil_level_name=\"Medium\"} 1"));
        assert!(body.contains("oil_level_name{email=\"a@example.test\",oil_level_name=\"High\"} 0"));
        assert!(body.contains("oil_level_name{email=\"a@example.test\",oil_level_name=\"Low\"} 0"));
    }

    #[test]
    fn unknown_level_name_keeps_previous_state() {
        super::record("b@example.test", &reading(Some("Low")));
        super::record("b@example.test", &reading(Some("Empty")));
        super::record("b@example.test", &reading(None));
        let body = super::read().unwrap();

        assert!(body.contains("oil_level_name{email=\"b@example.test\",oil_level_name=\"Low\"} 1"));
        assert!(!body.contains("oil_level_name=\"Empty\""));
    }
}
