use super::document::Document;
use super::endpoint;
use super::session::SiteSession;
use super::transport::Transport;
use super::Error;
use crate::model::TankReading;
use crate::number::extract_number;

/// Path of the tank detail page, relative to the site base url.
pub fn tank_path(tank_id: &str) -> String {
    format!("{}{}/edit", endpoint::TANKS, tank_id)
}

fn is_percent(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

fn is_positive(value: f64) -> bool {
    value > 0.0
}

/// First candidate text that contains a number; non-numeric candidates are skipped.
/// `extract_number` only yields finite, unsigned values.
fn first_number(document: &Document, selector: &str, field: &str) -> Result<f64, Error> {
    let candidates = document.texts(selector)?;

    candidates
        .iter()
        .find_map(|text| extract_number(Some(text.as_str())))
        .ok_or_else(|| {
            Error::ParseError(format!(
                "could not parse {} from {:?}",
                field, candidates
            ))
        })
}

/// Attribute that must hold a plain finite number accepted by `in_range`, without any
/// tolerance for surrounding text.
fn numeric_attr(
    document: &Document,
    selector: &str,
    attribute: &str,
    field: &str,
    in_range: fn(f64) -> bool,
) -> Result<f64, Error> {
    let value = document
        .first_attr(selector, attribute)?
        .ok_or_else(|| Error::ParseError(format!("{} not found", field)))?;

    let number = value.trim().parse::<f64>().map_err(|e| {
        Error::ParseError(format!("could not parse {} from {:?}: {}", field, value, e))
    })?;

    if number.is_finite() && in_range(number) {
        Ok(number)
    } else {
        Err(Error::ParseError(format!(
            "{} out of range: {:?}",
            field, value
        )))
    }
}

/// Extract a `TankReading` from the body of the tank detail page.
pub fn parse_tank_page(body: &str) -> Result<TankReading, Error> {
    let document = Document::parse(body);

    let usable_litres = first_number(&document, endpoint::USABLE_LEVEL, "usable level")?;
    let total_litres = first_number(&document, endpoint::TOTAL_LEVEL, "total level")?;
    let usable_percent = numeric_attr(
        &document,
        endpoint::USABLE_PERCENT,
        endpoint::PERCENTAGE_ATTR,
        "usable percent",
        is_percent,
    )?;
    let total_percent = numeric_attr(
        &document,
        endpoint::TOTAL_PERCENT,
        endpoint::PERCENTAGE_ATTR,
        "total percent",
        is_percent,
    )?;
    let capacity_litres = numeric_attr(
        &document,
        endpoint::CAPACITY_INPUT,
        endpoint::VALUE_ATTR,
        "capacity",
        is_positive,
    )?;

    let status_label = document
        .texts(endpoint::STATUS_LABEL)?
        .into_iter()
        .next()
        .map(|label| label.trim().to_owned())
        .filter(|label| !label.is_empty());

    Ok(TankReading {
        usable_litres,
        total_litres,
        usable_percent,
        total_percent,
        capacity_litres,
        status_label,
    })
}

/// Fetch and parse the detail page of `tank_id`. Requires a logged in `session`.
pub async fn scrape<T: Transport>(
    session: &SiteSession<T>,
    tank_id: &str,
) -> Result<TankReading, Error> {
    let body = session.fetch_authenticated(&tank_path(tank_id)).await?;

    log::trace!("tank page: {}", body);
    parse_tank_page(&body)
}
