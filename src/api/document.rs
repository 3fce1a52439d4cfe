use super::Error;
use scraper::{Html, Selector};

fn selector(selector: &str) -> Result<Selector, Error> {
    Selector::parse(selector)
        .map_err(|e| Error::ParseError(format!("invalid selector `{}`: {:?}", selector, e)))
}

/// Parsed HTML page with the handful of structural queries the scrapers need.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Document {
            html: Html::parse_document(body),
        }
    }

    /// Text nodes of every element matching `selector`, in document order. Only the element's
    /// own text nodes are returned, not those of its descendants.
    pub fn texts(&self, selector_str: &str) -> Result<Vec<String>, Error> {
        let selector = selector(selector_str)?;

        Ok(self
            .html
            .select(&selector)
            .flat_map(|element| {
                element
                    .children()
                    .filter_map(|node| node.value().as_text().map(|text| String::from(&**text)))
            })
            .collect())
    }

    /// Value of `attribute` on every element matching `selector` that carries it.
    pub fn attrs(&self, selector_str: &str, attribute: &str) -> Result<Vec<String>, Error> {
        let selector = selector(selector_str)?;

        Ok(self
            .html
            .select(&selector)
            .filter_map(|element| element.value().attr(attribute))
            .map(String::from)
            .collect())
    }

    pub fn first_attr(
        &self,
        selector_str: &str,
        attribute: &str,
    ) -> Result<Option<String>, Error> {
        self.attrs(selector_str, attribute)
            .map(|values| values.into_iter().next())
    }
}
