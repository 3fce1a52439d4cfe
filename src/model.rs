use serde::Serialize;
use std::fmt;
use std::str::FromStr;

type Litres = f64;
type Percent = f64;

#[derive(Clone)]
pub struct Site {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Single scrape of the tank page. Field names on the wire follow the JSON endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankReading {
    #[serde(rename = "litres")]
    pub usable_litres: Litres,
    pub total_litres: Litres,
    #[serde(rename = "percent")]
    pub usable_percent: Percent,
    pub total_percent: Percent,
    #[serde(rename = "capacity")]
    pub capacity_litres: Litres,
    #[serde(rename = "level_name", skip_serializing_if = "Option::is_none")]
    pub status_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelName {
    High,
    Medium,
    Low,
}

impl LevelName {
    pub const ALL: [LevelName; 3] = [LevelName::High, LevelName::Medium, LevelName::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelName::High => "High",
            LevelName::Medium => "Medium",
            LevelName::Low => "Low",
        }
    }
}

impl FromStr for LevelName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "High" => Ok(LevelName::High),
            "Medium" => Ok(LevelName::Medium),
            "Low" => Ok(LevelName::Low),
            other => Err(format!("unknown level name: {:?}", other)),
        }
    }
}
