use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// CheapShark sends ids and prices either as strings or as bare numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
    Other(serde_json::Value),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Integer(number) => number.to_string(),
            TextOrNumber::Float(number) => number.to_string(),
            TextOrNumber::Other(_) => String::new(),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(String::from))
}

// `null` decodes like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(#[serde(deserialize_with = "text_or_number")] String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        GameId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the title search response.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    #[serde(rename = "gameID", default)]
    pub game_id: GameId,
    #[serde(rename = "steamAppID", default, deserialize_with = "optional_text")]
    pub steam_app_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub cheapest: String,
    #[serde(rename = "cheapestDealID", default, deserialize_with = "optional_text")]
    pub cheapest_deal_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub external: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub internal_name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub thumb: String,
}

impl GameSummary {
    /// Price as a number, NaN when the payload is not numeric
    pub fn cheapest_price(&self) -> f64 {
        self.cheapest.trim().parse::<f64>().unwrap_or(f64::NAN)
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    #[serde(default, deserialize_with = "text_or_number")]
    pub title: String,
    #[serde(rename = "steamAppID", default, deserialize_with = "optional_text")]
    pub steam_app_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub thumb: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub metacritic_score: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheapestPrice {
    #[serde(default, deserialize_with = "text_or_number")]
    pub price: String,
    #[serde(default)]
    pub date: Option<i64>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    #[serde(rename = "storeID", default, deserialize_with = "text_or_number")]
    pub store_id: String,
    #[serde(rename = "dealID", default, deserialize_with = "optional_text")]
    pub deal_id: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub price: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub retail_price: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub savings: Option<String>,
}

/// Value of the id-keyed detail response.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub info: GameInfo,
    #[serde(default)]
    pub cheapest_price_ever: Option<CheapestPrice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deals: Vec<Deal>,
}
