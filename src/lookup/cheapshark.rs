use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::LookupError;

const GAMES_URL: &str = "https://www.cheapshark.com/api/1.0/games";
const DEALS_URL: &str = "https://www.cheapshark.com/api/1.0/deals";
const REDIRECT_URL: &str = "https://www.cheapshark.com/redirect";

/// Current price and discount lookup backed by CheapShark. No credentials.
pub struct CheapSharkClient {
    http: Client,
}

impl CheapSharkClient {
    pub fn new() -> CheapSharkClient {
        CheapSharkClient {
            http: Client::new(),
        }
    }

    /// Best title match with its cheapest deal, if CheapShark knows the game.
    pub async fn find_cheapest(&self, title: &str) -> Result<Option<GameMatch>, LookupError> {
        debug!("Checking deals for {title}");

        let response = self
            .http
            .get(GAMES_URL)
            .query(&[("title", title), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?;

        let matches: Vec<GameMatch> = response
            .json()
            .await
            .map_err(|err| LookupError::Malformed(err.to_string()))?;

        Ok(matches.into_iter().next())
    }

    /// Detail for one deal id.
    pub async fn deal(&self, deal_id: &str) -> Result<Option<DealInfo>, LookupError> {
        debug!("Querying CheapShark deal {deal_id}");

        let response = self
            .http
            .get(DEALS_URL)
            .query(&[("id", deal_id)])
            .send()
            .await?
            .error_for_status()?;

        let detail: DealResponse = response
            .json()
            .await
            .map_err(|err| LookupError::Malformed(err.to_string()))?;

        Ok(detail.game_info)
    }
}

impl Default for CheapSharkClient {
    fn default() -> Self {
        CheapSharkClient::new()
    }
}

pub fn redirect_url(deal_id: &str) -> String {
    format!("{REDIRECT_URL}?dealID={deal_id}")
}

/// Percent off, rounded: round((1 - sale/retail) * 100).
pub fn discount_percent(sale_price: f64, retail_price: f64) -> u32 {
    ((1.0 - sale_price / retail_price) * 100.0).round() as u32
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub external: Option<String>,
    pub cheapest: Option<String>,
    #[serde(rename = "cheapestDealID")]
    pub cheapest_deal_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DealResponse {
    #[serde(rename = "gameInfo")]
    game_info: Option<DealInfo>,
}

/// CheapShark reports prices as decimal strings.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealInfo {
    pub name: Option<String>,
    sale_price: Option<String>,
    retail_price: Option<String>,
}

impl DealInfo {
    pub fn sale_price(&self) -> Option<f64> {
        self.sale_price.as_deref().and_then(|p| p.parse().ok())
    }

    pub fn retail_price(&self) -> Option<f64> {
        self.retail_price.as_deref().and_then(|p| p.parse().ok())
    }

    /// Sale price strictly below retail.
    pub fn is_on_sale(&self) -> bool {
        matches!(
            (self.sale_price(), self.retail_price()),
            (Some(sale), Some(retail)) if sale < retail
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn discount_is_rounded_percent_off() {
        assert_eq!(discount_percent(15.0, 20.0), 25);
        assert_eq!(discount_percent(0.0, 20.0), 100);
        assert_eq!(discount_percent(9.99, 29.99), 67);
    }

    #[test]
    fn deal_detail_parses_string_prices() {
        let detail: DealResponse = serde_json::from_value(json!({
            "gameInfo": {
                "name": "Hades",
                "salePrice": "15.00",
                "retailPrice": "20.00",
                "steamRatingText": "Overwhelmingly Positive",
            }
        }))
        .unwrap();

        let info = detail.game_info.unwrap();
        assert_eq!(info.name.as_deref(), Some("Hades"));
        assert_eq!(info.sale_price(), Some(15.0));
        assert_eq!(info.retail_price(), Some(20.0));
        assert!(info.is_on_sale());
    }

    #[test]
    fn full_price_is_not_a_sale() {
        let info: DealInfo = serde_json::from_value(json!({
            "name": "Celeste",
            "salePrice": "19.99",
            "retailPrice": "19.99",
        }))
        .unwrap();

        assert!(!info.is_on_sale());
    }

    #[test]
    fn game_search_parses_the_cheapest_deal_id() {
        let matches: Vec<GameMatch> = serde_json::from_value(json!([{
            "gameID": "105",
            "external": "Hades",
            "cheapest": "15.00",
            "cheapestDealID": "deadbeef",
        }]))
        .unwrap();

        assert_eq!(matches[0].cheapest_deal_id.as_deref(), Some("deadbeef"));
        assert_eq!(matches[0].cheapest.as_deref(), Some("15.00"));
    }

    #[test]
    fn redirect_links_carry_the_deal_id() {
        assert_eq!(
            redirect_url("deadbeef"),
            "https://www.cheapshark.com/redirect?dealID=deadbeef",
        );
    }
}
