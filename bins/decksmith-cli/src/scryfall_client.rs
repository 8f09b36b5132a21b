use decksmith::card::Card;
use decksmith::catalog::CardCatalog;
use decksmith::error::CatalogError;
use decksmith::scryfall::{ApiError, List, ScryfallCard};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

const USER_AGENT: &str = concat!("decksmith/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the Scryfall search and named card endpoints.
/// Only the first page of search results is read.
pub struct ScryfallClient {
    client: Client,
    base_url: String,
    delay: Duration,
}

impl ScryfallClient {
    pub fn new(base_url: &str, delay: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            delay,
        })
    }

    /// Returns the response body, or None on 404
    fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Option<String>, CatalogError> {
        // Scryfall asks for a pause between requests
        std::thread::sleep(self.delay);
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {} {:?}", url, params);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let details = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.details)
                .unwrap_or(body);
            return Err(CatalogError::Api {
                status: status.as_u16(),
                details,
            });
        }
        Ok(Some(body))
    }
}

impl CardCatalog for ScryfallClient {
    fn search(&self, query: &str) -> Result<Vec<Card>, CatalogError> {
        let params = [
            ("q", query),
            ("unique", "cards"),
            ("order", "name"),
            ("dir", "asc"),
        ];
        let body = match self.fetch("/cards/search", &params)? {
            // Scryfall answers 404 when nothing matches
            None => return Ok(Vec::new()),
            Some(body) => body,
        };
        let list: List = serde_json::from_str(&body)?;
        if list.has_more {
            info!(
                "\"{}\" matched {} cards, using the first {}",
                query,
                list.total_cards,
                list.data.len()
            );
        }
        Ok(list.data.into_iter().map(Card::from).collect())
    }

    fn lookup_exact(&self, name: &str) -> Result<Option<Card>, CatalogError> {
        match self.fetch("/cards/named", &[("exact", name)])? {
            None => Ok(None),
            Some(body) => {
                let card: ScryfallCard = serde_json::from_str(&body)?;
                Ok(Some(card.into()))
            }
        }
    }
}
