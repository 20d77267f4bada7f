//! Domain DTOs for the card deck shuffler API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Keeping them separate avoids coupling the client (and the FFI surface built
//! on it) to Axum internals; integration tests catch any schema drift between
//! the two crates.
//!
//! Response field names follow the service's camelCase JSON exactly so an
//! envelope re-serializes to the same shape it was parsed from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shuffling algorithm the service should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShuffleMethod {
    #[serde(rename = "fisher-yates")]
    FisherYates,
    #[serde(rename = "riffle")]
    Riffle,
}

impl ShuffleMethod {
    /// Wire name sent as the `method` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShuffleMethod::FisherYates => "fisher-yates",
            ShuffleMethod::Riffle => "riffle",
        }
    }
}

impl fmt::Display for ShuffleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a method name is neither `fisher-yates` nor `riffle`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shuffle method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for ShuffleMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fisher-yates" => Ok(ShuffleMethod::FisherYates),
            "riffle" => Ok(ShuffleMethod::Riffle),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

/// Caller-supplied shuffle parameters. Unset fields are left out of the
/// request and the service applies its own defaults (1 deck, no jokers,
/// fisher-yates).
///
/// Values are not range-checked here: a deck count outside 1..=10 is sent
/// as-is and rejected by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decks: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jokers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<ShuffleMethod>,
}

impl ShuffleQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decks(mut self, decks: u8) -> Self {
        self.decks = Some(decks);
        self
    }

    pub fn jokers(mut self, jokers: bool) -> Self {
        self.jokers = Some(jokers);
        self
    }

    pub fn method(mut self, method: ShuffleMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Query-string pairs for the set fields, in `decks`, `jokers`, `method`
    /// order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(decks) = self.decks {
            pairs.push(("decks", decks.to_string()));
        }
        if let Some(jokers) = self.jokers {
            pairs.push(("jokers", jokers.to_string()));
        }
        if let Some(method) = self.method {
            pairs.push(("method", method.as_str().to_string()));
        }
        pairs
    }
}

/// Card suit as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

/// A single card from the shuffled deck.
///
/// `short` is passed through untouched; its rank codes are whatever the
/// service emits. Jokers have no suit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub rank: String,
    #[serde(default)]
    pub suit: Option<Suit>,
    pub card: String,
    pub short: String,
}

impl Card {
    pub fn is_joker(&self) -> bool {
        self.suit.is_none()
    }
}

/// The shuffled deck plus the views the service derives from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleResult {
    pub total_cards: u32,
    pub decks_used: u32,
    pub includes_jokers: bool,
    pub shuffle_method: String,
    pub cards: Vec<Card>,
    pub top_card: Card,
    pub bottom_card: Card,
    pub sample_hand: Vec<Card>,
}

/// Top-level response wrapper returned by every call.
///
/// `code` is only present on error envelopes and is omitted again when
/// re-serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleResponse {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<ShuffleResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl ShuffleResponse {
    /// Status value the service uses for a successful shuffle.
    pub const STATUS_OK: &'static str = "ok";

    pub fn is_ok(&self) -> bool {
        self.status == Self::STATUS_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_only_include_set_fields() {
        assert!(ShuffleQuery::new().to_pairs().is_empty());

        let pairs = ShuffleQuery::new().jokers(false).to_pairs();
        assert_eq!(pairs, vec![("jokers", "false".to_string())]);
    }

    #[test]
    fn query_pairs_keep_field_order() {
        let query = ShuffleQuery::new()
            .method(ShuffleMethod::Riffle)
            .jokers(true)
            .decks(2);
        assert_eq!(
            query.to_pairs(),
            vec![
                ("decks", "2".to_string()),
                ("jokers", "true".to_string()),
                ("method", "riffle".to_string()),
            ]
        );
    }

    #[test]
    fn method_uses_kebab_case_wire_names() {
        assert_eq!(
            serde_json::to_value(ShuffleMethod::FisherYates).unwrap(),
            "fisher-yates"
        );
        assert_eq!("riffle".parse::<ShuffleMethod>(), Ok(ShuffleMethod::Riffle));
        assert_eq!(
            "overhand".parse::<ShuffleMethod>(),
            Err(UnknownMethod("overhand".to_string()))
        );
    }

    #[test]
    fn query_deserializes_from_partial_json() {
        let query: ShuffleQuery = serde_json::from_str(r#"{"decks":3}"#).unwrap();
        assert_eq!(query, ShuffleQuery::new().decks(3));
    }

    #[test]
    fn card_with_suit_parses() {
        let card: Card = serde_json::from_str(
            r#"{"rank":"Ace","suit":"Spades","card":"Ace of Spades","short":"AS"}"#,
        )
        .unwrap();
        assert_eq!(card.suit, Some(Suit::Spades));
        assert_eq!(card.short, "AS");
        assert!(!card.is_joker());
    }

    #[test]
    fn joker_without_suit_parses() {
        let null_suit: Card =
            serde_json::from_str(r#"{"rank":"Joker","suit":null,"card":"Joker","short":"JK"}"#)
                .unwrap();
        let missing_suit: Card =
            serde_json::from_str(r#"{"rank":"Joker","card":"Joker","short":"JK"}"#).unwrap();
        assert!(null_suit.is_joker());
        assert_eq!(null_suit, missing_suit);
    }

    #[test]
    fn unknown_suit_is_rejected() {
        let result: Result<Card, _> =
            serde_json::from_str(r#"{"rank":"Ace","suit":"Stars","card":"x","short":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn error_envelope_omits_code_only_when_absent() {
        let with_code: ShuffleResponse =
            serde_json::from_str(r#"{"status":"error","error":"Invalid API Key","code":401}"#)
                .unwrap();
        assert!(!with_code.is_ok());
        assert!(with_code.data.is_none());
        let json = serde_json::to_value(&with_code).unwrap();
        assert_eq!(json["code"], 401);
        assert!(json["data"].is_null());

        let without_code = ShuffleResponse {
            code: None,
            ..with_code
        };
        let json = serde_json::to_value(&without_code).unwrap();
        assert!(json.get("code").is_none());
    }
}
