use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, info};

pub const SHUFFLE_PATH: &str = "/v1/carddeckshuffler";
pub const DEFAULT_SEED: u64 = 0x5eed_cafe;

const MAX_DECKS: u8 = 10;
const SAMPLE_HAND_SIZE: usize = 5;
const RIFFLE_PASSES: usize = 7;

const RANKS: [(&str, &str); 13] = [
    ("2", "2"),
    ("3", "3"),
    ("4", "4"),
    ("5", "5"),
    ("6", "6"),
    ("7", "7"),
    ("8", "8"),
    ("9", "9"),
    ("10", "10"),
    ("Jack", "J"),
    ("Queen", "Q"),
    ("King", "K"),
    ("Ace", "A"),
];

const SUITS: [(&str, &str); 4] = [
    ("Clubs", "C"),
    ("Diamonds", "D"),
    ("Hearts", "H"),
    ("Spades", "S"),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub rank: String,
    pub suit: Option<String>,
    pub card: String,
    pub short: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub total_cards: usize,
    pub decks_used: u8,
    pub includes_jokers: bool,
    pub shuffle_method: String,
    pub cards: Vec<Card>,
    pub top_card: Card,
    pub bottom_card: Card,
    pub sample_hand: Vec<Card>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub status: String,
    pub error: Option<String>,
    pub data: Option<Deck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl Envelope {
    fn ok(deck: Deck) -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
            data: Some(deck),
            code: None,
        }
    }

    fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(message.into()),
            data: None,
            code: Some(code.as_u16()),
        }
    }
}

/// Raw query parameters. Everything arrives as a string and is validated
/// by hand so bad values produce an error envelope instead of axum's
/// plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ShuffleParams {
    pub decks: Option<String>,
    pub jokers: Option<String>,
    pub method: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    FisherYates,
    Riffle,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::FisherYates => "fisher-yates",
            Method::Riffle => "riffle",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShuffleOptions {
    pub decks: u8,
    pub jokers: bool,
    pub method: Method,
}

impl ShuffleParams {
    pub fn validate(&self) -> Result<ShuffleOptions, String> {
        let decks = match self.decks.as_deref() {
            None => 1,
            Some(raw) => match raw.parse::<u8>() {
                Ok(n) if (1..=MAX_DECKS).contains(&n) => n,
                _ => return Err(format!("decks must be an integer between 1 and {MAX_DECKS}")),
            },
        };
        let jokers = match self.jokers.as_deref() {
            None | Some("false") => false,
            Some("true") => true,
            Some(_) => return Err("jokers must be true or false".to_string()),
        };
        let method = match self.method.as_deref() {
            None | Some("fisher-yates") => Method::FisherYates,
            Some("riffle") => Method::Riffle,
            Some(_) => return Err("method must be fisher-yates or riffle".to_string()),
        };
        Ok(ShuffleOptions {
            decks,
            jokers,
            method,
        })
    }
}

#[derive(Clone)]
struct AppState {
    api_key: Arc<str>,
    seed: u64,
}

pub fn app(api_key: &str) -> Router {
    app_with_seed(api_key, DEFAULT_SEED)
}

pub fn app_with_seed(api_key: &str, seed: u64) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        seed,
    };
    Router::new()
        .route(SHUFFLE_PATH, get(shuffle))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn shuffle(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<ShuffleParams>, QueryRejection>,
) -> (StatusCode, Json<Envelope>) {
    let key = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if key != Some(&*state.api_key) {
        debug!("rejecting request with missing or unknown api key");
        return (
            StatusCode::UNAUTHORIZED,
            Json(Envelope::error(StatusCode::UNAUTHORIZED, "Invalid API Key")),
        );
    }

    let options = match params
        .map_err(|rejection| rejection.body_text())
        .and_then(|Query(params)| params.validate())
    {
        Ok(options) => options,
        Err(message) => {
            debug!(%message, "rejecting invalid shuffle parameters");
            return (
                StatusCode::BAD_REQUEST,
                Json(Envelope::error(StatusCode::BAD_REQUEST, message)),
            );
        }
    };

    info!(
        decks = options.decks,
        jokers = options.jokers,
        method = options.method.as_str(),
        "shuffling"
    );
    (StatusCode::OK, Json(Envelope::ok(deal(options, state.seed))))
}

/// Build, shuffle and summarize a deck for `options`.
pub fn deal(options: ShuffleOptions, seed: u64) -> Deck {
    let mut cards = fresh_cards(options.decks, options.jokers);
    match options.method {
        Method::FisherYates => {
            let mut rng = StdRng::seed_from_u64(seed);
            cards.shuffle(&mut rng);
        }
        Method::Riffle => {
            for _ in 0..RIFFLE_PASSES {
                riffle(&mut cards);
            }
        }
    }

    let top_card = cards[0].clone();
    let bottom_card = cards[cards.len() - 1].clone();
    let sample_hand = cards.iter().take(SAMPLE_HAND_SIZE).cloned().collect();
    Deck {
        total_cards: cards.len(),
        decks_used: options.decks,
        includes_jokers: options.jokers,
        shuffle_method: options.method.as_str().to_string(),
        cards,
        top_card,
        bottom_card,
        sample_hand,
    }
}

/// Unshuffled cards: 52 per deck in suit order, then two jokers per deck.
fn fresh_cards(decks: u8, jokers: bool) -> Vec<Card> {
    let per_deck = if jokers { 54 } else { 52 };
    let mut cards = Vec::with_capacity(per_deck * decks as usize);
    for _ in 0..decks {
        for (suit, suit_code) in SUITS {
            for (rank, rank_code) in RANKS {
                cards.push(Card {
                    rank: rank.to_string(),
                    suit: Some(suit.to_string()),
                    card: format!("{rank} of {suit}"),
                    short: format!("{rank_code}{suit_code}"),
                });
            }
        }
    }
    if jokers {
        for _ in 0..decks as usize * 2 {
            cards.push(Card {
                rank: "Joker".to_string(),
                suit: None,
                card: "Joker".to_string(),
                short: "JK".to_string(),
            });
        }
    }
    cards
}

/// One perfect riffle: cut in half and interleave, starting with the top
/// half.
fn riffle(cards: &mut Vec<Card>) {
    let bottom = cards.split_off(cards.len() / 2);
    let top = std::mem::take(cards);
    let mut top = top.into_iter();
    let mut bottom = bottom.into_iter();
    loop {
        match (top.next(), bottom.next()) {
            (None, None) => break,
            (a, b) => {
                cards.extend(a);
                cards.extend(b);
            }
        }
    }
}
