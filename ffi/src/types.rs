//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use shuffler_core::{ApiError, Card, HttpRequest, ShuffleResponse, ShuffleResult, Suit};

/// Opaque handle to a `ShufflerClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiShufflerClient {
    pub(crate) inner: shuffler_core::ShufflerClient,
}

/// Copy `s` into a heap C string. Interior NULs yield an empty string.
pub(crate) fn to_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Release a string made by `to_c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Hand a vector to C as pointer + length. Empty vectors become null.
fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let mut items = items.into_boxed_slice();
    let len = items.len() as u32;
    let ptr = items.as_mut_ptr();
    std::mem::forget(items);
    (ptr, len)
}

/// Reclaim a vector handed out by `into_raw_parts`.
///
/// # Safety
/// `ptr`/`len` must come from `into_raw_parts` and not have been reclaimed.
unsafe fn from_raw_parts<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    Box::from_raw(slice).into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A GET request described as C-compatible plain data.
///
/// Built by `shuffler_build_request`. The C caller executes the request and
/// passes the response back through `shuffler_parse_response`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: to_c_string(k),
                value: to_c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            url: to_c_string(req.url),
            headers,
            headers_len,
        }))
    }

    /// Release the fields of a request (but not the struct itself).
    pub(crate) fn free_fields(&self) {
        free_c_string(self.url);
        for header in unsafe { from_raw_parts(self.headers, self.headers_len) } {
            free_c_string(header.key);
            free_c_string(header.value);
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to `shuffler_parse_response`. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiShuffleResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Configuration = 1,
    Remote = 2,
    Transport = 3,
    Panic = 4,
    NullArg = 5,
    InvalidArg = 6,
}

/// Card suit. `None` marks a joker.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSuit {
    None = 0,
    Clubs = 1,
    Diamonds = 2,
    Hearts = 3,
    Spades = 4,
}

impl From<Option<Suit>> for FfiSuit {
    fn from(suit: Option<Suit>) -> Self {
        match suit {
            None => FfiSuit::None,
            Some(Suit::Clubs) => FfiSuit::Clubs,
            Some(Suit::Diamonds) => FfiSuit::Diamonds,
            Some(Suit::Hearts) => FfiSuit::Hearts,
            Some(Suit::Spades) => FfiSuit::Spades,
        }
    }
}

#[repr(C)]
pub struct FfiCard {
    pub rank: *mut c_char,
    pub suit: FfiSuit,
    pub card: *mut c_char,
    pub short_name: *mut c_char,
}

impl FfiCard {
    fn from_core(card: Card) -> Self {
        FfiCard {
            rank: to_c_string(card.rank),
            suit: card.suit.into(),
            card: to_c_string(card.card),
            short_name: to_c_string(card.short),
        }
    }

    fn free_fields(&self) {
        free_c_string(self.rank);
        free_c_string(self.card);
        free_c_string(self.short_name);
    }
}

#[repr(C)]
pub struct FfiCardList {
    pub items: *mut FfiCard,
    pub len: u32,
}

impl FfiCardList {
    fn from_core(cards: Vec<Card>) -> Self {
        let cards = cards.into_iter().map(FfiCard::from_core).collect();
        let (items, len) = into_raw_parts(cards);
        FfiCardList { items, len }
    }

    fn free_fields(&self) {
        for card in unsafe { from_raw_parts(self.items, self.len) } {
            card.free_fields();
        }
    }
}

/// The `data` block of a successful envelope.
#[repr(C)]
pub struct FfiShuffleData {
    pub total_cards: u32,
    pub decks_used: u32,
    pub includes_jokers: bool,
    pub shuffle_method: *mut c_char,
    pub cards: FfiCardList,
    pub top_card: FfiCard,
    pub bottom_card: FfiCard,
    pub sample_hand: FfiCardList,
}

impl FfiShuffleData {
    fn from_core(data: ShuffleResult) -> Self {
        FfiShuffleData {
            total_cards: data.total_cards,
            decks_used: data.decks_used,
            includes_jokers: data.includes_jokers,
            shuffle_method: to_c_string(data.shuffle_method),
            cards: FfiCardList::from_core(data.cards),
            top_card: FfiCard::from_core(data.top_card),
            bottom_card: FfiCard::from_core(data.bottom_card),
            sample_hand: FfiCardList::from_core(data.sample_hand),
        }
    }

    fn free_fields(&self) {
        free_c_string(self.shuffle_method);
        self.cards.free_fields();
        self.top_card.free_fields();
        self.bottom_card.free_fields();
        self.sample_hand.free_fields();
    }
}

/// Result of parsing or executing a shuffle.
///
/// On success `error_code` is `Ok`, `error_message` is null, `status` holds
/// the envelope status and `data` points to the payload (null if the
/// service sent none). On failure `error_code` names the category,
/// `error_message` is a human-readable C string, `code` carries the
/// envelope code or HTTP status when known (0 otherwise), and `data` is
/// null.
#[repr(C)]
pub struct FfiShuffleResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub status: *mut c_char,
    pub code: u16,
    pub data: *mut FfiShuffleData,
}

impl FfiShuffleResult {
    fn boxed(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    /// Build a success result from a parsed envelope.
    pub(crate) fn ok(envelope: ShuffleResponse) -> *mut Self {
        let data = match envelope.data {
            Some(data) => Box::into_raw(Box::new(FfiShuffleData::from_core(data))),
            None => std::ptr::null_mut(),
        };
        FfiShuffleResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            status: to_c_string(envelope.status),
            code: envelope.code.unwrap_or(0),
            data,
        }
        .boxed()
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = err.code().unwrap_or(0);
        let message = match &err {
            ApiError::Remote { error, .. } => error.clone(),
            other => other.to_string(),
        };
        let (error_code, status) = match err {
            ApiError::Configuration(_) => (FfiErrorCode::Configuration, std::ptr::null_mut()),
            ApiError::Remote { status, .. } => (FfiErrorCode::Remote, to_c_string(status)),
            ApiError::Transport { .. } => (FfiErrorCode::Transport, std::ptr::null_mut()),
        };
        FfiShuffleResult {
            error_code,
            error_message: to_c_string(message),
            status,
            code,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    fn failure(error_code: FfiErrorCode, message: &str) -> *mut Self {
        FfiShuffleResult {
            error_code,
            error_message: to_c_string(message),
            status: std::ptr::null_mut(),
            code: 0,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    /// Build an error result for an argument that cannot be represented.
    pub(crate) fn invalid_arg(message: &str) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidArg, message)
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(message: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, message)
    }

    /// Release the fields of a result (but not the struct itself).
    pub(crate) fn free_fields(&self) {
        free_c_string(self.error_message);
        free_c_string(self.status);
        if !self.data.is_null() {
            let data = unsafe { Box::from_raw(self.data) };
            data.free_fields();
        }
    }
}
