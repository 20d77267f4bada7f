//! C-ABI wrapper around `shuffler-core`.
//!
//! # Overview
//! Exposes the shuffle call through `extern "C"` functions in two styles:
//! host-does-IO (`shuffler_build_request` + `shuffler_parse_response`) for
//! callers with their own HTTP stack, and `shuffler_execute`, which performs
//! the round trip and reports through a completion callback.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Query arguments use `-1` (or a null `method`) for "not set". Any other
//!   value the core types can hold is forwarded as-is and validated by the
//!   service; values they cannot hold are reported as `InvalidArg`.
//! - A single `FfiShuffleResult` conveys success payloads and errors
//!   uniformly.
//! - The C caller owns pointers returned by `shuffler_build_request` and
//!   `shuffler_parse_response` and must release them with the matching
//!   `shuffler_free_*` function. The result passed to an execute callback
//!   is owned by the library and only valid during the callback.

pub mod types;

use std::ffi::{c_void, CStr};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use shuffler_core::{ClientConfig, HttpResponse, ShuffleMethod, ShuffleQuery, ShufflerClient};

use types::*;

/// Completion callback for `shuffler_execute`.
pub type FfiShuffleCallback = extern "C" fn(result: *const FfiShuffleResult, user_data: *mut c_void);

/// Read a C string argument. Null and invalid UTF-8 yield `None`.
///
/// # Safety
/// `s` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

/// "Not set" sentinel for the integer query arguments.
const OMIT: i32 = -1;

/// Translate C query arguments into a `ShuffleQuery`.
///
/// `decks` in `0..=255` and `jokers` of 0 or 1 are forwarded untouched, even
/// when the service will reject them.
fn query_from_args(decks: i32, jokers: i32, method: *const c_char) -> Result<ShuffleQuery, String> {
    let mut query = ShuffleQuery::new();
    if decks != OMIT {
        let decks = u8::try_from(decks).map_err(|_| format!("decks out of range: {decks}"))?;
        query = query.decks(decks);
    }
    match jokers {
        OMIT => {}
        0 => query = query.jokers(false),
        1 => query = query.jokers(true),
        other => return Err(format!("jokers must be -1, 0 or 1: {other}")),
    }
    if !method.is_null() {
        let name = unsafe { read_str(method) }.ok_or("method is not valid UTF-8")?;
        let method: ShuffleMethod = name.parse().map_err(|e| format!("{e}"))?;
        query = query.method(method);
    }
    Ok(query)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

fn new_client(config: ClientConfig) -> *mut FfiShufflerClient {
    match ShufflerClient::new(config) {
        Ok(client) => Box::into_raw(Box::new(FfiShufflerClient { inner: client })),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Create a client for the hosted service.
///
/// Returns null if `api_key` is null, empty or not UTF-8, or if an internal
/// panic occurs. The caller must free the returned pointer with
/// `shuffler_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn shuffler_client_new(api_key: *const c_char, secure: bool) -> *mut FfiShufflerClient {
    catch_unwind(|| match unsafe { read_str(api_key) } {
        Some(key) => new_client(ClientConfig::new(key).with_secure(secure)),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client pointed at `host` (optionally `host:port`) instead of the
/// hosted service.
///
/// Returns null under the same conditions as `shuffler_client_new`, or if
/// `host` is null or not a valid host.
#[unsafe(no_mangle)]
pub extern "C" fn shuffler_client_new_with_host(
    api_key: *const c_char,
    secure: bool,
    host: *const c_char,
) -> *mut FfiShufflerClient {
    catch_unwind(|| match unsafe { (read_str(api_key), read_str(host)) } {
        (Some(key), Some(host)) => new_client(
            ClientConfig::new(key)
                .with_secure(secure)
                .with_host(host),
        ),
        _ => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `shuffler_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn shuffler_client_free(client: *mut FfiShufflerClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Host-does-IO
// ---------------------------------------------------------------------------

/// Build the HTTP request for a shuffle.
///
/// Pass `-1` for `decks` or `jokers` (or null for `method`) to leave that
/// option to the service's default. Returns null if `client` is null, if
/// `decks` is below -1 or above 255, if `jokers` is not -1, 0 or 1, or if
/// `method` is set but not `fisher-yates` or `riffle`. The caller must free
/// the returned pointer with `shuffler_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn shuffler_build_request(
    client: *const FfiShufflerClient,
    decks: i32,
    jokers: i32,
    method: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match query_from_args(decks, jokers, method) {
            Ok(query) => FfiHttpRequest::from_core(client.inner.build_request(&query)),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the HTTP response of a shuffle request.
///
/// A null `body` is treated as an empty body. The caller must free the
/// returned pointer with `shuffler_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn shuffler_parse_response(
    client: *const FfiShufflerClient,
    response: *const FfiHttpResponse,
) -> *mut FfiShuffleResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiShuffleResult::null_arg("client");
        }
        if response.is_null() {
            return FfiShuffleResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let core_resp = HttpResponse {
            status: resp.status,
            body: unsafe { read_str(resp.body) }.unwrap_or("").to_string(),
        };
        match client.inner.parse_response(core_resp) {
            Ok(envelope) => FfiShuffleResult::ok(envelope),
            Err(e) => FfiShuffleResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiShuffleResult::panic("panic in shuffler_parse_response"))
}

// ---------------------------------------------------------------------------
// Execute
// ---------------------------------------------------------------------------

/// Perform one shuffle round trip and report the outcome to `callback`.
///
/// Query arguments follow `shuffler_build_request`; values it would reject
/// are reported as `InvalidArg` without a round trip.
/// `callback` is invoked exactly once, on the calling thread, before this
/// function returns; argument errors and panics are reported through it as
/// well. The result pointer is freed when the callback returns, so copy out
/// anything you need. Nothing happens if `callback` is null.
#[unsafe(no_mangle)]
pub extern "C" fn shuffler_execute(
    client: *const FfiShufflerClient,
    decks: i32,
    jokers: i32,
    method: *const c_char,
    callback: Option<FfiShuffleCallback>,
    user_data: *mut c_void,
) {
    let Some(callback) = callback else {
        return;
    };

    let result = catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiShuffleResult::null_arg("client");
        }
        let client = unsafe { &*client };
        let query = match query_from_args(decks, jokers, method) {
            Ok(query) => query,
            Err(message) => return FfiShuffleResult::invalid_arg(&message),
        };
        match client.inner.execute(&query) {
            Ok(envelope) => FfiShuffleResult::ok(envelope),
            Err(e) => FfiShuffleResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiShuffleResult::panic("panic in shuffler_execute"));

    callback(result, user_data);
    shuffler_free_result(result);
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `shuffler_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn shuffler_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let req = unsafe { Box::from_raw(req) };
        req.free_fields();
    }));
}

/// Free an `FfiShuffleResult` returned by `shuffler_parse_response`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn shuffler_free_result(result: *mut FfiShuffleResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        result.free_fields();
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn shuffler_free_string(s: *mut c_char) {
    let _ = catch_unwind(AssertUnwindSafe(|| free_c_string(s)));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn client() -> *mut FfiShufflerClient {
        let key = CString::new("ffi-key").unwrap();
        shuffler_client_new(key.as_ptr(), true)
    }

    fn c_str<'a>(ptr: *const c_char) -> &'a str {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    fn parse(client: *const FfiShufflerClient, status: u16, body: &str) -> *mut FfiShuffleResult {
        let body = CString::new(body).unwrap();
        let resp = FfiHttpResponse {
            status,
            body: body.as_ptr(),
        };
        shuffler_parse_response(client, &resp)
    }

    const OK_BODY: &str = r#"{"status":"ok","error":null,"data":{"totalCards":52,"decksUsed":1,"includesJokers":false,"shuffleMethod":"fisher-yates","cards":[{"rank":"Ace","suit":"Spades","card":"Ace of Spades","short":"AS"},{"rank":"Joker","suit":null,"card":"Joker","short":"JK"}],"topCard":{"rank":"Ace","suit":"Spades","card":"Ace of Spades","short":"AS"},"bottomCard":{"rank":"Joker","suit":null,"card":"Joker","short":"JK"},"sampleHand":[]}}"#;

    #[test]
    fn client_new_and_free() {
        let client = client();
        assert!(!client.is_null());
        shuffler_client_free(client);
    }

    #[test]
    fn client_new_null_or_empty_key_returns_null() {
        assert!(shuffler_client_new(std::ptr::null(), true).is_null());
        let empty = CString::new("").unwrap();
        assert!(shuffler_client_new(empty.as_ptr(), true).is_null());
    }

    #[test]
    fn client_new_with_bad_host_returns_null() {
        let key = CString::new("k").unwrap();
        let host = CString::new("not a host").unwrap();
        assert!(shuffler_client_new_with_host(key.as_ptr(), false, host.as_ptr()).is_null());
        assert!(shuffler_client_new_with_host(key.as_ptr(), false, std::ptr::null()).is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        shuffler_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_request_without_options() {
        let client = client();
        let req = shuffler_build_request(client, -1, -1, std::ptr::null());
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert_eq!(c_str(req_ref.url), "https://api.apiverve.com/v1/carddeckshuffler");
        assert_eq!(req_ref.headers_len, 2);
        let headers = unsafe { std::slice::from_raw_parts(req_ref.headers, 2) };
        assert_eq!(c_str(headers[0].key), "x-api-key");
        assert_eq!(c_str(headers[0].value), "ffi-key");

        shuffler_free_request(req);
        shuffler_client_free(client);
    }

    #[test]
    fn build_request_with_all_options() {
        let client = client();
        let method = CString::new("riffle").unwrap();
        let req = shuffler_build_request(client, 2, 1, method.as_ptr());
        assert!(!req.is_null());

        let url = c_str(unsafe { &*req }.url);
        assert!(url.ends_with("?decks=2&jokers=true&method=riffle"), "{url}");

        shuffler_free_request(req);
        shuffler_client_free(client);
    }

    #[test]
    fn build_request_forwards_zero_decks() {
        let client = client();
        let req = shuffler_build_request(client, 0, -1, std::ptr::null());
        assert!(!req.is_null());

        let url = c_str(unsafe { &*req }.url);
        assert!(url.ends_with("/v1/carddeckshuffler?decks=0"), "{url}");

        shuffler_free_request(req);
        shuffler_client_free(client);
    }

    #[test]
    fn build_request_rejects_unrepresentable_values() {
        let client = client();
        assert!(shuffler_build_request(client, -3, -1, std::ptr::null()).is_null());
        assert!(shuffler_build_request(client, 256, -1, std::ptr::null()).is_null());
        assert!(shuffler_build_request(client, -1, 7, std::ptr::null()).is_null());
        assert!(shuffler_build_request(client, -1, -2, std::ptr::null()).is_null());
        shuffler_client_free(client);
    }

    #[test]
    fn build_request_unknown_method_returns_null() {
        let client = client();
        let method = CString::new("overhand").unwrap();
        assert!(shuffler_build_request(client, 1, 0, method.as_ptr()).is_null());
        assert!(shuffler_build_request(client, 300, 0, std::ptr::null()).is_null());
        shuffler_client_free(client);
    }

    #[test]
    fn build_request_null_client_returns_null() {
        assert!(shuffler_build_request(std::ptr::null(), 1, 0, std::ptr::null()).is_null());
    }

    #[test]
    fn parse_success_exposes_cards() {
        let client = client();
        let result = parse(client, 200, OK_BODY);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(c_str(r.status), "ok");

        let data = unsafe { &*r.data };
        assert_eq!(data.total_cards, 52);
        assert_eq!(data.decks_used, 1);
        assert!(!data.includes_jokers);
        assert_eq!(c_str(data.shuffle_method), "fisher-yates");
        assert_eq!(data.cards.len, 2);
        let cards = unsafe { std::slice::from_raw_parts(data.cards.items, 2) };
        assert_eq!(cards[0].suit, FfiSuit::Spades);
        assert_eq!(c_str(cards[0].short_name), "AS");
        assert_eq!(cards[1].suit, FfiSuit::None);
        assert_eq!(c_str(data.top_card.card), "Ace of Spades");
        assert_eq!(data.sample_hand.len, 0);
        assert!(data.sample_hand.items.is_null());

        shuffler_free_result(result);
        shuffler_client_free(client);
    }

    #[test]
    fn parse_remote_rejection() {
        let client = client();
        let result = parse(
            client,
            401,
            r#"{"status":"error","error":"Invalid API Key","code":401}"#,
        );
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Remote);
        assert_eq!(c_str(r.error_message), "Invalid API Key");
        assert_eq!(c_str(r.status), "error");
        assert_eq!(r.code, 401);
        assert!(r.data.is_null());

        shuffler_free_result(result);
        shuffler_client_free(client);
    }

    #[test]
    fn parse_malformed_body_is_transport_error() {
        let client = client();
        let result = parse(client, 502, "Bad Gateway");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Transport);
        assert_eq!(r.code, 502);
        assert!(r.status.is_null());

        shuffler_free_result(result);
        shuffler_client_free(client);
    }

    #[test]
    fn parse_null_arguments() {
        let result = parse(std::ptr::null(), 200, OK_BODY);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        shuffler_free_result(result);

        let client = client();
        let result = shuffler_parse_response(client, std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        shuffler_free_result(result);
        shuffler_client_free(client);
    }

    #[derive(Default)]
    struct Seen {
        calls: u32,
        error_code: Option<FfiErrorCode>,
    }

    extern "C" fn record(result: *const FfiShuffleResult, user_data: *mut c_void) {
        let seen = unsafe { &mut *(user_data as *mut Seen) };
        seen.calls += 1;
        seen.error_code = Some(unsafe { &*result }.error_code);
    }

    #[test]
    fn execute_null_client_reports_through_callback() {
        let mut seen = Seen::default();
        shuffler_execute(
            std::ptr::null(),
            1,
            0,
            std::ptr::null(),
            Some(record as FfiShuffleCallback),
            &mut seen as *mut Seen as *mut c_void,
        );
        assert_eq!(seen.calls, 1);
        assert_eq!(seen.error_code, Some(FfiErrorCode::NullArg));
    }

    #[test]
    fn execute_invalid_method_reports_through_callback() {
        let client = client();
        let method = CString::new("shuffle-harder").unwrap();
        let mut seen = Seen::default();
        shuffler_execute(
            client,
            1,
            0,
            method.as_ptr(),
            Some(record as FfiShuffleCallback),
            &mut seen as *mut Seen as *mut c_void,
        );
        assert_eq!(seen.calls, 1);
        assert_eq!(seen.error_code, Some(FfiErrorCode::InvalidArg));
        shuffler_client_free(client);
    }

    #[test]
    fn execute_invalid_jokers_reports_through_callback() {
        let client = client();
        let mut seen = Seen::default();
        shuffler_execute(
            client,
            0,
            7,
            std::ptr::null(),
            Some(record as FfiShuffleCallback),
            &mut seen as *mut Seen as *mut c_void,
        );
        assert_eq!(seen.calls, 1);
        assert_eq!(seen.error_code, Some(FfiErrorCode::InvalidArg));
        shuffler_client_free(client);
    }

    #[test]
    fn execute_without_callback_is_noop() {
        shuffler_execute(
            std::ptr::null(),
            1,
            0,
            std::ptr::null(),
            None,
            std::ptr::null_mut(),
        );
    }

    #[test]
    fn free_functions_accept_null() {
        shuffler_free_request(std::ptr::null_mut());
        shuffler_free_result(std::ptr::null_mut());
        shuffler_free_string(std::ptr::null_mut());
    }
}
