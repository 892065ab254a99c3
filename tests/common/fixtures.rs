//! Static event corpora used across harnesses.
//!
//! User-Agent strings are real-world captures; raw events cover the shapes
//! the transform has to accept: canonical-looking records, ingestion
//! envelopes with an embedded `data` document, and broken input.

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// User-Agent corpus
// ---------------------------------------------------------------------------

pub const UA_HTTP_CLIENT: &str = "Apache-HttpClient/4.5.12 (Java/11.0.15)";
pub const UA_CHROME_WINDOWS: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const UA_SAFARI_IPHONE: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1.2 Mobile/15E148 Safari/604.1";
pub const UA_FIREFOX_LINUX: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
pub const UA_CHROME_ANDROID: &str =
    "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.6045.163 Mobile Safari/537.36";
pub const UA_GOOGLEBOT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Every corpus entry, for tests that only care about pass-through.
pub const CORPUS_USER_AGENTS: &[&str] = &[
    UA_HTTP_CLIENT,
    UA_CHROME_WINDOWS,
    UA_SAFARI_IPHONE,
    UA_FIREFOX_LINUX,
    UA_CHROME_ANDROID,
    UA_GOOGLEBOT,
    "",
    "totally not a user agent",
    "Mozilla/5.0 (日本語; 🙂) 奇妙なブラウザ/1.0",
];

// ---------------------------------------------------------------------------
// Raw event corpus
// ---------------------------------------------------------------------------

/// Records already in (or close to) the canonical shape.
pub const CORPUS_CANONICAL: &[&str] = &[
    r#"{"event_id":"e-1","event_name":"_page_view","event_timestamp":1700000000000,"platform":"web","device":{"web_info":"Apache-HttpClient/4.5.12 (Java/11.0.15)"}}"#,
    r#"{"event_id":"e-2","event_name":"add_to_cart","event_timestamp":"1700000001000","platform":"Android","device":{"screen_width":"1080","screen_height":2400.0},"event_params":{"sku":"A-42","qty":2,"price":9.5}}"#,
    r#"{"event_id":"e-3","event_name":"login","user_id":"u-7","geo":{"country":"DE","city":"Berlin"},"app_info":{"version":"3.1.0"}}"#,
];

/// Ingestion-endpoint envelopes: the SDK payload sits as text in `data`.
pub const CORPUS_ENVELOPES: &[&str] = &[
    r#"{"ua":"curl/8.4.0","appId":"shop","timestamp":1700000000500,"data":"{\"event_id\":\"env-1\",\"event_type\":\"_first_open\",\"platform\":\"iOS\",\"zone_offset\":3600000}"}"#,
    r#"{"ua":"okhttp/4.9.2","appId":"shop","data":{"event_id":"env-2","event_type":"_app_end","attributes":{"_session_id":"s-1"}}}"#,
];

/// Lines that are not a usable record.
pub const CORPUS_BROKEN: &[&str] = &[
    "{\"event_id\": \"truncated",
    "[1, 2",
    "not json at all",
];

/// Path of the single-record ingestion sample under `tests/fixtures/`.
pub fn original_data_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("original_data.json")
}

pub fn original_data() -> String {
    std::fs::read_to_string(original_data_path()).unwrap()
}

/// Generate `n` synthetic NDJSON lines, cycling through the UA corpus and a
/// handful of platforms.
pub fn corpus_high_volume(n: usize) -> String {
    const PLATFORMS: &[&str] = &["web", "Android", "iOS", "WeChatMP"];
    (0..n)
        .map(|i| {
            let ua = CORPUS_USER_AGENTS[i % CORPUS_USER_AGENTS.len()];
            let platform = PLATFORMS[i % PLATFORMS.len()];
            let line = serde_json::json!({
                "event_id": format!("hv-{i}"),
                "event_name": "_page_view",
                "event_timestamp": 1_700_000_000_000i64 + i as i64,
                "platform": platform,
                "ua": ua,
                "event_params": { "seq": i, "page": format!("/p/{}", i % 17) },
            });
            format!("{line}\n")
        })
        .collect()
}
