//! User-Agent decomposition into browser, OS and device attributes.
//!
//! Each attribute is resolved by an ordered list of regex rules; the first
//! rule that matches wins, so more specific families (Edge, Opera, Samsung
//! Internet) are listed before the engines they embed (Chrome, Safari).
//! Unknown values resolve to family `Other` with an empty version. Parsing
//! never fails and never touches the input string.

use std::sync::LazyLock;

use phf::phf_map;
use regex::{Captures, Regex};
use serde::Serialize;

/// Attributes decoded from one User-Agent string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UserAgentInfo {
    pub browser: String,
    pub browser_version: String,
    pub os: String,
    pub os_version: String,
    pub device: String,
    pub device_category: String,
}

const OTHER: &str = "Other";

/// Decode `ua` with the built-in rule set.
pub fn parse_user_agent(ua: &str) -> UserAgentInfo {
    PARSER.parse(ua)
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// Where a rule takes its family name from.
#[derive(Debug, Clone, Copy)]
enum Family {
    Fixed(&'static str),
    Group(usize),
}

struct Rule {
    pattern: Regex,
    family: Family,
    /// Capture group holding the version, if any.
    version: Option<usize>,
}

impl Rule {
    fn new(pattern: &str, family: Family, version: Option<usize>) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("built-in user agent pattern must compile"),
            family,
            version,
        }
    }

    fn apply(&self, ua: &str) -> Option<(String, String)> {
        let caps = self.pattern.captures(ua)?;
        let family = match self.family {
            Family::Fixed(name) => name.to_string(),
            Family::Group(idx) => group(&caps, idx),
        };
        let version = self.version.map(|idx| group(&caps, idx)).unwrap_or_default();
        Some((family, version))
    }
}

fn group(caps: &Captures<'_>, idx: usize) -> String {
    caps.get(idx).map(|m| m.as_str().to_string()).unwrap_or_default()
}

const VERSION: &str = r"(\d+(?:\.\d+)*)";

static WINDOWS_NT_VERSIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "10.0" => "10",
    "6.3" => "8.1",
    "6.2" => "8",
    "6.1" => "7",
    "6.0" => "Vista",
    "5.2" => "XP",
    "5.1" => "XP",
    "5.0" => "2000",
};

static PARSER: LazyLock<UserAgentParser> = LazyLock::new(UserAgentParser::new);

struct UserAgentParser {
    bot: Regex,
    browsers: Vec<Rule>,
    oses: Vec<Rule>,
    android_model: Regex,
    apple_device: Regex,
}

impl UserAgentParser {
    fn new() -> Self {
        use Family::{Fixed, Group};

        let browsers = vec![
            Rule::new(
                r"\b(Googlebot|bingbot|Baiduspider|YandexBot|DuckDuckBot|Slurp|facebookexternalhit|AhrefsBot|SemrushBot|Applebot)(?:/(\d+(?:\.\d+)*))?",
                Group(1),
                Some(2),
            ),
            Rule::new(&format!(r"\b(?:Edge|Edg|EdgA|EdgiOS)/{VERSION}"), Fixed("Edge"), Some(1)),
            Rule::new(&format!(r"\b(?:OPR|OPiOS)/{VERSION}"), Fixed("Opera"), Some(1)),
            Rule::new(&format!(r"\bSamsungBrowser/{VERSION}"), Fixed("Samsung Internet"), Some(1)),
            Rule::new(&format!(r"\bUCBrowser/{VERSION}"), Fixed("UC Browser"), Some(1)),
            Rule::new(&format!(r"\bMicroMessenger/{VERSION}"), Fixed("WeChat"), Some(1)),
            Rule::new(&format!(r"\b(?:Firefox|FxiOS)/{VERSION}"), Fixed("Firefox"), Some(1)),
            Rule::new(&format!(r"\b(?:Chrome|CriOS)/{VERSION}"), Fixed("Chrome"), Some(1)),
            Rule::new(&format!(r"\bVersion/{VERSION}.*\bSafari/"), Fixed("Safari"), Some(1)),
            Rule::new(&format!(r"\bOpera/.*\bVersion/{VERSION}"), Fixed("Opera"), Some(1)),
            Rule::new(&format!(r"\bMSIE {VERSION}"), Fixed("IE"), Some(1)),
            Rule::new(&format!(r"\bTrident/.*\brv:{VERSION}"), Fixed("IE"), Some(1)),
            Rule::new(
                r"^(Apache-HttpClient|okhttp|curl|Wget|python-requests|python-urllib3|Go-http-client|PostmanRuntime|axios|node-fetch|Dart|Java|Dalvik|CFNetwork)/([^\s;()]+)",
                Group(1),
                Some(2),
            ),
        ];

        let oses = vec![
            Rule::new(&format!(r"\bWindows Phone(?: OS)? {VERSION}"), Fixed("Windows Phone"), Some(1)),
            Rule::new(r"\bWindows NT (\d+\.\d+)", Fixed("Windows"), Some(1)),
            Rule::new(r"\b(?:iPhone|iPad|iPod)\b.*?\bOS (\d+(?:_\d+)*)", Fixed("iOS"), Some(1)),
            Rule::new(&format!(r"\bHarmonyOS(?:[ /]{VERSION})?"), Fixed("HarmonyOS"), Some(1)),
            Rule::new(&format!(r"\bAndroid(?:[ /]{VERSION})?"), Fixed("Android"), Some(1)),
            Rule::new(r"\bMac OS X (\d+(?:[_.]\d+)*)", Fixed("Mac OS X"), Some(1)),
            Rule::new(&format!(r"\bCrOS \S+ {VERSION}"), Fixed("Chrome OS"), Some(1)),
            Rule::new(r"\bUbuntu\b", Fixed("Ubuntu"), None),
            Rule::new(r"\bLinux\b", Fixed("Linux"), None),
        ];

        Self {
            // A bare "bot" suffix is not enough: device names such as "CUBOT P50" end in it.
            bot: Regex::new(
                r"(?i)bot/|bot-|\bbot\b|compatible;[^)]*bot|crawler|spider|slurp|facebookexternalhit",
            )
            .expect("built-in user agent pattern must compile"),
            browsers,
            oses,
            android_model: Regex::new(
                r"\bAndroid(?:[ /][\d.]+)?;\s*(?:[a-zA-Z]{2}[-_][a-zA-Z]{2};\s*)?([^;)]+?)(?:\s+Build/[^;)]*)?\)",
            )
            .expect("built-in user agent pattern must compile"),
            apple_device: Regex::new(r"\b(iPad|iPhone|iPod)\b").expect("built-in user agent pattern must compile"),
        }
    }

    fn parse(&self, ua: &str) -> UserAgentInfo {
        let (browser, browser_version) = first_match(&self.browsers, ua);
        let (os, os_version) = first_match(&self.oses, ua);
        let os_version = normalize_os_version(&os, os_version);

        let is_bot = self.bot.is_match(ua);
        let device = if is_bot {
            "Spider".to_string()
        } else if let Some(caps) = self.apple_device.captures(ua) {
            group(&caps, 1)
        } else if os == "Android" || os == "HarmonyOS" {
            self.android_model
                .captures(ua)
                .map(|caps| group(&caps, 1))
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| "Generic Android".to_string())
        } else if ua.contains("Macintosh") {
            "Mac".to_string()
        } else {
            OTHER.to_string()
        };

        let device_category = category(ua, is_bot, &device, &os).to_string();

        UserAgentInfo {
            browser,
            browser_version,
            os,
            os_version,
            device,
            device_category,
        }
    }
}

fn first_match(rules: &[Rule], ua: &str) -> (String, String) {
    rules
        .iter()
        .find_map(|rule| rule.apply(ua))
        .unwrap_or_else(|| (OTHER.to_string(), String::new()))
}

fn normalize_os_version(os: &str, version: String) -> String {
    match os {
        "Windows" => WINDOWS_NT_VERSIONS
            .get(version.as_str())
            .map(|v| v.to_string())
            .unwrap_or(version),
        "iOS" | "Mac OS X" => version.replace('_', "."),
        _ => version,
    }
}

fn category(ua: &str, is_bot: bool, device: &str, os: &str) -> &'static str {
    let android = os == "Android" || os == "HarmonyOS";
    if is_bot {
        "Bot"
    } else if device == "iPad"
        || ua.contains("Tablet")
        || (android && !ua.contains("Mobile") && ua.contains("Safari"))
    {
        "Tablet"
    } else if device == "iPhone" || device == "iPod" || android || ua.contains("Mobile") || os == "Windows Phone" {
        "Mobile"
    } else if matches!(os, "Windows" | "Mac OS X" | "Linux" | "Ubuntu" | "Chrome OS") {
        "Desktop"
    } else {
        OTHER
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
