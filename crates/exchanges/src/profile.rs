//! Exchange profiles.
//!
//! A profile is the whole description of one REST exchange: where to list
//! markets, where to fetch books, how both payloads are shaped, ticker
//! aliases and how the exchange reports errors. Built-in profiles live in
//! [`crate::exchanges`]; more can be loaded from a JSON file.

use crate::book::{BookShape, Scaling};
use crate::error::{ErrorKind, ExchangeError, ExchangeResult};
use crate::listing::ListingShape;
use crate::template::{display_path, lookup, Placeholders};
use crate::ticker::TickerMap;
use crate::transport::{HttpRequest, Method};
use cointrage_core::MarketPair;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_DEPTH: usize = 50;

fn default_depth() -> usize {
    DEFAULT_DEPTH
}

/// Templated HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub method: Method,
    /// URL template, see [`Placeholders`]
    pub url: String,
    /// JSON body template for POST endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Endpoint {
    pub fn get(url: &str) -> Self {
        Self {
            method: Method::Get,
            url: url.to_string(),
            body: None,
            headers: BTreeMap::new(),
        }
    }

    pub fn post(url: &str, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.to_string(),
            body: Some(body),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn to_request(&self, placeholders: &Placeholders) -> ExchangeResult<HttpRequest> {
        let url = placeholders.render(&self.url);
        url::Url::parse(&url)?;

        let mut request = match self.method {
            Method::Get => HttpRequest::get(url),
            Method::Post => HttpRequest::post(url, self.body.as_ref().map(|b| placeholders.render_json(b))),
        };
        for (name, value) in &self.headers {
            request = request.with_header(name, &placeholders.render(value));
        }
        Ok(request)
    }
}

/// Maps an exchange error response to an [`ErrorKind`].
///
/// A rule matches when every condition it sets holds: the HTTP status, the
/// presence of `field` in the body, and `field == equals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRule {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub field: Vec<String>,
    #[serde(default)]
    pub equals: Option<Value>,
    pub kind: ErrorKind,
}

impl ErrorRule {
    pub fn on_status(status: u16, kind: ErrorKind) -> Self {
        Self {
            status: Some(status),
            field: Vec::new(),
            equals: None,
            kind,
        }
    }

    pub fn on_field(field: &[&str], equals: Value, kind: ErrorKind) -> Self {
        Self {
            status: None,
            field: crate::template::path(field),
            equals: Some(equals),
            kind,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    fn matches(&self, status: u16, body: &Value) -> bool {
        if self.status.is_none() && self.field.is_empty() {
            return false;
        }
        if self.status.is_some_and(|expected| expected != status) {
            return false;
        }
        if self.field.is_empty() {
            return true;
        }
        match lookup(body, &self.field, &Placeholders::default()) {
            None => false,
            Some(value) => self.equals.as_ref().map_or(true, |expected| value == expected),
        }
    }
}

/// Declarative description of one REST exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeProfile {
    pub name: String,
    pub markets: Endpoint,
    pub listing: ListingShape,
    pub order_book: Endpoint,
    pub book: BookShape,
    #[serde(default)]
    pub scaling: Scaling,
    /// The exchange labels bids as asks and vice versa
    #[serde(default)]
    pub swap_sides: bool,
    /// Depth sent in book requests when the caller gives none
    #[serde(default = "default_depth")]
    pub default_depth: usize,
    /// Native ticker -> canonical ticker
    #[serde(default)]
    pub ticker_aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub error_rules: Vec<ErrorRule>,
    /// Documented request allowance, informational only
    #[serde(default)]
    pub rate_limit: Option<String>,
}

impl ExchangeProfile {
    pub fn new(name: &str, markets: Endpoint, listing: ListingShape, order_book: Endpoint, book: BookShape) -> Self {
        Self {
            name: name.to_string(),
            markets,
            listing,
            order_book,
            book,
            scaling: Scaling::None,
            swap_sides: false,
            default_depth: DEFAULT_DEPTH,
            ticker_aliases: BTreeMap::new(),
            error_rules: Vec::new(),
            rate_limit: None,
        }
    }

    pub fn with_aliases(mut self, aliases: &[(&str, &str)]) -> Self {
        for (native, canonical) in aliases {
            self.ticker_aliases
                .insert(native.to_ascii_uppercase(), canonical.to_ascii_uppercase());
        }
        self
    }

    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_swapped_sides(mut self) -> Self {
        self.swap_sides = true;
        self
    }

    pub fn with_default_depth(mut self, depth: usize) -> Self {
        self.default_depth = depth;
        self
    }

    pub fn with_error_rule(mut self, rule: ErrorRule) -> Self {
        self.error_rules.push(rule);
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: &str) -> Self {
        self.rate_limit = Some(rate_limit.to_string());
        self
    }

    pub fn tickers(&self) -> TickerMap {
        TickerMap::new(&self.ticker_aliases)
    }

    /// Check the profile can produce valid requests.
    pub fn validate(&self) -> ExchangeResult<()> {
        if self.name.trim().is_empty() {
            return Err(ExchangeError::Config("profile name is empty".to_string()));
        }
        if self.default_depth == 0 {
            return Err(ExchangeError::Config(format!("{}: default_depth must be positive", self.name)));
        }
        if self.scaling.max_decimals() > Scaling::MAX_DECIMALS {
            return Err(ExchangeError::Config(format!(
                "{}: scaling decimals must not exceed {}",
                self.name,
                Scaling::MAX_DECIMALS
            )));
        }
        let sample = Placeholders {
            base: "ETH".to_string(),
            quote: "BTC".to_string(),
            id: "1".to_string(),
            depth: self.default_depth,
        };
        for endpoint in [&self.markets, &self.order_book] {
            endpoint
                .to_request(&sample)
                .map_err(|e| ExchangeError::Config(format!("{}: {}", self.name, e)))?;
        }
        for rule in &self.error_rules {
            if rule.status.is_none() && rule.field.is_empty() {
                return Err(ExchangeError::Config(format!(
                    "{}: error rule for {:?} matches nothing",
                    self.name, rule.kind
                )));
            }
        }
        Ok(())
    }

    /// Exchange-specific error carried by a response, if any.
    ///
    /// Configured rules are checked first, then HTTP 429. `pair` is the
    /// market being requested; without one an unknown-market rule reports a
    /// transport failure instead.
    pub fn translate_error(
        &self,
        status: u16,
        body: &Value,
        url: &str,
        pair: Option<&MarketPair>,
    ) -> Option<ExchangeError> {
        if let Some(rule) = self.error_rules.iter().find(|r| r.matches(status, body)) {
            debug!(
                "{}: response matched error rule {:?} at {}",
                self.name,
                rule.kind,
                display_path(&rule.field)
            );
            return Some(self.error_for(rule.kind, status, body, url, pair));
        }
        if status == 429 {
            return Some(ExchangeError::RateLimit(self.name.clone()));
        }
        None
    }

    fn error_for(
        &self,
        kind: ErrorKind,
        status: u16,
        body: &Value,
        url: &str,
        pair: Option<&MarketPair>,
    ) -> ExchangeError {
        match (kind, pair) {
            (ErrorKind::UnknownMarket, Some(pair)) => ExchangeError::UnknownMarket {
                exchange: self.name.clone(),
                pair: pair.clone(),
            },
            (ErrorKind::RateLimit, _) => ExchangeError::RateLimit(self.name.clone()),
            (ErrorKind::Schema, _) => ExchangeError::Schema(format!("{} reported error: {}", self.name, body)),
            (ErrorKind::Parse, _) => ExchangeError::Parse(format!("{} reported error: {}", self.name, body)),
            (ErrorKind::Config, _) | (ErrorKind::UnknownExchange, _) => {
                ExchangeError::Config(format!("{} rejected request: {}", self.name, body))
            }
            (ErrorKind::Transport, _) | (ErrorKind::UnknownMarket, None) => ExchangeError::Transport {
                status: Some(status),
                message: format!("{} error from url {}: {}", self.name, url, body),
            },
        }
    }
}

/// Load and validate profiles from a JSON array file.
pub fn load_profiles(path: &Path) -> ExchangeResult<Vec<ExchangeProfile>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ExchangeError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    let profiles: Vec<ExchangeProfile> = serde_json::from_str(&content)
        .map_err(|e| ExchangeError::Config(format!("invalid profiles in {}: {}", path.display(), e)))?;
    for profile in &profiles {
        profile.validate()?;
    }
    Ok(profiles)
}

/// Overlay `extra` on `base`; a profile with the same name (case-insensitive) replaces the original.
pub fn merge_profiles(base: Vec<ExchangeProfile>, extra: Vec<ExchangeProfile>) -> Vec<ExchangeProfile> {
    let mut merged = base;
    for profile in extra {
        match merged
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(&profile.name))
        {
            Some(existing) => *existing = profile,
            None => merged.push(profile),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::LevelFormat;
    use crate::listing::PairSource;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn profile() -> ExchangeProfile {
        ExchangeProfile::new(
            "testex",
            Endpoint::get("https://api.testex.test/markets"),
            ListingShape::Records {
                path: vec![],
                pair: PairSource::Fields {
                    quote: "quote".into(),
                    base: "base".into(),
                },
                id: None,
                filters: vec![],
            },
            Endpoint::get("https://api.testex.test/depth?symbol={base}{quote}&limit={depth}"),
            BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::pairs()),
        )
        .with_aliases(&[("bcc", "bch")])
        .with_error_rule(ErrorRule::on_field(&["code"], json!(-1121), ErrorKind::UnknownMarket).with_status(400))
    }

    #[test]
    fn test_endpoint_renders_request() {
        let ph = Placeholders {
            base: "BCC".into(),
            quote: "BTC".into(),
            id: String::new(),
            depth: 20,
        };
        let req = profile().order_book.to_request(&ph).unwrap();
        assert_eq!(req.url, "https://api.testex.test/depth?symbol=BCCBTC&limit=20");
        assert_eq!(req.method, Method::Get);

        let post = Endpoint::post("https://api.testex.test/book", json!({"market": "{quote}_{base}"}))
            .with_header("Content-Type", "application/json")
            .to_request(&ph)
            .unwrap();
        assert_eq!(post.body, Some(json!({"market": "BTC_BCC"})));
        assert_eq!(post.headers.len(), 1);
    }

    #[test]
    fn test_endpoint_rejects_bad_url() {
        let err = Endpoint::get("not a url/{base}").to_request(&Placeholders::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_translate_error_rules() {
        let profile = profile();
        let pair = MarketPair::from_strs("BTC", "ZZZ");
        let body = json!({"code": -1121, "msg": "Invalid symbol."});

        let err = profile
            .translate_error(400, &body, "https://api.testex.test/depth", Some(&pair))
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownMarket);

        // same body without a pair in play
        let err = profile
            .translate_error(400, &body, "https://api.testex.test/markets", None)
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Transport);

        // status must match too
        assert!(profile.translate_error(200, &body, "u", Some(&pair)).is_none());

        let err = profile.translate_error(429, &Value::Null, "u", None).unwrap();
        assert_eq!(err.kind(), ErrorKind::RateLimit);

        assert!(profile.translate_error(500, &json!({"code": 1}), "u", None).is_none());
    }

    #[test]
    fn test_field_presence_rule() {
        let rule = ErrorRule {
            status: None,
            field: vec!["error".into()],
            equals: None,
            kind: ErrorKind::Schema,
        };
        assert!(rule.matches(200, &json!({"error": "bad"})));
        assert!(!rule.matches(200, &json!({"result": []})));
    }

    #[test]
    fn test_validate() {
        assert!(profile().validate().is_ok());

        let mut broken = profile();
        broken.order_book = Endpoint::get("nonsense");
        assert_eq!(broken.validate().unwrap_err().kind(), ErrorKind::Config);

        let zero = profile().with_default_depth(0);
        assert!(zero.validate().is_err());

        let empty_rule = profile().with_error_rule(ErrorRule {
            status: None,
            field: vec![],
            equals: None,
            kind: ErrorKind::RateLimit,
        });
        assert!(empty_rule.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_scaling() {
        let eth = profile().with_scaling(Scaling::by_quote(18, &[("BTC", 8)]));
        assert!(eth.validate().is_ok());

        let huge = profile().with_scaling(Scaling::by_quote(u32::MAX, &[]));
        assert_eq!(huge.validate().unwrap_err().kind(), ErrorKind::Config);

        let per_quote = profile().with_scaling(Scaling::by_quote(8, &[("ETH", Scaling::MAX_DECIMALS + 1)]));
        assert_eq!(per_quote.validate().unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_tickers_from_aliases() {
        let tickers = profile().tickers();
        assert_eq!(tickers.normalize("BCC"), "BCH");
    }

    #[test]
    fn test_profile_json_defaults() {
        let json = serde_json::to_value(profile()).unwrap();
        let mut minimal = json.clone();
        let obj = minimal.as_object_mut().unwrap();
        obj.remove("default_depth");
        obj.remove("scaling");
        obj.remove("error_rules");

        let parsed: ExchangeProfile = serde_json::from_value(minimal).unwrap();
        assert_eq!(parsed.default_depth, DEFAULT_DEPTH);
        assert_eq!(parsed.scaling, Scaling::None);
        assert!(parsed.error_rules.is_empty());

        let round: ExchangeProfile = serde_json::from_value(json).unwrap();
        assert_eq!(round, profile());
    }

    #[test]
    fn test_load_and_merge_profiles() {
        let dir = std::env::temp_dir().join(format!("cointrage-profiles-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("profiles.json");

        let mut replacement = profile();
        replacement.default_depth = 10;
        let extra = ExchangeProfile {
            name: "otherex".into(),
            ..profile()
        };
        std::fs::write(&path, serde_json::to_string(&vec![replacement, extra]).unwrap()).unwrap();

        let loaded = load_profiles(&path).unwrap();
        assert_eq!(loaded.len(), 2);

        let merged = merge_profiles(vec![profile()], loaded);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].default_depth, 10);
        assert_eq!(merged[1].name, "otherex");

        assert!(load_profiles(&dir.join("missing.json")).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
