//! Exchange adapters for market discovery and order book snapshots.
//!
//! Every exchange answers the same two questions: which markets it lists
//! and what a market's order book looks like right now. Exchanges differ
//! only in URLs and payload shapes, so each one is described by an
//! [`ExchangeProfile`] and served by the generic [`RestExchange`].
//!
//! ## Architecture
//!
//! - `adapter` - The [`ExchangeAdapter`] contract and its REST implementation
//! - `profile` / `listing` / `book` - Declarative payload shapes and decoders
//! - `cache` - Lazily refreshed market-identity cache
//! - `ticker` - Native ↔ canonical ticker translation
//! - `registry` / `discovery` - Name lookup and multi-exchange batches
//! - `transport` - HTTP seam with a `reqwest` client and an in-memory mock
//! - `exchanges` - Built-in profile catalog

pub mod adapter;
pub mod book;
pub mod cache;
pub mod discovery;
pub mod error;
pub mod exchanges;
pub mod listing;
pub mod profile;
pub mod registry;
pub mod template;
pub mod ticker;
pub mod transport;

pub use adapter::{AdapterSettings, ExchangeAdapter, RestExchange};
pub use book::{BookLayout, BookNormalizer, BookShape, LevelFormat, Scaling};
pub use cache::{MarketCache, MarketRecord, RefreshPolicy};
pub use discovery::{first_non_empty_book, list_all, FailurePolicy};
pub use error::{ErrorKind, ExchangeError, ExchangeResult};
pub use exchanges::{builtin_profile, builtin_profiles};
pub use listing::{ListingFilter, ListingShape, PairOrder, PairSource, SymbolFormat};
pub use profile::{load_profiles, merge_profiles, Endpoint, ErrorRule, ExchangeProfile, DEFAULT_DEPTH};
pub use registry::AdapterRegistry;
pub use ticker::TickerMap;
pub use transport::{HttpRequest, HttpResponse, Method, MockTransport, ReqwestTransport, Transport};
