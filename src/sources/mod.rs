pub mod fetcher;
pub mod geocoder;
pub mod transport;

// Re-exports for convenience
pub use fetcher::RegionDataFetcher;
pub use geocoder::{PlaceResolver, ResolvedPlace};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, ScriptedTransport};
