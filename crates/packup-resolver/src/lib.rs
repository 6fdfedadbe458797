mod fetch;
mod manifest;
mod resolve;

pub use fetch::{HttpFetcher, ReqwestFetcher};
pub use manifest::{newest_version, parse_maven_metadata, MavenMetadata};
pub use resolve::resolve_version;
