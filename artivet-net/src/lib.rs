// artivet-net/src/lib.rs
pub mod http;
pub mod repository;
pub mod validation;

pub use http::{build_http_client, download_to};
pub use repository::RemoteArtifactResolver;
pub use validation::validate_url;
