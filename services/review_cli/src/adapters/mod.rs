pub mod http;
pub mod payload;

pub use http::HttpReviewGateway;
