pub mod builder;
pub mod dispatch;

pub use builder::{UrlCommand, UrlRequest};
pub use dispatch::{SystemDispatcher, UrlDispatcher};
