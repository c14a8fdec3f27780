pub mod page;
pub mod session;

pub use page::{fetch, fetch_with_encoding, parse};
pub use session::{Response, ResponseCache, Session, DEFAULT_ENCODING};
