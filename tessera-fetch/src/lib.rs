mod fetcher;
mod reader;

pub use self::fetcher::{FetchError, Fetcher};
pub use self::reader::FetchReader;
