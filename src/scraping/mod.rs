pub mod extractor;
pub mod fetcher;
pub mod redirect;
pub mod stealth;
