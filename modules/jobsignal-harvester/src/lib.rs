pub mod analyzer;
pub mod collector;
pub mod cursor;
pub mod dedup;
pub mod harvester;
pub mod header;
pub mod notify;
pub mod records;
pub mod snapshot;
