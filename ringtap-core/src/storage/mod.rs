pub mod block_store;
pub mod metadata;
pub mod raw_export;
