pub mod comment_store;
pub mod directory_sync;
