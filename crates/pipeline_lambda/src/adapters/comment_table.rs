use pipeline_core::error::StoreError;
use pipeline_core::record::{CommentRecord, CommentUpdate};

/// Key-value table holding comment records, keyed by `comment_id`.
pub trait CommentTable {
    fn get_item(&self, comment_id: &str) -> Result<Option<CommentRecord>, StoreError>;

    fn put_item(&self, record: &CommentRecord) -> Result<(), StoreError>;

    /// Sets `name`, `comment` and `timestamp` on the item; creates it when
    /// absent.
    fn update_item(&self, comment_id: &str, update: &CommentUpdate) -> Result<(), StoreError>;

    /// Removing an absent item is not an error.
    fn delete_item(&self, comment_id: &str) -> Result<(), StoreError>;
}
