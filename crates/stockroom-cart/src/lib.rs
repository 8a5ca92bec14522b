pub mod cart;
pub mod error;
pub mod line;
pub mod store;

pub use cart::{CartStore, CART_STORAGE_KEY};
pub use error::StoreError;
pub use line::{CartKey, CartLine};
pub use store::{FileStore, KeyValueStore, MemoryStore};
