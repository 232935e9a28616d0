//! Local persistence of per-user words and synonym results.
//!
//! * [`MapStore`]: whole-map load/save seam.
//! * [`JsonFileStore`] / [`MemoryStore`]: file and in-memory backends.
//! * [`UserData`]: `save_word`, `save_results`, `get_words`, `get_results`.
//! * [`load_map`]: read a JSON map file, missing file → empty map.

pub mod backend;
pub mod user_data;

pub use backend::{load_map, save_map, JsonFileStore, MapStore, MemoryStore, StoreError, UserMap};
pub use user_data::{SavedResults, SavedWords, UserData};
