pub mod breakdown;
pub mod goal;
pub mod history;
pub mod summary;
pub mod tx;

use std::path::{Path, PathBuf};

use crate::ClientResult;
use crate::setup::{ensure_initialized, ensure_initialized_at};
use crate::store::Store;

pub(crate) fn open_store(home_override: Option<&Path>) -> ClientResult<Store> {
    let setup = match home_override {
        Some(home) => ensure_initialized_at(home)?,
        None => ensure_initialized()?,
    };
    Store::open(&PathBuf::from(&setup.db_path))
}
