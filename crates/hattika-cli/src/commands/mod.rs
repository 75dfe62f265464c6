pub mod config;
pub mod countdown;
pub mod launch;
pub mod notify;
pub mod page;

use hattika_core::error::Result;
use hattika_core::{Config, Database, Document, KvStore, MemoryStore, PageContext};

/// Backing store selected by `--ephemeral`.
pub enum Store {
    Disk(Database),
    Memory(MemoryStore),
}

impl Store {
    pub fn open(ephemeral: bool) -> Result<Self> {
        if ephemeral {
            Ok(Store::Memory(MemoryStore::new()))
        } else {
            Ok(Store::Disk(Database::open()?))
        }
    }
}

impl KvStore for Store {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Store::Disk(db) => db.get(key),
            Store::Memory(mem) => mem.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            Store::Disk(db) => db.set(key, value),
            Store::Memory(mem) => mem.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match self {
            Store::Disk(db) => db.remove(key),
            Store::Memory(mem) => mem.remove(key),
        }
    }
}

/// Build the standard landing page over the selected store.
pub fn open_page(ephemeral: bool) -> Result<PageContext<Store>> {
    let config = Config::load()?;
    Ok(PageContext::new(Document::landing(), Store::open(ephemeral)?, config))
}
