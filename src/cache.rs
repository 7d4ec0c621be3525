use std::sync::{Arc, PoisonError, RwLock};

use crate::config::SourceConfig;
use crate::error::LoadError;
use crate::loader;
use crate::transaction::TransactionTable;

/// Something that can produce the transaction table.
pub trait TransactionSource: Send + Sync {
    fn load(&self) -> Result<TransactionTable, LoadError>;

    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;
}

/// The configured workbook on disk.
pub struct WorkbookSource {
    config: SourceConfig,
}

impl WorkbookSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }
}

impl TransactionSource for WorkbookSource {
    fn load(&self) -> Result<TransactionTable, LoadError> {
        loader::load_workbook(&self.config)
    }

    fn describe(&self) -> String {
        format!("{} [{}]", self.config.path, self.config.sheet)
    }
}

/// Load-once cache for the transaction table.
///
/// The first successful `get` stores the table; later calls share it until
/// `invalidate` is called. Changes to the underlying file are not noticed.
pub struct TableCache {
    source: Box<dyn TransactionSource>,
    slot: RwLock<Option<Arc<TransactionTable>>>,
}

impl TableCache {
    pub fn new(source: impl TransactionSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            slot: RwLock::new(None),
        }
    }

    pub fn get(&self) -> Result<Arc<TransactionTable>, LoadError> {
        if let Some(table) = self.slot.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return Ok(Arc::clone(table));
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // another caller may have loaded while we waited for the write lock
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }
        log::info!("loading transactions from {}", self.source.describe());
        let table = Arc::new(self.source.load()?);
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    pub fn is_warm(&self) -> bool {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Drops the cached table; the next `get` reloads from the source.
    pub fn invalidate(&self) {
        log::debug!("invalidating cached transactions from {}", self.source.describe());
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
