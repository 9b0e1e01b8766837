use std::collections::HashMap;

use thiserror::Error;

use crate::domain::TableId;
use crate::engine::game_loop::HandState;

/// Ошибки хранилища раздач.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("no saved hand for table {0}")]
    NotFound(TableId),

    #[error("failed to encode hand for table {table_id}: {source}")]
    Encode {
        table_id: TableId,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode hand for table {table_id}: {source}")]
    Decode {
        table_id: TableId,
        #[source]
        source: serde_json::Error,
    },

    /// Сбой самого хранилища (диск, сеть, БД).
    #[error("storage failure for table {table_id}: {message}")]
    Backend { table_id: TableId, message: String },
}

/// Абстракция хранилища активной раздачи стола.
///
/// Хранит две копии: основную и клон. Запись идёт в два шага (сначала клон,
/// потом основная), чтение – с основной, с откатом на клон, если основная
/// пропала или не читается. Сбои хранилища возвращаются вызывающему.
pub trait HandStore {
    fn load(&self, table_id: TableId) -> Result<Option<Vec<u8>>, PersistenceError>;

    fn save(&mut self, table_id: TableId, bytes: Vec<u8>) -> Result<(), PersistenceError>;

    fn load_clone(&self, table_id: TableId) -> Result<Option<Vec<u8>>, PersistenceError>;

    fn save_clone(&mut self, table_id: TableId, bytes: Vec<u8>) -> Result<(), PersistenceError>;

    /// Удалить обе копии.
    fn remove(&mut self, table_id: TableId) -> Result<(), PersistenceError>;

    /// Сохранить раздачу: клон, затем основная копия.
    /// Если клон не записался, основная копия не трогается.
    fn commit(&mut self, table_id: TableId, hand: &HandState) -> Result<(), PersistenceError> {
        let bytes = hand
            .to_bytes()
            .map_err(|source| PersistenceError::Encode { table_id, source })?;
        self.save_clone(table_id, bytes.clone())?;
        self.save(table_id, bytes)
    }

    /// Восстановить раздачу: основная копия, иначе клон.
    fn recover(&self, table_id: TableId) -> Result<HandState, PersistenceError> {
        match self.load(table_id) {
            Ok(Some(bytes)) => match HandState::from_bytes(&bytes) {
                Ok(hand) => return Ok(hand),
                Err(e) => log::error!(
                    "table {}: primary hand copy is unreadable ({}), falling back to clone",
                    table_id,
                    e
                ),
            },
            Ok(None) => {}
            Err(e) => log::error!(
                "table {}: primary hand copy failed to load ({}), falling back to clone",
                table_id,
                e
            ),
        }

        let bytes = self
            .load_clone(table_id)?
            .ok_or(PersistenceError::NotFound(table_id))?;
        HandState::from_bytes(&bytes).map_err(|source| PersistenceError::Decode { table_id, source })
    }
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHandStore {
    primary: HashMap<TableId, Vec<u8>>,
    clones: HashMap<TableId, Vec<u8>>,
}

impl InMemoryHandStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Есть ли хоть одна копия для стола.
    pub fn contains(&self, table_id: TableId) -> bool {
        self.primary.contains_key(&table_id) || self.clones.contains_key(&table_id)
    }

    /// Записать сырые байты в основную копию (имитация сбоя записи).
    pub fn write_raw_primary(&mut self, table_id: TableId, bytes: Vec<u8>) {
        self.primary.insert(table_id, bytes);
    }

    /// Потерять основную копию (имитация сбоя между шагами commit).
    pub fn drop_primary(&mut self, table_id: TableId) {
        self.primary.remove(&table_id);
    }
}

impl HandStore for InMemoryHandStore {
    fn load(&self, table_id: TableId) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.primary.get(&table_id).cloned())
    }

    fn save(&mut self, table_id: TableId, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        self.primary.insert(table_id, bytes);
        Ok(())
    }

    fn load_clone(&self, table_id: TableId) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.clones.get(&table_id).cloned())
    }

    fn save_clone(&mut self, table_id: TableId, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        self.clones.insert(table_id, bytes);
        Ok(())
    }

    fn remove(&mut self, table_id: TableId) -> Result<(), PersistenceError> {
        self.primary.remove(&table_id);
        self.clones.remove(&table_id);
        Ok(())
    }
}
