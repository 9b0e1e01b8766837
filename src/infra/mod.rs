//! Инфраструктурный слой вокруг покерного движка:
//! - RNG-реализации для движка;
//! - хранилище активной раздачи (двухфазная запись, восстановление).

pub mod persistence;
pub mod rng;

pub use persistence::{HandStore, InMemoryHandStore, PersistenceError};
pub use rng::{DeterministicRng, SystemRng};
