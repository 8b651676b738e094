// src/context.rs

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lockable workflow context.
///
/// Cloning a `FlowData` is cheap (it clones the inner `Arc`); every stage
/// handler receives a clone of the same underlying data.
///
/// IMPORTANT: the guards returned here are blocking `parking_lot` guards and
/// MUST NOT be held across an `.await` suspension point. Read what you need
/// into locals, drop the guard, then await.
#[derive(Debug)]
pub struct FlowData<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> FlowData<T> {
  pub fn new(data: T) -> Self {
    FlowData(Arc::new(RwLock::new(data)))
  }

  /// Acquires a read lock. Drop the guard before any `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  /// Acquires a write lock. Drop the guard before any `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Attempts to acquire a read lock without blocking.
  pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
    self.0.try_read()
  }

  /// Attempts to acquire a write lock without blocking.
  pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, T>> {
    self.0.try_write()
  }
}

impl<T: Send + Sync + 'static> Clone for FlowData<T> {
  fn clone(&self) -> Self {
    FlowData(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for FlowData<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}
