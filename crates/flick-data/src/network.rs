use std::sync::atomic::{AtomicBool, Ordering};

use flick_core::catalogue::Connectivity;

/// A connectivity flag that can be flipped at runtime.
#[derive(Debug, Default)]
pub struct NetworkStatus {
  offline: AtomicBool,
}

impl NetworkStatus {
  pub fn online() -> Self { Self::default() }

  pub fn offline() -> Self { Self { offline: AtomicBool::new(true) } }

  pub fn set_online(&self, online: bool) { self.offline.store(!online, Ordering::Relaxed); }
}

impl Connectivity for NetworkStatus {
  fn is_online(&self) -> bool { !self.offline.load(Ordering::Relaxed) }
}
