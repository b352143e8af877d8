use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared open/closed flag. Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct Disclosure {
    opened: Arc<AtomicBool>,
}

impl Disclosure {
    pub fn new(initial: bool) -> Self {
        Self {
            opened: Arc::new(AtomicBool::new(initial)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn open(&self) {
        self.opened.store(true, Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.opened.store(false, Ordering::SeqCst);
    }

    pub fn toggle(&self) {
        self.opened.fetch_xor(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let disclosure = Disclosure::default();
        let handle = disclosure.clone();
        handle.open();
        assert!(disclosure.is_open());
        disclosure.toggle();
        assert!(!handle.is_open());
        handle.toggle();
        handle.close();
        assert!(!disclosure.is_open());
    }
}
