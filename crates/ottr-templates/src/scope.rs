//! Scope tokens for blank-node freshness

use std::sync::atomic::{AtomicU64, Ordering};

use ottr_types::ScopeToken;

/// Hands out one scope token per top-level instantiation
///
/// Shared between worker threads; the counter is the only mutable state
/// touched during expansion.
#[derive(Debug, Default)]
pub struct ScopeGenerator {
    next: AtomicU64,
}

impl ScopeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub fn next_scope(&self) -> ScopeToken {
        ScopeToken(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_sequential_tokens() {
        let gen = ScopeGenerator::new();
        assert_eq!(gen.next_scope(), ScopeToken(0));
        assert_eq!(gen.next_scope(), ScopeToken(1));
        assert_eq!(ScopeGenerator::starting_at(10).next_scope(), ScopeToken(10));
    }

    #[test]
    fn test_tokens_unique_across_threads() {
        let gen = Arc::new(ScopeGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = Arc::clone(&gen);
                std::thread::spawn(move || (0..100).map(|_| gen.next_scope()).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for token in handle.join().unwrap() {
                assert!(seen.insert(token));
            }
        }
        assert_eq!(seen.len(), 400);
    }
}
