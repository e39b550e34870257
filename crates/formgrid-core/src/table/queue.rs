use std::collections::VecDeque;

/// FIFO of work deferred until the current callback has returned.
///
/// Single-threaded by construction; ordering alone prevents reentrancy.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    items: VecDeque<T>,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        DeferredQueue {
            items: VecDeque::new(),
        }
    }

    pub fn post(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Take everything queued so far. Items posted while the batch is being
    /// handled wait for the next drain.
    pub fn drain(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::DeferredQueue;

    #[test]
    fn test_drain_is_fifo_and_snapshots() {
        let mut queue = DeferredQueue::new();
        queue.post(1);
        queue.post(2);
        let batch = queue.drain();
        queue.post(3);
        assert_eq!(batch, vec![1, 2]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain(), vec![3]);
        assert!(queue.is_empty());
    }
}
