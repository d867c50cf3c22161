//=========================================================================
// Transition Queue
//=========================================================================
//
// Queue for game state requests.
//
// Discrete input handlers and intents queue requests here while a tick
// is being processed. The game drains this queue at the tick boundary
// and runs the matching lifecycle hook for each request in FIFO order.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::StateRequest;

//=== Transition Queue ====================================================

/// FIFO of state requests awaiting the tick boundary.
#[derive(Debug, Default)]
pub struct TransitionQueue {
    queue: Vec<StateRequest>,
}

impl TransitionQueue {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a request to be processed at the next tick boundary.
    pub fn push(&mut self, request: StateRequest) {
        self.queue.push(request);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all requests from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<StateRequest> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_returns_fifo_and_empties() {
        let mut queue = TransitionQueue::new();
        queue.push(StateRequest::BeginLoading);
        queue.push(StateRequest::Reset);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.take(), vec![StateRequest::BeginLoading, StateRequest::Reset]);
        assert!(queue.is_empty());
    }
}
