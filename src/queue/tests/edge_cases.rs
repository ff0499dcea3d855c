//! Edge case tests: argument rejection, truncation and closing

#[cfg(test)]
mod tests {
    use crate::queue::api::{MessageQueue, QueueError};

    #[test]
    fn test_zero_capacity_is_invalid_and_keeps_state() {
        let queue = MessageQueue::new("main");
        queue.enqueue("still").unwrap();
        let before = queue.stats();

        let mut nothing: [u8; 0] = [];
        match queue.dequeue(&mut nothing) {
            Err(QueueError::InvalidArgument { reason }) => {
                assert!(reason.contains("zero capacity"));
            }
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }

        assert_eq!(queue.stats(), before);
        assert_eq!(queue.pop().unwrap().unwrap().text(), "still");
    }

    #[test]
    fn test_zero_capacity_is_invalid_on_empty_queue() {
        let queue = MessageQueue::new("main");
        let mut nothing: [u8; 0] = [];

        assert!(matches!(
            queue.dequeue(&mut nothing),
            Err(QueueError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_interior_nul_is_invalid_and_keeps_state() {
        let queue = MessageQueue::new("main");

        assert!(matches!(
            queue.enqueue("still\0alive"),
            Err(QueueError::InvalidArgument { .. })
        ));
        assert!(queue.is_empty());
        assert_eq!(queue.stats().enqueued_total, 0);

        // The rejected payload does not consume a sequence number
        assert_eq!(queue.enqueue("still").unwrap(), 1);
    }

    #[test]
    fn test_truncation_copies_exactly_capacity_bytes() {
        let queue = MessageQueue::new("main");
        queue.enqueue("TestMessage: 10").unwrap();

        let mut backing = [0xEEu8; 12];
        let outcome = queue.dequeue(&mut backing[..7]).unwrap().unwrap();

        assert_eq!(&backing[..7], b"TestMes");
        assert!(backing[7..].iter().all(|&b| b == 0xEE));
        assert_eq!(outcome.written, 7);
        assert!(outcome.truncated);
        assert!(!outcome.terminated);

        // The truncated message is still consumed
        assert!(queue.is_empty());
    }

    #[test]
    fn test_exact_fit_reports_missing_terminator() {
        let queue = MessageQueue::new("main");
        queue.enqueue("alive").unwrap();

        let mut buffer = [0u8; 5];
        let outcome = queue.dequeue(&mut buffer).unwrap().unwrap();

        assert_eq!(&buffer, b"alive");
        assert!(!outcome.truncated);
        assert!(!outcome.terminated);
    }

    #[test]
    fn test_remaining_capacity_is_zero_filled() {
        let queue = MessageQueue::new("main");
        queue.enqueue("still").unwrap();

        let mut buffer = [0xFFu8; 10];
        let outcome = queue.dequeue(&mut buffer).unwrap().unwrap();

        assert_eq!(&buffer[..5], b"still");
        assert_eq!(&buffer[5..], &[0u8; 5]);
        assert!(outcome.terminated);
    }

    #[test]
    fn test_truncation_counts_bytes_not_characters() {
        let queue = MessageQueue::new("main");
        queue.enqueue("héllo").unwrap();

        let mut buffer = [0u8; 2];
        let outcome = queue.dequeue(&mut buffer).unwrap().unwrap();

        assert_eq!(outcome.written, 2);
        assert_eq!(buffer, [b'h', 0xC3]);
    }

    #[test]
    fn test_empty_text_is_a_valid_message() {
        let queue = MessageQueue::new("main");
        queue.enqueue("").unwrap();
        assert_eq!(queue.len(), 1);

        let mut buffer = [0x11u8; 4];
        let outcome = queue.dequeue(&mut buffer).unwrap().unwrap();
        assert_eq!(outcome.written, 0);
        assert_eq!(buffer, [0u8; 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_enqueue_after_close_is_rejected() {
        let queue = MessageQueue::new("main");
        queue.enqueue("still").unwrap();
        queue.close().unwrap();

        match queue.enqueue("alive") {
            Err(QueueError::Closed { queue_id }) => assert_eq!(queue_id, "main"),
            other => panic!("Expected Closed, got {:?}", other),
        }

        // Already queued messages remain available
        assert_eq!(queue.pop().unwrap().unwrap().text(), "still");
        assert!(queue.pop().unwrap().is_none());
    }

    #[test]
    fn test_close_is_idempotent() {
        let queue = MessageQueue::new("main");

        queue.close().unwrap();
        queue.close().unwrap();
        assert!(queue.is_closed());
        assert!(queue.stats().closed);
    }

    #[test]
    fn test_queues_are_independent() {
        let first = MessageQueue::new("first");
        let second = MessageQueue::new("second");

        first.enqueue("one").unwrap();
        second.enqueue("two").unwrap();
        first.close().unwrap();

        assert_eq!(second.enqueue("three").unwrap(), 2);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert!(!second.is_closed());
    }

    #[test]
    fn test_poisoned_lock_surfaces_internal_failure() {
        use std::sync::Arc;
        use std::thread;

        let queue = Arc::new(MessageQueue::new("main"));
        queue.enqueue("still").unwrap();

        // Panic while holding the queue lock
        let clone = Arc::clone(&queue);
        let _ = thread::spawn(move || {
            clone.poison_for_test();
        })
        .join();

        assert!(matches!(
            queue.enqueue("alive"),
            Err(QueueError::InternalFailure { .. })
        ));
        assert!(matches!(
            queue.pop(),
            Err(QueueError::InternalFailure { .. })
        ));

        // Read-only accessors still answer
        assert_eq!(queue.len(), 1);
        assert!(queue.dump().contains("Queue data: still"));
    }
}
