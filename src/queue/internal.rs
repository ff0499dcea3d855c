//! Singly-linked node chain backing [`MessageQueue`](crate::queue::MessageQueue)
//!
//! Nodes are heap allocations linked from `head` to `tail`. `tail` points
//! at the last node so appends are O(1). The chain has no synchronisation of
//! its own; it is only reachable through the owning queue's mutex.

use crate::queue::message::Message;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

struct Node {
    message: Message,
    next: Option<NonNull<Node>>,
}

/// FIFO chain of owned messages
///
/// Invariants: `head` is `None` exactly when `tail` is `None`; following
/// `next` from `head` reaches `tail` after `len - 1` steps; `tail.next` is
/// `None`.
pub(crate) struct NodeChain {
    head: Option<NonNull<Node>>,
    tail: Option<NonNull<Node>>,
    len: usize,
    payload_bytes: usize,
    _owns: PhantomData<Box<Node>>,
}

// SAFETY: every node is uniquely owned by the chain, so moving the chain to
// another thread moves its nodes with it. `Message` is `Send`.
unsafe impl Send for NodeChain {}

impl NodeChain {
    pub(crate) fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            payload_bytes: 0,
            _owns: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub(crate) fn payload_bytes(&self) -> usize {
        self.payload_bytes
    }

    /// Append after the current tail
    pub(crate) fn push_back(&mut self, message: Message) {
        self.payload_bytes += message.len();
        let node = NonNull::from(Box::leak(Box::new(Node {
            message,
            next: None,
        })));

        match self.tail {
            // SAFETY: `tail` points at a live node owned by this chain and
            // `&mut self` guarantees no other reference to it exists.
            Some(tail) => unsafe { (*tail.as_ptr()).next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
    }

    /// Detach and return the head message
    pub(crate) fn pop_front(&mut self) -> Option<Message> {
        self.head.map(|head| {
            // SAFETY: `head` was produced by `Box::leak` in `push_back` and is
            // unlinked here before the box is rebuilt, so it is freed once.
            let node = unsafe { Box::from_raw(head.as_ptr()) };
            self.head = node.next;
            if self.head.is_none() {
                self.tail = None;
            }
            self.len -= 1;
            self.payload_bytes -= node.message.len();
            node.message
        })
    }

    pub(crate) fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head,
            _chain: PhantomData,
        }
    }

    /// Walk the chain and verify the structural invariants
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        match (self.head, self.tail) {
            (None, None) if self.len == 0 => return Ok(()),
            (None, None) => return Err(format!("empty chain reports len {}", self.len)),
            (Some(_), None) | (None, Some(_)) => {
                return Err("head and tail disagree about emptiness".to_string())
            }
            (Some(_), Some(_)) => {}
        }

        let mut count = 0;
        let mut last = None;
        let mut cursor = self.head;
        while let Some(node) = cursor {
            count += 1;
            last = Some(node);
            // SAFETY: every linked node is live while `&self` is held.
            cursor = unsafe { (*node.as_ptr()).next };
        }

        if last != self.tail {
            return Err("walking from head does not end at tail".to_string());
        }
        if count != self.len {
            return Err(format!("walked {} nodes, len is {}", count, self.len));
        }
        Ok(())
    }
}

impl Drop for NodeChain {
    fn drop(&mut self) {
        // Iterative so long chains cannot overflow the stack
        while self.pop_front().is_some() {}
    }
}

impl fmt::Debug for NodeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeChain")
            .field("len", &self.len)
            .field("payload_bytes", &self.payload_bytes)
            .finish()
    }
}

/// Borrowing iterator from head to tail
pub(crate) struct Iter<'a> {
    next: Option<NonNull<Node>>,
    _chain: PhantomData<&'a NodeChain>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Message;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            // SAFETY: the chain is borrowed for 'a, so no node is freed or
            // mutated while the iterator is alive.
            let node = unsafe { &*node.as_ptr() };
            self.next = node.next;
            &node.message
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str, sequence: u64) -> Message {
        Message::copy_from(text, sequence).unwrap()
    }

    #[test]
    fn test_new_chain_is_empty() {
        let chain = NodeChain::new();

        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert_eq!(chain.payload_bytes(), 0);
        chain.check_invariants().unwrap();
    }

    #[test]
    fn test_push_pop_preserves_order() {
        let mut chain = NodeChain::new();
        chain.push_back(message("first", 1));
        chain.push_back(message("second", 2));
        chain.push_back(message("third", 3));
        chain.check_invariants().unwrap();
        assert_eq!(chain.len(), 3);

        assert_eq!(chain.pop_front().unwrap().text(), "first");
        chain.check_invariants().unwrap();
        assert_eq!(chain.pop_front().unwrap().text(), "second");
        assert_eq!(chain.pop_front().unwrap().text(), "third");
        assert!(chain.pop_front().is_none());
        chain.check_invariants().unwrap();
    }

    #[test]
    fn test_tail_resets_when_emptied_then_reused() {
        let mut chain = NodeChain::new();
        chain.push_back(message("only", 1));
        assert!(chain.pop_front().is_some());
        chain.check_invariants().unwrap();

        // Appending after the chain drained must not link through a stale tail
        chain.push_back(message("again", 2));
        chain.push_back(message("more", 3));
        chain.check_invariants().unwrap();
        assert_eq!(chain.pop_front().unwrap().text(), "again");
        assert_eq!(chain.pop_front().unwrap().text(), "more");
    }

    #[test]
    fn test_payload_bytes_tracking() {
        let mut chain = NodeChain::new();
        chain.push_back(message("still", 1));
        chain.push_back(message("alive", 2));
        assert_eq!(chain.payload_bytes(), 10);

        chain.pop_front();
        assert_eq!(chain.payload_bytes(), 5);
    }

    #[test]
    fn test_iter_walks_head_to_tail() {
        let mut chain = NodeChain::new();
        for i in 0..4 {
            chain.push_back(message(&format!("TestMessage: {}", i), i + 1));
        }

        let texts: Vec<&str> = chain.iter().map(Message::text).collect();
        assert_eq!(
            texts,
            vec![
                "TestMessage: 0",
                "TestMessage: 1",
                "TestMessage: 2",
                "TestMessage: 3"
            ]
        );
        assert_eq!(chain.len(), 4, "iteration does not consume");
    }

    #[test]
    fn test_drop_long_chain() {
        let mut chain = NodeChain::new();
        for i in 0..100_000 {
            chain.push_back(message("x", i));
        }
        drop(chain);
    }
}
