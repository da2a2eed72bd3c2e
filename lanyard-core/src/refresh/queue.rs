//! Bounded FIFO of refresh requests

use heapless::Deque;

use super::request::RefreshRequest;

pub const REFRESH_QUEUE_CAPACITY: usize = 16;

/// Errors from [`RefreshQueue::enqueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshError {
    QueueFull,
    /// Rect is empty, leaves the canvas or has an unaligned x edge
    InvalidRect,
}

/// Refresh requests waiting for the worker
///
/// Rectangles are checked against the canvas size at enqueue time, so the
/// worker never sees one it cannot transfer.
pub struct RefreshQueue {
    requests: Deque<RefreshRequest, REFRESH_QUEUE_CAPACITY>,
    width: u16,
    height: u16,
}

impl RefreshQueue {
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            requests: Deque::new(),
            width,
            height,
        }
    }

    /// Add a request without blocking
    pub fn enqueue(&mut self, request: RefreshRequest) -> Result<(), RefreshError> {
        if let Some(rect) = request.rect {
            if !rect.fits_within(self.width, self.height) || !rect.is_byte_aligned() {
                warn!(
                    "refresh: rejected rect ({}, {})-({}, {})",
                    rect.x_start,
                    rect.y_start,
                    rect.x_end,
                    rect.y_end
                );
                return Err(RefreshError::InvalidRect);
            }
        }
        self.requests.push_back(request).map_err(|_| {
            warn!("refresh: queue full");
            RefreshError::QueueFull
        })
    }

    pub fn dequeue(&mut self) -> Option<RefreshRequest> {
        self.requests.pop_front()
    }

    /// Drop everything pending
    pub fn reset(&mut self) {
        self.requests.clear();
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RefreshRequest> {
        self.requests.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::refresh::RefreshMode;

    #[test]
    fn test_fifo_order() {
        let mut queue = RefreshQueue::new(800, 480);
        queue.enqueue(RefreshRequest::clear()).unwrap();
        queue.enqueue(RefreshRequest::fast()).unwrap();
        queue.enqueue(RefreshRequest::sleep()).unwrap();

        assert_eq!(queue.dequeue().map(|r| r.mode), Some(RefreshMode::Clear));
        assert_eq!(queue.dequeue().map(|r| r.mode), Some(RefreshMode::Fast));
        assert_eq!(queue.dequeue().map(|r| r.mode), Some(RefreshMode::Sleep));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn test_capacity() {
        let mut queue = RefreshQueue::new(800, 480);
        for _ in 0..REFRESH_QUEUE_CAPACITY {
            queue.enqueue(RefreshRequest::fast()).unwrap();
        }
        assert_eq!(
            queue.enqueue(RefreshRequest::fast()),
            Err(RefreshError::QueueFull)
        );
        assert_eq!(queue.len(), REFRESH_QUEUE_CAPACITY);
    }

    #[test]
    fn test_rejects_bad_rects() {
        let mut queue = RefreshQueue::new(800, 480);
        let unaligned = RefreshRequest::partial(Rect::new(3, 0, 64, 48));
        let outside = RefreshRequest::partial(Rect::new(0, 0, 808, 48));
        let empty = RefreshRequest::partial(Rect::new(8, 8, 8, 48));

        assert_eq!(queue.enqueue(unaligned), Err(RefreshError::InvalidRect));
        assert_eq!(queue.enqueue(outside), Err(RefreshError::InvalidRect));
        assert_eq!(queue.enqueue(empty), Err(RefreshError::InvalidRect));
        assert!(queue.is_empty());

        let ok = RefreshRequest::partial(Rect::new(0, 0, 264, 48));
        assert_eq!(queue.enqueue(ok), Ok(()));
    }

    #[test]
    fn test_reset_drops_pending() {
        let mut queue = RefreshQueue::new(800, 480);
        queue.enqueue(RefreshRequest::full()).unwrap();
        queue.reset();
        assert!(queue.is_empty());
    }
}
