use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// HTTP method of a gateway request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hooks called around every gateway request.
///
/// Each `on_request_start` is followed by exactly one `on_request_end`, also
/// when the request fails or its future is dropped. `status` is `None` when no
/// HTTP response was received.
pub trait RequestObserver: Send + Sync {
    fn on_request_start(&self, method: Method, url: &str) {
        let _ = (method, url);
    }

    fn on_request_end(&self, method: Method, url: &str, status: Option<u16>) {
        let _ = (method, url, status);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {}

/// Counts requests in flight; clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct LoadingTracker {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }
}

impl RequestObserver for LoadingTracker {
    fn on_request_start(&self, _: Method, _: &str) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
    }

    fn on_request_end(&self, _: Method, _: &str, _: Option<u16>) {
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

/// Reports the end of a request when dropped.
pub(super) struct RequestGuard<'a> {
    observer: &'a dyn RequestObserver,
    method: Method,
    url: String,
    status: Option<u16>,
}

impl<'a> RequestGuard<'a> {
    pub(super) fn start(observer: &'a dyn RequestObserver, method: Method, url: String) -> Self {
        observer.on_request_start(method, &url);
        Self {
            observer,
            method,
            url,
            status: None,
        }
    }

    pub(super) fn set_status(&mut self, status: u16) {
        self.status = Some(status);
    }
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.observer
            .on_request_end(self.method, &self.url, self.status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_counts_overlapping_requests() {
        let tracker = LoadingTracker::new();
        assert!(!tracker.is_loading());

        let first = RequestGuard::start(&tracker, Method::Get, "a".to_owned());
        let mut second = RequestGuard::start(&tracker, Method::Post, "b".to_owned());
        assert_eq!(tracker.in_flight(), 2);

        second.set_status(201);
        drop(second);
        assert!(tracker.is_loading());

        drop(first);
        assert!(!tracker.is_loading());
    }

    #[test]
    fn tracker_never_underflows() {
        let tracker = LoadingTracker::new();
        tracker.on_request_end(Method::Delete, "x", None);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn clones_share_state() {
        let tracker = LoadingTracker::new();
        let clone = tracker.clone();
        clone.on_request_start(Method::Get, "x");
        assert!(tracker.is_loading());
    }
}
