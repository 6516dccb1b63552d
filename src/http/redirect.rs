// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Redirect hop policy

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What the transport does with a redirect response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectAction {
    /// Issue the next request
    Follow,
    /// Treat the redirect response as final
    Stop,
}

/// Counter-driven redirect decision, consulted once per hop
#[derive(Debug, Clone)]
pub struct RedirectPolicy {
    follow: bool,
    max: usize,
    taken: Arc<AtomicUsize>,
}

impl RedirectPolicy {
    /// Create a policy; `follow = false` stops at the first redirect
    pub fn new(follow: bool, max: usize) -> Self {
        Self {
            follow,
            max,
            taken: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Count a hop and decide whether to follow it
    pub fn next_hop(&self) -> RedirectAction {
        let taken = self.taken.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.follow || taken >= self.max {
            RedirectAction::Stop
        } else {
            RedirectAction::Follow
        }
    }

    /// Hops seen so far
    pub fn taken(&self) -> usize {
        self.taken.load(Ordering::SeqCst)
    }

    /// Bridge into reqwest; clones share the hop counter
    pub fn to_reqwest(&self) -> reqwest::redirect::Policy {
        let policy = self.clone();
        reqwest::redirect::Policy::custom(move |attempt| match policy.next_hop() {
            RedirectAction::Stop => attempt.stop(),
            RedirectAction::Follow => {
                tracing::info!(" Ignoring the response body");
                tracing::info!(" Issuing request to this URL : {}", attempt.url());
                attempt.follow()
            }
        })
    }
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self::new(false, 10)
    }
}
