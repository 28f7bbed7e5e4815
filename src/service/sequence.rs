//! Last-fetch-wins ordering of student list fetches.

/// Issues monotonically increasing fetch sequence numbers and decides which
/// responses may still be applied.
///
/// A response is applied only if its number is greater than the last applied
/// one, so a slow early fetch can never overwrite a newer result. Failed
/// fetches are settled with [`FetchSequencer::fail`] so they stop counting as
/// outstanding.
///
/// # Example
///
/// ```
/// use roster::service::FetchSequencer;
///
/// let mut seq = FetchSequencer::default();
/// let first = seq.issue();
/// let second = seq.issue();
///
/// assert!(seq.accept(second));
/// assert!(!seq.accept(first));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSequencer {
    issued: u64,
    applied: u64,
    /// Highest number that was applied or failed.
    settled: u64,
}

impl FetchSequencer {
    /// Allocates the number for a new fetch.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Records `seq` as applied if it is newer than the last applied fetch.
    ///
    /// Returns `false` for stale or unknown sequence numbers.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq > self.applied && seq <= self.issued {
            self.applied = seq;
            self.settled = self.settled.max(seq);
            true
        } else {
            tracing::debug!(seq, applied = self.applied, "stale fetch discarded");
            false
        }
    }

    /// Retires a fetch that failed. Unissued numbers are ignored.
    pub fn fail(&mut self, seq: u64) {
        if seq <= self.issued {
            self.settled = self.settled.max(seq);
        }
        tracing::debug!(seq, settled = self.settled, "fetch failed");
    }

    /// Discards every fetch issued so far; their responses will be rejected.
    pub fn invalidate(&mut self) {
        tracing::debug!(issued = self.issued, "outstanding fetches invalidated");
        self.applied = self.issued;
        self.settled = self.issued;
    }

    /// Whether a fetch newer than every settled one is still outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.issued > self.settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_order_responses_keep_the_newest() {
        let mut seq = FetchSequencer::default();
        let a = seq.issue();
        let b = seq.issue();
        let c = seq.issue();

        assert!(seq.accept(b));
        assert!(!seq.accept(a));
        assert!(seq.is_pending());
        assert!(seq.accept(c));
        assert!(!seq.is_pending());
        assert!(!seq.accept(b));
    }

    #[test]
    fn failed_newest_fetch_is_no_longer_pending() {
        let mut seq = FetchSequencer::default();
        let old = seq.issue();
        let newest = seq.issue();

        seq.fail(newest);
        assert!(seq.accept(old));
        assert!(!seq.is_pending());
    }

    #[test]
    fn invalidate_rejects_in_flight_responses() {
        let mut seq = FetchSequencer::default();
        let in_flight = seq.issue();
        seq.invalidate();

        assert!(!seq.is_pending());
        assert!(!seq.accept(in_flight));

        let next = seq.issue();
        assert!(seq.accept(next));
    }

    #[test]
    fn duplicate_and_unissued_numbers_are_rejected() {
        let mut seq = FetchSequencer::default();
        let a = seq.issue();
        assert!(seq.accept(a));
        assert!(!seq.accept(a));
        assert!(!seq.accept(99));
    }
}
