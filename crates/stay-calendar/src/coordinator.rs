//! Availability request coordination.
//!
//! Whenever the committed range or the guest count changes, the caller needs a
//! fresh availability/pricing answer from the server. Requests may overlap when
//! the guest changes dates quickly; instead of cancelling in-flight work, every
//! request carries a monotonically increasing token and only a response whose
//! token is still current is applied. Anything older is dropped.
//!
//! The coordinator never performs transport itself: callers implement
//! [`AvailabilityFetcher`] and own timeouts and retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dateset::RawCalendar;
use crate::day::CalendarDay;
use crate::error::FetchError;
use crate::selection::RangeChange;

/// Monotonic request counter; `0` means nothing was ever issued.
pub type RequestToken = u64;

/// Party size sent with every availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Guests {
    /// At least one in practice; defaults to 1.
    pub adults: u32,
    pub children: u32,
    /// Usually excluded from the occupancy limit.
    pub infants: u32,
}

impl Default for Guests {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

/// What gets sent to the availability endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    /// First night of the stay.
    pub check_in: CalendarDay,
    /// Departure day; not a night of the stay.
    pub check_out: CalendarDay,
    pub guests: Guests,
}

/// Server answer for a query. Pricing is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySnapshot {
    /// Whether the server would accept a booking for the queried range.
    pub is_available: bool,
    /// Refreshed calendar payload, when the server reports newly booked dates.
    #[serde(default)]
    pub calendar: Option<RawCalendar>,
    /// Price breakdown, passed through untouched for display.
    #[serde(default)]
    pub pricing: serde_json::Value,
}

/// A request the caller should send, tagged with the token it was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    /// Token to hand back with the response.
    pub token: RequestToken,
    pub query: AvailabilityQuery,
}

/// A completed fetch, still tagged with its request token.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    /// Token of the request this answers.
    pub token: RequestToken,
    /// Snapshot on success, transport or server error otherwise.
    pub outcome: std::result::Result<AvailabilitySnapshot, FetchError>,
}

/// What [`AvailabilityCoordinator::resolve`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Current token, successful fetch: the snapshot replaced the previous one.
    Applied,
    /// Current token, failed fetch: the error flag is set, the snapshot kept.
    Failed,
    /// Superseded token: ignored entirely.
    Stale,
}

/// Transport port implemented by the surrounding application.
#[async_trait]
pub trait AvailabilityFetcher: Send + Sync {
    /// Ask the server about one range. Must not retry on its own.
    async fn fetch(
        &self,
        query: &AvailabilityQuery,
    ) -> std::result::Result<AvailabilitySnapshot, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityCoordinator {
    token: RequestToken,
    pending: Option<RequestToken>,
    range: Option<(CalendarDay, CalendarDay)>,
    guests: Guests,
    snapshot: Option<AvailabilitySnapshot>,
    error: Option<FetchError>,
}

impl AvailabilityCoordinator {
    pub fn new(guests: Guests) -> Self {
        Self {
            guests,
            ..Self::default()
        }
    }

    pub fn current_token(&self) -> RequestToken {
        self.token
    }

    pub fn guests(&self) -> Guests {
        self.guests
    }

    pub fn range(&self) -> Option<(CalendarDay, CalendarDay)> {
        self.range
    }

    /// Last successfully applied snapshot.
    pub fn snapshot(&self) -> Option<&AvailabilitySnapshot> {
        self.snapshot.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// True while the most recent request has not resolved.
    pub fn is_loading(&self) -> bool {
        self.pending == Some(self.token)
    }

    /// React to a change published by the selection state machine.
    ///
    /// A complete range issues a request. Anything else forgets the range, so a
    /// later guest change does not refetch dates the guest already abandoned.
    pub fn on_selection_change(&mut self, change: &RangeChange) -> Option<PendingRequest> {
        match (change.check_in, change.check_out) {
            (Some(check_in), Some(check_out)) => Some(self.request_for_range(check_in, check_out)),
            _ => {
                self.range = None;
                None
            }
        }
    }

    /// Issue a request for a newly committed range.
    pub fn request_for_range(
        &mut self,
        check_in: CalendarDay,
        check_out: CalendarDay,
    ) -> PendingRequest {
        self.range = Some((check_in, check_out));
        self.issue(check_in, check_out)
    }

    /// Record a guest-count change; issues a request only if it changed and a
    /// range is committed.
    pub fn request_for_guests(&mut self, guests: Guests) -> Option<PendingRequest> {
        if guests == self.guests {
            return None;
        }
        self.guests = guests;
        let (check_in, check_out) = self.range?;
        Some(self.issue(check_in, check_out))
    }

    fn issue(&mut self, check_in: CalendarDay, check_out: CalendarDay) -> PendingRequest {
        self.token += 1;
        self.pending = Some(self.token);
        let request = PendingRequest {
            token: self.token,
            query: AvailabilityQuery {
                check_in,
                check_out,
                guests: self.guests,
            },
        };
        tracing::debug!(
            token = request.token,
            %check_in,
            %check_out,
            "issued availability request"
        );
        request
    }

    /// Run the fetch for `request`.
    ///
    /// Does not borrow the coordinator, so several requests can be in flight
    /// at once; feed each result to [`resolve`](Self::resolve).
    pub async fn fetch<F>(fetcher: &F, request: PendingRequest) -> FetchResponse
    where
        F: AvailabilityFetcher + ?Sized,
    {
        FetchResponse {
            token: request.token,
            outcome: fetcher.fetch(&request.query).await,
        }
    }

    /// Apply a response if its token is still current.
    pub fn resolve(&mut self, response: FetchResponse) -> Resolution {
        if response.token != self.token {
            tracing::debug!(
                token = response.token,
                current = self.token,
                "discarding stale availability response"
            );
            return Resolution::Stale;
        }

        self.pending = None;
        match response.outcome {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.error = None;
                Resolution::Applied
            }
            Err(err) => {
                tracing::warn!(token = response.token, error = %err, "availability fetch failed");
                self.error = Some(err);
                Resolution::Failed
            }
        }
    }

    /// Fetch and resolve in one step, for callers that never overlap requests.
    pub async fn refresh<F>(&mut self, fetcher: &F, request: PendingRequest) -> Resolution
    where
        F: AvailabilityFetcher + ?Sized,
    {
        let response = Self::fetch(fetcher, request).await;
        self.resolve(response)
    }
}
