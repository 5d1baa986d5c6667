// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Booking confirmation state machine.
//!
//! ```text
//! Idle -> DatesSelected -> Confirming -> Submitting -> Succeeded
//!                ^              |             |
//!                +--- cancel ---+             +-----> Failed -> (edit) DatesSelected
//!                                                           -> (book) Confirming
//! ```
//!
//! All transitions are synchronous except `confirm`, which awaits the
//! gateway. The state lock is never held across that await. At most one
//! submission per draft is in flight, and a response that arrives after a
//! timeout or reset is dropped. The flow never clears the session itself.

use super::draft::{BookingDraft, CarRef};
use super::pricing::CostBreakdown;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Booking, BookingRequest};
use crate::session::SessionStore;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Anything that can create a booking on the server.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, ApiError>;
}

/// Where the flow currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Idle,
    DatesSelected,
    Confirming,
    Submitting,
    Succeeded(Booking),
    Failed(ApiError),
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::DatesSelected => "dates_selected",
            FlowState::Confirming => "confirming",
            FlowState::Submitting => "submitting",
            FlowState::Succeeded(_) => "succeeded",
            FlowState::Failed(_) => "failed",
        }
    }

    /// Whether the draft may still be edited.
    pub fn is_editable(&self) -> bool {
        !matches!(self, FlowState::Submitting | FlowState::Succeeded(_))
    }
}

/// Local reasons a booking cannot proceed. Never reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select both dates")]
    MissingDates,

    #[error("Please choose valid dates: the return date must be after the pickup date")]
    InvalidRange,

    #[error("This car is not available for booking")]
    CarUnavailable,
}

/// An action attempted from a state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} while {state}")]
pub struct InvalidTransition {
    pub state: &'static str,
    pub action: &'static str,
}

/// Result of the user's "book" action.
#[derive(Debug, Clone, PartialEq)]
pub enum BookOutcome {
    /// Show the confirmation dialog with this breakdown.
    Confirming(CostBreakdown),
    /// No session: redirect to login. The state did not change.
    AuthRequired,
    /// Local validation failed. The state did not change.
    Rejected(ValidationError),
}

/// Result of the user's confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Succeeded(Booking),
    Failed(ApiError),
    /// Duplicate or out-of-place confirmation, or a stale response; nothing changed.
    Ignored,
}

struct Inner {
    state: FlowState,
    draft: BookingDraft,
    /// Bumped on every submission and reset; responses for older attempts are dropped.
    attempt: u64,
}

/// Drives one draft from date selection to a created booking.
pub struct BookingFlow<G> {
    car: CarRef,
    gateway: G,
    session: SessionStore,
    service_fee_rate: f64,
    timeout: Duration,
    inner: Mutex<Inner>,
}

impl<G: BookingGateway> BookingFlow<G> {
    pub fn new(
        car: CarRef,
        gateway: G,
        session: SessionStore,
        service_fee_rate: f64,
        timeout: Duration,
    ) -> Self {
        let draft = BookingDraft::new(car.id.clone());
        Self {
            car,
            gateway,
            session,
            service_fee_rate,
            timeout,
            inner: Mutex::new(Inner {
                state: FlowState::Idle,
                draft,
                attempt: 0,
            }),
        }
    }

    /// Build a flow using the configured fee rate and request timeout.
    pub fn from_config(car: CarRef, gateway: G, session: SessionStore, config: &Config) -> Self {
        Self::new(
            car,
            gateway,
            session,
            config.service_fee_rate,
            config.request_timeout,
        )
    }

    pub fn car(&self) -> &CarRef {
        &self.car
    }

    pub fn state(&self) -> FlowState {
        self.lock().state.clone()
    }

    pub fn draft(&self) -> BookingDraft {
        self.lock().draft.clone()
    }

    /// Current cost breakdown of the draft.
    pub fn breakdown(&self) -> CostBreakdown {
        let inner = self.lock();
        self.cost_of(&inner.draft)
    }

    pub fn set_dates(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<CostBreakdown, InvalidTransition> {
        self.edit("edit dates", |draft| {
            draft.start_date = start;
            draft.end_date = end;
        })
    }

    pub fn set_start_date(&self, start: Option<NaiveDate>) -> Result<CostBreakdown, InvalidTransition> {
        self.edit("edit dates", |draft| draft.start_date = start)
    }

    pub fn set_end_date(&self, end: Option<NaiveDate>) -> Result<CostBreakdown, InvalidTransition> {
        self.edit("edit dates", |draft| draft.end_date = end)
    }

    pub fn set_pickup_time(&self, time: NaiveTime) -> Result<CostBreakdown, InvalidTransition> {
        self.edit("edit times", |draft| draft.pickup_time = time)
    }

    pub fn set_dropoff_time(&self, time: NaiveTime) -> Result<CostBreakdown, InvalidTransition> {
        self.edit("edit times", |draft| draft.dropoff_time = time)
    }

    /// The user's "book" action: open the confirmation step if guards pass.
    ///
    /// Also the retry path out of `Failed`.
    pub fn request_booking(&self) -> Result<BookOutcome, InvalidTransition> {
        let mut inner = self.lock();

        match inner.state {
            FlowState::Idle => return Ok(BookOutcome::Rejected(ValidationError::MissingDates)),
            FlowState::DatesSelected | FlowState::Failed(_) => {}
            FlowState::Confirming => return Ok(BookOutcome::Confirming(self.cost_of(&inner.draft))),
            FlowState::Submitting | FlowState::Succeeded(_) => {
                return Err(InvalidTransition {
                    state: inner.state.name(),
                    action: "request booking",
                })
            }
        }

        if !self.session.check_auth() {
            tracing::info!(car_id = %self.car.id, "Booking requires login");
            return Ok(BookOutcome::AuthRequired);
        }

        if !self.car.is_active {
            return Ok(BookOutcome::Rejected(ValidationError::CarUnavailable));
        }

        if !inner.draft.has_dates() {
            return Ok(BookOutcome::Rejected(ValidationError::MissingDates));
        }

        let cost = self.cost_of(&inner.draft);
        if !cost.is_bookable() {
            return Ok(BookOutcome::Rejected(ValidationError::InvalidRange));
        }

        self.transition(&mut inner, FlowState::Confirming);
        Ok(BookOutcome::Confirming(cost))
    }

    /// Close the confirmation dialog without submitting.
    pub fn cancel_confirmation(&self) -> Result<(), InvalidTransition> {
        let mut inner = self.lock();
        if inner.state != FlowState::Confirming {
            return Err(InvalidTransition {
                state: inner.state.name(),
                action: "cancel confirmation",
            });
        }
        self.transition(&mut inner, FlowState::DatesSelected);
        Ok(())
    }

    /// The user confirmed the shown breakdown: submit the booking.
    pub async fn confirm(&self) -> SubmitOutcome {
        let (request, attempt) = {
            let mut inner = self.lock();
            match inner.state {
                FlowState::Confirming => {}
                FlowState::Submitting => {
                    tracing::debug!(car_id = %self.car.id, "Ignoring duplicate confirmation");
                    return SubmitOutcome::Ignored;
                }
                ref other => {
                    tracing::debug!(state = other.name(), "Ignoring confirmation outside confirm step");
                    return SubmitOutcome::Ignored;
                }
            }

            let Some(request) = inner.draft.to_request() else {
                self.transition(&mut inner, FlowState::Idle);
                return SubmitOutcome::Ignored;
            };

            inner.attempt += 1;
            self.transition(&mut inner, FlowState::Submitting);
            (request, inner.attempt)
        };

        let result = match tokio::time::timeout(self.timeout, self.gateway.create_booking(&request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(car_id = %self.car.id, timeout = ?self.timeout, "Booking submission timed out");
                Err(ApiError::Network(ApiError::REQUEST_TIMED_OUT.to_string()))
            }
        };

        let mut inner = self.lock();
        if inner.attempt != attempt || inner.state != FlowState::Submitting {
            tracing::debug!(car_id = %self.car.id, "Dropping stale booking response");
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(booking) => {
                inner.draft.clear();
                self.transition(&mut inner, FlowState::Succeeded(booking.clone()));
                SubmitOutcome::Succeeded(booking)
            }
            Err(err) => {
                // A rejected token already cleared the session inside the gateway.
                tracing::warn!(car_id = %self.car.id, error = %err, "Booking submission failed");
                self.transition(&mut inner, FlowState::Failed(err.clone()));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Discard the draft and start over; any in-flight response is dropped.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.attempt += 1;
        inner.draft.clear();
        self.transition(&mut inner, FlowState::Idle);
    }

    fn edit(
        &self,
        action: &'static str,
        apply: impl FnOnce(&mut BookingDraft),
    ) -> Result<CostBreakdown, InvalidTransition> {
        let mut inner = self.lock();
        if !inner.state.is_editable() {
            return Err(InvalidTransition {
                state: inner.state.name(),
                action,
            });
        }

        apply(&mut inner.draft);
        let next = if inner.draft.has_dates() {
            FlowState::DatesSelected
        } else {
            FlowState::Idle
        };
        self.transition(&mut inner, next);
        Ok(self.cost_of(&inner.draft))
    }

    fn transition(&self, inner: &mut Inner, next: FlowState) {
        if inner.state.name() != next.name() {
            tracing::debug!(
                car_id = %self.car.id,
                from = inner.state.name(),
                to = next.name(),
                "Booking flow transition"
            );
        }
        inner.state = next;
    }

    fn cost_of(&self, draft: &BookingDraft) -> CostBreakdown {
        draft.cost(self.car.price_per_day, self.service_fee_rate)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
