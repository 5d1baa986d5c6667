// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Booking core: cost calculation, the client-side draft, and the
//! confirmation state machine.

pub mod draft;
pub mod flow;
pub mod pricing;

pub use draft::{BookingDraft, CarRef};
pub use flow::{
    BookOutcome, BookingFlow, BookingGateway, FlowState, InvalidTransition, SubmitOutcome,
    ValidationError,
};
pub use pricing::{
    compute_booking_cost, compute_cost_for_span, quote_from_strs, rental_days, CostBreakdown,
};
