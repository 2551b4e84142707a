//! # Weighted Pool Engine
//!
//! State machines for a weighted liquidity pool with gradually changing
//! parameters:
//!
//! - token weights and the swap fee move linearly between scheduled
//!   checkpoints, queried lazily at caller supplied timestamps,
//! - an annual AUM fee accrues against the pool share supply and is settled
//!   before every supply changing operation, split between the pool owner
//!   and the protocol,
//! - recovery mode suspends the accrual clock and forfeits fees for the
//!   paused interval on exit.
//!
//! The engine owns no balances and reads no clock; the host contract feeds it
//! timestamps, the share supply and the token ledger, and mints whatever fee
//! amounts the engine reports.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod types;


pub use crate::types::{
	AssetId, AumFeeState, Balance, CollectedFees, GradualUpdate, Moment, Pool, SwapFeeChanged, WeightUpdate,
};

use crate::types::has_unique_elements;
use sp_arithmetic::{
	traits::{CheckedDiv, CheckedMul, CheckedSub, One, Zero},
	FixedPointNumber, FixedU128, Permill,
};
use sp_std::vec::Vec;
use weighted_pool_math::{aum, ensure, MathError};

/// Minimum normalized weight of a single token (1%).
pub const MIN_WEIGHT: FixedU128 = FixedU128::from_inner(10_000_000_000_000_000);

/// Minimum swap fee (0.0001%).
pub const MIN_SWAP_FEE: FixedU128 = FixedU128::from_inner(1_000_000_000_000);

/// Maximum swap fee (95%).
pub const MAX_SWAP_FEE: FixedU128 = FixedU128::from_inner(950_000_000_000_000_000);

/// Maximum annual AUM fee percentage (95%).
pub const MAX_AUM_FEE: FixedU128 = FixedU128::from_inner(950_000_000_000_000_000);

pub const MIN_POOL_TOKENS: usize = 2;
pub const MAX_POOL_TOKENS: usize = 50;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
	/// An update window closes before it can begin.
	TimeTravel,

	/// Number of supplied weights does not match the pool token count.
	InputLengthMismatch,

	/// Supplied token list does not match the pool tokens.
	TokenMismatch,

	/// Asset is not part of the pool.
	TokenNotFound,

	/// A normalized weight is below the allowed minimum.
	WeightBelowMinimum,

	/// Normalized weights do not sum to exactly one.
	WeightSumInvalid,

	/// Swap fee is below the allowed minimum.
	SwapFeeBelowMinimum,

	/// Swap fee is above the allowed maximum.
	SwapFeeAboveMaximum,

	/// AUM fee percentage is above the allowed maximum.
	AumFeeAboveMaximum,

	/// Pool tokens have to be unique.
	DuplicateToken,

	/// Pool cannot hold more than `MAX_POOL_TOKENS` tokens.
	TooManyTokens,

	/// Pool cannot hold fewer than `MIN_POOL_TOKENS` tokens.
	TooFewTokens,

	/// The token set cannot change while a gradual weight update is in flight.
	WeightUpdateInProgress,

	/// AUM fees cannot be collected before the pool is initialized.
	NotInitialized,

	/// Pool has already been initialized.
	AlreadyInitialized,

	/// AUM fee collection is suspended while in recovery mode.
	CollectionPaused,

	/// Recovery mode is already enabled.
	AlreadyInRecoveryMode,

	/// Recovery mode is not enabled.
	NotInRecoveryMode,

	/// An unexpected integer overflow occurred.
	Overflow,
}

impl From<MathError> for Error {
	fn from(_: MathError) -> Self {
		Error::Overflow
	}
}

/// Raise a start time lying in the past to `now`, so that a newly scheduled
/// update begins at its start value exactly once and interpolates forward
/// instead of jumping into the middle of the window.
fn resolve_start_time(start: Moment, end: Moment, now: Moment) -> Result<Moment, Error> {
	let resolved = start.max(now);
	ensure!(resolved <= end, Error::TimeTravel);
	Ok(resolved)
}

fn validate_endpoint_weights(token_count: usize, weights: &[FixedU128]) -> Result<(), Error> {
	ensure!(weights.len() == token_count, Error::InputLengthMismatch);
	ensure!(weights.iter().all(|w| *w >= MIN_WEIGHT), Error::WeightBelowMinimum);

	let sum = weights
		.iter()
		.try_fold(0u128, |acc, w| acc.checked_add(w.into_inner()))
		.ok_or(Error::Overflow)?;
	ensure!(sum == FixedU128::DIV, Error::WeightSumInvalid);

	Ok(())
}

fn validate_swap_fee(fee: FixedU128) -> Result<(), Error> {
	ensure!(fee >= MIN_SWAP_FEE, Error::SwapFeeBelowMinimum);
	ensure!(fee <= MAX_SWAP_FEE, Error::SwapFeeAboveMaximum);
	Ok(())
}

/// Patch the rounding drift left by rescaling so the weights sum to exactly
/// one again. The drift is at most a few raw units and is absorbed by the
/// largest weight.
fn renormalize_weights(weights: &mut [FixedU128]) -> Result<(), Error> {
	let sum = weights
		.iter()
		.try_fold(0u128, |acc, w| acc.checked_add(w.into_inner()))
		.ok_or(Error::Overflow)?;

	let largest = weights
		.iter()
		.enumerate()
		.max_by_key(|(_, w)| **w)
		.map(|(index, _)| index)
		.ok_or(Error::WeightSumInvalid)?;

	let patched = if sum < FixedU128::DIV {
		weights[largest]
			.into_inner()
			.checked_add(FixedU128::DIV - sum)
			.ok_or(Error::Overflow)?
	} else {
		weights[largest]
			.into_inner()
			.checked_sub(sum - FixedU128::DIV)
			.ok_or(Error::WeightSumInvalid)?
	};
	weights[largest] = FixedU128::from_inner(patched);

	Ok(())
}

impl Pool {
	/// Create a new pool with constant weights and swap fee.
	///
	/// The weight and fee checkpoints start out degenerate at `now`; AUM fees
	/// do not accrue until [`Pool::initialize`] is called at the first
	/// liquidity join.
	pub fn new(
		tokens: Vec<AssetId>,
		weights: Vec<FixedU128>,
		swap_fee: FixedU128,
		aum_fee_percentage: FixedU128,
		protocol_fee: Permill,
		now: Moment,
	) -> Result<Self, Error> {
		ensure!(tokens.len() >= MIN_POOL_TOKENS, Error::TooFewTokens);
		ensure!(tokens.len() <= MAX_POOL_TOKENS, Error::TooManyTokens);
		ensure!(has_unique_elements(&mut tokens.iter()), Error::DuplicateToken);
		validate_endpoint_weights(tokens.len(), &weights)?;
		validate_swap_fee(swap_fee)?;
		ensure!(aum_fee_percentage <= MAX_AUM_FEE, Error::AumFeeAboveMaximum);

		Ok(Pool {
			weights: WeightUpdate::constant(now, weights),
			swap_fee: GradualUpdate::constant(now, swap_fee),
			aum: AumFeeState {
				last_collection: None,
				fee_percentage: aum_fee_percentage,
				in_recovery_mode: false,
			},
			protocol_fee,
			tokens,
		})
	}

	/// Mark the pool as initialized at the first liquidity join. AUM fees
	/// start accruing from this moment.
	pub fn initialize(&mut self, now: Moment) -> Result<(), Error> {
		ensure!(self.aum.last_collection.is_none(), Error::AlreadyInitialized);
		self.aum.last_collection = Some(now);
		Ok(())
	}

	pub fn current_weight(&self, asset: AssetId, now: Moment) -> Result<FixedU128, Error> {
		let index = self.find_token(asset).ok_or(Error::TokenNotFound)?;
		self.weights.weight_at(index, now)
	}

	pub fn current_weights(&self, now: Moment) -> Result<Vec<FixedU128>, Error> {
		self.weights.weights_at(now)
	}

	pub fn current_swap_fee(&self, now: Moment) -> Result<FixedU128, Error> {
		self.swap_fee.value_at(now)
	}

	/// Schedule a gradual update of all token weights, superseding any update
	/// still in flight.
	///
	/// The update starts from the weights effective at `now`, so the weight
	/// curve is continuous across the switchover. `tokens` is the token list
	/// the caller based `end_weights` on and guards against races with
	/// concurrent token set changes.
	pub fn schedule_weight_update(
		&mut self,
		tokens: &[AssetId],
		start: Moment,
		end: Moment,
		end_weights: Vec<FixedU128>,
		now: Moment,
	) -> Result<(), Error> {
		validate_endpoint_weights(self.tokens.len(), &end_weights)?;
		ensure!(tokens == self.tokens.as_slice(), Error::TokenMismatch);

		let resolved_start = resolve_start_time(start, end, now)?;
		let initial_weights = self.weights.weights_at(now)?;

		self.weights = WeightUpdate {
			start: resolved_start,
			end,
			initial_weights,
			final_weights: end_weights,
		};

		Ok(())
	}

	/// Schedule a gradual update of the swap fee, superseding any update
	/// still in flight.
	///
	/// Unlike weight updates the fee curve is not forced to be continuous:
	/// `start_fee` is taken verbatim. If it differs from the fee effective
	/// under the superseded checkpoint at the resolved start time, the
	/// returned notification reports the discontinuity; a seamless
	/// continuation returns `None`.
	pub fn schedule_swap_fee_update(
		&mut self,
		start: Moment,
		end: Moment,
		start_fee: FixedU128,
		end_fee: FixedU128,
		now: Moment,
	) -> Result<Option<SwapFeeChanged>, Error> {
		validate_swap_fee(start_fee)?;
		validate_swap_fee(end_fee)?;

		let resolved_start = resolve_start_time(start, end, now)?;
		let previous = self.swap_fee.value_at(resolved_start)?;

		self.swap_fee = GradualUpdate {
			start: resolved_start,
			end,
			initial_value: start_fee,
			final_value: end_fee,
		};

		Ok((previous != start_fee).then_some(SwapFeeChanged {
			previous,
			current: start_fee,
		}))
	}

	/// Collect the AUM fees owed since the last collection.
	///
	/// Returns the pool share amounts to mint for the owner and the protocol.
	/// Zero elapsed time and a zero fee percentage are no-ops that leave the
	/// collection timestamp untouched; a paused pool refuses the collection
	/// instead of reporting nothing owed.
	pub fn collect_aum_fees(&mut self, now: Moment, total_supply: Balance) -> Result<CollectedFees, Error> {
		let last_collection = self.aum.last_collection.ok_or(Error::NotInitialized)?;
		ensure!(!self.aum.in_recovery_mode, Error::CollectionPaused);

		let elapsed = now.checked_sub(last_collection).ok_or(Error::TimeTravel)?;
		if elapsed == 0 || self.aum.fee_percentage.is_zero() {
			return Ok(CollectedFees::default());
		}

		let amount = aum::calculate_aum_fee_amount(total_supply, self.aum.fee_percentage, elapsed.into())?;
		let (protocol_amount, owner_amount) = aum::split_protocol_fee(amount, self.protocol_fee);

		self.aum.last_collection = Some(now);

		Ok(CollectedFees {
			owner_amount,
			protocol_amount,
		})
	}

	/// Settle AUM fees ahead of an operation that changes the share supply.
	///
	/// Joins and exits have to keep working while the pool is uninitialized
	/// or in recovery mode, so both cases settle as zero owed here instead of
	/// failing the way [`Pool::collect_aum_fees`] does.
	pub fn before_join_exit(&mut self, now: Moment, total_supply: Balance) -> Result<CollectedFees, Error> {
		if self.aum.last_collection.is_none() || self.aum.in_recovery_mode {
			return Ok(CollectedFees::default());
		}
		self.collect_aum_fees(now, total_supply)
	}

	/// Suspend AUM fee accrual. Time elapsed before entering recovery mode
	/// remains owed until the mode is disabled.
	pub fn enable_recovery_mode(&mut self) -> Result<(), Error> {
		ensure!(!self.aum.in_recovery_mode, Error::AlreadyInRecoveryMode);
		self.aum.in_recovery_mode = true;
		Ok(())
	}

	/// Resume AUM fee accrual. Restarts the accrual clock at `now`, forfeiting
	/// the fees for the whole paused interval.
	pub fn disable_recovery_mode(&mut self, now: Moment) -> Result<(), Error> {
		ensure!(self.aum.in_recovery_mode, Error::NotInRecoveryMode);
		self.aum.in_recovery_mode = false;
		if self.aum.last_collection.is_some() {
			self.aum.last_collection = Some(now);
		}
		Ok(())
	}

	/// Add a token to the pool with the given normalized weight.
	///
	/// Existing weights shrink proportionally so the vector stays normalized.
	/// Forbidden while a gradual weight update is in flight; AUM fees are
	/// settled against the pre-mutation supply first and returned for the
	/// host to mint.
	pub fn add_token(
		&mut self,
		asset: AssetId,
		normalized_weight: FixedU128,
		now: Moment,
		total_supply: Balance,
	) -> Result<CollectedFees, Error> {
		ensure!(!self.weights.is_ongoing(now), Error::WeightUpdateInProgress);
		ensure!(self.tokens.len() < MAX_POOL_TOKENS, Error::TooManyTokens);
		ensure!(self.find_token(asset).is_none(), Error::DuplicateToken);
		ensure!(normalized_weight >= MIN_WEIGHT, Error::WeightBelowMinimum);

		let factor = FixedU128::one().checked_sub(&normalized_weight).ok_or(Error::Overflow)?;
		let mut new_weights = self
			.weights
			.weights_at(now)?
			.iter()
			.map(|w| w.checked_mul(&factor))
			.collect::<Option<Vec<_>>>()
			.ok_or(Error::Overflow)?;
		new_weights.push(normalized_weight);
		renormalize_weights(&mut new_weights)?;
		ensure!(new_weights.iter().all(|w| *w >= MIN_WEIGHT), Error::WeightBelowMinimum);

		let fees = self.before_join_exit(now, total_supply)?;

		self.tokens.push(asset);
		self.weights = WeightUpdate::constant(now, new_weights);

		Ok(fees)
	}

	/// Remove a token from the pool.
	///
	/// Surviving weights grow proportionally so the vector stays normalized.
	/// Forbidden while a gradual weight update is in flight; AUM fees are
	/// settled against the pre-mutation supply first and returned for the
	/// host to mint.
	pub fn remove_token(&mut self, asset: AssetId, now: Moment, total_supply: Balance) -> Result<CollectedFees, Error> {
		ensure!(!self.weights.is_ongoing(now), Error::WeightUpdateInProgress);
		ensure!(self.tokens.len() > MIN_POOL_TOKENS, Error::TooFewTokens);
		let index = self.find_token(asset).ok_or(Error::TokenNotFound)?;

		let current = self.weights.weights_at(now)?;
		let remainder = FixedU128::one().checked_sub(&current[index]).ok_or(Error::Overflow)?;
		let mut new_weights = current
			.iter()
			.enumerate()
			.filter(|(i, _)| *i != index)
			.map(|(_, w)| w.checked_div(&remainder))
			.collect::<Option<Vec<_>>>()
			.ok_or(Error::Overflow)?;
		renormalize_weights(&mut new_weights)?;
		ensure!(new_weights.iter().all(|w| *w >= MIN_WEIGHT), Error::WeightBelowMinimum);

		let fees = self.before_join_exit(now, total_supply)?;

		self.tokens.remove(index);
		self.weights = WeightUpdate::constant(now, new_weights);

		Ok(fees)
	}
}
