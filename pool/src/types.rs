use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_arithmetic::{FixedU128, Permill};
use sp_std::collections::btree_set::BTreeSet;
use sp_std::vec::Vec;

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use crate::Error;
use weighted_pool_math::gradual;

pub type AssetId = u32;
pub type Balance = u128;

/// Unix timestamp in seconds. Always supplied by the caller; the engine never
/// reads a clock of its own.
pub type Moment = u64;

/// Checkpoint of a gradually changing scalar parameter.
///
/// The value moves linearly from `initial_value` at `start` to `final_value`
/// at `end` and is clamped to the endpoint values outside of the window.
/// A degenerate checkpoint with `start == end` holds a constant value.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Encode, Decode, Copy, Clone, PartialEq, Eq, TypeInfo, MaxEncodedLen)]
pub struct GradualUpdate {
	pub start: Moment,
	pub end: Moment,
	pub initial_value: FixedU128,
	pub final_value: FixedU128,
}

impl GradualUpdate {
	/// Degenerate checkpoint holding `value` constant from `at` on.
	pub fn constant(at: Moment, value: FixedU128) -> Self {
		Self {
			start: at,
			end: at,
			initial_value: value,
			final_value: value,
		}
	}

	/// Interpolated value at `now`.
	pub fn value_at(&self, now: Moment) -> Result<FixedU128, Error> {
		if now <= self.start {
			return Ok(self.initial_value);
		}
		if now >= self.end {
			return Ok(self.final_value);
		}
		Ok(gradual::calculate_linear_value(
			self.start,
			self.end,
			self.initial_value,
			self.final_value,
			now,
		)?)
	}

	/// Returns true while the update window is still open.
	pub fn is_ongoing(&self, now: Moment) -> bool {
		now < self.end
	}
}

/// Checkpoint of a gradual update of all token weights.
///
/// Weight slots are index aligned with the pool token list; both endpoint
/// vectors always have one entry per pool token.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Encode, Decode, Clone, PartialEq, Eq, TypeInfo)]
pub struct WeightUpdate {
	pub start: Moment,
	pub end: Moment,
	pub initial_weights: Vec<FixedU128>,
	pub final_weights: Vec<FixedU128>,
}

impl WeightUpdate {
	/// Degenerate checkpoint holding `weights` constant from `at` on.
	pub fn constant(at: Moment, weights: Vec<FixedU128>) -> Self {
		Self {
			start: at,
			end: at,
			initial_weights: weights.clone(),
			final_weights: weights,
		}
	}

	fn len(&self) -> usize {
		self.final_weights.len()
	}

	/// Interpolated weight of the token at `index` at `now`.
	pub fn weight_at(&self, index: usize, now: Moment) -> Result<FixedU128, Error> {
		let initial_weight = self.initial_weights.get(index).ok_or(Error::TokenNotFound)?;
		let final_weight = self.final_weights.get(index).ok_or(Error::TokenNotFound)?;

		if now <= self.start {
			return Ok(*initial_weight);
		}
		if now >= self.end {
			return Ok(*final_weight);
		}
		Ok(gradual::calculate_linear_value(
			self.start,
			self.end,
			*initial_weight,
			*final_weight,
			now,
		)?)
	}

	/// Interpolated weights of all tokens at `now`.
	pub fn weights_at(&self, now: Moment) -> Result<Vec<FixedU128>, Error> {
		(0..self.len()).map(|index| self.weight_at(index, now)).collect()
	}

	/// Returns true while the update window is still open.
	pub fn is_ongoing(&self, now: Moment) -> bool {
		now < self.end
	}
}

/// AUM fee accrual state of a pool.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Encode, Decode, Copy, Clone, PartialEq, Eq, TypeInfo, MaxEncodedLen)]
pub struct AumFeeState {
	/// Timestamp of the last successful collection or recovery mode exit.
	/// `None` until the pool is initialized by the first liquidity join.
	pub last_collection: Option<Moment>,

	/// Annual AUM fee percentage, 1e18 fixed point, strictly below one.
	pub fee_percentage: FixedU128,

	/// While set, fee collection is suspended and the accrual clock does not
	/// charge for the paused interval.
	pub in_recovery_mode: bool,
}

/// Pool share amounts minted by an AUM fee collection.
#[derive(Debug, Default, Encode, Decode, Copy, Clone, PartialEq, Eq, TypeInfo, MaxEncodedLen)]
pub struct CollectedFees {
	pub owner_amount: Balance,
	pub protocol_amount: Balance,
}

impl CollectedFees {
	pub fn total(&self) -> Balance {
		self.owner_amount.saturating_add(self.protocol_amount)
	}

	pub fn is_zero(&self) -> bool {
		self.owner_amount == 0 && self.protocol_amount == 0
	}
}

/// Notification that a newly scheduled swap fee update begins at a different
/// fee than the one effective under the superseded checkpoint.
#[derive(Debug, Encode, Decode, Copy, Clone, PartialEq, Eq, TypeInfo)]
pub struct SwapFeeChanged {
	pub previous: FixedU128,
	pub current: FixedU128,
}

/// All mutable state of a weighted pool tracked by this engine.
///
/// `tokens` is the ordered token list; the weight checkpoint is index aligned
/// with it. Balance custody, swap math and authorization stay with the host.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Encode, Decode, Clone, PartialEq, Eq, TypeInfo)]
pub struct Pool {
	pub tokens: Vec<AssetId>,
	pub weights: WeightUpdate,
	pub swap_fee: GradualUpdate,
	pub aum: AumFeeState,

	/// Protocol share of collected AUM fees.
	pub protocol_fee: Permill,
}

impl Pool {
	pub fn find_token(&self, asset: AssetId) -> Option<usize> {
		self.tokens.iter().position(|token| *token == asset)
	}
}

pub(crate) fn has_unique_elements<T>(iter: &mut T) -> bool
where
	T: Iterator,
	T::Item: Ord,
{
	let mut uniq = BTreeSet::new();
	iter.all(move |x| uniq.insert(x))
}
