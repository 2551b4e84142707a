use primitive_types::U256;
use sp_arithmetic::{
	traits::{One, Zero},
	FixedPointNumber, FixedU128, Permill,
};

use crate::types::{Balance, SECONDS_PER_YEAR};
use crate::{
	ensure, to_balance, to_u256, MathError,
	MathError::{DivisionByZero, Overflow},
};

/// Calculating the amount of pool shares to mint as an AUM fee for `elapsed`
/// seconds of management.
///
/// `total_supply * elapsed * fee_percentage / (SECONDS_PER_YEAR * (ONE - fee_percentage))`
///
/// The division by the complement of the fee converts a fee defined against
/// the post-mint supply into a pre-mint amount, so that after minting the fee
/// recipients hold exactly `fee_percentage * elapsed / SECONDS_PER_YEAR` of
/// the new total supply. Rounds down.
///
/// - `total_supply` - pool share supply the fee accrues against
/// - `fee_percentage` - annual AUM fee, 1e18 fixed point, strictly below one
/// - `elapsed` - seconds since the last collection
pub fn calculate_aum_fee_amount(
	total_supply: Balance,
	fee_percentage: FixedU128,
	elapsed: u128,
) -> Result<Balance, MathError> {
	ensure!(fee_percentage < FixedU128::one(), DivisionByZero);

	if total_supply.is_zero() || elapsed.is_zero() || fee_percentage.is_zero() {
		return Ok(0);
	}

	let complement = FixedU128::DIV - fee_percentage.into_inner();

	let (supply, elapsed, percentage) = to_u256!(total_supply, elapsed, fee_percentage.into_inner());

	let numerator = supply
		.checked_mul(elapsed)
		.ok_or(Overflow)?
		.checked_mul(percentage)
		.ok_or(Overflow)?;

	let denominator = U256::from(SECONDS_PER_YEAR).checked_mul(complement.into()).ok_or(Overflow)?;

	let result = numerator.checked_div(denominator).ok_or(Overflow)?;

	to_balance!(result)
}

/// Split a collected fee amount between the protocol and the pool owner.
///
/// The protocol share rounds down and the owner receives the remainder, so the
/// two parts always add up to `amount` exactly.
pub fn split_protocol_fee(amount: Balance, protocol_percentage: Permill) -> (Balance, Balance) {
	let protocol_amount = protocol_percentage.mul_floor(amount);
	let owner_amount = amount.saturating_sub(protocol_amount);

	(protocol_amount, owner_amount)
}
