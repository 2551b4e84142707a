use primitive_types::U256;
use sp_arithmetic::FixedU128;

use crate::{
	ensure, to_u256, MathError,
	MathError::{Overflow, ZeroDuration},
};

/// Calculating the value of a gradually changing parameter at any moment in an
/// interval using linear interpolation.
///
/// The value is the weighted average of the two endpoint values
/// `(start_y * (end_x - at) + end_y * (at - start_x)) / (end_x - start_x)`,
/// computed on the raw 1e18 fixed point units with the division rounding down.
///
/// - `start_x` - beginning of an interval
/// - `end_x` - end of an interval
/// - `start_y` - value at the beginning of the interval
/// - `end_y` - value at the end of the interval
/// - `at` - moment at which to calculate the value, `start_x <= at <= end_x`
pub fn calculate_linear_value<Moment: num_traits::CheckedSub + TryInto<u128>>(
	start_x: Moment,
	end_x: Moment,
	start_y: FixedU128,
	end_y: FixedU128,
	at: Moment,
) -> Result<FixedU128, MathError> {
	let d1 = end_x.checked_sub(&at).ok_or(Overflow)?;
	let d2 = at.checked_sub(&start_x).ok_or(Overflow)?;
	let dx = end_x.checked_sub(&start_x).ok_or(Overflow)?;

	let dx: u128 = dx.try_into().map_err(|_| Overflow)?;
	let d1: u128 = d1.try_into().map_err(|_| Overflow)?;
	let d2: u128 = d2.try_into().map_err(|_| Overflow)?;

	ensure!(dx != 0, ZeroDuration);

	let (start_y, end_y, d1, d2) = to_u256!(start_y.into_inner(), end_y.into_inner(), d1, d2);

	let left_part = start_y.checked_mul(d1).ok_or(Overflow)?;
	let right_part = end_y.checked_mul(d2).ok_or(Overflow)?;
	let result = (left_part.checked_add(right_part).ok_or(Overflow)?)
		.checked_div(dx.into())
		.ok_or(Overflow)?;

	let inner = u128::try_from(result).map_err(|_| Overflow)?;
	Ok(FixedU128::from_inner(inner))
}
