use super::super::test_utils::assert_approx_eq;
use crate::gradual;
use primitive_types::U256;
use proptest::prelude::*;
use rand::Rng;
use sp_arithmetic::FixedU128;

const MIN_START: u64 = 0;
const MAX_START: u64 = 10_000_000_000;
const ONE_DAY: u64 = 86_400;
const ONE_MONTH: u64 = 30 * 86_400;

fn start_moments() -> impl Strategy<Value = u64> {
	MIN_START..MAX_START
}

fn update_length() -> impl Strategy<Value = u64> {
	ONE_DAY..ONE_MONTH
}

fn initial_value() -> impl Strategy<Value = u128> {
	10_000_000_000_000_000u128..100_000_000_000_000_000u128
}

fn final_value() -> impl Strategy<Value = u128> {
	100_000_000_000_000_001u128..1_000_000_000_000_000_000u128
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn calculate_linear_value_invariant(
		start_x in start_moments(),
		length in update_length(),
		start_y in initial_value(),
		end_y in final_value()) {
		//Arrange
		let end_x = start_x.checked_add(length).unwrap();
		let at = rand::thread_rng().gen_range(start_x..end_x);

		//Act
		let value = gradual::calculate_linear_value(
			start_x,
			end_x,
			FixedU128::from_inner(start_y),
			FixedU128::from_inner(end_y),
			at,
		)
		.unwrap();

		//Assert
		// (at - start_x) * (end_y - start_y) == (value - start_y) * (end_x - start_x)
		let a1 = U256::from(at.checked_sub(start_x).unwrap());
		let a2 = U256::from(end_y.checked_sub(start_y).unwrap());

		let b1 = U256::from(value.into_inner().checked_sub(start_y).unwrap());
		let b2 = U256::from(end_x.checked_sub(start_x).unwrap());

		// the rounding error scales linearly with the length of the update
		let max_delta = U256::from(length);
		assert_approx_eq!(a1 * a2, b1 * b2, max_delta, "The linearity invariant does not hold")
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn calculate_linear_value_is_bounded_by_endpoints(
		start_x in start_moments(),
		length in update_length(),
		start_y in initial_value(),
		end_y in final_value()) {
		let end_x = start_x.checked_add(length).unwrap();
		let at = rand::thread_rng().gen_range(start_x..=end_x);

		let value = gradual::calculate_linear_value(
			start_x,
			end_x,
			FixedU128::from_inner(start_y),
			FixedU128::from_inner(end_y),
			at,
		)
		.unwrap();

		let lower = start_y.min(end_y);
		let upper = start_y.max(end_y);
		prop_assert!(value.into_inner() >= lower);
		prop_assert!(value.into_inner() <= upper);
	}
}
