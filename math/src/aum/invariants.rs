use crate::aum;
use crate::types::{Balance, SECONDS_PER_YEAR};

use proptest::prelude::*;
use sp_arithmetic::{FixedU128, Permill};

const ONE: u128 = 1_000_000_000_000_000_000;
const MAX_SUPPLY: Balance = 1_000_000_000 * ONE;

fn supply() -> impl Strategy<Value = Balance> {
	1_000u128..MAX_SUPPLY
}

fn fee_percentage() -> impl Strategy<Value = FixedU128> {
	// up to 95%
	(1u128..950_000_000_000_000_000u128).prop_map(FixedU128::from_inner)
}

fn elapsed() -> impl Strategy<Value = u128> {
	1u128..SECONDS_PER_YEAR
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn aum_fee_is_monotone_in_elapsed_time(
		total_supply in supply(),
		percentage in fee_percentage(),
		e1 in elapsed(),
		e2 in elapsed()) {
		let (shorter, longer) = if e1 <= e2 { (e1, e2) } else { (e2, e1) };

		let f1 = aum::calculate_aum_fee_amount(total_supply, percentage, shorter).unwrap();
		let f2 = aum::calculate_aum_fee_amount(total_supply, percentage, longer).unwrap();

		prop_assert!(f1 <= f2);
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn aum_fee_is_bounded_by_annualized_maximum(
		total_supply in supply(),
		percentage in fee_percentage(),
		elapsed in elapsed()) {
		let fee = aum::calculate_aum_fee_amount(total_supply, percentage, elapsed).unwrap();

		// for a 95% fee cap the pre-mint amount never exceeds pct / (1 - pct) = 19x supply
		let upper_bound = aum::calculate_aum_fee_amount(total_supply, percentage, SECONDS_PER_YEAR).unwrap();
		prop_assert!(fee <= upper_bound);
		prop_assert!(upper_bound <= total_supply.saturating_mul(19));
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(1000))]
	#[test]
	fn protocol_split_preserves_the_total(
		amount in 0u128..MAX_SUPPLY,
		parts in 0u32..1_000_000u32) {
		let percentage = Permill::from_parts(parts);

		let (protocol_amount, owner_amount) = aum::split_protocol_fee(amount, percentage);

		prop_assert_eq!(protocol_amount + owner_amount, amount);
	}
}
