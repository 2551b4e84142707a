//! # Weighted Pool Math
//!
//! A collection of deterministic fixed point formulas used by the
//! weighted pool engine: linear interpolation of gradually changing
//! parameters and time based AUM fee accrual.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(not(feature = "std"), test))]
extern crate std;

pub mod aum;
pub mod gradual;
#[cfg(test)]
pub mod test_utils;
pub mod types;

#[macro_export]
macro_rules! ensure {
	($e:expr, $f:expr) => {
		match $e {
			true => (),
			false => {
				return Err($f);
			}
		}
	};
}

#[macro_export]
macro_rules! to_u256 {
    ($($x:expr),+) => (
        {($(U256::from($x)),+)}
    );
}

#[macro_export]
macro_rules! to_balance {
	($x:expr) => {
		Balance::try_from($x).map_err(|_| Overflow)
	};
}

#[derive(Eq, PartialEq, Debug)]
pub enum MathError {
	Overflow,
	ZeroDuration,
	DivisionByZero,
}
