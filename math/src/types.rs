pub type Balance = u128;

/// Number of seconds in a 365 day year, used to annualize AUM fees.
pub const SECONDS_PER_YEAR: u128 = 365 * 24 * 60 * 60;
