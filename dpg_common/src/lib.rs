mod money;
mod secret;

pub mod helpers;

pub use money::{format_amount_value, parse_minor_units, Money, MoneyParseError, IDR_CURRENCY_CODE};
pub use secret::Secret;
