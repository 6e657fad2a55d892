//! Validation of business-travel date ranges against Chinese statutory
//! long holidays (Spring Festival and National Day), sourced from the
//! timor.tech calendar service.

pub mod checker;
pub mod source;
