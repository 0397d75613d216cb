//! Tax calculation logic.
//!
//! The engine in [`personal_income`] is a single synchronous pass over the
//! inputs; [`common`] holds the small arithmetic helpers it shares with the
//! display code.

pub mod common;
pub mod personal_income;

pub use personal_income::PersonalIncomeTax;
