// Keyapp: the operator's own app portfolio.
//
// Only app titles are used: a brand counts as "used" when one of the
// operator's apps already carries it in its title.

pub mod client;
pub mod usage;
