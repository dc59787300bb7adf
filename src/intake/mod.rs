//! Public intake form: field rules, the phone capability, and the
//! submission flow.

pub mod flow;
pub mod phone;
pub mod validate;
