/// Static user-facing message texts
pub mod texts;
/// Input validation for admin commands
pub mod validation;
