/// Olympiad catalog and add-to-favorites workflow
pub mod catalog;
/// Background delivery of due reminders
pub mod dispatcher;
/// Listing and removing favorites
pub mod favorites;
/// HTTP health endpoints
pub mod health;
/// Prep material bundles
pub mod materials;
/// Reminder planning and scheduling
pub mod reminder;
/// Subscription stub flow
pub mod subscription;
/// University benefit matching
pub mod universities;
