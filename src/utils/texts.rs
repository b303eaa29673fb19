//! User-facing message texts, kept in one place so handlers stay thin.

pub const START_GREETING: &str = "\
👋 Hi! I help you keep track of olympiad competitions.\n\n\
Browse the catalog, mark the olympiads you care about, and I'll remind you \
about registration deadlines and round dates. You'll also find prep \
materials and university benefits here.";

pub const HELP_TEXT: &str = "\
Available commands:\n\
/start — main menu\n\
/catalog — browse olympiads by subject\n\
/favorites — your saved olympiads\n\
/materials — prep materials for your favorites\n\
/universities — university benefits matched to your favorites\n\
/subscription — manage your subscription\n\
/help — this message";

pub const CATALOG_INTRO: &str = "\
🗂 Olympiad catalog\n\nPick a subject to see the olympiads we track.";

pub const FAVORITES_EMPTY: &str = "\
Your list is empty so far. Add olympiads from the catalog and I'll remind \
you about the important dates.";

pub const FAVORITE_ADDED: &str = "\
✨ Added to your olympiads!\n\
I'll remind you a week before registration closes, the day before the \
round, and on the day itself.";

pub const FAVORITE_ALREADY_PRESENT: &str = "This olympiad is already in your favorites";

pub const MATERIALS_NO_FAVORITES: &str = "\
Add olympiads to your favorites first — then I can put together prep \
materials for them.";

pub const SUBSCRIPTION_INTRO: &str = "\
⭐ Subscription\n\nThe subscription unlocks personalised reminders and \
curated prep materials. This demo uses a stub payment flow: follow the \
link and then confirm with the button below.";

pub const SUBSCRIPTION_ACTIVE: &str = "\
⭐ Your subscription is active. Thanks for the support!";

pub const SUBSCRIPTION_ACTIVATED: &str = "✅ Subscription activated!";

pub const SUBSCRIPTION_REQUIRED: &str = "\
⭐ This feature needs an active subscription. Open /subscription to \
activate one.";

pub const NOT_AN_ADMIN: &str = "This command is only available to administrators.";
