/// Bot command definitions and per-feature screens
pub mod commands;
/// Update routing for messages and callback queries
pub mod handlers;

use std::sync::Arc;

use crate::bot::commands::Command;
use crate::services::catalog::CatalogService;
use crate::services::favorites::FavoritesService;
use crate::services::materials::MaterialsService;
use crate::services::subscription::SubscriptionService;
use crate::services::universities::UniversitiesService;

/// Services shared by all handlers. Built once in `main` and cloned into the
/// dispatch closures; there are no global lookups.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<CatalogService>,
    pub favorites: Arc<FavoritesService>,
    pub materials: Arc<MaterialsService>,
    pub universities: Arc<UniversitiesService>,
    pub subscription: Arc<SubscriptionService>,
    pub admin_ids: Arc<Vec<i64>>,
}

impl AppContext {
    pub fn is_admin(&self, tg_id: i64) -> bool {
        self.admin_ids.contains(&tg_id)
    }
}

/// Commands everyone can reach; everything else sits behind the
/// subscription gate (admins bypass it).
pub fn command_is_open(cmd: &Command) -> bool {
    matches!(cmd, Command::Start | Command::Help | Command::Subscription)
}

/// Callback payloads reachable without a subscription: help, the
/// subscription screen, and the payment buttons themselves.
pub fn callback_is_open(data: &str) -> bool {
    matches!(data, "menu:help" | "menu:subscription") || data.starts_with("sub:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_commands_bypass_the_subscription_gate() {
        assert!(command_is_open(&Command::Start));
        assert!(command_is_open(&Command::Help));
        assert!(command_is_open(&Command::Subscription));

        assert!(!command_is_open(&Command::Catalog));
        assert!(!command_is_open(&Command::Favorites));
        assert!(!command_is_open(&Command::Materials));
        assert!(!command_is_open(&Command::Universities));
    }

    #[test]
    fn open_callbacks_bypass_the_subscription_gate() {
        assert!(callback_is_open("menu:help"));
        assert!(callback_is_open("menu:subscription"));
        assert!(callback_is_open("sub:pay"));
        assert!(callback_is_open("sub:activate"));

        assert!(!callback_is_open("menu:catalog"));
        assert!(!callback_is_open("subj:math"));
        assert!(!callback_is_open("olymp:2"));
        assert!(!callback_is_open("fav:rm:1"));
        assert!(!callback_is_open("mat:3"));
    }
}
