use crate::domain::ports::SessionActions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedUser {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image: String,
    pub permalink: String,
    #[serde(default)]
    pub providers: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub reputation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spaciness {
    #[default]
    Eco,
    Roomy,
    Cozy,
}

impl Spaciness {
    pub fn as_str(self) -> &'static str {
        match self {
            Spaciness::Eco => "eco",
            Spaciness::Roomy => "roomy",
            Spaciness::Cozy => "cozy",
        }
    }
}

/// UI settings read by the page at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub spaciness: Spaciness,
    pub show_only_unread_posts: bool,
    pub open_new_tab: bool,
    pub light_mode: bool,
    pub insane_mode: bool,
    pub loaded_settings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spaciness: Spaciness::Eco,
            show_only_unread_posts: false,
            open_new_tab: true,
            light_mode: false,
            insane_mode: false,
            loaded_settings: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Onboarding {
    pub onboarding_step: u32,
    pub onboarding_ready: bool,
    pub show_referral: bool,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self {
            onboarding_step: 3,
            onboarding_ready: true,
            show_referral: false,
        }
    }
}

/// Callback handles that ignore every call.
#[derive(Debug, Default)]
pub struct NoopActions;

impl SessionActions for NoopActions {
    fn show_login(&self) {}
    fn logout(&self) {}
    fn update_user(&self, _user: &LoggedUser) {}
}

/// Everything a page reads from its surroundings: who is logged in, the UI
/// settings and the onboarding state. Passed explicitly at construction.
#[derive(Clone)]
pub struct SessionBundle {
    pub user: Option<LoggedUser>,
    pub settings: Settings,
    pub onboarding: Onboarding,
    pub actions: Arc<dyn SessionActions>,
}

impl SessionBundle {
    pub fn new(user: Option<LoggedUser>, settings: Settings, onboarding: Onboarding) -> Self {
        Self {
            user,
            settings,
            onboarding,
            actions: Arc::new(NoopActions),
        }
    }

    pub fn anonymous(settings: Settings, onboarding: Onboarding) -> Self {
        Self::new(None, settings, onboarding)
    }

    pub fn with_actions(mut self, actions: Arc<dyn SessionActions>) -> Self {
        self.actions = actions;
        self
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}

impl fmt::Debug for SessionBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBundle")
            .field("user", &self.user.as_ref().map(|u| u.id.as_str()))
            .field("settings", &self.settings)
            .field("onboarding", &self.onboarding)
            .finish_non_exhaustive()
    }
}
