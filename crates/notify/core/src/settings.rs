//! Notification settings.

/// Global notification toggles, mutated by the admin console.
///
/// Each toggle is optional: a NULL column means "not configured", which the
/// handlers resolve with per-channel defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub push_enabled: Option<bool>,
    #[serde(default)]
    pub email_enabled: Option<bool>,
    #[serde(default)]
    pub whatsapp_enabled: Option<bool>,
}

impl Settings {
    /// Whether admin push has been explicitly switched off.
    ///
    /// Only a stored `false` disables push; an absent flag fails open.
    pub fn push_disabled(&self) -> bool {
        self.push_enabled == Some(false)
    }
}

/// Resolved customer channel toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerChannels {
    pub email: bool,
    pub whatsapp: bool,
}

impl CustomerChannels {
    /// Resolve channel toggles; email defaults on, WhatsApp defaults off.
    pub fn resolve(settings: Option<&Settings>) -> Self {
        Self {
            email: settings.and_then(|s| s.email_enabled).unwrap_or(true),
            whatsapp: settings.and_then(|s| s.whatsapp_enabled).unwrap_or(false),
        }
    }
}

impl Default for CustomerChannels {
    fn default() -> Self {
        Self::resolve(None)
    }
}
