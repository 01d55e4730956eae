use serde::{Deserialize, Serialize};

/// A named unit of backend-dependent functionality, independently flag-gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Auth,
    Catalog,
    Esim,
    Payments,
    UsageAlerts,
}

/// Immutable-per-read snapshot of the feature state. Defaults put every
/// capability in synthetic mode so the app works with no backend at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub real_auth: bool,
    pub real_catalog: bool,
    pub real_esim: bool,
    pub real_payments: bool,
    pub real_usage_alerts: bool,
    /// Explicitly configured public/tunnel URL; wins over dev and prod when
    /// set to something other than a placeholder.
    pub tunnel_url: Option<String>,
    pub dev_url: String,
    pub prod_url: String,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        // Android emulators reach the host loopback via 10.0.2.2.
        let dev_url = if cfg!(target_os = "android") {
            "http://10.0.2.2:8000"
        } else {
            "http://127.0.0.1:8000"
        };
        Self {
            real_auth: false,
            real_catalog: false,
            real_esim: false,
            real_payments: false,
            real_usage_alerts: false,
            tunnel_url: None,
            dev_url: dev_url.to_string(),
            prod_url: "https://api.esim-market.example.com".to_string(),
        }
    }
}

impl FeatureFlags {
    pub fn is_enabled(&self, capability: Capability) -> bool {
        match capability {
            Capability::Auth => self.real_auth,
            Capability::Catalog => self.real_catalog,
            Capability::Esim => self.real_esim,
            Capability::Payments => self.real_payments,
            Capability::UsageAlerts => self.real_usage_alerts,
        }
    }

    /// Base URL for a capability, or `None` when the flag is off and the
    /// caller should synthesize locally. Precedence: tunnel > dev > prod.
    pub fn resolve_endpoint(&self, capability: Capability) -> Option<String> {
        if !self.is_enabled(capability) {
            return None;
        }
        let base = match &self.tunnel_url {
            Some(url) if !is_placeholder(url) => url,
            _ if !is_placeholder(&self.dev_url) => &self.dev_url,
            _ => &self.prod_url,
        };
        Some(base.trim_end_matches('/').to_string())
    }

    pub fn merge(&self, update: FlagUpdate) -> Self {
        let mut next = self.clone();
        if let Some(v) = update.real_auth {
            next.real_auth = v;
        }
        if let Some(v) = update.real_catalog {
            next.real_catalog = v;
        }
        if let Some(v) = update.real_esim {
            next.real_esim = v;
        }
        if let Some(v) = update.real_payments {
            next.real_payments = v;
        }
        if let Some(v) = update.real_usage_alerts {
            next.real_usage_alerts = v;
        }
        if let Some(v) = update.tunnel_url {
            next.tunnel_url = v;
        }
        if let Some(v) = update.dev_url {
            next.dev_url = v;
        }
        if let Some(v) = update.prod_url {
            next.prod_url = v;
        }
        next
    }
}

fn is_placeholder(url: &str) -> bool {
    url.is_empty() || url.contains("your-tunnel")
}

/// Partial patch applied through [`crate::ConfigResolver::update`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlagUpdate {
    pub real_auth: Option<bool>,
    pub real_catalog: Option<bool>,
    pub real_esim: Option<bool>,
    pub real_payments: Option<bool>,
    pub real_usage_alerts: Option<bool>,
    /// `Some(None)` clears the tunnel URL.
    pub tunnel_url: Option<Option<String>>,
    pub dev_url: Option<String>,
    pub prod_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_capability_resolves_to_none() {
        let flags = FeatureFlags::default();
        assert!(!flags.is_enabled(Capability::Payments));
        assert_eq!(flags.resolve_endpoint(Capability::Payments), None);
    }

    #[test]
    fn tunnel_beats_dev_beats_prod() {
        let mut flags = FeatureFlags {
            real_catalog: true,
            ..Default::default()
        };
        assert_eq!(
            flags.resolve_endpoint(Capability::Catalog).as_deref(),
            Some(flags.dev_url.as_str())
        );

        flags.tunnel_url = Some("https://abc123.ngrok.io/".to_string());
        assert_eq!(
            flags.resolve_endpoint(Capability::Catalog).as_deref(),
            Some("https://abc123.ngrok.io")
        );
    }

    #[test]
    fn placeholder_tunnel_is_skipped() {
        let flags = FeatureFlags {
            real_catalog: true,
            tunnel_url: Some("https://your-tunnel.example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            flags.resolve_endpoint(Capability::Catalog).as_deref(),
            Some(flags.dev_url.as_str())
        );
    }

    #[test]
    fn placeholder_dev_falls_through_to_prod() {
        let flags = FeatureFlags {
            real_esim: true,
            dev_url: String::new(),
            ..Default::default()
        };
        assert_eq!(
            flags.resolve_endpoint(Capability::Esim).as_deref(),
            Some("https://api.esim-market.example.com")
        );
    }

    #[test]
    fn merge_only_touches_set_fields() {
        let base = FeatureFlags::default();
        let merged = base.merge(FlagUpdate {
            real_payments: Some(true),
            tunnel_url: Some(Some("https://t.example.com".to_string())),
            ..Default::default()
        });
        assert!(merged.real_payments);
        assert!(!merged.real_auth);
        assert_eq!(merged.tunnel_url.as_deref(), Some("https://t.example.com"));
        assert_eq!(merged.dev_url, base.dev_url);
    }
}
