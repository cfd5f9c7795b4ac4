//! Licensed features and license-denial detection.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::api::ApiProvider;

/// Feature that unlocks the privileged provider.
pub const CONSTRUCTORY_LICENSE_FEATURE: &str = "Research.Cline";

/// Notice shown instead of a raw license-denial message.
pub const LICENSE_NOTICE: &str = "You should have Research.Cline licence";

/// Licensed feature identifiers as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseState {
    features: BTreeSet<String>,
    is_loading: bool,
}

impl LicenseState {
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            features: features.into_iter().map(Into::into).collect(),
            is_loading: false,
        }
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }

    pub fn has_constructory_license(&self) -> bool {
        self.has_feature(CONSTRUCTORY_LICENSE_FEATURE)
    }

    /// Whether `provider` may be used. Only privileged providers are gated.
    pub fn permits(&self, provider: &ApiProvider) -> bool {
        !provider.is_privileged() || self.has_constructory_license()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Feature identifiers in sorted order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(String::as_str)
    }

    /// Replace the feature set and finish loading.
    pub fn set_features<I, S>(&mut self, features: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self = Self::new(features);
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }
}

fn license_denial_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:don'?t|do not|doesn'?t|does not)\s+have\s+(?:a\s+|the\s+)?licen[cs]e")
            .expect("license denial pattern is valid")
    })
}

/// Whether a host error message reports a missing license.
pub fn is_license_denial(message: &str) -> bool {
    license_denial_pattern().is_match(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_state_default_is_unlicensed() {
        let state = LicenseState::default();
        assert!(!state.has_constructory_license());
        assert!(!state.is_loading());
        assert!(state.permits(&ApiProvider::Anthropic));
        assert!(!state.permits(&ApiProvider::Constructory));
    }

    #[test]
    fn test_license_state_with_feature() {
        let state = LicenseState::new(["Research.Cline", "Other.Feature"]);
        assert!(state.has_constructory_license());
        assert!(state.permits(&ApiProvider::Constructory));
        assert_eq!(state.features().count(), 2);
    }

    #[test]
    fn test_set_features_clears_loading() {
        let mut state = LicenseState::default();
        state.set_loading(true);
        assert!(state.is_loading());

        state.set_features(vec!["Research.Cline".to_string()]);
        assert!(!state.is_loading());
        assert!(state.has_constructory_license());

        state.set_features(Vec::<String>::new());
        assert!(!state.has_constructory_license());
    }

    #[test]
    fn test_detects_license_denial() {
        assert!(is_license_denial(
            "Project owner don't have licence Research.Cline"
        ));
        assert!(is_license_denial("User does not have a license for this feature"));
        assert!(is_license_denial("403: DOESN'T HAVE LICENCE"));
    }

    #[test]
    fn test_ignores_other_errors() {
        assert!(!is_license_denial("API Error: Network timeout"));
        assert!(!is_license_denial("License server unreachable"));
        assert!(!is_license_denial(""));
    }
}
