/// Configuration for a [`SessionHost`](crate::SessionHost).
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    /// Upper bound on concurrently active sessions. `None` means unlimited.
    pub max_active: Option<usize>,
}

impl HostConfig {
    /// Limit the number of concurrently active sessions.
    pub fn with_max_active(mut self, max: usize) -> Self {
        self.max_active = Some(max);
        self
    }

    /// Remove the session limit.
    pub fn unlimited(mut self) -> Self {
        self.max_active = None;
        self
    }

    /// Whether another session may start while `active` are running.
    pub fn admits(&self, active: usize) -> bool {
        self.max_active.is_none_or(|max| active < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_unlimited() {
        let cfg = HostConfig::default();
        assert_eq!(cfg.max_active, None);
        assert!(cfg.admits(10_000));
    }

    #[test]
    fn builder_methods() {
        let cfg = HostConfig::default().with_max_active(2);
        assert_eq!(cfg.max_active, Some(2));
        assert!(cfg.admits(1));
        assert!(!cfg.admits(2));
        assert_eq!(cfg.unlimited().max_active, None);
    }

    #[test]
    fn zero_admits_nothing() {
        assert!(!HostConfig::default().with_max_active(0).admits(0));
    }
}
