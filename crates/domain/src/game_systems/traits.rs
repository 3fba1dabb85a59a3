//! Game system traits.
//!
//! A campaign service hosts several rulesets side by side and routes events
//! by system id and version. Each ruleset identifies itself through
//! [`GameSystem`].

/// Core trait all game systems must implement.
pub trait GameSystem: Send + Sync {
    /// Unique identifier for this game system (e.g., "daggerheart").
    fn system_id(&self) -> &str;

    /// Human-readable display name.
    fn display_name(&self) -> &str;

    /// Version of the rules and event schemas this implementation speaks.
    fn system_version(&self) -> &str;

    /// Names of the resources this system tracks.
    fn resource_names(&self) -> &[&str];

    /// Whether an event stamped with `system_id`/`version` belongs here.
    fn handles(&self, system_id: &str, version: &str) -> bool {
        self.system_id() == system_id && self.system_version() == version
    }
}
