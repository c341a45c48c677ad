use std::time::Duration;

/// Settings for the render thread started by [`crate::Bridge::spawn`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    pub thread_name: String,
    /// How long the render loop waits for a command before polling the
    /// toolkit for native events again.
    pub poll_interval: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            thread_name: "customui-render".into(),
            poll_interval: Duration::from_millis(5),
        }
    }
}

impl BridgeConfig {
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }
}
