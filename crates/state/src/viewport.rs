use crate::config::DEFAULT_MOBILE_BREAKPOINT;

/// Width threshold separating the mobile layout from the desktop layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint(pub f32);

impl Default for Breakpoint {
    fn default() -> Self {
        Self(DEFAULT_MOBILE_BREAKPOINT)
    }
}

impl Breakpoint {
    /// Mobile iff `width` is strictly below the threshold.
    pub fn is_mobile(self, width: f32) -> bool {
        width < self.0
    }
}
