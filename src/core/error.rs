//=========================================================================
// Load Errors
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::host::HostError;

//=== LoadError ===========================================================

/// Errors returned by scene handles and the loading-screen sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The scene handle has no scene name.
    Unconfigured,

    /// A loading-screen session is already running.
    ///
    /// Sessions are matched by scene name, so a second one would pick up
    /// the first one's notifications.
    SessionInProgress {
        /// Target of the session that is still running.
        target: String,
    },

    /// The host rejected the request.
    Host(HostError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "Scene reference has no scene name"),
            Self::SessionInProgress { target } => {
                write!(f, "A loading screen session towards '{}' is still running", target)
            }
            Self::Host(e) => write!(f, "Host error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Host(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HostError> for LoadError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

//=== Tests ===============================================================
