//! Navigation targets.

use std::fmt;

use cipherlab_proto::UserId;

/// A screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Landing page with links to every tool.
    Home,
    /// Sign-in and sign-up form.
    Auth,
    /// Password attack against a registered user.
    Attack,
    /// Brute-force and dictionary attacks on a ciphertext.
    Crack,
    /// Encrypt and decrypt with a chosen cipher.
    Workbench,
    /// Registered users, optionally without the viewer.
    Directory {
        /// User to leave out of the listing.
        except: Option<UserId>,
    },
    /// Messages exchanged with one peer.
    Conversation {
        /// The other participant.
        peer: UserId,
    },
}

impl Page {
    /// Stable short name, used as a `data-page` attribute and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Auth => "auth",
            Self::Attack => "attack",
            Self::Crack => "crack",
            Self::Workbench => "workbench",
            Self::Directory { .. } => "directory",
            Self::Conversation { .. } => "conversation",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conversation { peer } => write!(f, "conversation/{peer}"),
            other => f.write_str(other.name()),
        }
    }
}
