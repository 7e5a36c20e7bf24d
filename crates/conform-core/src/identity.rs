//! Identity resolution against the operating system's user database
//!
//! Stateless name/id queries, no caching. Not-found is `None`; a lookup
//! that errors folds into `None` as well, which makes a failing directory
//! indistinguishable from an absent entry — the defined not-found
//! sentinel either way.

use nix::unistd::{Gid, Group, Uid, User};

/// Resolve a user name to its uid.
pub fn uid_for_user(name: &str) -> Option<u32> {
    User::from_name(name).ok().flatten().map(|u| u.uid.as_raw())
}

/// Resolve a uid to its user name.
pub fn user_for_uid(uid: u32) -> Option<String> {
    User::from_uid(Uid::from_raw(uid))
        .ok()
        .flatten()
        .map(|u| u.name)
}

/// Resolve a group name to its gid.
pub fn gid_for_group(name: &str) -> Option<u32> {
    Group::from_name(name)
        .ok()
        .flatten()
        .map(|g| g.gid.as_raw())
}

/// Resolve a gid to its group name.
pub fn group_for_gid(gid: u32) -> Option<String> {
    Group::from_gid(Gid::from_raw(gid))
        .ok()
        .flatten()
        .map(|g| g.name)
}
