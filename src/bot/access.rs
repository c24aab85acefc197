//! Command authorization against configured Telegram user id lists.
//!
//! Lists are kept as the raw comma-separated strings and parsed on every
//! check. Entries that are not numeric user ids never match.

use crate::config::AppConfig;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    whitelist: String,
    admins: String,
}

impl AccessPolicy {
    pub fn new<W: Into<String>, A: Into<String>>(whitelist: W, admins: A) -> Self {
        Self {
            whitelist: whitelist.into(),
            admins: admins.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.bot_whitelist.clone(), config.bot_admins.clone())
    }

    /// Open access when the whitelist is empty, otherwise membership.
    pub fn is_authorized(&self, user_id: u64) -> bool {
        if self.whitelist.trim().is_empty() {
            return true;
        }
        contains(&self.whitelist, user_id)
    }

    /// Membership in the admin list. An empty list has no admins.
    pub fn is_admin(&self, user_id: u64) -> bool {
        if self.admins.trim().is_empty() {
            return false;
        }
        contains(&self.admins, user_id)
    }
}

fn contains(list: &str, user_id: u64) -> bool {
    parse_ids(list).any(|id| id == user_id)
}

fn parse_ids(list: &str) -> impl Iterator<Item = u64> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Ignoring malformed user id in access list: {:?}", entry);
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_whitelist_membership() {
        let policy = AccessPolicy::new("111,222", "");
        assert!(policy.is_authorized(111));
        assert!(policy.is_authorized(222));
        assert!(!policy.is_authorized(333));
    }

    #[test]
    fn test_entries_are_trimmed() {
        let policy = AccessPolicy::new(" 111 , 222,", " 111 ");
        assert!(policy.is_authorized(222));
        assert!(policy.is_admin(111));
    }

    #[test]
    fn test_malformed_entries_never_match() {
        let policy = AccessPolicy::new("abc,111", "@admin");
        assert!(policy.is_authorized(111));
        assert!(!policy.is_authorized(0));
        assert!(!policy.is_admin(0));
    }

    #[test]
    fn test_separators_only_list_is_not_open() {
        let policy = AccessPolicy::new(",,", "");
        assert!(!policy.is_authorized(111));
    }

    #[test]
    fn test_admin_list_is_independent_of_whitelist() {
        let policy = AccessPolicy::new("222", "111");
        assert!(policy.is_admin(111));
        assert!(!policy.is_authorized(111));
        assert!(!policy.is_admin(222));
    }

    proptest! {
        #[test]
        fn prop_empty_whitelist_allows_everyone(user_id in any::<u64>()) {
            prop_assert!(AccessPolicy::new("", "").is_authorized(user_id));
        }

        #[test]
        fn prop_empty_admin_list_has_no_admins(user_id in any::<u64>(), whitelist in "[0-9,]{0,20}") {
            prop_assert!(!AccessPolicy::new(whitelist, "").is_admin(user_id));
        }

        #[test]
        fn prop_listed_user_is_admin(ids in proptest::collection::vec(any::<u64>(), 1..8), pick in any::<prop::sample::Index>()) {
            let list = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
            let user_id = ids[pick.index(ids.len())];
            let policy = AccessPolicy::new(list.clone(), list);
            prop_assert!(policy.is_admin(user_id));
            prop_assert!(policy.is_authorized(user_id));
        }
    }
}
