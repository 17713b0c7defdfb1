//! Account directory
//!
//! Accounts live in an arena; a guid index points at the latest
//! registration, so re-registering an id overwrites (last write wins).
//! Display names consult the immediate parent only — one hop, never the
//! full ancestor chain.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::models::LedgerAccount;

/// Name of the synthetic top-level account that is never shown as a prefix
pub const ROOT_ACCOUNT_NAME: &str = "Root Account";

/// Resolves account ids to accounts and display names
#[derive(Debug, Default)]
pub struct AccountDirectory {
    arena: Vec<LedgerAccount>,
    index: HashMap<String, usize>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account by id; a repeated id overwrites the earlier entry
    pub fn register(&mut self, account: LedgerAccount) {
        let slot = self.arena.len();
        self.index.insert(account.id.clone(), slot);
        self.arena.push(account);
    }

    /// Look up an account by id.
    ///
    /// Failure is fatal for the run: a split referencing an unknown
    /// account would otherwise drop an amount from a financial report.
    pub fn lookup(&self, id: &str) -> CoreResult<&LedgerAccount> {
        self.index
            .get(id)
            .map(|slot| &self.arena[*slot])
            .ok_or_else(|| CoreError::MissingAccount { id: id.to_string() })
    }

    /// Display name of an account: "parent:name" with one level of parent
    /// prefixing, or the bare name when there is no parent or the parent
    /// is the root marker.
    pub fn resolve_display_name(&self, id: &str) -> CoreResult<String> {
        let account = self.lookup(id)?;
        match &account.parent_id {
            Some(parent_id) => {
                let parent = self.lookup(parent_id)?;
                if parent.name == ROOT_ACCOUNT_NAME {
                    Ok(account.name.clone())
                } else {
                    Ok(format!("{}:{}", parent.name, account.name))
                }
            }
            None => Ok(account.name.clone()),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Registered accounts sorted by name
    pub fn sorted_by_name(&self) -> Vec<&LedgerAccount> {
        let mut accounts: Vec<&LedgerAccount> =
            self.index.values().map(|slot| &self.arena[*slot]).collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        accounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, name: &str, parent: Option<&str>) -> LedgerAccount {
        LedgerAccount {
            id: id.to_string(),
            name: name.to_string(),
            kind: "BANK".to_string(),
            parent_id: parent.map(|p| p.to_string()),
        }
    }

    #[test]
    fn test_lookup_missing_is_fatal() {
        let directory = AccountDirectory::new();
        assert!(matches!(
            directory.lookup("nope"),
            Err(CoreError::MissingAccount { .. })
        ));
    }

    #[test]
    fn test_display_name_without_parent() {
        let mut directory = AccountDirectory::new();
        directory.register(account("a", "Checking", None));
        assert_eq!(directory.resolve_display_name("a").unwrap(), "Checking");
    }

    #[test]
    fn test_display_name_root_parent_hidden() {
        let mut directory = AccountDirectory::new();
        directory.register(account("root", ROOT_ACCOUNT_NAME, None));
        directory.register(account("a", "Checking", Some("root")));
        assert_eq!(directory.resolve_display_name("a").unwrap(), "Checking");
    }

    #[test]
    fn test_display_name_single_hop() {
        let mut directory = AccountDirectory::new();
        directory.register(account("root", ROOT_ACCOUNT_NAME, None));
        directory.register(account("chk", "Checking", Some("root")));
        directory.register(account("food", "Food", Some("chk")));
        // Only the immediate parent is consulted, never the grandparent.
        assert_eq!(
            directory.resolve_display_name("food").unwrap(),
            "Checking:Food"
        );
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut directory = AccountDirectory::new();
        directory.register(account("a", "Old", None));
        directory.register(account("a", "New", None));
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.lookup("a").unwrap().name, "New");
    }

    #[test]
    fn test_missing_parent_is_fatal() {
        let mut directory = AccountDirectory::new();
        directory.register(account("a", "Checking", Some("ghost")));
        assert!(matches!(
            directory.resolve_display_name("a"),
            Err(CoreError::MissingAccount { .. })
        ));
    }

    #[test]
    fn test_sorted_by_name() {
        let mut directory = AccountDirectory::new();
        directory.register(account("z", "Zebra", None));
        directory.register(account("b", "Apple", None));
        let names: Vec<&str> = directory
            .sorted_by_name()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["Apple", "Zebra"]);
    }
}
