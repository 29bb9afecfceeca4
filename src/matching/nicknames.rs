//! Formal given names and their common diminutives.
//!
//! Edit distance cannot see that "Bob" is "Robert"; this table can. Each
//! formal name forms a group with its diminutives, and two names are
//! variants when they share a group. A diminutive may belong to several
//! groups ("pat" is both Patrick and Patricia).

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// The built-in table, constructed on first use and never mutated.
pub static BUILTIN_NICKNAMES: LazyLock<NicknameTable> = LazyLock::new(NicknameTable::with_builtins);

/// Whether two given names are distinct members of one nickname group.
///
/// Inputs are lowercased and trimmed only; punctuation is not stripped, so
/// "Rob." does not match "Robert". Identical names return `false`, since
/// equality is scored elsewhere.
///
/// ```
/// use person_dedupe::matching::are_nickname_variants;
///
/// assert!(are_nickname_variants("Robert", "Bob"));
/// assert!(!are_nickname_variants("Robert", "Robert"));
/// assert!(!are_nickname_variants("Robert", "Richard"));
/// ```
#[must_use]
pub fn are_nickname_variants(name1: &str, name2: &str) -> bool {
    BUILTIN_NICKNAMES.are_variants(name1, name2)
}

/// One formal name plus its diminutives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicknameGroup {
    formal: String,
    members: BTreeSet<String>,
}

impl NicknameGroup {
    #[must_use]
    pub fn formal(&self) -> &str {
        &self.formal
    }

    /// The formal name and every diminutive.
    #[must_use]
    pub const fn members(&self) -> &BTreeSet<String> {
        &self.members
    }
}

/// Lookup table from names to the groups containing them.
#[derive(Debug, Clone, Default)]
pub struct NicknameTable {
    groups: Vec<NicknameGroup>,
    /// name -> indices into `groups`
    index: HashMap<String, Vec<usize>>,
}

impl NicknameTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the built-in English given names
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table.load_builtins();
        table
    }

    fn load_builtins(&mut self) {
        self.add_group("robert", &["bob", "rob", "bobby", "robbie"]);
        self.add_group("william", &["bill", "will", "billy", "willie", "liam"]);
        self.add_group("richard", &["rick", "dick", "rich", "ricky"]);
        self.add_group("james", &["jim", "jimmy", "jamie"]);
        self.add_group("john", &["jack", "johnny", "jon"]);
        self.add_group("jonathan", &["jon", "jonny", "nathan"]);
        self.add_group("joseph", &["joe", "joey"]);
        self.add_group("thomas", &["tom", "tommy"]);
        self.add_group("michael", &["mike", "mikey", "mick"]);
        self.add_group("christopher", &["chris", "kit"]);
        self.add_group("daniel", &["dan", "danny"]);
        self.add_group("david", &["dave", "davey"]);
        self.add_group("charles", &["charlie", "chuck", "chas"]);
        self.add_group("edward", &["ed", "eddie", "ted", "ned"]);
        self.add_group("anthony", &["tony"]);
        self.add_group("steven", &["steve"]);
        self.add_group("stephen", &["steve"]);
        self.add_group("matthew", &["matt"]);
        self.add_group("andrew", &["andy", "drew"]);
        self.add_group("benjamin", &["ben", "benny"]);
        self.add_group("samuel", &["sam", "sammy"]);
        self.add_group("alexander", &["alex", "al", "xander"]);
        self.add_group("nicholas", &["nick", "nicky"]);
        self.add_group("timothy", &["tim", "timmy"]);
        self.add_group("gregory", &["greg"]);
        self.add_group("patrick", &["pat", "paddy"]);
        self.add_group("elizabeth", &["liz", "beth", "betty", "eliza", "lizzie"]);
        self.add_group("margaret", &["maggie", "meg", "peggy", "marge"]);
        self.add_group("katherine", &["kate", "kathy", "katie", "kat"]);
        self.add_group("catherine", &["cathy", "cate", "cat"]);
        self.add_group("jennifer", &["jen", "jenny"]);
        self.add_group("susan", &["sue", "susie"]);
        self.add_group("patricia", &["pat", "patty", "trish"]);
        self.add_group("deborah", &["deb", "debbie"]);
        self.add_group("rebecca", &["becky", "becca"]);
        self.add_group("victoria", &["vicky", "tori"]);
        self.add_group("jessica", &["jess", "jessie"]);
        self.add_group("barbara", &["barb", "barbie"]);
    }

    /// Add a formal name with its diminutives as a new group.
    pub fn add_group(&mut self, formal: &str, diminutives: &[&str]) {
        let formal = lookup_key(formal);
        let members: BTreeSet<String> = std::iter::once(formal.clone())
            .chain(diminutives.iter().map(|d| lookup_key(d)))
            .collect();

        let group_idx = self.groups.len();
        for member in &members {
            self.index.entry(member.clone()).or_default().push(group_idx);
        }
        self.groups.push(NicknameGroup { formal, members });
    }

    /// Whether two names are different members of a common group.
    #[must_use]
    pub fn are_variants(&self, name1: &str, name2: &str) -> bool {
        let a = lookup_key(name1);
        let b = lookup_key(name2);
        if a.is_empty() || a == b {
            return false;
        }
        let Some(groups_a) = self.index.get(&a) else {
            return false;
        };
        groups_a
            .iter()
            .any(|&idx| self.groups[idx].members.contains(&b))
    }

    /// Formal names whose groups contain `name` (including `name` itself if formal).
    #[must_use]
    pub fn formal_names_for(&self, name: &str) -> Vec<&str> {
        self.index
            .get(&lookup_key(name))
            .map(|groups| {
                groups
                    .iter()
                    .map(|&idx| self.groups[idx].formal.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The group for a formal name.
    #[must_use]
    pub fn group(&self, formal: &str) -> Option<&NicknameGroup> {
        let key = lookup_key(formal);
        self.groups.iter().find(|g| g.formal == key)
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn lookup_key(name: &str) -> String {
    name.trim().to_lowercase()
}
