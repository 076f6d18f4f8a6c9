//! Parameter aliases for values that cannot be written inside a path.

use indexmap::IndexMap;

/// Alias name to serialised value, in allocation order.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: IndexMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates `@name`, or `@name1`, `@name2`, ... if taken, and records
    /// `value` under it. Returns the alias written into the path.
    pub fn allocate(&mut self, name: &str, value: &str) -> String {
        let mut alias = format!("@{}", name);
        let mut suffix = 1usize;
        while self.entries.contains_key(&alias) {
            alias = format!("@{}{}", name, suffix);
            suffix += 1;
        }
        log::trace!("alias {} allocated for parameter {}", alias, name);
        self.entries.insert(alias.clone(), value.to_string());
        alias
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `@a=v1&@b=v2`
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(alias, value)| format!("{}={}", alias, value))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_alias_is_bare_name() {
        let mut table = AliasTable::new();
        assert_eq!(table.allocate("p", "{}"), "@p");
        assert_eq!(table.render(), "@p={}");
    }

    #[test]
    fn test_collisions_count_up() {
        let mut table = AliasTable::new();
        assert_eq!(table.allocate("p", "a"), "@p");
        assert_eq!(table.allocate("p", "b"), "@p1");
        assert_eq!(table.allocate("p", "c"), "@p2");
        assert_eq!(table.render(), "@p=a&@p1=b&@p2=c");
    }

    #[test]
    fn test_suffixed_name_does_not_clash() {
        // a parameter literally called "p1" takes @p1 first
        let mut table = AliasTable::new();
        assert_eq!(table.allocate("p1", "x"), "@p1");
        assert_eq!(table.allocate("p", "y"), "@p");
        assert_eq!(table.allocate("p", "z"), "@p2");
    }
}
