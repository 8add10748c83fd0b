use crate::agent::registry::CatalogEntry;
use crate::error::{AgentError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Exact,
    Suffix,
    Flexible,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Suffix => write!(f, "suffix"),
            Self::Flexible => write!(f, "flexible"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub entry: &'a CatalogEntry,
    pub strategy: MatchStrategy,
}

impl Resolution<'_> {
    pub fn effective_name(&self) -> &str {
        self.entry.effective_name()
    }
}

/// Maps a model-issued tool name onto one catalog entry.
///
/// Strategies are tried in order (exact, suffix, flexible). The first strategy
/// that matches anything wins, and within it the earliest registered entry
/// wins, so a given catalog always resolves a given name the same way.
///
/// The final segment of an entry is its local name: the part of the effective
/// name after the provider prefix.
pub struct ToolNameResolver<'a> {
    entries: &'a [CatalogEntry],
}

impl<'a> ToolNameResolver<'a> {
    pub fn new(entries: &'a [CatalogEntry]) -> Self {
        Self { entries }
    }

    pub fn resolve(&self, requested: &str) -> Result<Resolution<'a>> {
        if requested.trim().is_empty() {
            return Err(AgentError::ToolNotFound(requested.to_string()));
        }

        let lowered = requested.to_lowercase();
        let strategies: [(MatchStrategy, &dyn Fn(&CatalogEntry) -> bool); 3] = [
            (MatchStrategy::Exact, &|e| e.effective_name() == requested),
            (MatchStrategy::Suffix, &|e| e.local_name == requested),
            (MatchStrategy::Flexible, &|e| {
                let local = e.local_name.to_lowercase();
                local.contains(&lowered) || lowered.contains(&local)
            }),
        ];

        for (strategy, matches) in strategies {
            if let Some(entry) = self.entries.iter().find(|&e| matches(e)) {
                return Ok(Resolution { entry, strategy });
            }
        }

        Err(AgentError::ToolNotFound(requested.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ToolRegistry;
    use crate::testing::{RecordingProvider, descriptor};

    fn multi(providers: &[(&str, &[&str])]) -> ToolRegistry {
        let mut registry = ToolRegistry::multi("_");
        for (id, tools) in providers {
            registry
                .register(
                    id,
                    RecordingProvider::arc(),
                    tools.iter().map(|t| descriptor(t)).collect(),
                )
                .unwrap();
        }
        registry
    }

    fn resolve(registry: &ToolRegistry, name: &str) -> Result<(String, MatchStrategy)> {
        ToolNameResolver::new(registry.entries())
            .resolve(name)
            .map(|r| (r.effective_name().to_string(), r.strategy))
    }

    #[test]
    fn exact_name_resolves_to_itself() {
        let registry = multi(&[("fs", &["read", "write"]), ("gh", &["read"])]);
        for entry in registry.entries() {
            let (name, strategy) = resolve(&registry, entry.effective_name()).unwrap();
            assert_eq!(name, entry.effective_name());
            assert_eq!(strategy, MatchStrategy::Exact);
        }
    }

    #[test]
    fn exact_takes_precedence_over_suffix() {
        // "gh_read" is also the local name of a tool under "x".
        let registry = multi(&[("x", &["gh_read"]), ("gh", &["read"])]);
        let (name, strategy) = resolve(&registry, "gh_read").unwrap();
        assert_eq!(strategy, MatchStrategy::Exact);
        assert_eq!(name, "gh_read");
    }

    #[test]
    fn bare_name_resolves_by_suffix() {
        let registry = multi(&[
            ("filesystem", &["write_file"]),
            ("github", &["create_repository"]),
        ]);
        let (name, strategy) = resolve(&registry, "write_file").unwrap();
        assert_eq!(name, "filesystem_write_file");
        assert_eq!(strategy, MatchStrategy::Suffix);
    }

    #[test]
    fn suffix_tie_goes_to_first_registered() {
        let registry = multi(&[("alpha", &["search"]), ("beta", &["search"])]);
        let (name, _) = resolve(&registry, "search").unwrap();
        assert_eq!(name, "alpha_search");
    }

    #[test]
    fn flexible_matches_substrings_case_insensitively() {
        let registry = multi(&[("gh", &["create_repository"]), ("fs", &["read_file"])]);

        let (name, strategy) = resolve(&registry, "Create_Repo").unwrap();
        assert_eq!(name, "gh_create_repository");
        assert_eq!(strategy, MatchStrategy::Flexible);

        // The local name inside the requested name also counts.
        let (name, _) = resolve(&registry, "please_read_file_now").unwrap();
        assert_eq!(name, "fs_read_file");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let registry = multi(&[("fs", &["read_file"]), ("gh", &["create_repository"])]);
        let err = resolve(&registry, "delete_universe").unwrap_err();
        assert!(matches!(err, AgentError::ToolNotFound(ref n) if n == "delete_universe"));
    }

    #[test]
    fn empty_name_is_not_found() {
        let registry = multi(&[("fs", &["read_file"])]);
        assert!(resolve(&registry, "").is_err());
        assert!(resolve(&registry, "   ").is_err());
    }

    #[test]
    fn empty_catalog_finds_nothing() {
        let registry = ToolRegistry::multi("_");
        assert!(resolve(&registry, "anything").is_err());
    }

    #[test]
    fn resolution_is_deterministic() {
        let registry = multi(&[("a", &["list", "list_all"]), ("b", &["listing"])]);
        let first = resolve(&registry, "LIST_").unwrap();
        for _ in 0..20 {
            assert_eq!(resolve(&registry, "LIST_").unwrap(), first);
        }
    }

    #[test]
    fn single_mode_suffix_is_the_whole_name() {
        let mut registry = ToolRegistry::single();
        registry
            .register("x", RecordingProvider::arc(), vec![descriptor("read_file")])
            .unwrap();
        let (name, strategy) = resolve(&registry, "READ").unwrap();
        assert_eq!(name, "read_file");
        assert_eq!(strategy, MatchStrategy::Flexible);
    }
}
