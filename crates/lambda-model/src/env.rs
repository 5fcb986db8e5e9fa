/// Prefix prepended to every user-supplied environment entry.
///
/// Keeps user variables apart from the ones the orchestrator injects into the unit.
pub const ENV_PREFIX: &str = "LAMBDA_";

/// Rewrite every entry with [`ENV_PREFIX`], preserving order and length.
///
/// Entries are taken verbatim (`KEY=VALUE` or a bare `KEY`); only the prefix is added.
pub fn namespace_env<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| format!("{ENV_PREFIX}{}", entry.as_ref()))
        .collect()
}
