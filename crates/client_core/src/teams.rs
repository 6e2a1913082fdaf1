pub fn default_team_name(index: usize) -> String {
    format!("Team {}", index + 1)
}

/// Resizes the editable team-name list to `count` entries. Entries that stay
/// in range are kept verbatim; new slots get `"Team {i+1}"`.
pub fn derive_team_names(prev: &[String], count: usize) -> Vec<String> {
    (0..count)
        .map(|index| {
            prev.get(index)
                .cloned()
                .unwrap_or_else(|| default_team_name(index))
        })
        .collect()
}

/// Names as they are sent to the server: trimmed, blanks dropped, order kept.
pub fn trimmed_team_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
