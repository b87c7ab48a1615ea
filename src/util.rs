/// Expands a leading `~` in a path to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") || path == "~" {
        if let Some(home) = dirs::home_dir() {
            let rest = path[1..].trim_start_matches('/');
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path.to_string()
}

/// Get current time as Unix timestamp (seconds).
pub fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/var/log/casa"), "/var/log/casa");
        assert_eq!(expand_tilde("relative/dir"), "relative/dir");
    }

    #[test]
    fn test_expand_tilde_home() {
        if let Some(home) = dirs::home_dir() {
            let expanded = expand_tilde("~/.casa/logs");
            assert_eq!(expanded, home.join(".casa/logs").to_string_lossy());
        }
    }
}
