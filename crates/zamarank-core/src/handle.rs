/// Canonical form of a user handle: one leading `@` removed, lowercased.
///
/// Both inbound surfaces (HTTP route and CLI) run user input through this
/// before it reaches the upstream client.
#[must_use]
pub fn normalize_handle(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    match lowered.strip_prefix('@') {
        Some(stripped) => stripped.to_owned(),
        None => lowered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_at_and_lowercases() {
        assert_eq!(normalize_handle("@Alice"), "alice");
        assert_eq!(normalize_handle("BOB"), "bob");
    }

    #[test]
    fn strips_only_one_at() {
        assert_eq!(normalize_handle("@@carol"), "@carol");
    }

    #[test]
    fn keeps_inner_at_signs() {
        assert_eq!(normalize_handle("d@ve"), "d@ve");
    }

    #[test]
    fn leaves_whitespace_untouched() {
        assert_eq!(normalize_handle(" @Eve"), " @eve");
    }
}
