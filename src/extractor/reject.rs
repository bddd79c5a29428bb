/// Client-side keyword match for sources whose search is loose.
///
/// A posting survives when the keyword appears, case-insensitively, in its
/// title or its description. A blank keyword rejects nothing.
pub fn matches_keyword(keyword: &str, title: &str, description: Option<&str>) -> bool {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    title.to_lowercase().contains(&needle)
        || description.is_some_and(|d| d.to_lowercase().contains(&needle))
}

pub fn should_reject(keyword: &str, title: &str, description: Option<&str>) -> bool {
    !matches_keyword(keyword, title, description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_match_is_case_insensitive() {
        assert!(matches_keyword("motion designer", "Senior MOTION Designer (m/w/d)", None));
    }

    #[test]
    fn description_match_rescues_generic_title() {
        assert!(matches_keyword(
            "motion designer",
            "Kreativ-Profi gesucht",
            Some("Du arbeitest als Motion Designer in unserem Studio.")
        ));
    }

    #[test]
    fn neither_field_matching_rejects() {
        assert!(should_reject("motion designer", "Buchhalter", Some("Finanzen und Controlling")));
        assert!(should_reject("motion designer", "Buchhalter", None));
    }

    #[test]
    fn blank_keyword_accepts_everything() {
        assert!(!should_reject("  ", "Buchhalter", None));
    }
}
