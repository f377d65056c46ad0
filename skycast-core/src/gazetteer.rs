//! Country and region names recognized at the end of a location slug.

use std::sync::LazyLock;

const NAMES: &[&str] = &[
    "afghanistan", "albania", "algeria", "andorra", "angola", "antigua and barbuda",
    "argentina", "armenia", "australia", "austria", "azerbaijan", "bahamas", "bahrain",
    "bangladesh", "barbados", "belarus", "belgium", "belize", "benin", "bhutan", "bolivia",
    "bosnia and herzegovina", "botswana", "brazil", "brunei", "bulgaria", "burkina faso",
    "burundi", "cabo verde", "cape verde", "cambodia", "cameroon", "canada",
    "central african republic", "chad", "chile", "china", "colombia", "comoros", "congo",
    "democratic republic of the congo", "republic of the congo", "costa rica",
    "cote d ivoire", "ivory coast", "croatia", "cuba", "cyprus", "czechia",
    "czech republic", "denmark", "djibouti", "dominica", "dominican republic", "ecuador",
    "egypt", "el salvador", "equatorial guinea", "eritrea", "estonia", "eswatini",
    "ethiopia", "fiji", "finland", "france", "gabon", "gambia", "georgia", "germany",
    "ghana", "greece", "grenada", "guatemala", "guinea", "guinea bissau", "guyana",
    "haiti", "honduras", "hungary", "iceland", "india", "indonesia", "iran", "iraq",
    "ireland", "israel", "italy", "jamaica", "japan", "jordan", "kazakhstan", "kenya",
    "kiribati", "kosovo", "kuwait", "kyrgyzstan", "laos", "latvia", "lebanon", "lesotho",
    "liberia", "libya", "liechtenstein", "lithuania", "luxembourg", "madagascar", "malawi",
    "malaysia", "maldives", "mali", "malta", "marshall islands", "mauritania", "mauritius",
    "mexico", "micronesia", "moldova", "monaco", "mongolia", "montenegro", "morocco",
    "mozambique", "myanmar", "namibia", "nauru", "nepal", "netherlands", "the netherlands",
    "new zealand", "nicaragua", "niger", "nigeria", "north korea", "north macedonia",
    "norway", "oman", "pakistan", "palau", "palestine", "panama", "papua new guinea",
    "paraguay", "peru", "philippines", "poland", "portugal", "qatar", "romania", "russia",
    "russian federation", "rwanda", "saint kitts and nevis", "saint lucia",
    "saint vincent and the grenadines", "samoa", "san marino", "sao tome and principe",
    "saudi arabia", "senegal", "serbia", "seychelles", "sierra leone", "singapore",
    "slovakia", "slovenia", "solomon islands", "somalia", "south africa", "south korea",
    "korea", "south sudan", "spain", "sri lanka", "sudan", "suriname", "sweden",
    "switzerland", "syria", "taiwan", "tajikistan", "tanzania", "thailand", "timor leste",
    "togo", "tonga", "trinidad and tobago", "tunisia", "turkey", "turkiye", "turkmenistan",
    "tuvalu", "uganda", "ukraine", "united arab emirates", "uae", "united kingdom", "uk",
    "great britain", "united states", "united states of america", "usa", "us", "uruguay",
    "uzbekistan", "vanuatu", "vatican city", "venezuela", "vietnam", "yemen", "zambia",
    "zimbabwe", "hong kong", "macau", "puerto rico", "greenland",
];

static BY_LENGTH: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut names = NAMES.to_vec();
    // Stable sort keeps list order among equal lengths.
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));
    names
});

/// All names, longest first, so "papua new guinea" is stripped whole rather
/// than just "guinea".
pub fn names() -> &'static [&'static str] {
    &BY_LENGTH
}

/// Strip a trailing gazetteer name from `text` on a word boundary.
///
/// Returns the trimmed remainder, or `None` when no name matches or nothing
/// would be left.
pub fn strip_country_suffix(text: &str) -> Option<&str> {
    names().iter().find_map(|country| {
        let split = text.len().checked_sub(country.len())?;
        let tail = text.get(split..)?;
        if !tail.eq_ignore_ascii_case(country) {
            return None;
        }
        let head = text.get(..split)?;
        if !head.ends_with(' ') {
            return None;
        }
        let rest = head.trim();
        (!rest.is_empty()).then_some(rest)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_longest_first() {
        let names = names();
        assert!(names.windows(2).all(|w| w[0].len() >= w[1].len()));
        assert_eq!(names.len(), NAMES.len());
    }

    #[test]
    fn strips_multi_word_country() {
        assert_eq!(
            strip_country_suffix("london england united kingdom"),
            Some("london england")
        );
        assert_eq!(
            strip_country_suffix("new york new york united states of america"),
            Some("new york new york")
        );
    }

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(strip_country_suffix("Paris France"), Some("Paris"));
    }

    #[test]
    fn requires_word_boundary() {
        // "oman" must not be cut out of "roman".
        assert_eq!(strip_country_suffix("san roman"), None);
    }

    #[test]
    fn bare_country_is_not_stripped() {
        assert_eq!(strip_country_suffix("france"), None);
        assert_eq!(strip_country_suffix("singapore singapore"), Some("singapore"));
    }
}
