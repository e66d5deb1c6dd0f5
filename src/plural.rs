// SPDX-License-Identifier: PMPL-1.0-or-later

//! Cardinal plural-category rules
//!
//! Qt Linguist catalogs carry one `<numerusform>` per plural category of
//! the catalog language, in that language's category order. The rule is
//! selected from the `language` tag at load time and injected into the
//! resolver; nothing downstream hardcodes "singular vs plural".
//!
//! Rules are grouped by family rather than enumerated per language: the
//! interesting axis is the category set and the selection function, and
//! dozens of languages share each. Unknown tags fall back to the two-form
//! rule, which matches the bulk of European languages.

use serde::{Deserialize, Serialize};

/// CLDR-style cardinal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    One,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PluralCategory::One => "one",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

/// Plural rule family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralRule {
    /// No plural distinction: ja, zh, ko, th, vi, id, ms.
    Single,
    /// n == 1 is "one": en, de, es, it, nl, sv, da, fi, el, hu, pt_PT, …
    TwoForm,
    /// n == 0 or 1 is "one": fr, pt_BR, tr, fa, hi.
    FrenchLike,
    /// one/few/many on mod-10/mod-100: ru, uk, be, sr, hr, bs.
    RussianLike,
    /// one/few/many, with "one" only for exactly 1: pl.
    Polish,
    /// one (1) / few (2–4) / other: cs, sk.
    CzechLike,
}

impl PluralRule {
    /// Select the rule for a locale tag such as `pt_PT`, `ru`, `fr-CA`.
    ///
    /// Keys off the language subtag; Portuguese additionally inspects the
    /// region because pt_BR pluralizes like French while pt_PT does not.
    pub fn for_locale(tag: &str) -> Self {
        let mut parts = tag.split(|c| c == '_' || c == '-');
        let language = parts.next().unwrap_or("").to_ascii_lowercase();
        let region = parts.next().unwrap_or("").to_ascii_uppercase();

        match language.as_str() {
            "ja" | "zh" | "ko" | "th" | "vi" | "id" | "ms" => PluralRule::Single,
            "fr" | "tr" | "fa" | "hi" => PluralRule::FrenchLike,
            "pt" if region == "BR" => PluralRule::FrenchLike,
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => PluralRule::RussianLike,
            "pl" => PluralRule::Polish,
            "cs" | "sk" => PluralRule::CzechLike,
            _ => PluralRule::TwoForm,
        }
    }

    /// Category order for this rule. Matches the `<numerusform>` slot order
    /// Qt Linguist emits for languages of this family.
    pub fn categories(self) -> &'static [PluralCategory] {
        use PluralCategory::*;
        match self {
            PluralRule::Single => &[Other],
            PluralRule::TwoForm | PluralRule::FrenchLike => &[One, Other],
            PluralRule::RussianLike | PluralRule::Polish => &[One, Few, Many],
            PluralRule::CzechLike => &[One, Few, Other],
        }
    }

    /// Number of `<numerusform>` slots a plural message should carry.
    pub fn required_forms(self) -> usize {
        self.categories().len()
    }

    /// Category for a cardinal count.
    pub fn categorize(self, n: u64) -> PluralCategory {
        use PluralCategory::*;
        match self {
            PluralRule::Single => Other,
            PluralRule::TwoForm => {
                if n == 1 {
                    One
                } else {
                    Other
                }
            }
            PluralRule::FrenchLike => {
                if n <= 1 {
                    One
                } else {
                    Other
                }
            }
            PluralRule::RussianLike => {
                if n % 10 == 1 && n % 100 != 11 {
                    One
                } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                    Few
                } else {
                    Many
                }
            }
            PluralRule::Polish => {
                if n == 1 {
                    One
                } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                    Few
                } else {
                    Many
                }
            }
            PluralRule::CzechLike => {
                if n == 1 {
                    One
                } else if (2..=4).contains(&n) {
                    Few
                } else {
                    Other
                }
            }
        }
    }

    /// Slot index for a count, i.e. which `<numerusform>` applies.
    pub fn slot_for(self, n: u64) -> usize {
        let category = self.categorize(n);
        self.categories()
            .iter()
            .position(|&c| c == category)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_tag_parsing() {
        assert_eq!(PluralRule::for_locale("pt_PT"), PluralRule::TwoForm);
        assert_eq!(PluralRule::for_locale("pt_BR"), PluralRule::FrenchLike);
        assert_eq!(PluralRule::for_locale("pt"), PluralRule::TwoForm);
        assert_eq!(PluralRule::for_locale("fr-CA"), PluralRule::FrenchLike);
        assert_eq!(PluralRule::for_locale("ru"), PluralRule::RussianLike);
        assert_eq!(PluralRule::for_locale("ja"), PluralRule::Single);
        assert_eq!(PluralRule::for_locale("cs"), PluralRule::CzechLike);
        // Unknown tags degrade to the common two-form rule
        assert_eq!(PluralRule::for_locale("tlh"), PluralRule::TwoForm);
        assert_eq!(PluralRule::for_locale(""), PluralRule::TwoForm);
    }

    #[test]
    fn two_form_selection() {
        let rule = PluralRule::TwoForm;
        assert_eq!(rule.categorize(0), PluralCategory::Other);
        assert_eq!(rule.categorize(1), PluralCategory::One);
        assert_eq!(rule.categorize(5), PluralCategory::Other);
        assert_eq!(rule.slot_for(1), 0);
        assert_eq!(rule.slot_for(5), 1);
    }

    #[test]
    fn french_counts_zero_as_singular() {
        let rule = PluralRule::FrenchLike;
        assert_eq!(rule.categorize(0), PluralCategory::One);
        assert_eq!(rule.categorize(1), PluralCategory::One);
        assert_eq!(rule.categorize(2), PluralCategory::Other);
    }

    #[test]
    fn russian_mod_rules() {
        let rule = PluralRule::RussianLike;
        assert_eq!(rule.categorize(1), PluralCategory::One);
        assert_eq!(rule.categorize(3), PluralCategory::Few);
        assert_eq!(rule.categorize(5), PluralCategory::Many);
        assert_eq!(rule.categorize(11), PluralCategory::Many);
        assert_eq!(rule.categorize(12), PluralCategory::Many);
        assert_eq!(rule.categorize(21), PluralCategory::One);
        assert_eq!(rule.categorize(22), PluralCategory::Few);
        assert_eq!(rule.categorize(111), PluralCategory::Many);
    }

    #[test]
    fn polish_one_is_exactly_one() {
        let rule = PluralRule::Polish;
        assert_eq!(rule.categorize(1), PluralCategory::One);
        // 21 is "many" in Polish, not "one" as in Russian
        assert_eq!(rule.categorize(21), PluralCategory::Many);
        assert_eq!(rule.categorize(22), PluralCategory::Few);
        assert_eq!(rule.categorize(5), PluralCategory::Many);
    }

    #[test]
    fn czech_small_range_few() {
        let rule = PluralRule::CzechLike;
        assert_eq!(rule.categorize(1), PluralCategory::One);
        assert_eq!(rule.categorize(2), PluralCategory::Few);
        assert_eq!(rule.categorize(4), PluralCategory::Few);
        assert_eq!(rule.categorize(5), PluralCategory::Other);
        assert_eq!(rule.categorize(22), PluralCategory::Other);
    }

    #[test]
    fn single_form_always_other() {
        let rule = PluralRule::Single;
        for n in [0, 1, 2, 100] {
            assert_eq!(rule.categorize(n), PluralCategory::Other);
            assert_eq!(rule.slot_for(n), 0);
        }
    }

    #[test]
    fn selection_is_total_over_counts() {
        for rule in [
            PluralRule::Single,
            PluralRule::TwoForm,
            PluralRule::FrenchLike,
            PluralRule::RussianLike,
            PluralRule::Polish,
            PluralRule::CzechLike,
        ] {
            for n in 0..200u64 {
                let slot = rule.slot_for(n);
                assert!(
                    slot < rule.required_forms(),
                    "{:?} count {} selected slot {} out of {}",
                    rule,
                    n,
                    slot,
                    rule.required_forms()
                );
            }
        }
    }
}
