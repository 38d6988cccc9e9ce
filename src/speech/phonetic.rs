/// Applies each `(from, to)` substitution to the whole word, in order.
pub fn apply_rules<S: AsRef<str>>(word: &str, rules: &[(S, S)]) -> String {
    rules.iter().fold(word.to_string(), |acc, (from, to)| {
        let from = from.as_ref();
        if from.is_empty() {
            acc
        } else {
            acc.replace(from, to.as_ref())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::config::DEFAULT_PHONETIC_RULES;

    #[test]
    fn default_rules_fold_confusable_sounds() {
        assert_eq!(apply_rules("thank", &DEFAULT_PHONETIC_RULES), "tank");
        assert_eq!(apply_rules("foto", &DEFAULT_PHONETIC_RULES), "poto");
        assert_eq!(apply_rules("vas", &DEFAULT_PHONETIC_RULES), "bas");
        assert_eq!(apply_rules("zebra", &DEFAULT_PHONETIC_RULES), "sebra");
        assert_eq!(apply_rules("chat", &DEFAULT_PHONETIC_RULES), "cat");
    }

    #[test]
    fn rules_apply_in_order() {
        assert_eq!(apply_rules("thf", &DEFAULT_PHONETIC_RULES), "tp");
        let rules = [("a", "b"), ("b", "c")];
        assert_eq!(apply_rules("a", &rules), "c");
    }
}
