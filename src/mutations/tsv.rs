//! Minimal tab-separated text splitting.

/// Field separator of all input payloads.
pub const FIELD_SEP: char = '\t';

/// Split `text` into rows of fields.
///
/// Lines are separated by `'\n'` and empty lines are dropped.  There is no
/// quoting, escaping or column count validation; consumers must cope with
/// ragged rows.
pub fn parse_tsv(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| line.split(FIELD_SEP).map(String::from).collect())
        .collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::parse_tsv;

    #[test]
    fn parse_tsv_drops_empty_lines() {
        let rows = parse_tsv("a\tb\n\nc\td\te\n");

        assert_eq!(
            rows,
            vec![
                vec![String::from("a"), String::from("b")],
                vec![String::from("c"), String::from("d"), String::from("e")],
            ]
        );
    }

    #[test]
    fn parse_tsv_keeps_empty_fields() {
        let rows = parse_tsv("a\t\tb");

        assert_eq!(
            rows,
            vec![vec![String::from("a"), String::new(), String::from("b")]]
        );
    }

    #[test]
    fn parse_tsv_empty_input() {
        assert!(parse_tsv("").is_empty());
        assert!(parse_tsv("\n\n").is_empty());
    }
}
