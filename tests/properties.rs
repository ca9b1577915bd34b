use proptest::prelude::*;
use proptest::sample::Index;

use cnfpad_lib::translator::{self, INVALID_INPUT};
use cnfpad_lib::Error;

// ============================================================================
// Strategies
// ============================================================================

prop_compose! {
    fn any_literal()(var in 1..=500i32, negative in any::<bool>()) -> i32 {
        if negative { -var } else { var }
    }
}

prop_compose! {
    fn any_clause()(lits in prop::collection::vec(any_literal(), 1..6)) -> Vec<i32> {
        lits
    }
}

fn line(clause: &[i32]) -> String {
    clause.iter().map(|x| x.to_string()).collect::<Vec<String>>().join(" ")
}

prop_compose! {
    /// Clauses and the text typing them, with blank and padded lines mixed in.
    fn any_input()(rows in prop::collection::vec((any_clause(), 0..3usize, any::<bool>()), 1..8))
        -> (Vec<Vec<i32>>, String) {
        let mut text = String::new();
        for (clause, blanks, padded) in rows.iter() {
            for _ in 0..*blanks {
                text.push_str("  \n");
            }
            match *padded {
                true => text.push_str(&format!("\t {}  \n", line(clause))),
                false => text.push_str(&format!("{}\n", line(clause))),
            }
        }
        (rows.into_iter().map(|(clause, _, _)| clause).collect(), text)
    }
}

prop_compose! {
    /// Valid input with exactly one token replaced by a non-integer.
    fn corrupted_input()(
        (clauses, _) in any_input(),
        at in any::<Index>(),
        bad in "[a-z]{1,3}|[0-9]\\.[0-9]|[0-9]+[a-z]"
    ) -> String {
        let total: usize = clauses.iter().map(Vec::len).sum();
        let mut k = at.index(total);
        let mut lines: Vec<String> = Vec::new();
        for clause in clauses.iter() {
            let mut tokens: Vec<String> = clause.iter().map(|x| x.to_string()).collect();
            if k < tokens.len() {
                tokens[k] = bad.clone();
            }
            k = k.wrapping_sub(clause.len());
            lines.push(tokens.join(" "));
        }
        lines.join("\n\n")
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_one_group_per_line((clauses, text) in any_input()) {
        let rendered = translator::render_text(&text);
        let groups: Vec<&str> = rendered.split(" ∧ ").collect();
        prop_assert_eq!(groups.len(), clauses.len());
        for (group, clause) in groups.iter().zip(clauses.iter()) {
            prop_assert!(group.starts_with('(') && group.ends_with(')'));
            prop_assert_eq!(group.split(" ∨ ").count(), clause.len());
        }
    }

    #[test]
    fn prop_header_counts((clauses, text) in any_input()) {
        let lines = translator::parse_lines(&text);
        let doc = match translator::to_exchange_document(&lines) {
            Ok(doc) => doc,
            Err(e) => return Err(TestCaseError::fail(format!("rejected valid input: {e}"))),
        };
        let max = clauses.iter().flatten().map(|x| x.unsigned_abs()).max().unwrap_or(0);
        prop_assert_eq!(doc.num_vars, max);
        prop_assert_eq!(doc.clauses.len(), clauses.len());

        let rendered = doc.to_string();
        let mut out = rendered.lines();
        let header = format!("p cnf {} {}", max, clauses.len());
        prop_assert_eq!(out.next(), Some(header.as_str()));
        for (row, clause) in out.zip(clauses.iter()) {
            let expected = format!("{} 0", line(clause));
            prop_assert_eq!(row, expected.as_str());
        }
    }

    #[test]
    fn prop_bad_token_anywhere(text in corrupted_input()) {
        prop_assert_eq!(translator::render_text(&text), INVALID_INPUT);
        let lines = translator::parse_lines(&text);
        let rejected = matches!(translator::to_exchange_document(&lines), Err(Error::MalformedLiteral { .. }));
        prop_assert!(rejected);
    }
}
