use log::debug;

use crate::error::{Error, Result};
use crate::types::{Clause, ExchangeDocument, Formula, Lit, Sign};

pub const INVALID_INPUT: &str = "Invalid input detected. Please ensure all entries are integers.";

const OR: &str = " ∨ ";
const AND: &str = " ∧ ";

/// Non-blank lines of `text`, trimmed, in order.
pub fn parse_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn parse_lit(token: &str, line: usize) -> Result<Lit> {
    token.parse::<i32>()
        .ok()
        .and_then(Lit::try_from_i32)
        .ok_or_else(|| Error::MalformedLiteral { line, token: token.to_string() })
}

fn parse_clause(line: &str, lineno: usize) -> Result<Clause> {
    let lits = line.split_whitespace()
        .map(|t| parse_lit(t, lineno))
        .collect::<Result<Vec<Lit>>>()?;
    // lines reaching here are non-blank, so there is at least one token
    Clause::from_vec(lits).ok_or(Error::EmptyFormula)
}

/// One clause per line. A single bad token anywhere rejects the whole formula.
pub fn to_clauses(lines: &[&str]) -> Result<Formula> {
    let clauses = lines.iter()
        .enumerate()
        .map(|(i, line)| parse_clause(line, i + 1))
        .collect::<Result<Vec<Clause>>>()?;
    Ok(Formula::new(clauses))
}

fn render_lit(lit: Lit) -> String {
    match lit.sign() {
        Sign::Pos => format!("x{}", lit.var().to_u32()),
        Sign::Neg => format!("¬x{}", lit.var().to_u32()),
    }
}

/// Readable rendering, e.g. `(x1 ∨ ¬x2) ∧ (x2 ∨ x3)`; empty for an empty formula.
pub fn render(formula: &Formula) -> String {
    formula.clauses().iter()
        .map(|c| {
            let lits: Vec<String> = c.lits().iter().map(|&l| render_lit(l)).collect();
            format!("({})", lits.join(OR))
        })
        .collect::<Vec<String>>()
        .join(AND)
}

/// What the formula area shows for raw input `text`.
pub fn render_text(text: &str) -> String {
    match to_clauses(&parse_lines(text)) {
        Ok(formula) => render(&formula),
        Err(e) => {
            debug!("rendering rejected: {e}");
            INVALID_INPUT.to_string()
        }
    }
}

pub fn to_exchange_document(lines: &[&str]) -> Result<ExchangeDocument> {
    let formula = to_clauses(lines)?;
    let num_vars = formula.num_vars().ok_or(Error::EmptyFormula)?;
    Ok(ExchangeDocument { num_vars, clauses: formula.clauses().to_vec() })
}

/// Reads an exchange document back into raw line notation.
///
/// Clauses may span lines; each `0` closes one. Comment lines (`c`) are
/// skipped and a `%` line ends the body. Text without a `p cnf` header is
/// taken to be raw notation already and comes back trimmed but otherwise
/// untouched.
pub fn from_exchange_document(text: &str) -> Result<String> {
    let mut lines = text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('c'));

    let declared = match lines.next() {
        Some((_, header)) if header.starts_with('p') => {
            let parts: Vec<&str> = header.split_whitespace().collect();
            match parts.as_slice() {
                ["p", "cnf", nvars, nclauses] => {
                    nvars.parse::<u32>()
                        .map_err(|_| Error::MalformedHeader(header.to_string()))?;
                    nclauses.parse::<usize>()
                        .map_err(|_| Error::MalformedHeader(header.to_string()))?
                },
                _ => return Err(Error::MalformedHeader(header.to_string())),
            }
        },
        _ => return Ok(text.trim().to_string()),
    };

    let mut clauses: Vec<Vec<Lit>> = Vec::new();
    let mut clause: Vec<Lit> = Vec::new();

    for (lineno, line) in lines {
        if line.starts_with('%') {
            break;
        }
        for word in line.split_whitespace() {
            let x = word.parse::<i32>()
                .map_err(|_| Error::MalformedLiteral { line: lineno, token: word.to_string() })?;
            match Lit::try_from_i32(x) {
                None => {
                    if !clause.is_empty() {
                        clauses.push(std::mem::take(&mut clause));
                    }
                },
                Some(l) => clause.push(l),
            }
        }
    }
    if !clause.is_empty() {
        clauses.push(clause);
    }

    if clauses.len() != declared {
        return Err(Error::ClauseCountMismatch { declared, found: clauses.len() });
    }

    Ok(clauses.iter()
        .map(|c| c.iter().map(|l| l.to_string()).collect::<Vec<String>>().join(" "))
        .collect::<Vec<String>>()
        .join("\n"))
}

/// Uniform random k-CNF in raw notation, distinct variables within a clause.
pub fn random_formula(rng: &fastrand::Rng, num_vars: u32, num_clauses: usize, width: usize) -> String {
    let width = width.min(num_vars as usize);
    let mut lines: Vec<String> = Vec::with_capacity(num_clauses);

    for _ in 0..num_clauses {
        let mut vars: Vec<u32> = Vec::with_capacity(width);
        while vars.len() < width {
            let v = rng.u32(1..=num_vars);
            if !vars.contains(&v) {
                vars.push(v);
            }
        }
        let lits: Vec<String> = vars.iter()
            .map(|&v| if rng.bool() { v.to_string() } else { format!("-{v}") })
            .collect();
        lines.push(lits.join(" "));
    }

    lines.join("\n")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_lines() {
        assert_eq!(parse_lines("  1 2 \n\n   \n-1 3\n"), vec!["1 2", "-1 3"]);
        assert!(parse_lines("").is_empty());
        assert!(parse_lines(" \n\t\n").is_empty());
    }

    #[test]
    fn test_render_single_clause() {
        let formula = to_clauses(&["1 -2"]).unwrap();
        assert_eq!(render(&formula), "(x1 ∨ ¬x2)");
    }

    #[test]
    fn test_render_groups() {
        let text = "1 2 3\n-4\n\n5 -6";
        let out = render_text(text);
        assert_eq!(out, "(x1 ∨ x2 ∨ x3) ∧ (¬x4) ∧ (x5 ∨ ¬x6)");
        assert_eq!(out.matches('(').count(), 3);
        let groups: Vec<&str> = out.split(AND).collect();
        assert_eq!(groups[0].matches(OR).count() + 1, 3);
        assert_eq!(groups[1].matches(OR).count() + 1, 1);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_text(""), "");
        assert_eq!(render_text("\n   \n"), "");
        assert_eq!(render(&Formula::default()), "");
    }

    #[test]
    fn test_render_invalid_anywhere() {
        assert_eq!(render_text("1 2\n-1 a\n3"), INVALID_INPUT);
        assert_eq!(render_text("1.5"), INVALID_INPUT);
        assert_eq!(render_text("1 0 2"), INVALID_INPUT);
        assert_eq!(render_text("99999999999"), INVALID_INPUT);
    }

    #[test]
    fn test_malformed_literal_location() {
        let err = to_clauses(&["1 2", "3 foo"]).unwrap_err();
        assert_eq!(err, Error::MalformedLiteral { line: 2, token: "foo".to_string() });
    }

    #[test]
    fn test_exchange_document() {
        let doc = to_exchange_document(&["1 -2", "2 3"]).unwrap();
        assert_eq!(doc.num_vars, 3);
        assert_eq!(doc.to_string(), "p cnf 3 2\n1 -2 0\n2 3 0");
    }

    #[test]
    fn test_exchange_document_max_abs() {
        let lines = parse_lines("1 -7\n2   3\n");
        let doc = to_exchange_document(&lines).unwrap();
        assert_eq!(doc.to_string(), "p cnf 7 2\n1 -7 0\n2 3 0");
    }

    #[test]
    fn test_exchange_document_empty() {
        assert_eq!(to_exchange_document(&[]), Err(Error::EmptyFormula));
    }

    #[test]
    fn test_exchange_document_malformed() {
        assert!(matches!(to_exchange_document(&["1 x"]), Err(Error::MalformedLiteral { .. })));
    }

    #[test]
    fn test_from_exchange_document() {
        let text = "c random example\np cnf 3 2\n1 -2 0\n2\n3 0\n";
        assert_eq!(from_exchange_document(text).unwrap(), "1 -2\n2 3");
    }

    #[test]
    fn test_from_exchange_document_satlib_trailer() {
        let text = "p cnf 2 1\n 1 2 0\n%\n0\n";
        assert_eq!(from_exchange_document(text).unwrap(), "1 2");
    }

    #[test]
    fn test_from_exchange_document_raw_passthrough() {
        assert_eq!(from_exchange_document("  1 2\n-1 3\n").unwrap(), "1 2\n-1 3");
    }

    #[test]
    fn test_from_exchange_document_errors() {
        assert_eq!(
            from_exchange_document("p cnf 2\n1 2 0"),
            Err(Error::MalformedHeader("p cnf 2".to_string()))
        );
        assert_eq!(
            from_exchange_document("p cnf 2 2\n1 2 0"),
            Err(Error::ClauseCountMismatch { declared: 2, found: 1 })
        );
        assert!(matches!(from_exchange_document("p cnf 2 1\n1 y 0"), Err(Error::MalformedLiteral { line: 2, .. })));
    }

    #[test]
    fn test_exchange_round_trip() {
        let doc = to_exchange_document(&["1 2", "-1 3"]).unwrap().to_string();
        assert_eq!(from_exchange_document(&doc).unwrap(), "1 2\n-1 3");
    }

    #[test]
    fn test_random_formula() {
        let rng = fastrand::Rng::with_seed(7);
        let text = random_formula(&rng, 5, 20, 3);
        let lines = parse_lines(&text);
        assert_eq!(lines.len(), 20);
        let formula = to_clauses(&lines).unwrap();
        for clause in formula.clauses() {
            assert_eq!(clause.lits().len(), 3);
            let mut vars: Vec<u32> = clause.lits().iter().map(|l| l.var().to_u32()).collect();
            vars.sort();
            vars.dedup();
            assert_eq!(vars.len(), 3);
            assert!(vars.iter().all(|&v| (1..=5).contains(&v)));
        }
    }

    #[test]
    fn test_random_formula_narrow() {
        let rng = fastrand::Rng::with_seed(1);
        let text = random_formula(&rng, 2, 4, 3);
        assert!(to_clauses(&parse_lines(&text)).unwrap().clauses().iter().all(|c| c.lits().len() == 2));
    }
}
