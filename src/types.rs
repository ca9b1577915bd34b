use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(u32);

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Sign { Pos, Neg, }

impl Lit {
    /// `None` for 0, the clause terminator, and for `i32::MIN`, which has no negation
    pub fn try_from_i32(x: i32) -> Option<Lit> {
        match x {
            0 | i32::MIN => None,
            _ => Some(Lit(x)),
        }
    }

    pub fn to_i32(self) -> i32 {
        self.0
    }

    pub fn var(self) -> Var {
        Var(self.0.unsigned_abs())
    }

    pub fn sign(self) -> Sign {
        if self.0 > 0 { Sign::Pos } else { Sign::Neg }
    }

    pub fn neg(self) -> Lit {
        Lit(-self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Var {
    pub fn from_u32(x: u32) -> Var {
        Var(x)
    }

    pub fn to_u32(self) -> u32 {
        self.0
    }

    /// position of the variable in a 0-based assignment vector
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn to_lit(self, sign: Sign) -> Lit {
        match sign {
            Sign::Pos => Lit(self.0 as i32),
            Sign::Neg => Lit(-(self.0 as i32)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    lits : Box<[Lit]>
}

impl Clause {
    /// `None` for an empty literal list; clauses never exist without literals
    pub fn from_vec(lits: Vec<Lit>) -> Option<Clause> {
        match lits.len() {
            0 => None,
            _ => Some(Clause { lits: lits.into_boxed_slice() }),
        }
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    fn satisfied_by(&self, values: &[bool]) -> bool {
        self.lits.iter().any(|l| match values.get(l.var().index()) {
            Some(&v) => v == (l.sign() == Sign::Pos),
            None => false,
        })
    }
}

impl fmt::Display for Clause {
    /// exchange-format clause line, terminator included
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for l in self.lits.iter() {
            write!(f, "{} ", l)?;
        }
        write!(f, "0")
    }
}

/// conjunction of clauses, rebuilt from the input on every change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    clauses : Vec<Clause>,
}

impl Formula {
    pub fn new(clauses: Vec<Clause>) -> Formula {
        Formula { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// largest variable referenced, `None` when there are no literals at all
    pub fn num_vars(&self) -> Option<u32> {
        self.clauses.iter()
            .flat_map(|c| c.lits().iter())
            .map(|l| l.var().to_u32())
            .max()
    }

    /// `values[i]` is the value of variable `i + 1`; missing variables count as unsatisfied
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        self.clauses.iter().all(|c| c.satisfied_by(values))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeDocument {
    pub num_vars : u32,
    pub clauses  : Vec<Clause>,
}

impl fmt::Display for ExchangeDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in self.clauses.iter() {
            write!(f, "\n{}", clause)?;
        }
        Ok(())
    }
}

/// solver output, kept as the exact string the service returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment(String);

impl Assignment {
    pub fn new(s: impl Into<String>) -> Assignment {
        Assignment(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// decodes a bit string reply (`"101"`: x1 = true, x2 = false, x3 = true)
    pub fn values(&self) -> Option<Vec<bool>> {
        let s = self.0.trim();
        if s.is_empty() {
            return None;
        }
        s.chars()
            .map(|c| match c {
                '1' => Some(true),
                '0' => Some(false),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
