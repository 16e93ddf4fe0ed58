//! Query expression AST
//!
//! Predicate trees are immutable and shared through `Arc`. Nothing in the
//! crate mutates a node in place: a rewrite builds a new node, so pointer
//! identity (`Arc::ptr_eq`) tells whether anything changed.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Shared handle to an immutable expression node
pub type QueryExpr = Arc<Expr>;

/// Path segment matching any element of an array
pub const ANY_ELEMENT: &str = "*";

/// Path segment naming the current array element inside an elemMatch
pub const THIS: &str = "$this";

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// field = value
    Eq,
    /// field != value
    Neq,
    /// field < value
    Lt,
    /// field <= value
    Lte,
    /// field > value
    Gt,
    /// field >= value
    Gte,
}

impl ComparisonOp {
    /// Returns the operator matching exactly the complement of this one
    pub fn negate(self) -> Self {
        match self {
            ComparisonOp::Eq => ComparisonOp::Neq,
            ComparisonOp::Neq => ComparisonOp::Eq,
            ComparisonOp::Lt => ComparisonOp::Gte,
            ComparisonOp::Gte => ComparisonOp::Lt,
            ComparisonOp::Gt => ComparisonOp::Lte,
            ComparisonOp::Lte => ComparisonOp::Gt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Neq => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
        }
    }
}

/// Set membership operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaryRelationalOp {
    In,
    NotIn,
}

impl NaryRelationalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            NaryRelationalOp::In => "$in",
            NaryRelationalOp::NotIn => "$nin",
        }
    }
}

/// Array containment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainsOp {
    /// Array holds at least one of the values
    Any,
    /// Array holds every value
    All,
    /// Array holds none of the values
    None,
}

impl ContainsOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainsOp::Any => "$any",
            ContainsOp::All => "$all",
            ContainsOp::None => "$none",
        }
    }
}

/// N-ary logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaryLogicalOp {
    And,
    Or,
}

impl NaryLogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            NaryLogicalOp::And => "$and",
            NaryLogicalOp::Or => "$or",
        }
    }
}

/// `field op value`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueComparison {
    pub field: String,
    pub op: ComparisonOp,
    pub value: Value,
}

/// `field op rfield`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldComparison {
    pub field: String,
    pub op: ComparisonOp,
    pub rfield: String,
}

/// `field $in [..]` / `field $nin [..]`
#[derive(Debug, Clone, PartialEq)]
pub struct NaryRelational {
    pub field: String,
    pub op: NaryRelationalOp,
    pub values: Vec<Value>,
}

/// Regular expression match on a string field
#[derive(Debug, Clone, PartialEq)]
pub struct RegexMatch {
    pub field: String,
    pub pattern: String,
    pub case_insensitive: bool,
    pub multiline: bool,
    pub extended: bool,
    pub dot_all: bool,
}

/// Containment test on an array field
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayContains {
    pub array: String,
    pub op: ContainsOp,
    pub values: Vec<Value>,
}

/// Some element of `array` satisfies `elem_match`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayMatch {
    pub array: String,
    pub elem_match: QueryExpr,
}

/// `$and` / `$or` over child expressions
#[derive(Debug, Clone, PartialEq)]
pub struct NaryLogical {
    pub op: NaryLogicalOp,
    pub children: Vec<QueryExpr>,
}

/// A predicate expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    ValueComparison(ValueComparison),
    FieldComparison(FieldComparison),
    NaryRelational(NaryRelational),
    RegexMatch(RegexMatch),
    ArrayContains(ArrayContains),
    ArrayMatch(ArrayMatch),
    /// Unary logical negation
    Not(QueryExpr),
    Logical(NaryLogical),
}

impl Expr {
    /// Creates `field op value`
    pub fn compare(field: impl Into<String>, op: ComparisonOp, value: impl Into<Value>) -> QueryExpr {
        Arc::new(Expr::ValueComparison(ValueComparison {
            field: field.into(),
            op,
            value: value.into(),
        }))
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> QueryExpr {
        Self::compare(field, ComparisonOp::Eq, value)
    }

    pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> QueryExpr {
        Self::compare(field, ComparisonOp::Neq, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> QueryExpr {
        Self::compare(field, ComparisonOp::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> QueryExpr {
        Self::compare(field, ComparisonOp::Lte, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> QueryExpr {
        Self::compare(field, ComparisonOp::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> QueryExpr {
        Self::compare(field, ComparisonOp::Gte, value)
    }

    /// Creates `field op rfield`
    pub fn compare_fields(
        field: impl Into<String>,
        op: ComparisonOp,
        rfield: impl Into<String>,
    ) -> QueryExpr {
        Arc::new(Expr::FieldComparison(FieldComparison {
            field: field.into(),
            op,
            rfield: rfield.into(),
        }))
    }

    /// Creates `field $in / $nin [values]`
    pub fn relational<V: Into<Value>>(
        field: impl Into<String>,
        op: NaryRelationalOp,
        values: impl IntoIterator<Item = V>,
    ) -> QueryExpr {
        Arc::new(Expr::NaryRelational(NaryRelational {
            field: field.into(),
            op,
            values: values.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> QueryExpr {
        Self::relational(field, NaryRelationalOp::In, values)
    }

    pub fn not_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> QueryExpr {
        Self::relational(field, NaryRelationalOp::NotIn, values)
    }

    /// Creates a regex match with all flags off
    pub fn regex(field: impl Into<String>, pattern: impl Into<String>) -> QueryExpr {
        Self::regex_with(RegexMatch {
            field: field.into(),
            pattern: pattern.into(),
            case_insensitive: false,
            multiline: false,
            extended: false,
            dot_all: false,
        })
    }

    pub fn regex_with(regex: RegexMatch) -> QueryExpr {
        Arc::new(Expr::RegexMatch(regex))
    }

    pub fn contains<V: Into<Value>>(
        array: impl Into<String>,
        op: ContainsOp,
        values: impl IntoIterator<Item = V>,
    ) -> QueryExpr {
        Arc::new(Expr::ArrayContains(ArrayContains {
            array: array.into(),
            op,
            values: values.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn elem_match(array: impl Into<String>, elem_match: QueryExpr) -> QueryExpr {
        Arc::new(Expr::ArrayMatch(ArrayMatch {
            array: array.into(),
            elem_match,
        }))
    }

    pub fn not(nested: QueryExpr) -> QueryExpr {
        Arc::new(Expr::Not(nested))
    }

    pub fn logical(op: NaryLogicalOp, children: Vec<QueryExpr>) -> QueryExpr {
        Arc::new(Expr::Logical(NaryLogical { op, children }))
    }

    pub fn and(children: Vec<QueryExpr>) -> QueryExpr {
        Self::logical(NaryLogicalOp::And, children)
    }

    pub fn or(children: Vec<QueryExpr>) -> QueryExpr {
        Self::logical(NaryLogicalOp::Or, children)
    }

    /// Returns the logical node if this is an `$and`/`$or` with the given operator
    pub fn as_logical(&self, op: NaryLogicalOp) -> Option<&NaryLogical> {
        match self {
            Expr::Logical(le) if le.op == op => Some(le),
            _ => None,
        }
    }
}

/// True if `path` fans out over array elements, so it can resolve to
/// more than one value
pub fn is_multi_valued(path: &str) -> bool {
    path.split('.').any(|segment| segment == ANY_ELEMENT)
}

/// Joins path segments with `.`, skipping empty ones
pub fn join_path(prefix: &str, suffix: &str) -> String {
    match (prefix.is_empty(), suffix.is_empty()) {
        (true, _) => suffix.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{}.{}", prefix, suffix),
    }
}

fn write_values(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    write!(f, "[")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", v)?;
    }
    write!(f, "]")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::ValueComparison(c) => write!(f, "{} {} {}", c.field, c.op.as_str(), c.value),
            Expr::FieldComparison(c) => write!(f, "{} {} {}", c.field, c.op.as_str(), c.rfield),
            Expr::NaryRelational(r) => {
                write!(f, "{} {} ", r.field, r.op.as_str())?;
                write_values(f, &r.values)
            }
            Expr::RegexMatch(r) => {
                write!(f, "{} =~ /{}/", r.field, r.pattern)?;
                for (set, flag) in [
                    (r.case_insensitive, 'i'),
                    (r.multiline, 'm'),
                    (r.extended, 'x'),
                    (r.dot_all, 's'),
                ] {
                    if set {
                        write!(f, "{}", flag)?;
                    }
                }
                Ok(())
            }
            Expr::ArrayContains(c) => {
                write!(f, "{} {} ", c.array, c.op.as_str())?;
                write_values(f, &c.values)
            }
            Expr::ArrayMatch(m) => write!(f, "{} $elemMatch({})", m.array, m.elem_match),
            Expr::Not(q) => write!(f, "$not({})", q),
            Expr::Logical(le) => {
                write!(f, "{}(", le.op.as_str())?;
                for (i, child) in le.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}
