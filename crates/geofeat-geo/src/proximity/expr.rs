//! Structured distance expression emitted by the proximity planner.
//!
//! The tree can be evaluated in memory or rendered as generic function-call
//! text for a query layer to translate into its own dialect.

use std::fmt;

use geofeat_core::models::Position;
use serde::Serialize;

/// Arithmetic and trigonometric expression over one spatial attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Literal(f64),
    /// Longitude of the attribute
    X(String),
    /// Latitude of the attribute
    Y(String),
    Radians(Box<Expr>),
    Degrees(Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Acos(Box<Expr>),
    Least(Box<Expr>, Box<Expr>),
    Greatest(Box<Expr>, Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn literal(value: f64) -> Self {
        Expr::Literal(value)
    }

    pub fn radians(self) -> Self {
        Expr::Radians(Box::new(self))
    }

    pub fn degrees(self) -> Self {
        Expr::Degrees(Box::new(self))
    }

    pub fn sin(self) -> Self {
        Expr::Sin(Box::new(self))
    }

    pub fn cos(self) -> Self {
        Expr::Cos(Box::new(self))
    }

    pub fn acos(self) -> Self {
        Expr::Acos(Box::new(self))
    }

    pub fn least(self, other: Expr) -> Self {
        Expr::Least(Box::new(self), Box::new(other))
    }

    pub fn greatest(self, other: Expr) -> Self {
        Expr::Greatest(Box::new(self), Box::new(other))
    }

    pub fn plus(self, other: Expr) -> Self {
        Expr::Add(Box::new(self), Box::new(other))
    }

    pub fn minus(self, other: Expr) -> Self {
        Expr::Sub(Box::new(self), Box::new(other))
    }

    pub fn times(self, other: Expr) -> Self {
        Expr::Mul(Box::new(self), Box::new(other))
    }

    /// Evaluate with the attribute bound to `candidate` (`[lng, lat]`)
    pub fn evaluate(&self, candidate: Position) -> f64 {
        match self {
            Expr::Literal(v) => *v,
            Expr::X(_) => candidate[0],
            Expr::Y(_) => candidate[1],
            Expr::Radians(e) => e.evaluate(candidate).to_radians(),
            Expr::Degrees(e) => e.evaluate(candidate).to_degrees(),
            Expr::Sin(e) => e.evaluate(candidate).sin(),
            Expr::Cos(e) => e.evaluate(candidate).cos(),
            Expr::Acos(e) => e.evaluate(candidate).acos(),
            Expr::Least(a, b) => a.evaluate(candidate).min(b.evaluate(candidate)),
            Expr::Greatest(a, b) => a.evaluate(candidate).max(b.evaluate(candidate)),
            Expr::Add(a, b) => a.evaluate(candidate) + b.evaluate(candidate),
            Expr::Sub(a, b) => a.evaluate(candidate) - b.evaluate(candidate),
            Expr::Mul(a, b) => a.evaluate(candidate) * b.evaluate(candidate),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) => 2,
            _ => 3,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }

    fn fmt_binary(f: &mut fmt::Formatter<'_>, a: &Expr, op: &str, b: &Expr, prec: u8) -> fmt::Result {
        a.fmt_operand(f, prec)?;
        write!(f, " {} ", op)?;
        // Right operands of equal precedence need grouping for `-`
        b.fmt_operand(f, if op == "-" { prec + 1 } else { prec })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::X(attribute) => write!(f, "X({})", attribute),
            Expr::Y(attribute) => write!(f, "Y({})", attribute),
            Expr::Radians(e) => write!(f, "RADIANS({})", e),
            Expr::Degrees(e) => write!(f, "DEGREES({})", e),
            Expr::Sin(e) => write!(f, "SIN({})", e),
            Expr::Cos(e) => write!(f, "COS({})", e),
            Expr::Acos(e) => write!(f, "ACOS({})", e),
            Expr::Least(a, b) => write!(f, "LEAST({}, {})", a, b),
            Expr::Greatest(a, b) => write!(f, "GREATEST({}, {})", a, b),
            Expr::Add(a, b) => Expr::fmt_binary(f, a, "+", b, 1),
            Expr::Sub(a, b) => Expr::fmt_binary(f, a, "-", b, 1),
            Expr::Mul(a, b) => Expr::fmt_binary(f, a, "*", b, 2),
        }
    }
}

/// Great-circle distance in kilometers from a fixed origin to an attribute.
///
/// Spherical law of cosines, with the `ACOS` argument clamped to `[-1, 1]`
/// so a point compared with itself (or its antipode) stays in the domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceExpr {
    pub attribute: String,
    pub origin: Position,
    pub km_per_degree: f64,
    pub expr: Expr,
}

impl DistanceExpr {
    pub fn great_circle(attribute: impl Into<String>, origin: Position, km_per_degree: f64) -> Self {
        let attribute = attribute.into();
        let [lng, lat] = origin;

        let lat0 = Expr::literal(lat).radians();
        let lat1 = Expr::Y(attribute.clone()).radians();
        let delta_lng = Expr::X(attribute.clone()).radians().minus(Expr::literal(lng).radians());

        let cosines = lat0.clone().cos().times(lat1.clone().cos()).times(delta_lng.cos());
        let sines = lat0.sin().times(lat1.sin());
        let clamped = Expr::literal(1.0).least(Expr::literal(-1.0).greatest(cosines.plus(sines)));
        let expr = clamped.acos().degrees().times(Expr::literal(km_per_degree));

        Self { attribute, origin, km_per_degree, expr }
    }

    /// Distance in kilometers from the origin to `candidate`
    pub fn evaluate(&self, candidate: Position) -> f64 {
        self.expr.evaluate(candidate)
    }
}

impl fmt::Display for DistanceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}
