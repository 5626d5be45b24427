//! By-value keys for RDF terms.
//!
//! Two terms denote the same value when their [`ValueKey`]s are equal. IRIs
//! and blank nodes are their own value. Literals are mapped into value
//! spaces: every integer-derived datatype shares one integer space (so
//! `"1"^^xsd:integer` and `"01"^^xsd:int` coincide), decimals with no
//! fractional part fall into that space too, booleans accept both lexical
//! forms, and language tags compare case-insensitively. Literals that are
//! ill-typed or of an unknown datatype only equal an identical literal.

use oxigraph::model::{Literal, Term};

use crate::consts::{INTEGER_TYPES, XSD_BOOLEAN, XSD_DECIMAL, XSD_DOUBLE, XSD_FLOAT, XSD_STRING};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Iri(String),
    Blank(String),
    Integer(i128),
    /// Canonical decimal with a non-zero fraction.
    Decimal(String),
    Boolean(bool),
    Float(u32),
    Double(u64),
    String(String),
    LangString { lex: String, lang: String },
    Typed { datatype: String, lex: String },
}

impl ValueKey {
    pub fn of(term: &Term) -> ValueKey {
        match term {
            Term::NamedNode(n) => ValueKey::Iri(n.as_str().to_owned()),
            Term::BlankNode(b) => ValueKey::Blank(b.as_str().to_owned()),
            Term::Literal(l) => literal_key(l),
            #[allow(unreachable_patterns)]
            other => ValueKey::Typed {
                datatype: String::new(),
                lex: other.to_string(),
            },
        }
    }
}

fn literal_key(l: &Literal) -> ValueKey {
    if let Some(lang) = l.language() {
        return ValueKey::LangString {
            lex: l.value().to_owned(),
            lang: lang.to_ascii_lowercase(),
        };
    }
    let dt = l.datatype();
    let lex = l.value();
    if dt == XSD_STRING {
        return ValueKey::String(lex.to_owned());
    }
    let typed = || ValueKey::Typed {
        datatype: dt.as_str().to_owned(),
        lex: lex.to_owned(),
    };
    if let Some((_, lo, hi)) = INTEGER_TYPES.iter().find(|(t, _, _)| *t == dt) {
        return match parse_integer(lex.trim()) {
            Some(v) if v >= *lo && v <= *hi => ValueKey::Integer(v),
            _ => typed(),
        };
    }
    if dt == XSD_DECIMAL {
        return parse_decimal(lex.trim()).unwrap_or_else(typed);
    }
    if dt == XSD_BOOLEAN {
        return match lex.trim() {
            "true" | "1" => ValueKey::Boolean(true),
            "false" | "0" => ValueKey::Boolean(false),
            _ => typed(),
        };
    }
    if dt == XSD_FLOAT {
        return match parse_float(lex.trim()).map(|v| v as f32) {
            Some(v) => ValueKey::Float(if v == 0.0 { 0 } else { v.to_bits() }),
            None => typed(),
        };
    }
    if dt == XSD_DOUBLE {
        return match parse_float(lex.trim()) {
            Some(v) => ValueKey::Double(if v == 0.0 { 0 } else { v.to_bits() }),
            None => typed(),
        };
    }
    typed()
}

fn parse_integer(lex: &str) -> Option<i128> {
    let digits = lex.strip_prefix(['+', '-']).unwrap_or(lex);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // i128 parsing accepts a leading '+' on its own
    lex.parse().ok()
}

fn parse_decimal(lex: &str) -> Option<ValueKey> {
    let (negative, body) = match lex.as_bytes().first() {
        Some(b'-') => (true, &lex[1..]),
        Some(b'+') => (false, &lex[1..]),
        _ => (false, lex),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        let magnitude: i128 = if int_part.is_empty() { 0 } else { int_part.parse().ok()? };
        return Some(ValueKey::Integer(if negative { -magnitude } else { magnitude }));
    }
    let sign = if negative { "-" } else { "" };
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    Some(ValueKey::Decimal(format!("{}{}.{}", sign, int_part, frac_part)))
}

fn parse_float(lex: &str) -> Option<f64> {
    match lex {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        // Rust also accepts "inf" and "nan", which XSD does not
        s if s.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => None,
        s => s.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::XSD;
    use oxigraph::model::NamedNode;

    fn typed(lex: &str, local: &str) -> Term {
        Literal::new_typed_literal(lex, NamedNode::new_unchecked(format!("{}{}", XSD, local))).into()
    }

    #[test]
    fn integer_family_shares_value_space() {
        let one = ValueKey::of(&typed("1", "integer"));
        assert_eq!(one, ValueKey::of(&typed("01", "int")));
        assert_eq!(one, ValueKey::of(&typed("+1", "byte")));
        assert_eq!(one, ValueKey::of(&typed("1.0", "decimal")));
        assert_eq!(ValueKey::of(&typed("42", "short")), ValueKey::of(&typed("42", "long")));
        assert_ne!(one, ValueKey::of(&typed("2", "integer")));
    }

    #[test]
    fn out_of_range_is_ill_typed() {
        let k = ValueKey::of(&typed("300", "byte"));
        assert!(matches!(k, ValueKey::Typed { .. }));
        assert_ne!(k, ValueKey::of(&typed("300", "integer")));
        assert!(matches!(
            ValueKey::of(&typed("-1", "unsignedInt")),
            ValueKey::Typed { .. }
        ));
    }

    #[test]
    fn strings_and_language_tags() {
        let plain: Term = Literal::new_simple_literal("123").into();
        assert_eq!(ValueKey::of(&plain), ValueKey::of(&typed("123", "string")));
        assert_ne!(ValueKey::of(&plain), ValueKey::of(&typed("123", "integer")));

        let en = Literal::new_language_tagged_literal_unchecked("chat", "en");
        let en_gb = Literal::new_language_tagged_literal_unchecked("chat", "EN");
        assert_eq!(ValueKey::of(&en.into()), ValueKey::of(&en_gb.into()));
        let fr = Literal::new_language_tagged_literal_unchecked("chat", "fr");
        assert_ne!(ValueKey::of(&fr.into()), ValueKey::of(&plain));
    }

    #[test]
    fn decimals_booleans_floats() {
        assert_eq!(
            ValueKey::of(&typed("1.50", "decimal")),
            ValueKey::of(&typed("01.5", "decimal"))
        );
        assert_eq!(
            ValueKey::of(&typed("-.5", "decimal")),
            ValueKey::Decimal("-0.5".into())
        );
        assert_eq!(
            ValueKey::of(&typed("1", "boolean")),
            ValueKey::of(&typed("true", "boolean"))
        );
        assert_eq!(
            ValueKey::of(&typed("1.0", "double")),
            ValueKey::of(&typed("1e0", "double"))
        );
        assert_ne!(
            ValueKey::of(&typed("1.0", "double")),
            ValueKey::of(&typed("1.0", "float"))
        );
        assert!(matches!(
            ValueKey::of(&typed("inf", "double")),
            ValueKey::Typed { .. }
        ));
    }
}
