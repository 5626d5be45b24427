//! Defines constant NamedNodeRefs for the XML Schema datatypes that take part
//! in by-value literal comparison, grouped by value space.

use oxigraph::model::NamedNodeRef;

pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";

pub const XSD_STRING: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#string");
pub const XSD_BOOLEAN: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#boolean");
pub const XSD_DECIMAL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#decimal");
pub const XSD_FLOAT: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#float");
pub const XSD_DOUBLE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#double");
pub const XSD_INTEGER: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#integer");
pub const RDF_LANG_STRING: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#langString");

/// Integer-derived datatypes with their inclusive value bounds. All of them
/// share the `xsd:integer` value space.
pub const INTEGER_TYPES: [(NamedNodeRef<'_>, i128, i128); 13] = [
    (XSD_INTEGER, i128::MIN, i128::MAX),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#long"),
        i64::MIN as i128,
        i64::MAX as i128,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#int"),
        i32::MIN as i128,
        i32::MAX as i128,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#short"),
        i16::MIN as i128,
        i16::MAX as i128,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#byte"),
        i8::MIN as i128,
        i8::MAX as i128,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#nonNegativeInteger"),
        0,
        i128::MAX,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#positiveInteger"),
        1,
        i128::MAX,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#nonPositiveInteger"),
        i128::MIN,
        0,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#negativeInteger"),
        i128::MIN,
        -1,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#unsignedLong"),
        0,
        u64::MAX as i128,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#unsignedInt"),
        0,
        u32::MAX as i128,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#unsignedShort"),
        0,
        u16::MAX as i128,
    ),
    (
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#unsignedByte"),
        0,
        u8::MAX as i128,
    ),
];

/// Prefixes understood by the compact triple notation.
pub const KNOWN_PREFIXES: [(&str, &str); 5] = [
    ("xsd", XSD),
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("owl", OWL),
    ("eh", "eh:/"),
];
