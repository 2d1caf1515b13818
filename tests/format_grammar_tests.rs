//! Placeholder grammar, escapes and inline diagnostics, exercised through the
//! public entrypoints.

use tagfmt::{args, format_to_string, format_to_vec, ArgList};

fn fmt(format: &str, args: ArgList<'_>) -> String {
    format_to_string(format, args).unwrap()
}

#[test]
fn test_literal_text_passes_through() {
    assert_eq!(fmt("no arguments", args![]), "no arguments");
    assert_eq!(fmt("", args![]), "");
    assert_eq!(fmt("naïve café", args![]), "naïve café");
}

#[test]
fn test_escaped_braces() {
    assert_eq!(fmt("escaping: {{ }}", args![]), "escaping: { }");
    assert_eq!(fmt("a{{b", args![]), "a{b");
    assert_eq!(fmt("{{}}", args![]), "{}");
    assert_eq!(fmt("{{{}}}", args![5]), "{5}");
    assert_eq!(fmt("}", args![]), "}");
    assert_eq!(fmt("a}b}}c", args![]), "a}b}c");
}

#[test]
fn test_auto_index_advances_per_placeholder() {
    assert_eq!(fmt("{} {} {}", args![1, 2, 3]), "1 2 3");
    assert_eq!(fmt("{} {}", args![1]), "1 {invalid arg index}");
}

#[test]
fn test_explicit_index_does_not_consume() {
    assert_eq!(fmt("{1} {} {}", args!["a", "b"]), "b a b");
    assert_eq!(fmt("{0}{0}{0}", args!['z']), "zzz");
}

#[test]
fn test_positional_reuse() {
    assert_eq!(fmt("{1}{0}{1}", args!["A", "B"]), "BAB");
}

#[test]
fn test_out_of_range_index_continues() {
    assert_eq!(fmt("{5} and {}", args![1, 2]), "{invalid arg index} and 1");
    assert_eq!(
        fmt("{8} {9} {}", args![0, 1, 2, 3, 4, 5, 6, 7, 8]),
        "8 {invalid fmt} 0"
    );
}

#[test]
fn test_malformed_placeholders() {
    assert_eq!(fmt("{:q}", args![1]), "{invalid fmt}");
    assert_eq!(fmt("{:X}", args![1]), "{invalid fmt}");
    assert_eq!(fmt("{ab}", args![1]), "{invalid fmt}");
    assert_eq!(fmt("{12}", args![1]), "{invalid fmt}");
    assert_eq!(fmt("{:123}", args![1]), "{invalid fmt}");
    assert_eq!(fmt("{:xx}", args![1]), "{invalid fmt}");
}

#[test]
fn test_malformed_resumes_after_close() {
    assert_eq!(fmt("[{:q}] {}", args![7]), "[{invalid fmt}] 7");
    assert_eq!(
        fmt("bad format string {{ blah {5 blah }}", args![]),
        "bad format string { blah {invalid fmt}}"
    );
}

#[test]
fn test_unterminated_placeholder_consumes_rest() {
    assert_eq!(fmt("abc{", args![]), "abc{invalid fmt}");
    assert_eq!(fmt("bad { blah", args![]), "bad {invalid fmt}");
    assert_eq!(fmt("x{|never closed", args![1]), "x{invalid fmt}");
}

#[test]
fn test_malformed_does_not_advance_auto_index() {
    assert_eq!(fmt("{:q} {} {}", args![1, 2]), "{invalid fmt} 1 2");
}

#[test]
fn test_flags_without_width() {
    assert_eq!(fmt("{:-}|{:0}|{:-0}", args![1, 2, 3]), "1|2|3");
}

#[test]
fn test_width_counts_bytes() {
    assert_eq!(fmt("[{:4}]", args!["é"]), "[  é]");
    assert_eq!(fmt("[{:-4}]", args!['é']), "[é  ]");
}

#[test]
fn test_width_smaller_than_text() {
    assert_eq!(fmt("{:2}", args![12345]), "12345");
    assert_eq!(fmt("{:02x}", args![0xabcdu16]), "abcd");
}

#[test]
fn test_combined_spec() {
    assert_eq!(fmt("{0:08b}", args![5u8]), "00000101");
    assert_eq!(fmt("{1:-06x}|", args![0, 255]), "ff0000|");
    assert_eq!(fmt("{:99}", args![""]).len(), 99);
}

#[test]
fn test_payload_ignored_by_builtin_types() {
    assert_eq!(fmt("{|anything goes}", args![5]), "5");
    assert_eq!(fmt("{:4|%H}", args!["ab"]), "  ab");
    assert_eq!(fmt("{|}", args![true]), "true");
}

#[test]
fn test_byte_format_strings() {
    let bytes = format_to_vec(b"\xff{}\xfe", args![1]).unwrap();
    assert_eq!(bytes, b"\xff1\xfe\0");

    let owned = String::from("{} owned");
    assert_eq!(format_to_string(&owned, args!["an"]).unwrap(), "an owned");
}

#[test]
fn test_diagnostics_ignore_width() {
    assert_eq!(fmt("[{4:30}]", args![]), "[{invalid arg index}]");
}
