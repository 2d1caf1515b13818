//! Property-based tests for the formatting state machine.
//!
//! Integer rendering is checked byte-for-byte against `num-bigint`; the
//! chunked, bounded and measure-then-allocate paths are checked against each
//! other over generated format strings.

use num_bigint::{BigInt, BigUint};
use proptest::prelude::*;
use tagfmt::{
    args, format_bounded, format_to_string, format_to_vec, format_to_vec_with_options,
    ArgList, FormatOptions, FormatState, NoCustomTypes,
};

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,6}",
        Just("{{".to_string()),
        Just("}}".to_string()),
        Just("{}".to_string()),
        Just("{:q}".to_string()),
        (0usize..6).prop_map(|i| format!("{{{}}}", i)),
        (
            0usize..5,
            any::<bool>(),
            any::<bool>(),
            0usize..20,
            prop::sample::select(vec!["", "x", "b", "c", "p"]),
        )
            .prop_map(|(index, right, zero, width, mode)| {
                format!(
                    "{{{}:{}{}{}{}}}",
                    index,
                    if right { "-" } else { "" },
                    if zero { "0" } else { "" },
                    width,
                    mode
                )
            }),
    ]
}

fn format_string() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 0..12).prop_map(|segments| segments.concat())
}

fn render_full(format: &str, args: ArgList<'_>) -> Vec<u8> {
    let options = FormatOptions::new().with_terminator(false);
    format_to_vec_with_options(format, args, &options, &NoCustomTypes).unwrap()
}

fn drain(state: &mut FormatState<'_>, sizes: &[usize]) -> Vec<u8> {
    let mut out = Vec::new();
    for size in sizes.iter().cycle() {
        let mut buf = vec![0u8; *size];
        match state.produce_chunk(Some(&mut buf[..])) {
            Some(n) => out.extend_from_slice(&buf[..n]),
            None => break,
        }
    }
    out
}

proptest! {
    #[test]
    fn prop_signed_decimal_matches_bigint(n in any::<i64>()) {
        let text = format_to_string("{}", args![n]).unwrap();
        prop_assert_eq!(text, BigInt::from(n).to_str_radix(10));
    }

    #[test]
    fn prop_unsigned_radixes_match_biguint(n in any::<u64>()) {
        let text = format_to_string("{} {:x} {:b}", args![n, n, n]).unwrap();
        let big = BigUint::from(n);
        let expected = format!(
            "{} {} {}",
            big.to_str_radix(10),
            big.to_str_radix(16),
            big.to_str_radix(2)
        );
        prop_assert_eq!(text, expected);
    }

    #[test]
    fn prop_narrow_integers(a in any::<i8>(), b in any::<i16>(), c in any::<i32>(), d in any::<u8>(), e in any::<u16>(), f in any::<u32>()) {
        let text = format_to_string("{} {} {} {} {} {}", args![a, b, c, d, e, f]).unwrap();
        let expected = [
            BigInt::from(a), BigInt::from(b), BigInt::from(c),
            BigInt::from(d), BigInt::from(e), BigInt::from(f),
        ]
        .iter()
        .map(|v| v.to_str_radix(10))
        .collect::<Vec<_>>()
        .join(" ");
        prop_assert_eq!(text, expected);
    }

    #[test]
    fn prop_negative_hex_is_sign_extended(a in any::<i8>(), b in any::<i32>()) {
        let text = format_to_string("{:x} {:b}", args![a, b]).unwrap();
        let expected = format!(
            "{} {}",
            BigUint::from(a as u64).to_str_radix(16),
            BigUint::from(b as u64).to_str_radix(2)
        );
        prop_assert_eq!(text, expected);
    }

    #[test]
    fn prop_padding_width(text in "[a-z]{0,10}", width in 0usize..100, right in any::<bool>(), zero in any::<bool>()) {
        let format = format!(
            "{{:{}{}{}}}",
            if right { "-" } else { "" },
            if zero { "0" } else { "" },
            width
        );
        let out = format_to_string(&format, args![text]).unwrap();
        let pad = if zero { '0' } else { ' ' };
        prop_assert_eq!(out.len(), width.max(text.len()));
        let padding = if right {
            out.strip_prefix(text.as_str())
        } else {
            out.strip_suffix(text.as_str())
        };
        prop_assert!(padding.is_some());
        prop_assert!(padding.unwrap_or_default().chars().all(|ch| ch == pad));
    }

    #[test]
    fn prop_escaped_braces(text in "[a-z ]{0,20}") {
        let format = format!("{{{{{}}}}}", text);
        prop_assert_eq!(format_to_string(&format, args![]).unwrap(), format!("{{{}}}", text));
    }

    #[test]
    fn prop_chunked_equivalence(
        format in format_string(),
        a in any::<i32>(),
        b in any::<u64>(),
        s in "[a-z]{0,12}",
        flag in any::<bool>(),
        c in any::<char>(),
        sizes in prop::collection::vec(1usize..17, 1..8),
    ) {
        let full = render_full(&format, args![a, b, s, flag, c]);
        let mut state = FormatState::new(&format, args![a, b, s, flag, c]);
        prop_assert_eq!(drain(&mut state, &sizes), full);
    }

    #[test]
    fn prop_measure_matches_allocate(
        format in format_string(),
        a in any::<i64>(),
        s in "[a-z]{0,12}",
        c in any::<char>(),
    ) {
        let mut state = FormatState::new(&format, args![a, s, c, a, s]);
        let measured = state.produce_chunk(None).unwrap_or(0);
        let allocated = format_to_vec(&format, args![a, s, c, a, s]).unwrap();
        prop_assert_eq!(allocated.len(), measured + 1);
        prop_assert_eq!(allocated.last(), Some(&0u8));
    }

    #[test]
    fn prop_reset_is_idempotent(
        format in format_string(),
        a in any::<u16>(),
        s in "[a-z]{0,12}",
        first in 1usize..9,
        second in 1usize..9,
    ) {
        let mut state = FormatState::new(&format, args![a, s, a, s, a]);
        let once = drain(&mut state, &[first]);
        state.reset();
        let twice = drain(&mut state, &[second]);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_bounded_fill_is_terminated_prefix(
        format in format_string(),
        a in any::<i16>(),
        s in "[a-z]{0,12}",
        capacity in 0usize..48,
    ) {
        let full = render_full(&format, args![a, s, 'x', true, a]);
        let mut buf = vec![0xaau8; capacity];
        let total = format_bounded(&mut buf, &format, args![a, s, 'x', true, a]);
        prop_assert_eq!(total, full.len());
        if capacity > 0 {
            let kept = (capacity - 1).min(full.len());
            prop_assert_eq!(&buf[..kept], &full[..kept]);
            prop_assert_eq!(buf[kept], 0);
        }
    }
}
