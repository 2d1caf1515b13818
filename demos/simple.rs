//! Placeholders, padding, escapes and diagnostics.
//!
//! Run with: cargo run --example simple

use std::error::Error;
use std::ffi::CStr;
use tagfmt::{fmt_alloc, fmt_print, fmt_show, fmt_sn};

fn main() -> Result<(), Box<dyn Error>> {
    let c = 'x';
    fmt_print!("hello {} {}\n", 123, "hi")?;
    fmt_print!("hello {} {:c}\n", c, c)?;
    fmt_print!("hello {:05} 0x{:05x}\n", 123, 0xa66e)?;
    fmt_print!("no arguments\n")?;
    fmt_print!("positional arguments: {1:c}{0:c}{2:c}{2:c}{3:c}\n", b'e', b'h', b'l', b'o')?;

    let text = "abc";
    fmt_print!("pointers: {:p} {:p} {:p}\n", text, std::ptr::null::<u8>(), &c as *const char)?;
    fmt_print!("space-padded pointer: {:16p}\n", text)?;
    fmt_print!(" zero-padded pointer: {:016p}\n", text)?;

    // Diagnostics are rendered inline; formatting carries on.
    fmt_print!("extraneous {} {1}\n")?;
    fmt_print!("bad format string {{ blah {5 blah }}\n")?;

    fmt_print!("several arguments: {} {} {} {} {} {} {} {} {}\n", 1, 2, 3, 4, 5, 6, 7, 8, 9)?;
    fmt_print!("indexed arguments: {8} {7} {6} {5} {4} {3} {2} {1} {0}\n", 1, 2, 3, 4, 5, 6, 7, 8, 9)?;
    fmt_print!("escaping: {{ }}\n")?;
    fmt_print!("bools: {:5} {:5}\n", false, true)?;
    fmt_print!("INT64_MIN: {}\n", i64::MIN)?;
    fmt_print!("binary: {:b} {:016b}\n", 10u8, -1i8)?;
    fmt_show!(u32::MAX)?;

    let args: Vec<String> = std::env::args().collect();
    fmt_print!("{} command-line argument{}:\n", args.len(), if args.len() == 1 { "" } else { "s" })?;
    for (i, arg) in args.iter().enumerate() {
        fmt_print!("  argv[{:-3}] = {}\n", i, arg)?;
    }

    let mut buf = [0u8; 5];
    for (format, arg) in [("abcd", ""), ("abcde", ""), ("{}", "fghi"), ("{}", "fghij")] {
        let total = fmt_sn!(&mut buf, format, arg);
        let shown = CStr::from_bytes_until_nul(&buf)?.to_str()?;
        fmt_print!("{:-8} -> {} {}\n", format, total, shown)?;
    }
    fmt_print!("length: {}\n", fmt_sn!(&mut [], "{} {}", 123, "hello"))?;

    let bytes = fmt_alloc!("{} {}", "some memory", 123)?;
    let allocated = CStr::from_bytes_until_nul(&bytes)?.to_str()?;
    fmt_print!("allocated: {}\n", allocated)?;

    Ok(())
}
