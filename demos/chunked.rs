//! Driving the format state machine by hand.
//!
//! Output is pulled through a deliberately tiny window to show that
//! placeholders, padding and escapes resume cleanly across chunks.
//!
//! Run with: cargo run --example chunked

use std::error::Error;
use tagfmt::{args, Action, FormatState};

fn main() -> Result<(), Box<dyn Error>> {
    let user = String::from("alice");
    let mut state = FormatState::new(
        "{{user}} = [{:-8}] id={:06} mask=0x{:08x}",
        args![user, 42u32, 0xbeefu32],
    );

    let total = state.produce_chunk(None).unwrap_or(0);
    println!("measured {total} bytes");
    state.reset();

    let mut window = [0u8; 5];
    let mut collected = Vec::with_capacity(total);
    while let Some(n) = state.produce_chunk(Some(&mut window[..])) {
        let phase = match state.action() {
            Action::Parsing => "parsing",
            Action::Formatting => "formatting",
            Action::Done => "done",
        };
        println!("chunk {:>2} bytes {:<12} {:?}", n, phase, String::from_utf8_lossy(&window[..n]));
        collected.extend_from_slice(&window[..n]);
    }

    assert_eq!(collected.len(), total);
    println!("{}", std::str::from_utf8(&collected)?);
    Ok(())
}
