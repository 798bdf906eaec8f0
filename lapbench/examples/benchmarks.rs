//! Lapbench example benchmarks
//!
//! Demonstrates the suite registration API and serves as a template for
//! your own benchmark binary.
//!
//! Run with:
//!   cargo run --example benchmarks                     # Run all suites
//!   cargo run --example benchmarks -- list             # List suites
//!   cargo run --example benchmarks -- encoding         # Prefix-matched
//!   cargo run --example benchmarks -- --timeout 100ms  # Tighter budget
//!   cargo run --example benchmarks -- --test encode    # Filter tests

use lapbench::prelude::*;

// ============================================================================
// Sample payload: a small base64 codec
// ============================================================================

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let b = [
            chunk[0],
            chunk.get(1).copied().unwrap_or(0),
            chunk.get(2).copied().unwrap_or(0),
        ];
        let n = u32::from(b[0]) << 16 | u32::from(b[1]) << 8 | u32::from(b[2]);
        out.push(BASE64_ALPHABET[(n >> 18) as usize & 63] as char);
        out.push(BASE64_ALPHABET[(n >> 12) as usize & 63] as char);
        out.push(if chunk.len() > 1 {
            BASE64_ALPHABET[(n >> 6) as usize & 63] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            BASE64_ALPHABET[n as usize & 63] as char
        } else {
            '='
        });
    }
    out
}

fn hex_encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    for byte in input {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

// ============================================================================
// Encoding suite: shares one prepared corpus across its tests
// ============================================================================

fn define_encoding(ctx: &mut SuiteContext) {
    let corpus = ctx.prepare(|| {
        (0u32..64 * 1024)
            .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
            .collect::<Vec<u8>>()
    });

    corpus.test("base64_encode_64k", |data| {
        black_box(base64_encode(data));
    });

    corpus.test("hex_encode_64k", |data| {
        black_box(hex_encode(data));
    });
}

inventory::submit! {
    SuiteDef {
        name: "encoding",
        description: Some("byte-to-text codecs over a shared 64 KiB corpus"),
        timeout_ms: None,
        define: define_encoding,
    }
}

// ============================================================================
// String suite: immediate tests, no shared setup
// ============================================================================

fn define_strings(ctx: &mut SuiteContext) {
    ctx.test("concat_100", || {
        let mut s = String::new();
        for i in 0..100 {
            s.push_str(&i.to_string());
        }
        black_box(s);
    });

    ctx.test("parse_ints", || {
        let sum: i64 = ("0 1 2 3 4 5 6 7 8 9 ".repeat(10))
            .split_whitespace()
            .filter_map(|s| s.parse::<i64>().ok())
            .sum();
        black_box(sum);
    });
}

inventory::submit! {
    SuiteDef {
        name: "strings",
        description: Some("string building and parsing"),
        timeout_ms: Some(250),
        define: define_strings,
    }
}

// ============================================================================
// Collections suite: hooks and an async body
// ============================================================================

fn define_collections(ctx: &mut SuiteContext) {
    ctx.test("btreemap_insert_1k", || {
        let mut map = std::collections::BTreeMap::new();
        for i in 0..1000 {
            map.insert(i, i * 2);
        }
        black_box(map);
    });

    ctx.test_async("channel_round_trip", || async {
        let (tx, rx) = tokio::sync::oneshot::channel::<u64>();
        tx.send(42).ok();
        black_box(rx.await.unwrap_or(0));
    });
}

inventory::submit! {
    SuiteDef {
        name: "collections",
        description: None,
        timeout_ms: None,
        define: define_collections,
    }
}

// ============================================================================
// Main entry point: the lapbench CLI discovers the suites above
// ============================================================================

fn main() {
    if let Err(e) = lapbench::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
