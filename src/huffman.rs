//! Huffman codec for snapshot payloads.
//!
//! The compressed blob is self-describing: a textual header carrying the
//! symbol frequency table and the pad-bit count, a `\n` terminator, then the
//! packed bitstream (high bit first within each byte). Decompression needs
//! nothing beyond the blob itself.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Write as _;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    #[error("malformed compressed header: {0}")]
    Header(&'static str),
    #[error("compressed body ends before the encoded data is complete")]
    TruncatedBody,
}

/// Huffman tree node, arena-indexed. The tree is never mutated after
/// construction; dropping the arena frees it.
enum Node {
    Leaf(u8),
    Internal(usize, usize),
}

/// Build the coding tree from `(symbol, frequency)` pairs, combining the two
/// lowest-frequency nodes until one remains. Ties are broken by insertion
/// order, so encode and decode agree as long as both build from the pairs in
/// the same order. Returns the arena and the root index (`None` for an empty
/// table).
fn build_tree(pairs: &[(u8, u64)]) -> (Vec<Node>, Option<usize>) {
    let mut arena: Vec<Node> = Vec::with_capacity(pairs.len().saturating_mul(2));
    let mut heap = BinaryHeap::new();
    for &(symbol, freq) in pairs {
        let idx = arena.len();
        arena.push(Node::Leaf(symbol));
        heap.push(Reverse((freq, idx)));
    }
    while let Some(Reverse((freq_a, a))) = heap.pop() {
        let Some(Reverse((freq_b, b))) = heap.pop() else {
            return (arena, Some(a));
        };
        let idx = arena.len();
        arena.push(Node::Internal(a, b));
        heap.push(Reverse((freq_a + freq_b, idx)));
    }
    (arena, None)
}

/// Walk the tree and record each leaf's bit path. Left edges are `0`, right
/// edges are `1`. A single-leaf tree assigns the empty code.
fn assign_codes(arena: &[Node], root: usize) -> Vec<Vec<u8>> {
    let mut codes: Vec<Vec<u8>> = vec![Vec::new(); 256];
    let mut stack = vec![(root, Vec::new())];
    while let Some((idx, prefix)) = stack.pop() {
        match arena[idx] {
            Node::Leaf(symbol) => codes[symbol as usize] = prefix,
            Node::Internal(left, right) => {
                let mut left_path = prefix.clone();
                left_path.push(0);
                let mut right_path = prefix;
                right_path.push(1);
                stack.push((left, left_path));
                stack.push((right, right_path));
            }
        }
    }
    codes
}

/// Compress `data` into a self-describing blob. Never fails; the empty
/// input produces the header `0 0` and no body.
pub fn compress(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return b"0 0\n".to_vec();
    }

    let mut frequencies = [0u64; 256];
    for &byte in data {
        frequencies[byte as usize] += 1;
    }
    // Ascending symbol order keeps compression deterministic across calls.
    let pairs: Vec<(u8, u64)> = (0u16..256)
        .filter(|&s| frequencies[s as usize] > 0)
        .map(|s| (s as u8, frequencies[s as usize]))
        .collect();

    let (arena, root) = build_tree(&pairs);
    let codes = match root {
        Some(root) => assign_codes(&arena, root),
        // Empty table: same blob as empty input.
        None => return b"0 0\n".to_vec(),
    };

    let mut body = Vec::new();
    let mut current = 0u8;
    let mut filled = 0u8;
    for &byte in data {
        for &bit in &codes[byte as usize] {
            current = (current << 1) | bit;
            filled += 1;
            if filled == 8 {
                body.push(current);
                current = 0;
                filled = 0;
            }
        }
    }
    // P = 8 marks a naturally byte-aligned bitstream (nothing to strip).
    let pad = if filled == 0 { 8 } else { 8 - filled };
    if filled > 0 {
        body.push(current << pad);
    }

    let mut header = String::new();
    let _ = write!(header, "{}", pairs.len());
    for (symbol, freq) in &pairs {
        let _ = write!(header, " {}:{}", symbol, freq);
    }
    let _ = write!(header, " {}", pad);
    header.push('\n');

    let mut blob = header.into_bytes();
    blob.extend_from_slice(&body);
    blob
}

/// Decompress a blob produced by [`compress`]. The frequency table in the
/// header is enough to rebuild a congruent tree and decode the bitstream.
pub fn decompress(blob: &[u8]) -> Result<Vec<u8>, HuffmanError> {
    let newline = blob
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(HuffmanError::Header("missing newline terminator"))?;
    let header = std::str::from_utf8(&blob[..newline])
        .map_err(|_| HuffmanError::Header("header is not valid text"))?;
    let body = &blob[newline + 1..];

    let mut tokens = header.split_whitespace();
    let unique: usize = tokens
        .next()
        .ok_or(HuffmanError::Header("missing symbol count"))?
        .parse()
        .map_err(|_| HuffmanError::Header("unreadable symbol count"))?;

    let mut pairs = Vec::with_capacity(unique);
    for _ in 0..unique {
        let token = tokens
            .next()
            .ok_or(HuffmanError::Header("fewer frequency pairs than declared"))?;
        let (symbol, freq) = token
            .split_once(':')
            .ok_or(HuffmanError::Header("frequency pair without separator"))?;
        let symbol: u8 = symbol
            .parse()
            .map_err(|_| HuffmanError::Header("symbol out of range"))?;
        let freq: u64 = freq
            .parse()
            .map_err(|_| HuffmanError::Header("unreadable frequency"))?;
        if freq == 0 {
            return Err(HuffmanError::Header("zero frequency"));
        }
        pairs.push((symbol, freq));
    }

    let pad: u8 = tokens
        .next()
        .ok_or(HuffmanError::Header("missing pad count"))?
        .parse()
        .map_err(|_| HuffmanError::Header("unreadable pad count"))?;
    if pad > 8 {
        return Err(HuffmanError::Header("pad count out of range"));
    }
    if tokens.next().is_some() {
        return Err(HuffmanError::Header("trailing tokens"));
    }

    if unique == 0 {
        return Ok(Vec::new());
    }
    let total: usize = pairs.iter().map(|&(_, f)| f as usize).sum();
    if unique == 1 {
        // One leaf, empty code: the header alone describes the content.
        return Ok(vec![pairs[0].0; total]);
    }

    let (arena, root) = build_tree(&pairs);
    let Some(root) = root else {
        return Err(HuffmanError::Header("empty frequency table"));
    };

    // 0 and 8 both mean the bitstream was already byte-aligned.
    let strip = if pad == 8 { 0 } else { pad as usize };
    let bit_count = body
        .len()
        .checked_mul(8)
        .and_then(|n| n.checked_sub(strip))
        .ok_or(HuffmanError::TruncatedBody)?;

    let mut out = Vec::with_capacity(total);
    let mut node = root;
    for bit_index in 0..bit_count {
        let bit = (body[bit_index >> 3] >> (7 - (bit_index & 7))) & 1;
        // The walk only ever stands on internal nodes: leaves reset it to
        // the root below, and with two or more symbols the root is internal.
        node = match arena[node] {
            Node::Internal(left, right) => {
                if bit == 0 {
                    left
                } else {
                    right
                }
            }
            Node::Leaf(_) => unreachable!(),
        };
        if let Node::Leaf(symbol) = arena[node] {
            out.push(symbol);
            if out.len() == total {
                break;
            }
            node = root;
        }
    }

    if out.len() < total {
        return Err(HuffmanError::TruncatedBody);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "huffman_test.rs"]
mod tests;
