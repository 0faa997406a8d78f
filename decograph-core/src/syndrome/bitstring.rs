//! Packed bit sequences.
//!
//! Bits are stored in little-endian `u64` words, bit `i` at word `i / 64`,
//! position `i % 64`, matching the dense syndrome layout decoders consume.
//!
//! - [`Bitstring`] has value semantics over its set bits only: trailing zeros
//!   are insignificant, so `0b0101` and `0b00101` compare equal.
//! - [`FixedWidthBitstring`] carries an explicit width. Every binary operation
//!   rejects operands of differing widths, and equality includes the width.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor};

use crate::error::SyndromeError;

const WORD_BITS: usize = 64;

/// A growable bit set with value-based equality and hashing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitstring {
    // Invariant: no trailing zero word.
    words: Vec<u64>,
}

impl Bitstring {
    /// Creates an empty bitstring.
    #[must_use]
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Creates a bitstring from packed little-endian words.
    #[must_use]
    pub fn from_words(words: Vec<u64>) -> Self {
        let mut bits = Self { words };
        bits.normalize();
        bits
    }

    /// Creates a bitstring with the given bits set.
    ///
    /// Indices listed twice cancel, as repeated detector flips do.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut bits = Self::new();
        for i in indices {
            bits.toggle(i);
        }
        bits
    }

    /// Creates a bitstring from booleans, index 0 first.
    #[must_use]
    pub fn from_bools(bools: &[bool]) -> Self {
        Self::from_indices(
            bools
                .iter()
                .enumerate()
                .filter_map(|(i, &b)| b.then_some(i)),
        )
    }

    /// Packed words, with no trailing zero word.
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Returns bit `i`. Bits past the end read as zero.
    #[must_use]
    pub fn get(&self, i: usize) -> bool {
        self.words
            .get(i / WORD_BITS)
            .is_some_and(|w| (w >> (i % WORD_BITS)) & 1 == 1)
    }

    /// Sets bit `i` to `value`.
    pub fn set(&mut self, i: usize, value: bool) {
        if self.get(i) != value {
            self.toggle(i);
        }
    }

    /// Flips bit `i`.
    pub fn toggle(&mut self, i: usize) {
        let word = i / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] ^= 1u64 << (i % WORD_BITS);
        self.normalize();
    }

    /// Number of bits up to and including the highest set bit.
    #[must_use]
    pub fn bit_length(&self) -> usize {
        match self.words.last() {
            Some(&last) => {
                (self.words.len() - 1) * WORD_BITS + (WORD_BITS - last.leading_zeros() as usize)
            }
            None => 0,
        }
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if no bit is set.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.words.is_empty()
    }

    /// Indices of set bits in increasing order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            let mut w = word;
            core::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let b = w.trailing_zeros() as usize;
                w &= w - 1;
                Some(wi * WORD_BITS + b)
            })
        })
    }

    fn zip_words(&self, other: &Self, f: impl Fn(u64, u64) -> u64) -> Self {
        let len = self.words.len().max(other.words.len());
        let words = (0..len)
            .map(|i| {
                f(
                    self.words.get(i).copied().unwrap_or(0),
                    other.words.get(i).copied().unwrap_or(0),
                )
            })
            .collect();
        Self::from_words(words)
    }

    fn normalize(&mut self) {
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }
}

impl BitXor for &Bitstring {
    type Output = Bitstring;

    fn bitxor(self, rhs: Self) -> Bitstring {
        self.zip_words(rhs, |a, b| a ^ b)
    }
}

impl BitAnd for &Bitstring {
    type Output = Bitstring;

    fn bitand(self, rhs: Self) -> Bitstring {
        self.zip_words(rhs, |a, b| a & b)
    }
}

impl BitOr for &Bitstring {
    type Output = Bitstring;

    fn bitor(self, rhs: Self) -> Bitstring {
        self.zip_words(rhs, |a, b| a | b)
    }
}

/// A bit sequence whose width is fixed at construction.
///
/// # Text and byte formats
///
/// - `'0'`/`'1'` text puts bit 0 first: `"0110"` has bits 1 and 2 set.
/// - Packed bytes put bit `i` in byte `i / 8` at position `i % 8` (LSB
///   first), the layout of Stim's `b8` format. Padding bits in the final
///   byte are ignored on input and written as zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FixedWidthBitstring {
    width: usize,
    bits: Bitstring,
}

impl FixedWidthBitstring {
    /// Creates an all-zero bitstring of `width` bits.
    #[must_use]
    pub const fn zeros(width: usize) -> Self {
        Self {
            width,
            bits: Bitstring::new(),
        }
    }

    /// Wraps `bits` with an explicit width.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::IndexOutOfRange`] if a bit at or past `width` is set.
    pub fn from_bitstring(bits: Bitstring, width: usize) -> Result<Self, SyndromeError> {
        let len = bits.bit_length();
        if len > width {
            return Err(SyndromeError::IndexOutOfRange {
                index: len - 1,
                width,
            });
        }
        Ok(Self { width, bits })
    }

    /// Creates a bitstring of `bools.len()` bits.
    #[must_use]
    pub fn from_bools(bools: &[bool]) -> Self {
        Self {
            width: bools.len(),
            bits: Bitstring::from_bools(bools),
        }
    }

    /// Creates a bitstring of `width` bits with the given bits set.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::IndexOutOfRange`] if an index is at or past `width`.
    pub fn from_indices<I: IntoIterator<Item = usize>>(
        indices: I,
        width: usize,
    ) -> Result<Self, SyndromeError> {
        let mut bits = Bitstring::new();
        for index in indices {
            if index >= width {
                return Err(SyndromeError::IndexOutOfRange { index, width });
            }
            bits.toggle(index);
        }
        Ok(Self { width, bits })
    }

    /// Parses `'0'`/`'1'` text, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::InvalidCharacter`] on any other character.
    pub fn from_01_str(text: &str) -> Result<Self, SyndromeError> {
        let text = text.trim();
        let mut bits = Bitstring::new();
        for (i, c) in text.chars().enumerate() {
            match c {
                '0' => {}
                '1' => bits.toggle(i),
                other => return Err(SyndromeError::InvalidCharacter(other)),
            }
        }
        Ok(Self {
            width: text.chars().count(),
            bits,
        })
    }

    /// Unpacks `width` bits from LSB-first packed bytes.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::ByteLength`] unless `bytes.len() == width.div_ceil(8)`.
    pub fn from_bytes(bytes: &[u8], width: usize) -> Result<Self, SyndromeError> {
        if bytes.len() != width.div_ceil(8) {
            return Err(SyndromeError::ByteLength {
                bytes: bytes.len(),
                width,
            });
        }
        let mut words = vec![0u64; width.div_ceil(WORD_BITS)];
        for (i, &byte) in bytes.iter().enumerate() {
            words[i / 8] |= u64::from(byte) << ((i % 8) * 8);
        }
        if width % WORD_BITS != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << (width % WORD_BITS)) - 1;
            }
        }
        Ok(Self {
            width,
            bits: Bitstring::from_words(words),
        })
    }

    /// Number of bits.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The underlying width-free bitstring.
    #[must_use]
    pub const fn as_bitstring(&self) -> &Bitstring {
        &self.bits
    }

    /// Returns bit `index`.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::IndexOutOfRange`] if `index >= width`.
    pub fn get(&self, index: usize) -> Result<bool, SyndromeError> {
        self.check_index(index)?;
        Ok(self.bits.get(index))
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Indices of set bits in increasing order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Parity of the bits at `indices`; an index listed twice counts twice.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::IndexOutOfRange`] if any index is at or past the width.
    pub fn parity(&self, indices: &[usize]) -> Result<bool, SyndromeError> {
        let mut parity = false;
        for &index in indices {
            parity ^= self.get(index)?;
        }
        Ok(parity)
    }

    /// Bitwise XOR of two bitstrings of equal width.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::WidthMismatch`] if the widths differ.
    pub fn xor(&self, other: &Self) -> Result<Self, SyndromeError> {
        self.check_width(other)?;
        Ok(Self {
            width: self.width,
            bits: &self.bits ^ &other.bits,
        })
    }

    /// Bitwise AND of two bitstrings of equal width.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::WidthMismatch`] if the widths differ.
    pub fn and(&self, other: &Self) -> Result<Self, SyndromeError> {
        self.check_width(other)?;
        Ok(Self {
            width: self.width,
            bits: &self.bits & &other.bits,
        })
    }

    /// Copies `len` bits starting at `start` into a new bitstring.
    ///
    /// # Errors
    ///
    /// [`SyndromeError::IndexOutOfRange`] if the window reaches past the width.
    pub fn window(&self, start: usize, len: usize) -> Result<Self, SyndromeError> {
        let end = start.checked_add(len).unwrap_or(usize::MAX);
        if end > self.width {
            return Err(SyndromeError::IndexOutOfRange {
                index: end.saturating_sub(1),
                width: self.width,
            });
        }
        let bits = Bitstring::from_indices(
            self.bits
                .iter_ones()
                .skip_while(|&i| i < start)
                .take_while(|&i| i < end)
                .map(|i| i - start),
        );
        Ok(Self { width: len, bits })
    }

    /// Booleans, index 0 first.
    #[must_use]
    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.width).map(|i| self.bits.get(i)).collect()
    }

    /// LSB-first packed bytes, `width.div_ceil(8)` of them.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.width.div_ceil(8)];
        for i in self.bits.iter_ones() {
            bytes[i / 8] |= 1 << (i % 8);
        }
        bytes
    }

    /// `'0'`/`'1'` text, index 0 first.
    #[must_use]
    pub fn to_01_string(&self) -> String {
        self.to_string()
    }

    fn check_index(&self, index: usize) -> Result<(), SyndromeError> {
        if index >= self.width {
            return Err(SyndromeError::IndexOutOfRange {
                index,
                width: self.width,
            });
        }
        Ok(())
    }

    fn check_width(&self, other: &Self) -> Result<(), SyndromeError> {
        if self.width != other.width {
            return Err(SyndromeError::WidthMismatch {
                left: self.width,
                right: other.width,
            });
        }
        Ok(())
    }
}

impl fmt::Display for FixedWidthBitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.width {
            f.write_str(if self.bits.get(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Extracts the bits of one measurement round.
///
/// Round `round` covers bits `round * round_width .. (round + 1) * round_width`.
///
/// # Errors
///
/// - [`SyndromeError::ZeroRoundWidth`] if `round_width` is zero.
/// - [`SyndromeError::RoundOutOfRange`] if the window exceeds the width.
pub fn get_round_words(
    bits: &FixedWidthBitstring,
    round_width: usize,
    round: usize,
) -> Result<FixedWidthBitstring, SyndromeError> {
    if round_width == 0 {
        return Err(SyndromeError::ZeroRoundWidth);
    }
    let out_of_range = SyndromeError::RoundOutOfRange {
        round,
        round_width,
        width: bits.width(),
    };
    let start = round.checked_mul(round_width).ok_or(out_of_range.clone())?;
    match start.checked_add(round_width) {
        Some(end) if end <= bits.width() => bits.window(start, round_width),
        _ => Err(out_of_range),
    }
}
