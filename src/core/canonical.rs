//! core::canonical
//!
//! Normalization of arbitrary text into a lattice's alphabet.
//!
//! # Rules
//!
//! Applied in order:
//! 1. trim surrounding whitespace
//! 2. apply the lattice casing (`ß` upper-cases to `SS`)
//! 3. substitute unsupported characters from a fixed table: accented Latin
//!    letters fold to their base letter, ligatures expand, typographic
//!    quotes and dashes fold to ASCII, full-width forms fold to ASCII,
//!    whitespace folds to the separator
//! 4. anything still unsupported becomes the separator
//!
//! Separator runs are then collapsed and trimmed, which makes the
//! transformation idempotent. A separator left by rule 4 is the same
//! character as one left by whitespace, so a second pass could not tell
//! `A☃☃B` (two separators) from `A  B` (two spaces); both collapse to
//! `A B`. A dropped character still leaves a word boundary behind. Canonicalization never fails; at worst the
//! result is empty.
//!
//! # Example
//!
//! ```
//! use qbc::core::canonical::canonicalize;
//! use qbc::core::lattice::LatticeRegistry;
//!
//! let registry = LatticeRegistry::builtin();
//! let g1 = registry.get("G1").unwrap();
//!
//! let text = canonicalize(g1, "  Café  crème☃brûlée ");
//! assert_eq!(text.as_str(), "CAFE CREME BRULEE");
//! assert_eq!(canonicalize(g1, text.as_str()), text);
//! ```

use std::fmt;

use serde::Serialize;

use crate::core::lattice::Lattice;
use crate::core::types::{ContentHash, LatticeKey};

/// Text restricted to one lattice's alphabet plus its separator.
///
/// Only [`canonicalize`] produces values of this type, so holding one is
/// proof that every character has an anchor on the named lattice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalText {
    text: String,
    lattice_key: LatticeKey,
}

impl CanonicalText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Key of the lattice this text was canonicalized for.
    pub fn lattice_key(&self) -> &LatticeKey {
        &self.lattice_key
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// SHA-256 integrity digest of the text. Independent of the lattice.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of_str(&self.text)
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for CanonicalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Normalize `raw` into `lattice`'s alphabet.
pub fn canonicalize(lattice: &Lattice, raw: &str) -> CanonicalText {
    let separator = lattice.separator();
    let casing = lattice.casing();

    let mut cased = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        casing.push_cased(c, &mut cased);
    }

    let mut mapped = String::with_capacity(cased.len());
    let mut substituted = 0usize;
    for c in cased.chars() {
        if lattice.supports(c) {
            mapped.push(c);
            continue;
        }
        if c.is_whitespace() {
            mapped.push(separator);
            continue;
        }

        substituted += 1;
        let mut replacement = String::new();
        if let Some(folded) = fold(c) {
            for f in folded.chars() {
                casing.push_cased(f, &mut replacement);
            }
        } else if let Some(ascii) = fold_fullwidth(c) {
            casing.push_cased(ascii, &mut replacement);
        }

        if replacement.is_empty() {
            mapped.push(separator);
        }
        for r in replacement.chars() {
            mapped.push(if lattice.supports(r) { r } else { separator });
        }
    }

    let text = collapse_separators(&mapped, separator);
    if substituted > 0 {
        tracing::trace!(
            lattice = %lattice.key(),
            substituted,
            "canonicalized text with substitutions"
        );
    }

    CanonicalText {
        text,
        lattice_key: lattice.key().clone(),
    }
}

/// Collapse runs of `separator` into one and drop leading/trailing ones.
fn collapse_separators(text: &str, separator: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = false;
    for c in text.chars() {
        if c == separator {
            pending = !out.is_empty();
            continue;
        }
        if pending {
            out.push(separator);
            pending = false;
        }
        out.push(c);
    }
    out
}

/// Map a full-width ASCII variant (U+FF01..U+FF5E) to plain ASCII.
fn fold_fullwidth(c: char) -> Option<char> {
    match c {
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0),
        '\u{3000}' => Some(' '),
        _ => None,
    }
}

/// Fixed substitution table. Case is kept so the caller can re-apply the
/// lattice casing to the result.
fn fold(c: char) -> Option<&'static str> {
    let folded = match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' | 'ª' => "a",
        'Æ' => "AE",
        'æ' => "ae",
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => "C",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'Ð' | 'Ď' | 'Đ' => "D",
        'ð' | 'ď' | 'đ' => "d",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĥ' | 'Ħ' => "H",
        'ĥ' | 'ħ' => "h",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => "I",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'Ĵ' => "J",
        'ĵ' => "j",
        'Ķ' => "K",
        'ķ' => "k",
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ŀ' | 'Ł' => "L",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => "N",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' | 'º' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Ŕ' | 'Ŗ' | 'Ř' => "R",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => "S",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ẞ' => "SS",
        'Ţ' | 'Ť' | 'Ŧ' => "T",
        'ţ' | 'ť' | 'ŧ' => "t",
        'Þ' => "TH",
        'þ' => "th",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'Ŵ' => "W",
        'ŵ' => "w",
        'Ý' | 'Ŷ' | 'Ÿ' => "Y",
        'ý' | 'ŷ' | 'ÿ' => "y",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",
        '‘' | '’' | '‚' | '‛' | '′' | '`' | '´' => "'",
        '“' | '”' | '„' | '‟' | '″' | '«' | '»' => "\"",
        '‐' | '‑' | '‒' | '–' | '—' | '―' | '−' => "-",
        '…' => "...",
        '¿' => "?",
        '¡' => "!",
        '·' | '•' => ".",
        '¹' => "1",
        '²' => "2",
        '³' => "3",
        _ => return None,
    };
    Some(folded)
}
