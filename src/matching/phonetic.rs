//! Phonetic encodings used for "sounds like" name signals.
//!
//! Both encoders reproduce the behavior of PHP's `soundex()` and
//! `metaphone()` so codes line up with scores produced by the legacy
//! WordPress tooling. Non-ASCII letters are ignored.

/// Soundex digit for an uppercase ASCII letter. Vowels, H, W and Y map to `0`.
#[must_use]
pub const fn soundex_digit(c: u8) -> u8 {
    match c {
        b'B' | b'F' | b'P' | b'V' => b'1',
        b'C' | b'G' | b'J' | b'K' | b'Q' | b'S' | b'X' | b'Z' => b'2',
        b'D' | b'T' => b'3',
        b'L' => b'4',
        b'M' | b'N' => b'5',
        b'R' => b'6',
        _ => b'0',
    }
}

/// American Soundex code, four characters, zero padded.
///
/// Letters coded `0` (vowels, H, W, Y) reset adjacency, so a repeated
/// consonant code separated by any of them is emitted again. Input with no
/// letters pads to `"0000"`; empty input yields `""`.
#[must_use]
pub fn soundex(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let mut code = String::with_capacity(4);
    let mut last = 0u8;

    for c in name.bytes().map(|b| b.to_ascii_uppercase()) {
        if code.len() == 4 {
            break;
        }
        if !c.is_ascii_uppercase() {
            continue;
        }
        if code.is_empty() {
            code.push(c as char);
            last = soundex_digit(c);
            continue;
        }
        let digit = soundex_digit(c);
        if digit != last {
            if digit != b'0' {
                code.push(digit as char);
            }
            last = digit;
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    code
}

const fn is_vowel(c: u8) -> bool {
    matches!(c, b'A' | b'E' | b'I' | b'O' | b'U')
}

/// Letters that soften a preceding C or G.
const fn makes_soft(c: u8) -> bool {
    matches!(c, b'E' | b'I' | b'Y')
}

/// Letters that keep a following GH from sounding like F.
const fn blocks_gh_f(c: u8) -> bool {
    matches!(c, b'B' | b'D' | b'H')
}

/// Letters that silence a following H.
const fn affects_h(c: u8) -> bool {
    matches!(c, b'C' | b'G' | b'P' | b'S' | b'T')
}

/// Uppercased word with bounds-checked lookups; out of range reads as `0`.
struct Word {
    bytes: Vec<u8>,
}

impl Word {
    fn new(word: &str) -> Self {
        Self {
            bytes: word.bytes().map(|b| b.to_ascii_uppercase()).collect(),
        }
    }

    fn at(&self, idx: usize) -> u8 {
        self.bytes.get(idx).copied().unwrap_or(0)
    }

    fn behind(&self, idx: usize, n: usize) -> u8 {
        if idx >= n {
            self.at(idx - n)
        } else {
            0
        }
    }

    fn next(&self, idx: usize) -> u8 {
        self.at(idx + 1)
    }

    fn after(&self, idx: usize) -> u8 {
        if self.next(idx) == 0 {
            0
        } else {
            self.at(idx + 2)
        }
    }

    /// Letter `n` ahead, stopping at the end of the word.
    fn ahead(&self, idx: usize, n: usize) -> u8 {
        (1..=n)
            .map(|k| self.at(idx + k))
            .take_while(|&c| c != 0)
            .nth(n - 1)
            .unwrap_or(0)
    }
}

/// Metaphone code with no length limit.
///
/// `0` encodes "th" and `X` encodes "sh"/"ch", as in the classic
/// Lawrence Philips rule set.
#[must_use]
pub fn metaphone(word: &str) -> String {
    let w = Word::new(word);
    let mut out = String::new();

    let Some(mut idx) = w.bytes.iter().position(u8::is_ascii_alphabetic) else {
        return out;
    };

    // Initial-letter exceptions
    match w.at(idx) {
        b'A' => {
            if w.next(idx) == b'E' {
                out.push('E');
                idx += 2;
            } else {
                out.push('A');
                idx += 1;
            }
        }
        b'G' | b'K' | b'P' => {
            if w.next(idx) == b'N' {
                out.push('N');
                idx += 2;
            }
        }
        b'W' => {
            let next = w.next(idx);
            if next == b'R' {
                out.push('R');
                idx += 2;
            } else if next == b'H' || is_vowel(next) {
                out.push('W');
                idx += 2;
            }
        }
        b'X' => {
            out.push('S');
            idx += 1;
        }
        c @ (b'E' | b'I' | b'O' | b'U') => {
            out.push(c as char);
            idx += 1;
        }
        _ => {}
    }

    while idx < w.bytes.len() {
        let cur = w.at(idx);
        let last = w.behind(idx, 1);
        let next = w.next(idx);
        let after = w.after(idx);
        let mut skip = 0;

        if !cur.is_ascii_alphabetic() || (cur == last && cur != b'C') {
            idx += 1;
            continue;
        }

        match cur {
            b'B' => {
                if !(last == b'M' && next == 0) {
                    out.push('B');
                }
            }
            b'C' => {
                if makes_soft(next) {
                    if next == b'I' && after == b'A' {
                        out.push('X');
                    } else if last != b'S' {
                        out.push('S');
                    }
                } else if next == b'H' {
                    if after == b'R' || last == b'S' {
                        out.push('K');
                    } else {
                        out.push('X');
                    }
                    skip = 1;
                } else {
                    out.push('K');
                }
            }
            b'D' => {
                if next == b'G' && makes_soft(after) {
                    out.push('J');
                    skip = 1;
                } else {
                    out.push('T');
                }
            }
            b'G' => {
                if next == b'H' {
                    if !(blocks_gh_f(w.behind(idx, 3)) || w.behind(idx, 4) == b'H') {
                        out.push('F');
                        skip = 1;
                    }
                } else if next == b'N' {
                    let silent = !after.is_ascii_alphabetic()
                        || (after == b'E' && w.ahead(idx, 3) == b'D');
                    if !silent {
                        out.push('K');
                    }
                } else if makes_soft(next) && last != b'G' {
                    out.push('J');
                } else {
                    out.push('K');
                }
            }
            b'H' => {
                if is_vowel(next) && !affects_h(last) {
                    out.push('H');
                }
            }
            b'K' => {
                if last != b'C' {
                    out.push('K');
                }
            }
            b'P' => out.push(if next == b'H' { 'F' } else { 'P' }),
            b'Q' => out.push('K'),
            b'S' => {
                if next == b'I' && (after == b'O' || after == b'A') {
                    out.push('X');
                } else if next == b'H' {
                    out.push('X');
                    skip = 1;
                } else if next == b'C' && w.ahead(idx, 2) == b'H' && w.ahead(idx, 3) == b'W' {
                    out.push('X');
                    skip = 2;
                } else {
                    out.push('S');
                }
            }
            b'T' => {
                if next == b'I' && (after == b'O' || after == b'A') {
                    out.push('X');
                } else if next == b'H' {
                    out.push('0');
                    skip = 1;
                } else if !(next == b'C' && after == b'H') {
                    out.push('T');
                }
            }
            b'V' => out.push('F'),
            b'W' => {
                if is_vowel(next) {
                    out.push('W');
                }
            }
            b'X' => out.push_str("KS"),
            b'Y' => {
                if is_vowel(next) {
                    out.push('Y');
                }
            }
            b'Z' => out.push('S'),
            b'F' | b'J' | b'L' | b'M' | b'N' | b'R' => out.push(cur as char),
            _ => {}
        }

        idx += 1 + skip;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soundex_basic() {
        assert_eq!(soundex("Robert"), "R163");
        assert_eq!(soundex("Rupert"), "R163");
        assert_eq!(soundex("Smith"), "S530");
        assert_eq!(soundex("smyth"), "S530");
    }

    #[test]
    fn test_soundex_vowel_resets_adjacency() {
        // The repeated 2 after the H is emitted again.
        assert_eq!(soundex("Ashcraft"), "A226");
        assert_eq!(soundex("Tymczak"), "T522");
    }

    #[test]
    fn test_soundex_padding_and_empty() {
        assert_eq!(soundex("Lee"), "L000");
        assert_eq!(soundex(""), "");
        assert_eq!(soundex("123"), "0000");
    }

    #[test]
    fn test_metaphone_th_and_vowels() {
        assert_eq!(metaphone("smith"), "SM0");
        assert_eq!(metaphone("smyth"), "SM0");
        assert_eq!(metaphone("catherine"), metaphone("kathryn"));
        assert_eq!(metaphone("kathryn"), "K0RN");
    }

    #[test]
    fn test_metaphone_initial_exceptions() {
        assert_eq!(metaphone("knight"), "NFT");
        assert_eq!(metaphone("wright"), "RFT");
        assert_eq!(metaphone("xavier"), "SFR");
        assert_eq!(metaphone("aeron"), "ERN");
        assert_eq!(metaphone("ellen"), "ELN");
    }

    #[test]
    fn test_metaphone_consonant_rules() {
        assert_eq!(metaphone("john"), "JN");
        assert_eq!(metaphone("jon"), "JN");
        assert_eq!(metaphone("philip"), "FLP");
        assert_eq!(metaphone("dumb"), "TM");
        assert_eq!(metaphone("shaw"), "X");
        assert_eq!(metaphone("school"), "SKL");
        assert_eq!(metaphone("george"), "JRJ");
    }

    #[test]
    fn test_metaphone_skips_non_letters() {
        assert_eq!(metaphone(""), "");
        assert_eq!(metaphone("123"), "");
        assert_eq!(metaphone("  john"), "JN");
    }
}
