// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::Error;

/// Parses a comma separated list of font family names.
///
/// Names can be bare, like `Times New Roman`, or quoted with single or double quotes.
/// Inside quotes a backslash escapes the next char. Runs of whitespace inside
/// a bare name are collapsed into a single space.
///
/// # Errors
///
/// An empty list, an empty name, an unterminated quote or any data
/// after a quoted name other than a comma.
pub fn parse_family_list(text: &str) -> Result<Vec<String>, Error> {
    let mut s = Stream::new(text);
    let mut families = Vec::new();

    loop {
        s.skip_spaces();
        let name = match s.curr_char() {
            Some(q @ '"') | Some(q @ '\'') => s.parse_quoted(q)?,
            Some(_) => s.parse_bare()?,
            None => return Err(Error::InvalidFamilyList(s.pos)),
        };
        families.push(name);

        s.skip_spaces();
        match s.curr_char() {
            None => break,
            Some(',') => s.advance(),
            Some(_) => return Err(Error::InvalidFamilyList(s.pos)),
        }
    }

    Ok(families)
}

struct Stream {
    chars: Vec<char>,
    pos: usize,
}

impl Stream {
    fn new(text: &str) -> Self {
        Stream {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn curr_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_spaces(&mut self) {
        while self.curr_char().map_or(false, char::is_whitespace) {
            self.advance();
        }
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, Error> {
        let start = self.pos;
        self.advance();

        let mut name = String::new();
        loop {
            match self.curr_char() {
                None => return Err(Error::InvalidFamilyList(start)),
                Some('\\') => {
                    self.advance();
                    match self.curr_char() {
                        Some(c) => name.push(c),
                        None => return Err(Error::InvalidFamilyList(self.pos)),
                    }
                }
                Some(c) if c == quote => break,
                Some(c) => name.push(c),
            }
            self.advance();
        }
        self.advance();

        Ok(name)
    }

    fn parse_bare(&mut self) -> Result<String, Error> {
        let start = self.pos;
        let mut words: Vec<String> = Vec::new();
        let mut word = String::new();
        while let Some(c) = self.curr_char() {
            if c == ',' {
                break;
            }

            if c.is_whitespace() {
                if !word.is_empty() {
                    words.push(std::mem::take(&mut word));
                }
            } else {
                word.push(c);
            }

            self.advance();
        }

        if !word.is_empty() {
            words.push(word);
        }

        if words.is_empty() {
            return Err(Error::InvalidFamilyList(start));
        }

        Ok(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                let expected: Vec<String> = $result.iter().map(|s: &&str| s.to_string()).collect();
                assert_eq!(parse_family_list($text).unwrap(), expected);
            }
        )
    }

    macro_rules! test_err {
        ($name:ident, $text:expr) => (
            #[test]
            fn $name() {
                assert!(parse_family_list($text).is_err());
            }
        )
    }

    test_err!(empty, "");
    test_err!(bare_comma, ",");
    test_err!(bare_commas, ",, ,,");
    test_err!(escaped_then_extra_dquote, r#""\\"""#);
    test_err!(escaped_then_extra_squote, r#"'\\''"#);
    test_err!(too_many_dquotes, r#"""""#);
    test_err!(too_many_squotes, "'''");
    test_err!(unterminated, "'Times");
    test_err!(trailing_comma, "serif,");

    test!(quoted_comma_1, "','", &[","]);
    test!(quoted_comma_2, r#"",""#, &[","]);
    test!(quoted_commas, "',,', \",,\"", &[",,", ",,"]);

    test!(backslashes_bare, r"\font\\", &[r"\font\\"]);
    test!(backslashes_dquote, r#""\\font\\\\""#, &[r"\font\\"]);
    test!(backslashes_squote, r"'\\font\\\\'", &[r"\font\\"]);

    test!(quotes_bare, r#"serif, serif's, serif"s"#, &["serif", "serif's", "serif\"s"]);
    test!(quotes_squote, r#"'serif', 'serif\'s', 'serif"s'"#, &["serif", "serif's", "serif\"s"]);
    test!(quotes_dquote, r#""serif", "serif's", "serif\"s""#, &["serif", "serif's", "serif\"s"]);

    const COMPLEX: &[&str] = &["Times New Roman", "Georgia Common", "Helvetica Neue", "serif"];
    test!(complex_bare, "Times New Roman, Georgia Common, Helvetica Neue, serif", COMPLEX);
    test!(complex_mixed, r#"Times New Roman, "Georgia Common", 'Helvetica Neue', "serif""#, COMPLEX);
    test!(complex_spacing,
        r#"Times New Roman  ,"Georgia Common"              , 'Helvetica Neue' ,"serif""#,
        COMPLEX);
}
